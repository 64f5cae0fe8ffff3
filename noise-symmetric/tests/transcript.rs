//! End-to-end transcript tests: two parties drive their symmetric states
//! through the same calls and must end up agreeing.

use noise_symmetric::{
    AesGcm, Blake2s, ChaChaPoly, DefaultSymmetricState, Dh, Error, ErrorKind, KeyPair, Sha256,
    SymmetricConfig, SymmetricState, X25519,
};
use rand::rngs::OsRng;

const NN_BLAKE2B: &str = "Noise_NN_25519_ChaChaPoly_BLAKE2b";

type AesSha = SymmetricState<X25519, AesGcm, Sha256>;

fn keypair() -> KeyPair {
    X25519.generate_keypair(&mut OsRng)
}

/// Initiator and responder states after `<- s ... -> e, es` key mixing.
fn es_pair<C, H>(name: &str) -> (SymmetricState<X25519, C, H>, SymmetricState<X25519, C, H>)
where
    C: noise_symmetric::Cipher,
    H: noise_symmetric::HashFunction,
{
    let static_key = keypair();
    let ephemeral = keypair();

    let mut initiator = SymmetricState::<X25519, C, H>::initialize(SymmetricConfig::new(), name);
    let mut responder = SymmetricState::<X25519, C, H>::initialize(SymmetricConfig::new(), name);

    for state in [&mut initiator, &mut responder] {
        state.mix_hash(&[]).unwrap();
        state.mix_hash(static_key.public.as_bytes()).unwrap();
        state.mix_hash(ephemeral.public.as_bytes()).unwrap();
    }

    initiator
        .mix_key(static_key.public.as_bytes(), ephemeral.secret.as_bytes())
        .unwrap();
    responder
        .mix_key(ephemeral.public.as_bytes(), static_key.secret.as_bytes())
        .unwrap();

    (initiator, responder)
}

#[test]
fn n_pattern_hello() {
    let name = AesSha::protocol_name("N");
    assert_eq!(name, "Noise_N_25519_AESGCM_SHA256");

    let static_key = keypair();
    let ephemeral = keypair();

    let mut initiator = AesSha::initialize(SymmetricConfig::new(), &name);
    initiator.mix_hash(&[]).unwrap();
    initiator
        .mix_key(static_key.public.as_bytes(), ephemeral.secret.as_bytes())
        .unwrap();
    let ciphertext = initiator.encrypt_and_hash(b"hello").unwrap();
    assert_eq!(ciphertext.len(), 5 + initiator.overhead());
    assert_eq!(ciphertext.len(), 21);

    let mut responder = AesSha::initialize(SymmetricConfig::new(), &name);
    responder.mix_hash(&[]).unwrap();
    responder
        .mix_key(ephemeral.public.as_bytes(), static_key.secret.as_bytes())
        .unwrap();
    assert_eq!(responder.decrypt_and_hash(&ciphertext).unwrap(), b"hello");

    assert_eq!(
        initiator.handshake_hash().unwrap(),
        responder.handshake_hash().unwrap()
    );
}

#[test]
fn identical_calls_give_identical_digests() {
    let run = |ikm: &[u8]| {
        let mut s = DefaultSymmetricState::initialize(SymmetricConfig::new(), NN_BLAKE2B);
        s.mix_hash(b"prologue").unwrap();
        s.mix_key_material(ikm).unwrap();
        s.mix_hash(b"e").unwrap();
        s.handshake_hash().unwrap()
    };

    assert_eq!(run(b"secret"), run(b"secret"));
    // mix_key does not touch h, so the digest matches for any key material
    assert_eq!(run(b"secret"), run(b"other"));
}

#[test]
fn protocol_names_separate_transcripts() {
    let a = DefaultSymmetricState::initialize(SymmetricConfig::new(), NN_BLAKE2B);
    let b = DefaultSymmetricState::initialize(
        SymmetricConfig::new(),
        "Noise_XX_25519_ChaChaPoly_BLAKE2b",
    );
    assert_ne!(a.handshake_hash().unwrap(), b.handshake_hash().unwrap());
}

#[test]
fn multi_message_exchange() {
    let name = DefaultSymmetricState::protocol_name("N");
    let (mut alice, mut bob) = es_pair::<ChaChaPoly, noise_symmetric::Blake2b>(&name);

    let messages: [&[u8]; 4] = [b"", b"one", &[0xAA; 300], b"last"];
    for (i, msg) in messages.iter().enumerate() {
        let (sender, receiver) = if i % 2 == 0 {
            (&mut alice, &mut bob)
        } else {
            (&mut bob, &mut alice)
        };
        let ct = sender.encrypt_and_hash(msg).unwrap();
        assert_eq!(ct.len(), msg.len() + 16);
        assert_eq!(receiver.decrypt_and_hash(&ct).unwrap(), *msg);
    }

    assert_eq!(alice.handshake_hash().unwrap(), bob.handshake_hash().unwrap());
}

#[test]
fn replayed_ciphertext_is_rejected() {
    let name = AesSha::protocol_name("N");
    let (mut alice, mut bob) = es_pair::<AesGcm, Sha256>(&name);

    let ct = alice.encrypt_and_hash(b"once").unwrap();
    bob.decrypt_and_hash(&ct).unwrap();

    // The transcript and nonce have both moved on
    let err = bob.decrypt_and_hash(&ct).unwrap_err();
    assert_eq!(err, Error::AuthenticationFailed);
    assert_eq!(err.kind(), ErrorKind::ProtocolFatal);
}

#[test]
fn tampering_is_detected_and_transcript_kept() {
    let name = DefaultSymmetricState::protocol_name("N");
    let (mut alice, mut bob) = es_pair::<ChaChaPoly, noise_symmetric::Blake2b>(&name);

    let ct = alice.encrypt_and_hash(b"payload").unwrap();
    let before = bob.handshake_hash().unwrap();

    for i in 0..ct.len() {
        let mut bad = ct.clone();
        bad[i] ^= 0x01;
        assert_eq!(bob.decrypt_and_hash(&bad), Err(Error::AuthenticationFailed));
        assert_eq!(bob.handshake_hash().unwrap(), before);
    }

    // The genuine message still goes through afterwards
    assert_eq!(bob.decrypt_and_hash(&ct).unwrap(), b"payload");
}

#[test]
fn split_gives_two_independent_directions() {
    let name = SymmetricState::<X25519, ChaChaPoly, Blake2s>::protocol_name("N");
    let (mut alice, mut bob) = es_pair::<ChaChaPoly, Blake2s>(&name);

    let (mut a_send, mut a_recv) = alice.split_cipher_states().unwrap();
    let (mut b_recv, mut b_send) = bob.split_cipher_states().unwrap();

    let ct = a_send.encrypt_with_ad(&[], b"to bob").unwrap();
    assert_eq!(b_recv.decrypt_with_ad(&[], &ct).unwrap(), b"to bob");

    let ct = b_send.encrypt_with_ad(&[], b"to alice").unwrap();
    assert_eq!(a_recv.decrypt_with_ad(&[], &ct).unwrap(), b"to alice");

    // A message on one direction's key does not open on the other
    let ct = a_send.encrypt_with_ad(&[], b"crossed").unwrap();
    assert!(a_recv.decrypt_with_ad(&[], &ct).is_err());
}

#[test]
fn handshake_hash_survives_split_for_channel_binding() {
    let name = AesSha::protocol_name("N");
    let (mut alice, mut bob) = es_pair::<AesGcm, Sha256>(&name);
    let ct = alice.encrypt_and_hash(b"").unwrap();
    bob.decrypt_and_hash(&ct).unwrap();

    alice.split().unwrap();
    bob.split().unwrap();

    let mut a = [0u8; 32];
    let mut b = [0u8; 32];
    alice.copy_handshake_hash(&mut a).unwrap();
    bob.copy_handshake_hash(&mut b).unwrap();
    assert_eq!(a, b);

    let err = alice.encrypt_and_hash(b"late").unwrap_err();
    assert_eq!(err, Error::AlreadySplit);
    assert_eq!(err.kind(), ErrorKind::ContractViolation);
}

#[test]
fn cleared_state_is_unusable() {
    let name = DefaultSymmetricState::protocol_name("N");
    let (mut alice, _) = es_pair::<ChaChaPoly, noise_symmetric::Blake2b>(&name);

    alice.clear();
    assert!(!alice.has_key());
    assert_eq!(alice.mix_hash(b"x"), Err(Error::UseAfterClear));
    assert_eq!(alice.encrypt_and_hash(b"x"), Err(Error::UseAfterClear));
    assert_eq!(alice.handshake_hash(), Err(Error::UseAfterClear));
    assert!(matches!(alice.split(), Err(Error::UseAfterClear)));
}

#[test]
fn low_order_peer_key_is_fatal() {
    let mut s = DefaultSymmetricState::initialize(SymmetricConfig::new(), NN_BLAKE2B);
    let local = keypair();

    let err = s.mix_key(&[0u8; 32], local.secret.as_bytes()).unwrap_err();
    assert!(matches!(err, Error::KeyAgreement(_)));
    assert_eq!(err.kind(), ErrorKind::ProtocolFatal);
    assert!(!s.has_key());
}

#[test]
fn psk_mixing_keeps_parties_in_sync() {
    let name = DefaultSymmetricState::protocol_name("Npsk0");
    let (mut alice, mut bob) = es_pair::<ChaChaPoly, noise_symmetric::Blake2b>(&name);
    let psk = [0x5A; 32];

    alice.mix_key_and_hash(&psk).unwrap();
    bob.mix_key_and_hash(&psk).unwrap();
    assert_eq!(alice.handshake_hash().unwrap(), bob.handshake_hash().unwrap());

    let ct = alice.encrypt_and_hash(b"with psk").unwrap();
    assert_eq!(bob.decrypt_and_hash(&ct).unwrap(), b"with psk");
}
