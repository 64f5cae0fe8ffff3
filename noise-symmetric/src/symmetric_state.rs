use core::marker::PhantomData;

use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::cipher_state::CipherState;
use crate::config::SymmetricConfig;
use crate::crypto::aead::ChaChaPoly;
use crate::crypto::hash::Blake2b;
use crate::crypto::{Cipher, Dh, HashFunction, X25519};
use crate::error::{Error, Result};
use crate::keys::{TransportKey, truncate_key};

/// The default suite, `25519_ChaChaPoly_BLAKE2b`.
pub type DefaultSymmetricState = SymmetricState<X25519, ChaChaPoly, Blake2b>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    /// Constructed, protocol name not yet mixed in.
    Uninitialized,
    Ready,
    /// Transport keys handed out; only the handshake hash may still be read.
    Split,
    /// Buffers zeroed; every operation fails.
    Cleared,
}

/// Noise SymmetricState: the handshake hash, the chaining key and a cipher.
///
/// Per Noise spec Section 5.2. `D` is the DH engine used by
/// [`mix_key`](Self::mix_key), `C` the AEAD and `H` the hash/HKDF.
///
/// Every ciphertext is bound to the transcript: the handshake hash as it
/// stood *before* the call is the associated data, and the ciphertext is
/// mixed in afterwards. A failed decryption leaves the hash untouched.
///
/// Secrets are zeroed by [`clear`](Self::clear) and again on drop. After
/// `clear` every operation returns [`Error::UseAfterClear`]; after
/// [`split`](Self::split) everything except reading the handshake hash
/// returns [`Error::AlreadySplit`].
#[derive(ZeroizeOnDrop)]
pub struct SymmetricState<D: Dh = X25519, C: Cipher = ChaChaPoly, H: HashFunction = Blake2b> {
    cipher: CipherState<C>,
    #[zeroize(skip)]
    curve: D,
    /// Chaining key (ck), absent until the protocol name is mixed in.
    ck: Option<Zeroizing<Vec<u8>>>,
    /// Handshake hash (h), always `H::HASH_LEN` bytes until cleared.
    h: Vec<u8>,
    #[zeroize(skip)]
    lifecycle: Lifecycle,
    #[zeroize(skip)]
    _hash: PhantomData<H>,
}

impl<D: Dh, C: Cipher, H: HashFunction> core::fmt::Debug for SymmetricState<D, C, H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SymmetricState")
            .field("algorithm", &Self::algorithm())
            .field("lifecycle", &self.lifecycle)
            .field("has_key", &self.cipher.has_key())
            .finish_non_exhaustive()
    }
}

impl<D: Dh, C: Cipher, H: HashFunction> SymmetricState<D, C, H> {
    /// Digest length of the configured hash.
    pub const HASH_LEN: usize = H::HASH_LEN;

    /// Create an uninitialized state using the DH engine named by `config`.
    ///
    /// The handshake hash starts zero-filled and there is no chaining key
    /// until [`initialize_symmetric`](Self::initialize_symmetric) is called.
    pub fn new(config: SymmetricConfig<D>) -> Self {
        Self {
            cipher: CipherState::empty(),
            curve: config.into_curve(),
            ck: None,
            h: vec![0u8; H::HASH_LEN],
            lifecycle: Lifecycle::Uninitialized,
            _hash: PhantomData,
        }
    }

    /// Create a state and seed it with `protocol_name` in one step.
    pub fn initialize(config: SymmetricConfig<D>, protocol_name: &str) -> Self {
        let mut state = Self::new(config);
        state.seed(protocol_name.as_bytes());
        state
    }

    /// `InitializeSymmetric(protocol_name)`, per Noise spec Section 5.2:
    /// - If protocol_name.len() <= HASH_LEN, pad with zeros
    /// - Otherwise, hash the protocol name
    ///
    /// The chaining key starts equal to the handshake hash.
    pub fn initialize_symmetric(&mut self, protocol_name: &[u8]) -> Result<()> {
        match self.lifecycle {
            Lifecycle::Uninitialized => {
                self.seed(protocol_name);
                Ok(())
            }
            Lifecycle::Ready => Err(Error::InvariantViolation(
                "symmetric state is already initialized",
            )),
            Lifecycle::Split => Err(Error::AlreadySplit),
            Lifecycle::Cleared => Err(Error::UseAfterClear),
        }
    }

    fn seed(&mut self, protocol_name: &[u8]) {
        let h = if protocol_name.len() <= H::HASH_LEN {
            let mut h = vec![0u8; H::HASH_LEN];
            h[..protocol_name.len()].copy_from_slice(protocol_name);
            h
        } else {
            H::hash(&[protocol_name])
        };

        self.ck = Some(Zeroizing::new(h.clone()));
        self.h.copy_from_slice(&h);
        self.lifecycle = Lifecycle::Ready;
        tracing::trace!(algorithm = %Self::algorithm(), "symmetric state initialized");
    }

    /// `{dh}_{cipher}_{hash}`, e.g. `25519_ChaChaPoly_BLAKE2b`.
    pub fn algorithm() -> String {
        format!("{}_{}_{}", D::NAME, C::NAME, H::NAME)
    }

    /// The full protocol name for a handshake pattern, e.g.
    /// `Noise_XX_25519_ChaChaPoly_BLAKE2b` for `"XX"`.
    pub fn protocol_name(pattern: &str) -> String {
        format!("Noise_{pattern}_{}", Self::algorithm())
    }

    /// The DH engine, e.g. to generate ephemeral key pairs.
    pub fn curve(&self) -> &D {
        &self.curve
    }

    fn ensure_ready(&self) -> Result<()> {
        match self.lifecycle {
            Lifecycle::Ready => Ok(()),
            Lifecycle::Uninitialized => Err(Error::InvariantViolation(
                "symmetric state used before initialize_symmetric",
            )),
            Lifecycle::Split => Err(Error::AlreadySplit),
            Lifecycle::Cleared => Err(Error::UseAfterClear),
        }
    }

    /// Like `ensure_ready`, but the transcript stays readable after split.
    fn ensure_readable(&self) -> Result<()> {
        match self.lifecycle {
            Lifecycle::Ready | Lifecycle::Split => Ok(()),
            Lifecycle::Uninitialized => Err(Error::InvariantViolation(
                "handshake hash read before initialize_symmetric",
            )),
            Lifecycle::Cleared => Err(Error::UseAfterClear),
        }
    }

    /// Mix data into the handshake hash.
    ///
    /// Per Noise spec: h = HASH(h || data)
    pub fn mix_hash(&mut self, data: &[u8]) -> Result<()> {
        self.ensure_ready()?;
        self.absorb(data);
        Ok(())
    }

    /// Overwrites `h` in place so no stale transcript value is left behind.
    fn absorb(&mut self, data: &[u8]) {
        let next = Zeroizing::new(H::hash(&[&self.h, data]));
        self.h.copy_from_slice(&next);
    }

    /// Perform DH between `peer_public_key` and `local_private_key` and mix
    /// the result into the chaining key.
    ///
    /// Key validation is the DH engine's; its errors come back as
    /// [`Error::KeyAgreement`] and leave the state unchanged.
    pub fn mix_key(&mut self, peer_public_key: &[u8], local_private_key: &[u8]) -> Result<()> {
        self.ensure_ready()?;
        let shared = self
            .curve
            .dh(peer_public_key, local_private_key)
            .inspect_err(|e| tracing::debug!(error = %e, "key agreement rejected"))?;
        self.mix_key_material(shared.as_bytes())
    }

    /// Mix input key material into the chaining key via HKDF.
    ///
    /// Per Noise spec: (ck, temp_k) = HKDF(ck, input_key_material, 2)
    /// Then: InitializeKey(temp_k), truncated to the cipher key length.
    pub fn mix_key_material(&mut self, input_key_material: &[u8]) -> Result<()> {
        self.ensure_ready()?;
        let ck = self.chaining_key()?;
        let (new_ck, temp_k) = H::hkdf2(ck, input_key_material)?;
        self.ck = Some(new_ck);
        self.rekey_cipher(&temp_k);
        tracing::trace!(ikm_len = input_key_material.len(), "mixed key");
        Ok(())
    }

    /// Mix key material into both the chaining key and the handshake hash,
    /// used for pre-shared keys.
    ///
    /// Per Noise spec: (ck, temp_h, temp_k) = HKDF(ck, input_key_material, 3),
    /// MixHash(temp_h), InitializeKey(temp_k).
    pub fn mix_key_and_hash(&mut self, input_key_material: &[u8]) -> Result<()> {
        self.ensure_ready()?;
        let ck = self.chaining_key()?;
        let (new_ck, temp_h, temp_k) = H::hkdf3(ck, input_key_material)?;
        self.ck = Some(new_ck);
        self.absorb(&temp_h);
        self.rekey_cipher(&temp_k);
        tracing::trace!("mixed key and hash");
        Ok(())
    }

    fn chaining_key(&self) -> Result<&[u8]> {
        self.ck
            .as_deref()
            .map(Vec::as_slice)
            .ok_or(Error::InvariantViolation("chaining key is not initialized"))
    }

    fn rekey_cipher(&mut self, temp_k: &[u8]) {
        let mut key = truncate_key(temp_k);
        self.cipher.initialize_key(key);
        key.zeroize();
    }

    /// Encrypt plaintext and mix the ciphertext into the hash.
    ///
    /// Per Noise spec: ciphertext = EncryptWithAd(h, plaintext), then MixHash(ciphertext)
    pub fn encrypt_and_hash(&mut self, plaintext: &[u8]) -> Result<Vec<u8>> {
        self.ensure_ready()?;
        let ciphertext = self.cipher.encrypt_with_ad(&self.h, plaintext)?;
        self.absorb(&ciphertext);
        Ok(ciphertext)
    }

    /// Decrypt ciphertext and mix it into the hash.
    ///
    /// Per Noise spec: `plaintext = DecryptWithAd(h, ciphertext)`, then `MixHash(ciphertext)`.
    /// The current hash is used as AD *before* mixing in the ciphertext. On
    /// failure nothing is mixed: the session is about to be aborted and the
    /// transcript must stay as it was.
    pub fn decrypt_and_hash(&mut self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        self.ensure_ready()?;
        let plaintext = self
            .cipher
            .decrypt_with_ad(&self.h, ciphertext)
            .inspect_err(|e| {
                tracing::debug!(error = %e, len = ciphertext.len(), "handshake payload rejected")
            })?;
        self.absorb(ciphertext);
        Ok(plaintext)
    }

    /// A copy of the current handshake hash.
    ///
    /// Still available after [`split`](Self::split), for channel binding.
    pub fn handshake_hash(&self) -> Result<Vec<u8>> {
        self.ensure_readable()?;
        Ok(self.h.clone())
    }

    /// Copy the current handshake hash into `out`, which must be exactly
    /// `HASH_LEN` bytes.
    pub fn copy_handshake_hash(&self, out: &mut [u8]) -> Result<()> {
        self.ensure_readable()?;
        if out.len() != H::HASH_LEN {
            return Err(Error::BufferLength {
                expected: H::HASH_LEN,
                actual: out.len(),
            });
        }
        out.copy_from_slice(&self.h);
        Ok(())
    }

    /// Derive the two transport keys and end the handshake phase.
    ///
    /// Per Noise spec Section 5.2: (temp_k1, temp_k2) = HKDF(ck, "", 2),
    /// each truncated to the cipher key length. The chaining key is
    /// destroyed; the handshake hash stays readable.
    pub fn split(&mut self) -> Result<(TransportKey, TransportKey)> {
        self.ensure_ready()?;
        let ck = self.chaining_key()?;
        let (temp_k1, temp_k2) = H::hkdf2(ck, &[])?;

        self.ck.zeroize();
        self.cipher.clear();
        self.lifecycle = Lifecycle::Split;
        tracing::debug!(algorithm = %Self::algorithm(), "handshake split into transport keys");

        Ok((
            TransportKey::from_material(&temp_k1),
            TransportKey::from_material(&temp_k2),
        ))
    }

    /// [`split`](Self::split), with each key loaded into a fresh
    /// [`CipherState`] for the transport phase.
    pub fn split_cipher_states(&mut self) -> Result<(CipherState<C>, CipherState<C>)> {
        let (k1, k2) = self.split()?;
        Ok((
            CipherState::with_key(*k1.as_bytes()),
            CipherState::with_key(*k2.as_bytes()),
        ))
    }

    /// Whether the cipher has been keyed by a `mix_key*` call.
    pub fn has_key(&self) -> bool {
        self.cipher.has_key()
    }

    /// The current encryption overhead.
    pub fn overhead(&self) -> usize {
        self.cipher.overhead()
    }

    /// Zero the handshake hash and chaining key, clear the cipher and poison
    /// the state. Safe to call more than once and in any state.
    pub fn clear(&mut self) {
        if self.lifecycle == Lifecycle::Cleared {
            return;
        }
        self.cipher.clear();
        self.h.zeroize();
        self.ck.zeroize();
        self.lifecycle = Lifecycle::Cleared;
        tracing::debug!("symmetric state cleared");
    }
}
