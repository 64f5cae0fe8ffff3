//! Cryptographic engines plugged into the symmetric state.
//!
//! - [`aead`]: ChaChaPoly and AESGCM ciphers
//! - [`hash`]: BLAKE2b, BLAKE2s, SHA256 and SHA512
//! - [`kdf`]: the two- and three-output Noise HKDF over any of those hashes
//! - [`x25519`]: X25519 Diffie-Hellman with low-order point rejection
//!
//! Each family sits behind a trait ([`Dh`], [`Cipher`], [`HashFunction`]) so a
//! [`SymmetricState`](crate::SymmetricState) can be composed from any pairing.

use rand_core::CryptoRngCore;
use sha2::digest::Digest;
use sha2::digest::core_api::BlockSizeUser;
use zeroize::Zeroizing;

use crate::error::{KeyAgreementError, Result};
use crate::keys::{KeyPair, PublicKey, SharedSecret, truncate_key};

pub mod aead;
pub mod hash;
pub mod kdf;
pub mod x25519;

pub use aead::{AEAD_KEY_LEN, AEAD_TAG_LEN, AesGcm, ChaChaPoly};
pub use hash::{Blake2b, Blake2s, Sha256, Sha512};
pub use kdf::{KdfOutput2, KdfOutput3};
pub use x25519::X25519;

/// A Diffie-Hellman engine (Noise spec Section 4.1).
pub trait Dh {
    /// Name used in the protocol name, e.g. `25519`.
    const NAME: &'static str;
    /// Public key length in bytes.
    const PUBLIC_KEY_LEN: usize;
    /// Secret key length in bytes.
    const SECRET_KEY_LEN: usize;
    /// Shared secret length in bytes.
    const DH_LEN: usize;

    /// Agree on a shared secret from a peer public key and a local secret key.
    ///
    /// Malformed keys and non-contributory results are errors.
    fn dh(
        &self,
        public_key: &[u8],
        secret_key: &[u8],
    ) -> core::result::Result<SharedSecret, KeyAgreementError>;

    /// Derive the public key for a secret key.
    fn public_key(&self, secret_key: &[u8]) -> core::result::Result<PublicKey, KeyAgreementError>;

    /// Generate a fresh key pair.
    fn generate_keypair(&self, rng: &mut impl CryptoRngCore) -> KeyPair;
}

/// An AEAD cipher with a 32-byte key, 16-byte tag and 64-bit counter nonce
/// (Noise spec Section 4.2).
pub trait Cipher {
    /// Name used in the protocol name, e.g. `ChaChaPoly`.
    const NAME: &'static str;

    /// Encrypt `plaintext`, returning ciphertext with the tag appended.
    fn encrypt(
        key: &[u8; AEAD_KEY_LEN],
        nonce: u64,
        ad: &[u8],
        plaintext: &[u8],
    ) -> Result<Vec<u8>>;

    /// Verify and decrypt `ciphertext` (tag included).
    fn decrypt(
        key: &[u8; AEAD_KEY_LEN],
        nonce: u64,
        ad: &[u8],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>>;

    /// Derive a new key from `key` (Noise spec Section 11.3).
    ///
    /// `REKEY(k) = ENCRYPT(k, 2^64-1, "", zeros)`, truncated to the key length.
    fn rekey(key: &[u8; AEAD_KEY_LEN]) -> Result<[u8; AEAD_KEY_LEN]> {
        let out = Zeroizing::new(Self::encrypt(key, u64::MAX, &[], &[0u8; AEAD_KEY_LEN])?);
        Ok(truncate_key(&out))
    }
}

/// A hash function and the HKDF built over it (Noise spec Section 4.3).
pub trait HashFunction {
    /// Name used in the protocol name, e.g. `BLAKE2b`.
    const NAME: &'static str;
    /// Digest length in bytes.
    const HASH_LEN: usize;

    /// The underlying `digest` implementation.
    type Hasher: Digest + BlockSizeUser + Clone;

    /// Hash the concatenation of `parts` without building it.
    fn hash(parts: &[&[u8]]) -> Vec<u8> {
        let mut hasher = Self::Hasher::new();
        for part in parts {
            hasher.update(part);
        }
        hasher.finalize().to_vec()
    }

    /// `HKDF(chaining_key, input_key_material, 2)`.
    fn hkdf2(chaining_key: &[u8], input_key_material: &[u8]) -> Result<KdfOutput2> {
        kdf::hkdf2::<Self::Hasher>(chaining_key, input_key_material)
    }

    /// `HKDF(chaining_key, input_key_material, 3)`.
    fn hkdf3(chaining_key: &[u8], input_key_material: &[u8]) -> Result<KdfOutput3> {
        kdf::hkdf3::<Self::Hasher>(chaining_key, input_key_material)
    }
}
