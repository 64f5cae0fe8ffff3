//! Key material exchanged with the DH engine and produced by `split()`.
//!
//! Secrets are zeroized from memory when dropped and never printed.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::aead::AEAD_KEY_LEN;

/// A DH secret key in the curve's raw encoding.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey(Vec<u8>);

impl SecretKey {
    /// Create from raw secret key material.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }

    /// Access the raw secret key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl core::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SecretKey([REDACTED])")
    }
}

/// A DH public key in the curve's raw encoding.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey(Vec<u8>);

impl PublicKey {
    /// Create from a raw public key.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }

    /// Access the raw bytes of this public key.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl core::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let prefix = &self.0[..self.0.len().min(4)];
        write!(f, "PublicKey({prefix:02x?})")
    }
}

/// A secret key together with its public key.
#[derive(Debug, Clone)]
pub struct KeyPair {
    pub secret: SecretKey,
    pub public: PublicKey,
}

/// Output of a Diffie-Hellman operation.
///
/// Zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret(Vec<u8>);

impl SharedSecret {
    pub(crate) fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Access the raw shared secret.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl core::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SharedSecret([REDACTED])")
    }
}

/// One of the two transport-phase keys returned by `split()`.
///
/// Zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct TransportKey([u8; AEAD_KEY_LEN]);

impl TransportKey {
    /// Build a key from KDF output, keeping only the first `AEAD_KEY_LEN` bytes.
    pub(crate) fn from_material(material: &[u8]) -> Self {
        Self(truncate_key(material))
    }

    /// Access the raw 32-byte key.
    pub fn as_bytes(&self) -> &[u8; AEAD_KEY_LEN] {
        &self.0
    }
}

impl core::fmt::Debug for TransportKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("TransportKey([REDACTED])")
    }
}

/// Take the cipher-key prefix of a KDF output block.
///
/// Every supported hash has `HASH_LEN >= AEAD_KEY_LEN`; shorter input is
/// zero-extended rather than panicking.
pub(crate) fn truncate_key(material: &[u8]) -> [u8; AEAD_KEY_LEN] {
    let mut key = [0u8; AEAD_KEY_LEN];
    let n = material.len().min(AEAD_KEY_LEN);
    key[..n].copy_from_slice(&material[..n]);
    key
}
