use aes_gcm::Aes256Gcm;
use chacha20poly1305::ChaCha20Poly1305;
use chacha20poly1305::aead::consts::{U12, U16};
use chacha20poly1305::aead::generic_array::GenericArray;
use chacha20poly1305::aead::{AeadInPlace, KeyInit};
use zeroize::Zeroize;

use super::Cipher;
use crate::error::{Error, Result};

/// AEAD key length in bytes.
pub const AEAD_KEY_LEN: usize = 32;
/// AEAD tag length in bytes.
pub const AEAD_TAG_LEN: usize = 16;
/// AEAD nonce length in bytes.
pub const AEAD_NONCE_LEN: usize = 12;

/// ChaCha20-Poly1305.
///
/// Nonce: 4 bytes of zeros followed by the 64-bit little-endian counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChaChaPoly;

impl Cipher for ChaChaPoly {
    const NAME: &'static str = "ChaChaPoly";

    fn encrypt(
        key: &[u8; AEAD_KEY_LEN],
        nonce: u64,
        ad: &[u8],
        plaintext: &[u8],
    ) -> Result<Vec<u8>> {
        let cipher = ChaCha20Poly1305::new(key.into());
        seal(&cipher, chacha_nonce(nonce), ad, plaintext)
    }

    fn decrypt(
        key: &[u8; AEAD_KEY_LEN],
        nonce: u64,
        ad: &[u8],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>> {
        let cipher = ChaCha20Poly1305::new(key.into());
        open(&cipher, chacha_nonce(nonce), ad, ciphertext)
    }
}

/// AES-256-GCM.
///
/// Nonce: 4 bytes of zeros followed by the 64-bit big-endian counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AesGcm;

impl Cipher for AesGcm {
    const NAME: &'static str = "AESGCM";

    fn encrypt(
        key: &[u8; AEAD_KEY_LEN],
        nonce: u64,
        ad: &[u8],
        plaintext: &[u8],
    ) -> Result<Vec<u8>> {
        let cipher = Aes256Gcm::new(key.into());
        seal(&cipher, aesgcm_nonce(nonce), ad, plaintext)
    }

    fn decrypt(
        key: &[u8; AEAD_KEY_LEN],
        nonce: u64,
        ad: &[u8],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>> {
        let cipher = Aes256Gcm::new(key.into());
        open(&cipher, aesgcm_nonce(nonce), ad, ciphertext)
    }
}

fn chacha_nonce(n: u64) -> [u8; AEAD_NONCE_LEN] {
    let mut nonce = [0u8; AEAD_NONCE_LEN];
    nonce[4..].copy_from_slice(&n.to_le_bytes());
    nonce
}

fn aesgcm_nonce(n: u64) -> [u8; AEAD_NONCE_LEN] {
    let mut nonce = [0u8; AEAD_NONCE_LEN];
    nonce[4..].copy_from_slice(&n.to_be_bytes());
    nonce
}

/// Encrypt into a fresh buffer and append the tag.
fn seal<A>(cipher: &A, nonce: [u8; AEAD_NONCE_LEN], ad: &[u8], plaintext: &[u8]) -> Result<Vec<u8>>
where
    A: AeadInPlace<NonceSize = U12, TagSize = U16>,
{
    let mut buffer = Vec::with_capacity(plaintext.len() + AEAD_TAG_LEN);
    buffer.extend_from_slice(plaintext);

    let tag = match cipher.encrypt_in_place_detached(&GenericArray::from(nonce), ad, &mut buffer) {
        Ok(tag) => tag,
        Err(_) => {
            buffer.zeroize();
            return Err(Error::InvariantViolation("plaintext exceeds AEAD length limit"));
        }
    };

    buffer.extend_from_slice(&tag);
    Ok(buffer)
}

/// Split off the tag, verify it and decrypt into a fresh buffer.
fn open<A>(cipher: &A, nonce: [u8; AEAD_NONCE_LEN], ad: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>>
where
    A: AeadInPlace<NonceSize = U12, TagSize = U16>,
{
    if ciphertext.len() < AEAD_TAG_LEN {
        return Err(Error::Decryption {
            len: ciphertext.len(),
            min: AEAD_TAG_LEN,
        });
    }
    let (body, tag_bytes) = ciphertext.split_at(ciphertext.len() - AEAD_TAG_LEN);
    let tag = GenericArray::from_slice(tag_bytes);

    let mut buffer = body.to_vec();
    if cipher
        .decrypt_in_place_detached(&GenericArray::from(nonce), ad, &mut buffer, tag)
        .is_err()
    {
        buffer.zeroize();
        return Err(Error::AuthenticationFailed);
    }
    Ok(buffer)
}
