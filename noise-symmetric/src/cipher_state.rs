use core::marker::PhantomData;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::aead::{AEAD_KEY_LEN, AEAD_TAG_LEN, ChaChaPoly};
use crate::crypto::Cipher;
use crate::error::{Error, Result};

/// Noise CipherState: an AEAD key and a nonce counter.
///
/// Per Noise spec Section 5.1.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct CipherState<C: Cipher = ChaChaPoly> {
    /// The AEAD key, or `None` if uninitialized.
    key: Option<[u8; AEAD_KEY_LEN]>,
    /// Nonce counter, incremented after each successful encryption/decryption.
    #[zeroize(skip)]
    nonce: u64,
    #[zeroize(skip)]
    _cipher: PhantomData<C>,
}

impl<C: Cipher> core::fmt::Debug for CipherState<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CipherState")
            .field("cipher", &C::NAME)
            .field("has_key", &self.has_key())
            .field("nonce", &self.nonce)
            .finish()
    }
}

impl<C: Cipher> Default for CipherState<C> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<C: Cipher> CipherState<C> {
    /// Create an empty (uninitialized) CipherState.
    pub fn empty() -> Self {
        Self {
            key: None,
            nonce: 0,
            _cipher: PhantomData,
        }
    }

    /// Create a CipherState already holding `key`.
    pub fn with_key(key: [u8; AEAD_KEY_LEN]) -> Self {
        let mut cs = Self::empty();
        cs.initialize_key(key);
        cs
    }

    /// Initialize with a key, resetting the nonce counter to zero.
    pub fn initialize_key(&mut self, key: [u8; AEAD_KEY_LEN]) {
        self.key.zeroize();
        self.key = Some(key);
        self.nonce = 0;
    }

    /// Whether this CipherState has a key set.
    pub fn has_key(&self) -> bool {
        self.key.is_some()
    }

    /// The next nonce to be used.
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Set the nonce counter, e.g. for out-of-order transport messages.
    pub fn set_nonce(&mut self, nonce: u64) {
        self.nonce = nonce;
    }

    /// Encrypt plaintext with associated data.
    ///
    /// If no key is set, returns the plaintext unchanged (Noise spec behavior).
    /// Otherwise the result is `plaintext.len() + AEAD_TAG_LEN` bytes.
    pub fn encrypt_with_ad(&mut self, ad: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
        let Some(key) = &self.key else {
            return Ok(plaintext.to_vec());
        };
        if self.nonce == u64::MAX {
            // Nonce 2^64-1 is reserved for rekey (Noise spec §11.3)
            return Err(Error::NonceExhausted);
        }
        let ciphertext = C::encrypt(key, self.nonce, ad, plaintext)?;
        self.nonce += 1;
        Ok(ciphertext)
    }

    /// Decrypt ciphertext with associated data.
    ///
    /// If no key is set, returns the ciphertext unchanged (Noise spec behavior).
    /// The nonce only advances when the tag verifies.
    pub fn decrypt_with_ad(&mut self, ad: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
        let Some(key) = &self.key else {
            return Ok(ciphertext.to_vec());
        };
        if self.nonce == u64::MAX {
            // Nonce 2^64-1 is reserved for rekey (Noise spec §11.3)
            return Err(Error::NonceExhausted);
        }
        let plaintext = C::decrypt(key, self.nonce, ad, ciphertext)?;
        self.nonce += 1;
        Ok(plaintext)
    }

    /// Rekey per Noise spec Section 11.3. Does not reset the nonce counter.
    pub fn rekey(&mut self) -> Result<()> {
        if let Some(ref mut key) = self.key {
            let mut new_key = C::rekey(key)?;
            key.copy_from_slice(&new_key);
            new_key.zeroize();
        }
        Ok(())
    }

    /// The overhead added by encryption (0 if no key, AEAD_TAG_LEN otherwise).
    pub fn overhead(&self) -> usize {
        if self.has_key() { AEAD_TAG_LEN } else { 0 }
    }

    /// Zero the key, drop it and reset the nonce.
    pub fn clear(&mut self) {
        self.key.zeroize();
        self.nonce = 0;
    }
}
