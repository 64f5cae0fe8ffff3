#![deny(unsafe_code)]

//! # noise-symmetric
//!
//! The symmetric half of the Noise Protocol Framework: the `SymmetricState`
//! that runs a handshake transcript and the `CipherState` it drives.
//!
//! A [`SymmetricState`] carries the handshake hash (`h`), the chaining key
//! (`ck`) and a cipher. Handshake patterns call into it to absorb public
//! data, mix in DH results, and encrypt payloads bound to the transcript,
//! then [`split`](SymmetricState::split) it into two transport keys.
//!
//! Supported algorithms:
//!
//! | Family | Names |
//! |--------|-------|
//! | DH     | `25519` |
//! | Cipher | `ChaChaPoly`, `AESGCM` |
//! | Hash   | `BLAKE2b`, `BLAKE2s`, `SHA256`, `SHA512` |
//!
//! ## Security Properties
//!
//! - X25519 low-order point / identity element rejection
//! - All key material zeroized on drop and on [`clear`](SymmetricState::clear)
//! - Failed decryption never alters the transcript
//! - Misuse after `split` or `clear` is an error, not a panic
//!
//! ## Example
//!
//! ```rust
//! use noise_symmetric::{DefaultSymmetricState, SymmetricConfig};
//!
//! let name = DefaultSymmetricState::protocol_name("NN");
//! let mut alice = DefaultSymmetricState::initialize(SymmetricConfig::new(), &name);
//! let mut bob = DefaultSymmetricState::initialize(SymmetricConfig::new(), &name);
//!
//! alice.mix_hash(b"prologue").unwrap();
//! bob.mix_hash(b"prologue").unwrap();
//! alice.mix_key_material(b"shared secret").unwrap();
//! bob.mix_key_material(b"shared secret").unwrap();
//!
//! let ct = alice.encrypt_and_hash(b"hello").unwrap();
//! assert_eq!(bob.decrypt_and_hash(&ct).unwrap(), b"hello");
//! assert_eq!(alice.handshake_hash().unwrap(), bob.handshake_hash().unwrap());
//!
//! let (a1, _) = alice.split().unwrap();
//! let (b1, _) = bob.split().unwrap();
//! assert_eq!(a1.as_bytes(), b1.as_bytes());
//! ```

pub mod crypto;
pub mod error;
pub mod keys;

mod cipher_state;
mod config;
mod symmetric_state;

// Re-export the primary public API
pub use cipher_state::CipherState;
pub use config::SymmetricConfig;
pub use crypto::{
    AesGcm, Blake2b, Blake2s, ChaChaPoly, Cipher, Dh, HashFunction, Sha256, Sha512, X25519,
};
pub use error::{Error, ErrorKind, KeyAgreementError, Result};
pub use keys::{KeyPair, PublicKey, SecretKey, SharedSecret, TransportKey};
pub use symmetric_state::{DefaultSymmetricState, SymmetricState};
