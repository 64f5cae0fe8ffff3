use rand_core::CryptoRngCore;
use subtle::ConstantTimeEq;
use x25519_dalek::{PublicKey as DalekPublicKey, StaticSecret as DalekStaticSecret};
use zeroize::Zeroizing;

use super::Dh;
use crate::error::KeyAgreementError;
use crate::keys::{KeyPair, PublicKey, SecretKey, SharedSecret};

/// X25519 key and DH output length in bytes.
pub const DH_LEN: usize = 32;

/// The X25519 DH engine (Curve25519, RFC 7748). The default curve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct X25519;

impl Dh for X25519 {
    const NAME: &'static str = "25519";
    const PUBLIC_KEY_LEN: usize = DH_LEN;
    const SECRET_KEY_LEN: usize = DH_LEN;
    const DH_LEN: usize = DH_LEN;

    /// Returns `NonContributory` if the result is the all-zeros point
    /// (low-order input), as required by RFC 7748 Section 6.1 and
    /// recommended by the Noise spec Section 12.1.
    fn dh(&self, public_key: &[u8], secret_key: &[u8]) -> Result<SharedSecret, KeyAgreementError> {
        let remote = DalekPublicKey::from(public_bytes(public_key)?);
        let local = DalekStaticSecret::from(*secret_bytes(secret_key)?);
        let shared = local.diffie_hellman(&remote);
        validate_shared_secret(shared.as_bytes())
    }

    fn public_key(&self, secret_key: &[u8]) -> Result<PublicKey, KeyAgreementError> {
        let local = DalekStaticSecret::from(*secret_bytes(secret_key)?);
        Ok(PublicKey::from_bytes(DalekPublicKey::from(&local).as_bytes()))
    }

    fn generate_keypair(&self, rng: &mut impl CryptoRngCore) -> KeyPair {
        let secret = DalekStaticSecret::random_from_rng(rng);
        let public = DalekPublicKey::from(&secret);
        let secret_bytes = Zeroizing::new(secret.to_bytes());
        KeyPair {
            secret: SecretKey::from_bytes(&secret_bytes[..]),
            public: PublicKey::from_bytes(public.as_bytes()),
        }
    }
}

fn public_bytes(bytes: &[u8]) -> Result<[u8; DH_LEN], KeyAgreementError> {
    bytes
        .try_into()
        .map_err(|_| KeyAgreementError::InvalidPublicKeyLength {
            expected: DH_LEN,
            actual: bytes.len(),
        })
}

fn secret_bytes(bytes: &[u8]) -> Result<Zeroizing<[u8; DH_LEN]>, KeyAgreementError> {
    let array: [u8; DH_LEN] =
        bytes
            .try_into()
            .map_err(|_| KeyAgreementError::InvalidSecretKeyLength {
                expected: DH_LEN,
                actual: bytes.len(),
            })?;
    Ok(Zeroizing::new(array))
}

/// Reject the all-zeros shared secret, which indicates a low-order public key.
fn validate_shared_secret(bytes: &[u8; DH_LEN]) -> Result<SharedSecret, KeyAgreementError> {
    let is_zero = bytes.ct_eq(&[0u8; DH_LEN]);
    if bool::from(is_zero) {
        Err(KeyAgreementError::NonContributory)
    } else {
        Ok(SharedSecret::new(bytes.to_vec()))
    }
}
