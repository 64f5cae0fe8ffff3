/// Errors that can occur while driving the symmetric state or its cipher.
///
/// Variants fall into three families, see [`ErrorKind`]. None of them are
/// converted or swallowed on the way up: what the cipher or the DH engine
/// reports is what the caller sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The AEAD tag did not verify (tampered ciphertext, wrong key or transcript).
    #[error("authentication failed: ciphertext is invalid or tampered")]
    AuthenticationFailed,

    /// The DH engine rejected a key or produced a non-contributory output.
    #[error("key agreement failed: {0}")]
    KeyAgreement(#[from] KeyAgreementError),

    /// The ciphertext is shorter than a single AEAD tag.
    #[error("ciphertext too short: {len} bytes, need at least {min}")]
    Decryption { len: usize, min: usize },

    /// A call sequence the protocol forbids, e.g. mixing a key before seeding.
    #[error("invariant violated: {0}")]
    InvariantViolation(&'static str),

    /// A caller-supplied buffer has the wrong length.
    #[error("buffer must be exactly {expected} bytes, got {actual}")]
    BufferLength { expected: usize, actual: usize },

    /// The state was cleared and its key material destroyed.
    #[error("symmetric state used after clear")]
    UseAfterClear,

    /// The state was already split into transport keys.
    #[error("symmetric state used after split")]
    AlreadySplit,

    /// The nonce counter reached 2^64-1, which is reserved for rekeying.
    #[error("nonce counter exhausted")]
    NonceExhausted,
}

/// Failures reported by a [`Dh`](crate::crypto::Dh) engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum KeyAgreementError {
    #[error("public key must be {expected} bytes, got {actual}")]
    InvalidPublicKeyLength { expected: usize, actual: usize },

    #[error("secret key must be {expected} bytes, got {actual}")]
    InvalidSecretKeyLength { expected: usize, actual: usize },

    /// The shared secret is all zeros: the peer sent a low-order point.
    #[error("non-contributory key exchange: peer sent a low-order point")]
    NonContributory,
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The handshake must be aborted and the state cleared. Never retried
    /// with the same state.
    ProtocolFatal,
    /// A programming error in the caller (wrong call order, bad buffer,
    /// use after clear or split).
    ContractViolation,
    /// The key's nonce space is spent; a rekey or a new session is required.
    ResourceExhaustion,
}

impl Error {
    /// Which family this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AuthenticationFailed | Self::KeyAgreement(_) | Self::Decryption { .. } => {
                ErrorKind::ProtocolFatal
            }
            Self::InvariantViolation(_)
            | Self::BufferLength { .. }
            | Self::UseAfterClear
            | Self::AlreadySplit => ErrorKind::ContractViolation,
            Self::NonceExhausted => ErrorKind::ResourceExhaustion,
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_failures_are_fatal() {
        assert_eq!(Error::AuthenticationFailed.kind(), ErrorKind::ProtocolFatal);
        assert_eq!(
            Error::from(KeyAgreementError::NonContributory).kind(),
            ErrorKind::ProtocolFatal
        );
        assert_eq!(
            Error::Decryption { len: 3, min: 16 }.kind(),
            ErrorKind::ProtocolFatal
        );
    }

    #[test]
    fn misuse_is_a_contract_violation() {
        for err in [
            Error::InvariantViolation("x"),
            Error::BufferLength {
                expected: 64,
                actual: 32,
            },
            Error::UseAfterClear,
            Error::AlreadySplit,
        ] {
            assert_eq!(err.kind(), ErrorKind::ContractViolation);
        }
    }

    #[test]
    fn nonce_exhaustion_is_resource_exhaustion() {
        assert_eq!(Error::NonceExhausted.kind(), ErrorKind::ResourceExhaustion);
    }

    #[test]
    fn key_agreement_message_is_nested() {
        let err = Error::from(KeyAgreementError::InvalidPublicKeyLength {
            expected: 32,
            actual: 31,
        });
        assert_eq!(
            err.to_string(),
            "key agreement failed: public key must be 32 bytes, got 31"
        );
    }
}
