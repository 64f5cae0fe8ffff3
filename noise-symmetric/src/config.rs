//! Construction-time configuration for a [`SymmetricState`](crate::SymmetricState).

use crate::crypto::{Dh, X25519};

/// Names the DH engine a symmetric state mixes keys with.
///
/// Falls back to [`X25519`] when no curve is given. The AEAD and hash are
/// fixed by the state's type parameters, not chosen here.
///
/// # Example
///
/// ```rust
/// use noise_symmetric::{DefaultSymmetricState, SymmetricConfig};
///
/// let state = DefaultSymmetricState::initialize(
///     SymmetricConfig::new(),
///     "Noise_XX_25519_ChaChaPoly_BLAKE2b",
/// );
/// assert_eq!(state.handshake_hash().unwrap().len(), 64);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SymmetricConfig<D: Dh = X25519> {
    curve: D,
}

impl SymmetricConfig {
    /// Configuration using the default curve.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D: Dh> SymmetricConfig<D> {
    /// Configuration using `curve` for key agreement.
    pub fn with_curve(curve: D) -> Self {
        Self { curve }
    }

    /// The configured DH engine.
    pub fn curve(&self) -> &D {
        &self.curve
    }

    pub(crate) fn into_curve(self) -> D {
        self.curve
    }
}
