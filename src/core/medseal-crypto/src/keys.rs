//! Secure key types with automatic memory zeroization.
//!
//! All key types implement `Zeroize` and `ZeroizeOnDrop` to ensure
//! sensitive key material is securely erased from memory when no longer needed.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::aead::KEY_SIZE;
use crate::error::CryptoError;
use crate::random::generate_key;

/// A one-time 256-bit symmetric key with automatic zeroization.
///
/// This type wraps a raw key and ensures it is securely erased
/// from memory when dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey {
    bytes: [u8; KEY_SIZE],
}

impl SymmetricKey {
    /// Generates a new random symmetric key.
    pub fn generate() -> Result<Self, CryptoError> {
        let key = generate_key()?;
        Ok(Self { bytes: *key })
    }

    /// Returns the raw key bytes.
    ///
    /// Use with caution - the returned slice is not zeroized automatically.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymmetricKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}
