//! Cryptographically secure random generation.
//!
//! Uses the operating system's CSPRNG for all random number generation.

use rand::rngs::{OsRng, StdRng};
use rand::{RngCore, SeedableRng};
use zeroize::Zeroizing;

use crate::aead::{KEY_SIZE, NONCE_SIZE};
use crate::error::CryptoError;

/// Generates a cryptographically secure random 256-bit key.
///
/// The key is wrapped in `Zeroizing` to ensure it is cleared from memory when dropped.
pub fn generate_key() -> Result<Zeroizing<[u8; KEY_SIZE]>, CryptoError> {
    let mut key = Zeroizing::new([0u8; KEY_SIZE]);
    OsRng
        .try_fill_bytes(&mut *key)
        .map_err(|e| CryptoError::KeyGenerationFailed(e.to_string()))?;
    Ok(key)
}

/// Generates a cryptographically secure random nonce for AES-GCM.
///
/// Every call yields a fresh nonce; callers must never reuse one under the same key.
pub fn generate_nonce() -> Result<[u8; NONCE_SIZE], CryptoError> {
    let mut nonce = [0u8; NONCE_SIZE];
    OsRng
        .try_fill_bytes(&mut nonce)
        .map_err(|e| CryptoError::EncryptionFailed(format!("nonce generation: {}", e)))?;
    Ok(nonce)
}

/// Returns a CSPRNG seeded with 256 bits from the OS entropy source.
///
/// For consumers that draw through the infallible `RngCore::fill_bytes`, such as
/// RSA key generation. Entropy failure is reported here, before any drawing starts.
pub fn seeded_rng() -> Result<StdRng, CryptoError> {
    let mut seed = Zeroizing::new([0u8; 32]);
    OsRng
        .try_fill_bytes(&mut *seed)
        .map_err(|e| CryptoError::KeyGenerationFailed(format!("entropy source: {}", e)))?;
    Ok(StdRng::from_seed(*seed))
}
