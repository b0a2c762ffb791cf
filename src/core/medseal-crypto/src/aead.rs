//! AES-256-GCM authenticated encryption.
//!
//! Seals bulk payloads under a one-time key with an explicit, caller-supplied nonce.
//! The authentication tag is appended to the ciphertext.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use zeroize::Zeroizing;

use crate::error::CryptoError;
use crate::keys::SymmetricKey;
use crate::random;
use crate::traits::AuthenticatedCipher;

/// Size of an AES-256 key in bytes.
pub const KEY_SIZE: usize = 32;

/// Size of a GCM nonce in bytes.
pub const NONCE_SIZE: usize = 12;

/// Size of a GCM authentication tag in bytes.
pub const TAG_SIZE: usize = 16;

fn cipher_for(key: &[u8]) -> Result<Aes256Gcm, CryptoError> {
    if key.len() != KEY_SIZE {
        return Err(CryptoError::InvalidKey(format!(
            "expected {} bytes, got {}",
            KEY_SIZE,
            key.len()
        )));
    }

    Aes256Gcm::new_from_slice(key).map_err(|e| CryptoError::InvalidKey(e.to_string()))
}

fn check_nonce(nonce: &[u8]) -> Result<(), CryptoError> {
    if nonce.len() != NONCE_SIZE {
        return Err(CryptoError::InvalidInput(format!(
            "nonce must be {} bytes, got {}",
            NONCE_SIZE,
            nonce.len()
        )));
    }
    Ok(())
}

/// Encrypts plaintext using AES-256-GCM.
///
/// Format: `ciphertext || tag (16 bytes)`. The nonce is not included.
///
/// # Arguments
///
/// * `key` - 32-byte encryption key
/// * `nonce` - 12-byte nonce, fresh for every call under the same key
/// * `plaintext` - Data to encrypt
pub fn encrypt(key: &[u8], nonce: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = cipher_for(key)?;
    check_nonce(nonce)?;

    cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))
}

/// Decrypts ciphertext produced by [`encrypt`].
///
/// Plaintext is only released after the tag verifies; any mismatch yields
/// [`CryptoError::AuthenticationFailed`] whatever its cause.
///
/// # Returns
///
/// Decrypted plaintext wrapped in `Zeroizing` for automatic memory cleanup.
pub fn decrypt(
    key: &[u8],
    nonce: &[u8],
    ciphertext: &[u8],
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    let cipher = cipher_for(key)?;
    check_nonce(nonce)?;

    if ciphertext.len() < TAG_SIZE {
        return Err(CryptoError::AuthenticationFailed);
    }

    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::AuthenticationFailed)?;

    Ok(Zeroizing::new(plaintext))
}

/// AES-256-GCM as an [`AuthenticatedCipher`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Aes256GcmCipher;

impl AuthenticatedCipher for Aes256GcmCipher {
    fn name(&self) -> &'static str {
        "AES-256-GCM"
    }

    fn key_size(&self) -> usize {
        KEY_SIZE
    }

    fn nonce_size(&self) -> usize {
        NONCE_SIZE
    }

    fn tag_size(&self) -> usize {
        TAG_SIZE
    }

    fn generate_key(&self) -> Result<SymmetricKey, CryptoError> {
        SymmetricKey::generate()
    }

    fn generate_nonce(&self) -> Result<Vec<u8>, CryptoError> {
        Ok(random::generate_nonce()?.to_vec())
    }

    fn seal(&self, key: &[u8], nonce: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        encrypt(key, nonce, plaintext)
    }

    fn open(
        &self,
        key: &[u8],
        nonce: &[u8],
        ciphertext: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
        decrypt(key, nonce, ciphertext)
    }
}
