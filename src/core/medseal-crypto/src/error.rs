//! Cryptographic error types.

use thiserror::Error;

/// Errors that can occur during cryptographic operations.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Key generation failed, either from the entropy source or a rejected parameter.
    #[error("key generation failed: {0}")]
    KeyGenerationFailed(String),

    /// A key container could not be parsed.
    #[error("key parse failed: {0}")]
    Parse(String),

    /// Encryption failed.
    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    /// Asymmetric decryption failed.
    ///
    /// Carries no detail so padding and length failures are indistinguishable.
    #[error("decryption failed")]
    DecryptionFailed,

    /// Invalid key format or size.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Authentication tag verification failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Unknown digest algorithm identifier.
    #[error("unsupported hash algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Invalid input data.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The operation was cancelled before completion.
    #[error("operation cancelled")]
    Cancelled,
}
