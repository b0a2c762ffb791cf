//! Envelope error types.

use std::fmt;

use medseal_crypto::CryptoError;
use thiserror::Error;

/// A length-prefixed field of the serialized envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeField {
    /// The wrapped data key.
    WrappedKey,
    /// The AEAD nonce.
    Nonce,
    /// The sealed payload, tag included.
    Ciphertext,
}

impl fmt::Display for EnvelopeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrappedKey => write!(f, "wrapped key"),
            Self::Nonce => write!(f, "nonce"),
            Self::Ciphertext => write!(f, "ciphertext"),
        }
    }
}

/// Errors raised while parsing a serialized envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Fewer bytes than the three length headers.
    #[error("data too short")]
    TooShort {
        /// Size of the rejected buffer.
        len: usize,
    },

    /// A declared length runs past the end of the buffer.
    #[error("corrupted length field: {field}")]
    CorruptedLength {
        /// Field whose length header is invalid.
        field: EnvelopeField,
    },

    /// Extra bytes follow the ciphertext field.
    #[error("trailing data: {count} bytes after ciphertext")]
    TrailingBytes {
        /// Number of unexpected bytes.
        count: usize,
    },
}

/// Errors that can occur during envelope encryption and decryption.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// The wrapped data key could not be recovered.
    #[error("key unwrap failed")]
    KeyUnwrap,

    /// The payload failed authentication.
    #[error("authentication failed")]
    Authentication,

    /// Malformed serialized envelope.
    #[error("invalid envelope format: {0}")]
    Format(#[from] FormatError),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The operation was cancelled between stages.
    #[error("operation cancelled")]
    Cancelled,

    /// Cryptographic error.
    #[error("crypto error: {0}")]
    Crypto(#[source] CryptoError),
}

impl From<CryptoError> for EnvelopeError {
    fn from(e: CryptoError) -> Self {
        match e {
            CryptoError::Cancelled => EnvelopeError::Cancelled,
            CryptoError::AuthenticationFailed => EnvelopeError::Authentication,
            other => EnvelopeError::Crypto(other),
        }
    }
}
