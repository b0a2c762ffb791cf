//! # Medseal Envelope
//!
//! Hybrid envelope encryption: payloads are sealed under a one-time AES-256-GCM key,
//! which is wrapped for the recipient with RSA-OAEP-SHA256.
//!
//! ## Wire Format
//!
//! Envelopes serialize as three little-endian, 8-byte length-prefixed fields:
//! `wrapped_key`, `nonce`, `ciphertext` (tag included). The format is byte-exact
//! and must stay stable for interoperability.
//!
//! ## Failure Model
//!
//! Every operation either completes or returns the first error it hits. No partial
//! envelope and no unauthenticated plaintext is ever returned.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod format;
pub mod hybrid;

pub use config::{EnvelopeConfig, TrailingBytes};
pub use error::{EnvelopeError, EnvelopeField, FormatError};
pub use format::{EncryptedEnvelope, LENGTH_PREFIX_SIZE, MIN_SERIALIZED_LEN};
pub use hybrid::{decrypt, deserialize, encrypt, serialize, HybridEnvelope};
