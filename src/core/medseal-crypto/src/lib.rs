//! # Medseal Crypto
//!
//! Core cryptographic primitives for Medseal.
//!
//! This crate provides the building blocks for envelope encryption:
//! - Symmetric authenticated encryption (AES-256-GCM)
//! - Asymmetric key wrapping (RSA-OAEP with SHA-256) and PEM key containers
//! - Chunked integrity digests (SHA-256, SHA-512) with constant-time verification
//! - Secure random generation
//! - Progress reporting and cooperative cancellation

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod aead;
pub mod asymmetric;
pub mod cancel;
pub mod error;
pub mod hashing;
pub mod keys;
pub mod progress;
pub mod random;
pub mod traits;

pub use aead::Aes256GcmCipher;
pub use asymmetric::{KeyPair, RsaOaep, RsaPrivateKey, RsaPublicKey};
pub use cancel::CancellationToken;
pub use error::CryptoError;
pub use hashing::{HashAlgorithm, HashDigest, IntegrityHasher};
pub use keys::SymmetricKey;
pub use progress::{ProgressEvent, ProgressLog, ProgressReporter, ProgressSink};
pub use traits::{AuthenticatedCipher, KeyEncapsulation};
