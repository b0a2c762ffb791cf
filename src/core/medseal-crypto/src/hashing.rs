//! Chunked integrity digests with constant-time verification.
//!
//! Data is hashed in fixed 1 MiB chunks, reporting progress after each one.
//! Verification compares digests with `subtle` so timing does not depend on
//! where two digests differ.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha512};
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::cancel::CancellationToken;
use crate::error::CryptoError;
use crate::progress::{ProgressReporter, ProgressSink};

/// Bytes hashed between progress reports and cancellation checks.
pub const CHUNK_SIZE: usize = 1024 * 1024;

/// Supported digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HashAlgorithm {
    /// SHA-256, 32-byte digests.
    Sha256,
    /// SHA-512, 64-byte digests.
    Sha512,
}

impl HashAlgorithm {
    /// Digest length in bytes.
    pub const fn output_len(self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha512 => 64,
        }
    }

    /// Display name used in progress stages.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sha256 => "SHA-256",
            Self::Sha512 => "SHA-512",
        }
    }

    /// Stable numeric identifier.
    pub const fn id(self) -> u8 {
        match self {
            Self::Sha256 => 0,
            Self::Sha512 => 1,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha256 => write!(f, "sha256"),
            Self::Sha512 => write!(f, "sha512"),
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(Self::Sha256),
            "sha512" | "sha-512" => Ok(Self::Sha512),
            _ => Err(CryptoError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

impl TryFrom<u8> for HashAlgorithm {
    type Error = CryptoError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            0 => Ok(Self::Sha256),
            1 => Ok(Self::Sha512),
            other => Err(CryptoError::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

/// A digest tagged with the algorithm that produced it.
#[derive(Clone)]
pub struct HashDigest {
    algorithm: HashAlgorithm,
    bytes: Vec<u8>,
}

impl HashDigest {
    /// Wraps raw digest bytes, checking their length against the algorithm.
    pub fn from_bytes(algorithm: HashAlgorithm, bytes: Vec<u8>) -> Result<Self, CryptoError> {
        if bytes.len() != algorithm.output_len() {
            return Err(CryptoError::InvalidInput(format!(
                "{} digest must be {} bytes, got {}",
                algorithm.name(),
                algorithm.output_len(),
                bytes.len()
            )));
        }
        Ok(Self { algorithm, bytes })
    }

    /// Parses a hex-encoded digest.
    pub fn from_hex(algorithm: HashAlgorithm, hex_str: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(hex_str.trim())
            .map_err(|e| CryptoError::InvalidInput(format!("invalid hex digest: {}", e)))?;
        Self::from_bytes(algorithm, bytes)
    }

    /// Algorithm that produced this digest.
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Lowercase hex encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Constant-time comparison against raw digest bytes.
    ///
    /// A length mismatch is a plain `false`.
    pub fn verify(&self, expected: &[u8]) -> bool {
        constant_time_eq(&self.bytes, expected)
    }
}

impl PartialEq for HashDigest {
    fn eq(&self, other: &Self) -> bool {
        self.algorithm == other.algorithm && self.verify(&other.bytes)
    }
}

impl Eq for HashDigest {}

impl fmt::Debug for HashDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashDigest")
            .field("algorithm", &self.algorithm)
            .field("hex", &self.to_hex())
            .finish()
    }
}

impl fmt::Display for HashDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.to_hex())
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Computes and verifies digests, optionally honouring a cancellation token.
#[derive(Debug, Clone, Default)]
pub struct IntegrityHasher {
    cancel: Option<CancellationToken>,
}

impl IntegrityHasher {
    /// A hasher that always runs to completion.
    pub fn new() -> Self {
        Self::default()
    }

    /// A hasher that checks `token` before every chunk.
    pub fn with_cancellation(token: CancellationToken) -> Self {
        Self {
            cancel: Some(token),
        }
    }

    /// Computes the digest of `data`.
    ///
    /// Reports progress once per chunk; the last event is always 100%.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Cancelled`] if the token fires between chunks.
    pub fn calculate_digest(
        &self,
        algorithm: HashAlgorithm,
        data: &[u8],
        progress: Option<&mut dyn ProgressSink>,
    ) -> Result<HashDigest, CryptoError> {
        let mut reporter = ProgressReporter::new(progress);

        let bytes = match algorithm {
            HashAlgorithm::Sha256 => self.digest_chunks::<Sha256>(algorithm, data, &mut reporter)?,
            HashAlgorithm::Sha512 => self.digest_chunks::<Sha512>(algorithm, data, &mut reporter)?,
        };

        Ok(HashDigest { algorithm, bytes })
    }

    /// Recomputes the digest of `data` and compares it to `expected` in constant time.
    ///
    /// Returns `Ok(false)` for a content or length mismatch. An `Err` means the
    /// check could not run at all.
    pub fn verify_integrity(
        &self,
        data: &[u8],
        expected: &[u8],
        algorithm: HashAlgorithm,
        progress: Option<&mut dyn ProgressSink>,
    ) -> Result<bool, CryptoError> {
        let actual = self.calculate_digest(algorithm, data, progress)?;
        let matches = actual.verify(expected);

        debug!(algorithm = %algorithm, size = data.len(), matches, "Integrity check completed");

        Ok(matches)
    }

    fn digest_chunks<D: Digest>(
        &self,
        algorithm: HashAlgorithm,
        data: &[u8],
        reporter: &mut ProgressReporter<'_>,
    ) -> Result<Vec<u8>, CryptoError> {
        let total = data.len() as u64;
        let stage = format!("Calculating {}", algorithm.name());
        let mut hasher = D::new();

        if data.is_empty() {
            self.check_cancelled()?;
            reporter.report(stage, 100.0, 0, 0);
            return Ok(hasher.finalize().to_vec());
        }

        let mut processed = 0u64;
        for chunk in data.chunks(CHUNK_SIZE) {
            self.check_cancelled()?;

            hasher.update(chunk);
            processed += chunk.len() as u64;

            reporter.report(
                stage.as_str(),
                processed as f64 * 100.0 / total as f64,
                processed,
                total,
            );
        }

        Ok(hasher.finalize().to_vec())
    }

    fn check_cancelled(&self) -> Result<(), CryptoError> {
        match &self.cancel {
            Some(token) => token.check(),
            None => Ok(()),
        }
    }
}

/// Computes the digest of `data`. See [`IntegrityHasher::calculate_digest`].
pub fn calculate_digest(
    algorithm: HashAlgorithm,
    data: &[u8],
    progress: Option<&mut dyn ProgressSink>,
) -> Result<HashDigest, CryptoError> {
    IntegrityHasher::new().calculate_digest(algorithm, data, progress)
}

/// Verifies `data` against an expected digest. See [`IntegrityHasher::verify_integrity`].
pub fn verify_integrity(
    data: &[u8],
    expected: &[u8],
    algorithm: HashAlgorithm,
    progress: Option<&mut dyn ProgressSink>,
) -> Result<bool, CryptoError> {
    IntegrityHasher::new().verify_integrity(data, expected, algorithm, progress)
}
