//! Binary envelope format.
//!
//! ```text
//! LE64(len(wrapped_key)) || wrapped_key
//! LE64(len(nonce))       || nonce
//! LE64(len(ciphertext))  || ciphertext
//! ```
//!
//! Every field is present even when empty, so the smallest valid buffer is 24 bytes.

use medseal_crypto::{ProgressReporter, ProgressSink};
use tracing::debug;

use crate::config::TrailingBytes;
use crate::error::{EnvelopeField, FormatError};

/// Size of each little-endian length header.
pub const LENGTH_PREFIX_SIZE: usize = 8;

/// Smallest buffer that can hold an envelope.
pub const MIN_SERIALIZED_LEN: usize = 3 * LENGTH_PREFIX_SIZE;

/// The three parts of a hybrid-encrypted payload.
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptedEnvelope {
    /// Data key encrypted under the recipient's public key.
    pub wrapped_key: Vec<u8>,
    /// AEAD nonce.
    pub nonce: Vec<u8>,
    /// Sealed payload with the authentication tag at its tail.
    pub ciphertext: Vec<u8>,
}

impl EncryptedEnvelope {
    /// Size of [`EncryptedEnvelope::to_bytes`] output.
    pub fn serialized_len(&self) -> usize {
        MIN_SERIALIZED_LEN + self.wrapped_key.len() + self.nonce.len() + self.ciphertext.len()
    }

    /// Serializes the envelope.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_bytes_with_progress(None)
    }

    /// Serializes the envelope, reporting one event per field.
    pub fn to_bytes_with_progress(&self, progress: Option<&mut dyn ProgressSink>) -> Vec<u8> {
        let mut reporter = ProgressReporter::new(progress);
        let total = self.serialized_len();
        let total_u64 = total as u64;

        reporter.report("Calculating sizes", 0.0, 0, total_u64);
        let mut out = Vec::with_capacity(total);

        reporter.report(
            format!("Writing wrapped key ({} bytes)", self.wrapped_key.len()),
            40.0,
            LENGTH_PREFIX_SIZE as u64,
            total_u64,
        );
        write_field(&mut out, &self.wrapped_key);

        reporter.report(
            format!("Writing nonce ({} bytes)", self.nonce.len()),
            60.0,
            out.len() as u64,
            total_u64,
        );
        write_field(&mut out, &self.nonce);

        reporter.report(
            format!("Writing ciphertext ({} bytes)", self.ciphertext.len()),
            80.0,
            out.len() as u64,
            total_u64,
        );
        write_field(&mut out, &self.ciphertext);

        reporter.report("Serialization complete", 100.0, total_u64, total_u64);
        out
    }

    /// Parses an envelope, rejecting trailing bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self, FormatError> {
        Self::from_bytes_with(data, TrailingBytes::Reject, None)
    }

    /// Parses an envelope with an explicit trailing-bytes policy.
    ///
    /// Checks run in order: minimum size, then each declared length against the
    /// bytes left for it, then (under [`TrailingBytes::Reject`]) leftovers.
    pub fn from_bytes_with(
        data: &[u8],
        trailing: TrailingBytes,
        progress: Option<&mut dyn ProgressSink>,
    ) -> Result<Self, FormatError> {
        let mut reporter = ProgressReporter::new(progress);
        let total = data.len() as u64;

        reporter.report("Validating data", 0.0, 0, total);
        if data.len() < MIN_SERIALIZED_LEN {
            debug!(size = data.len(), "Envelope rejected: too short");
            return Err(FormatError::TooShort { len: data.len() });
        }

        let mut reader = FieldReader::new(data);

        reporter.report("Reading wrapped key", 20.0, LENGTH_PREFIX_SIZE as u64, total);
        let wrapped_key = reader.read(EnvelopeField::WrappedKey, 2)?.to_vec();

        reporter.report("Reading nonce", 40.0, reader.offset as u64, total);
        let nonce = reader.read(EnvelopeField::Nonce, 1)?.to_vec();

        reporter.report("Reading ciphertext", 60.0, reader.offset as u64, total);
        let ciphertext = reader.read(EnvelopeField::Ciphertext, 0)?.to_vec();

        let leftover = reader.remaining();
        if leftover > 0 {
            match trailing {
                TrailingBytes::Reject => {
                    debug!(count = leftover, "Envelope rejected: trailing data");
                    return Err(FormatError::TrailingBytes { count: leftover });
                }
                TrailingBytes::Allow => {
                    debug!(count = leftover, "Ignoring trailing data after envelope");
                }
            }
        }

        reporter.report("Deserialization complete", 100.0, total, total);

        Ok(Self {
            wrapped_key,
            nonce,
            ciphertext,
        })
    }
}

impl std::fmt::Debug for EncryptedEnvelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptedEnvelope")
            .field("wrapped_key_len", &self.wrapped_key.len())
            .field("nonce_len", &self.nonce.len())
            .field("ciphertext_len", &self.ciphertext.len())
            .finish()
    }
}

fn write_field(out: &mut Vec<u8>, field: &[u8]) {
    out.extend_from_slice(&(field.len() as u64).to_le_bytes());
    out.extend_from_slice(field);
}

struct FieldReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> FieldReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Reads one length-prefixed field. `headers_after` headers must still fit
    /// behind it, so a length that swallows them is reported against this field.
    fn read(&mut self, field: EnvelopeField, headers_after: usize) -> Result<&'a [u8], FormatError> {
        let corrupted = FormatError::CorruptedLength { field };

        let header_end = self.offset + LENGTH_PREFIX_SIZE;
        let header: [u8; LENGTH_PREFIX_SIZE] = self
            .data
            .get(self.offset..header_end)
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or_else(|| corrupted.clone())?;
        let declared = u64::from_le_bytes(header);
        self.offset = header_end;

        let available = self
            .remaining()
            .checked_sub(headers_after * LENGTH_PREFIX_SIZE)
            .ok_or_else(|| corrupted.clone())?;
        if declared > available as u64 {
            debug!(field = %field, declared, available, "Envelope rejected: corrupted length");
            return Err(corrupted);
        }

        let len = declared as usize;
        let bytes = &self.data[self.offset..self.offset + len];
        self.offset += len;
        Ok(bytes)
    }
}
