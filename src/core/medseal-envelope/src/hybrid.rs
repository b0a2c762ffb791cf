//! Hybrid (envelope) encryption.
//!
//! A one-time data key seals the payload with an [`AuthenticatedCipher`]; the data key
//! itself is wrapped for the recipient with a [`KeyEncapsulation`]. The defaults are
//! RSA-OAEP-SHA256 and AES-256-GCM.
//!
//! ## Progress milestones
//!
//! | Encrypt                  | %   | Decrypt                 | %   |
//! |--------------------------|-----|-------------------------|-----|
//! | generate data key        | 0   | unwrap data key         | 0   |
//! | create cipher            | 10  | create cipher           | 20  |
//! | generate nonce           | 20  | open payload            | 40  |
//! | seal payload             | 30  | done                    | 100 |
//! | wrap data key            | 80  |                         |     |
//! | done                     | 100 |                         |     |
//!
//! Milestones are fixed and do not scale with payload size.

use medseal_crypto::{
    Aes256GcmCipher, AuthenticatedCipher, CancellationToken, CryptoError, KeyEncapsulation,
    ProgressReporter, ProgressSink, RsaOaep, RsaPrivateKey, RsaPublicKey,
};
use tracing::debug;
use zeroize::Zeroizing;

use crate::config::EnvelopeConfig;
use crate::error::EnvelopeError;
use crate::format::EncryptedEnvelope;

/// Envelope encryption over a key-encapsulation scheme and an AEAD cipher.
///
/// Holds no mutable state; one instance can serve concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct HybridEnvelope<K = RsaOaep, C = Aes256GcmCipher> {
    kem: K,
    cipher: C,
    config: EnvelopeConfig,
    cancel: Option<CancellationToken>,
}

impl HybridEnvelope {
    /// RSA-OAEP-SHA256 + AES-256-GCM with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<K, C> HybridEnvelope<K, C>
where
    K: KeyEncapsulation,
    C: AuthenticatedCipher,
{
    /// Builds an envelope over explicit algorithm implementations.
    pub fn with_algorithms(kem: K, cipher: C) -> Self {
        Self {
            kem,
            cipher,
            config: EnvelopeConfig::default(),
            cancel: None,
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: EnvelopeConfig) -> Self {
        self.config = config;
        self
    }

    /// Checks `token` between pipeline stages.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &EnvelopeConfig {
        &self.config
    }

    /// Encrypts `payload` for the holder of `public`'s private key.
    ///
    /// Either a complete envelope is returned or nothing is.
    pub fn encrypt(
        &self,
        public: &K::PublicKey,
        payload: &[u8],
        progress: Option<&mut dyn ProgressSink>,
    ) -> Result<EncryptedEnvelope, EnvelopeError> {
        let mut reporter = ProgressReporter::new(progress);
        let total = payload.len() as u64;

        debug!(
            size = payload.len(),
            kem = self.kem.name(),
            cipher = self.cipher.name(),
            "Envelope encryption started"
        );

        self.check_cancelled()?;
        reporter.report(format!("Generating {} key", self.cipher.name()), 0.0, 0, total);
        let data_key = self.cipher.generate_key()?;
        let key_len = data_key.as_bytes().len() as u64;

        self.check_cancelled()?;
        reporter.report("Creating cipher", 10.0, key_len, total);
        if data_key.as_bytes().len() != self.cipher.key_size() {
            return Err(CryptoError::InvalidKey(format!(
                "expected {} bytes, got {}",
                self.cipher.key_size(),
                data_key.as_bytes().len()
            ))
            .into());
        }

        self.check_cancelled()?;
        reporter.report("Generating nonce", 20.0, key_len, total);
        let nonce = self.cipher.generate_nonce()?;

        self.check_cancelled()?;
        reporter.report(
            format!("Encrypting data ({} bytes)", payload.len()),
            30.0,
            key_len + nonce.len() as u64,
            total,
        );
        let ciphertext = self.cipher.seal(data_key.as_bytes(), &nonce, payload)?;

        self.check_cancelled()?;
        reporter.report(
            format!("Encrypting data key with {}", self.kem.name()),
            80.0,
            total,
            total,
        );
        let wrapped_key = self.kem.wrap_key(public, data_key.as_bytes())?;

        reporter.report("Finalizing encryption", 100.0, total, total);

        debug!(
            wrapped_key = wrapped_key.len(),
            ciphertext = ciphertext.len(),
            "Envelope encryption completed"
        );

        Ok(EncryptedEnvelope {
            wrapped_key,
            nonce,
            ciphertext,
        })
    }

    /// Decrypts an envelope with the recipient's private key.
    ///
    /// # Errors
    ///
    /// - [`EnvelopeError::KeyUnwrap`] if the data key cannot be recovered
    /// - [`EnvelopeError::Authentication`] if the payload fails authentication
    pub fn decrypt(
        &self,
        private: &K::PrivateKey,
        envelope: &EncryptedEnvelope,
        progress: Option<&mut dyn ProgressSink>,
    ) -> Result<Zeroizing<Vec<u8>>, EnvelopeError> {
        let mut reporter = ProgressReporter::new(progress);
        let total = envelope.ciphertext.len() as u64;

        self.check_cancelled()?;
        reporter.report(format!("Decrypting {} key", self.cipher.name()), 0.0, 0, total);
        let data_key = self
            .kem
            .unwrap_key(private, &envelope.wrapped_key)
            .map_err(|_| {
                debug!("Envelope rejected: key unwrap failed");
                EnvelopeError::KeyUnwrap
            })?;

        self.check_cancelled()?;
        let wrapped_len = envelope.wrapped_key.len() as u64;
        reporter.report("Creating cipher", 20.0, wrapped_len, total);

        self.check_cancelled()?;
        reporter.report(
            format!("Decrypting data ({} bytes)", envelope.ciphertext.len()),
            40.0,
            wrapped_len + envelope.nonce.len() as u64,
            total,
        );
        let payload = self
            .cipher
            .open(&data_key, &envelope.nonce, &envelope.ciphertext)
            .map_err(|e| {
                debug!(error = %e, "Envelope rejected: payload did not open");
                EnvelopeError::from(e)
            })?;

        reporter.report("Finalizing decryption", 100.0, total, total);

        Ok(payload)
    }

    /// Parses a serialized envelope using the configured trailing-bytes policy.
    pub fn deserialize(
        &self,
        data: &[u8],
        progress: Option<&mut dyn ProgressSink>,
    ) -> Result<EncryptedEnvelope, EnvelopeError> {
        Ok(EncryptedEnvelope::from_bytes_with(
            data,
            self.config.trailing_bytes,
            progress,
        )?)
    }

    /// Encrypts and serializes in one step.
    pub fn seal(
        &self,
        public: &K::PublicKey,
        payload: &[u8],
        progress: Option<&mut dyn ProgressSink>,
    ) -> Result<Vec<u8>, EnvelopeError> {
        Ok(self.encrypt(public, payload, progress)?.to_bytes())
    }

    /// Deserializes and decrypts in one step.
    pub fn open(
        &self,
        private: &K::PrivateKey,
        data: &[u8],
        progress: Option<&mut dyn ProgressSink>,
    ) -> Result<Zeroizing<Vec<u8>>, EnvelopeError> {
        let envelope = self.deserialize(data, None)?;
        self.decrypt(private, &envelope, progress)
    }

    fn check_cancelled(&self) -> Result<(), EnvelopeError> {
        match &self.cancel {
            Some(token) => Ok(token.check()?),
            None => Ok(()),
        }
    }
}

/// Encrypts `payload` under `public` with RSA-OAEP-SHA256 and AES-256-GCM.
pub fn encrypt(
    public: &RsaPublicKey,
    payload: &[u8],
    progress: Option<&mut dyn ProgressSink>,
) -> Result<EncryptedEnvelope, EnvelopeError> {
    HybridEnvelope::new().encrypt(public, payload, progress)
}

/// Decrypts an envelope produced by [`encrypt`].
pub fn decrypt(
    private: &RsaPrivateKey,
    envelope: &EncryptedEnvelope,
    progress: Option<&mut dyn ProgressSink>,
) -> Result<Zeroizing<Vec<u8>>, EnvelopeError> {
    HybridEnvelope::new().decrypt(private, envelope, progress)
}

/// Serializes an envelope. See [`EncryptedEnvelope::to_bytes_with_progress`].
pub fn serialize(envelope: &EncryptedEnvelope, progress: Option<&mut dyn ProgressSink>) -> Vec<u8> {
    envelope.to_bytes_with_progress(progress)
}

/// Deserializes an envelope, rejecting trailing bytes.
pub fn deserialize(
    data: &[u8],
    progress: Option<&mut dyn ProgressSink>,
) -> Result<EncryptedEnvelope, EnvelopeError> {
    HybridEnvelope::new().deserialize(data, progress)
}
