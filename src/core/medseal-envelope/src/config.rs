//! Envelope configuration.

use medseal_crypto::asymmetric::{DEFAULT_KEY_BITS, MIN_KEY_BITS};
use medseal_crypto::KeyPair;
use serde::{Deserialize, Serialize};

use crate::error::EnvelopeError;

/// What to do with bytes that follow the ciphertext field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrailingBytes {
    /// Treat them as corruption (default).
    #[default]
    Reject,
    /// Ignore them.
    Allow,
}

/// Configuration for envelope operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvelopeConfig {
    /// RSA modulus size for generated key pairs (default: 2048).
    pub key_bits: usize,
    /// Trailing-bytes policy for deserialization (default: reject).
    pub trailing_bytes: TrailingBytes,
}

impl EnvelopeConfig {
    /// Creates a configuration with the defaults.
    pub fn new() -> Self {
        Self {
            key_bits: DEFAULT_KEY_BITS,
            trailing_bytes: TrailingBytes::default(),
        }
    }

    /// Parses a configuration from JSON and validates it.
    ///
    /// Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self, EnvelopeError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| EnvelopeError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), EnvelopeError> {
        if self.key_bits < MIN_KEY_BITS {
            return Err(EnvelopeError::InvalidConfig(format!(
                "key_bits must be >= {}, got {}",
                MIN_KEY_BITS, self.key_bits
            )));
        }
        Ok(())
    }

    /// Generates a key pair of the configured size.
    pub fn generate_key_pair(&self) -> Result<KeyPair, EnvelopeError> {
        self.validate()?;
        Ok(KeyPair::generate(self.key_bits)?)
    }
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self::new()
    }
}
