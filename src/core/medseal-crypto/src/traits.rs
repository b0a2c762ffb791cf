//! Algorithm-agnostic capabilities composed by envelope encryption.
//!
//! [`KeyEncapsulation`] protects a small secret under a recipient key pair;
//! [`AuthenticatedCipher`] seals bulk data under a one-time symmetric key.

use zeroize::Zeroizing;

use crate::error::CryptoError;
use crate::keys::SymmetricKey;

/// Asymmetric protection of a short secret (the one-time data key).
pub trait KeyEncapsulation {
    /// Key used to wrap.
    type PublicKey;
    /// Key used to unwrap.
    type PrivateKey;

    /// Human-readable algorithm name, used in logs.
    fn name(&self) -> &'static str;

    /// Wraps `secret` so only the holder of the matching private key can recover it.
    fn wrap_key(&self, public: &Self::PublicKey, secret: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Recovers a secret produced by [`KeyEncapsulation::wrap_key`].
    ///
    /// Implementations must fail uniformly, whatever check rejected the input.
    fn unwrap_key(
        &self,
        private: &Self::PrivateKey,
        wrapped: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>, CryptoError>;
}

/// Authenticated encryption of bulk data under a one-time key.
pub trait AuthenticatedCipher {
    /// Human-readable algorithm name, used in logs.
    fn name(&self) -> &'static str;

    /// Required key length in bytes.
    fn key_size(&self) -> usize;

    /// Required nonce length in bytes.
    fn nonce_size(&self) -> usize;

    /// Length of the authentication tag appended to every ciphertext.
    fn tag_size(&self) -> usize;

    /// Generates a fresh random key.
    fn generate_key(&self) -> Result<SymmetricKey, CryptoError>;

    /// Generates a fresh random nonce of [`AuthenticatedCipher::nonce_size`] bytes.
    fn generate_nonce(&self) -> Result<Vec<u8>, CryptoError>;

    /// Encrypts and authenticates `plaintext`, returning `ciphertext || tag`.
    fn seal(&self, key: &[u8], nonce: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Verifies and decrypts; no plaintext is returned unless the tag is valid.
    fn open(
        &self,
        key: &[u8],
        nonce: &[u8],
        ciphertext: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>, CryptoError>;
}
