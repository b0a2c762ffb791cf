//! RSA-OAEP key pairs and small-payload encryption.
//!
//! RSA only ever protects the one-time data key. Its plaintext capacity is bounded by
//! the modulus: `key_bytes - 2 * 32 - 2` with SHA-256 OAEP (190 bytes for RSA-2048).
//!
//! Key containers are PEM text. Public keys are written as SubjectPublicKeyInfo
//! (`PUBLIC KEY`), private keys as PKCS#1 (`RSA PRIVATE KEY`).

use rand::rngs::OsRng;
use rsa::{
    pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey, EncodeRsaPrivateKey},
    pkcs8::{der::pem, DecodePrivateKey, DecodePublicKey, EncodePublicKey, LineEnding},
    traits::PublicKeyParts,
    Oaep,
};
use sha2::Sha256;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::error::CryptoError;
use crate::random;
use crate::traits::KeyEncapsulation;

pub use rsa::{RsaPrivateKey, RsaPublicKey};

/// Default RSA modulus size in bits.
pub const DEFAULT_KEY_BITS: usize = 2048;

/// Smallest modulus accepted for new key pairs.
pub const MIN_KEY_BITS: usize = 2048;

/// SHA-256 output length, used by the OAEP capacity bound.
const OAEP_HASH_LEN: usize = 32;

const LABEL_SPKI_PUBLIC: &str = "PUBLIC KEY";
const LABEL_PKCS1_PUBLIC: &str = "RSA PUBLIC KEY";
const LABEL_PKCS1_PRIVATE: &str = "RSA PRIVATE KEY";
const LABEL_PKCS8_PRIVATE: &str = "PRIVATE KEY";

/// An RSA key pair whose halves are guaranteed to correspond.
///
/// Immutable once built; share it freely across threads.
#[derive(Clone)]
pub struct KeyPair {
    private: RsaPrivateKey,
    public: RsaPublicKey,
    bits: usize,
}

impl KeyPair {
    /// Generates a new key pair from the OS entropy source.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::KeyGenerationFailed`] if `bits` is below
    /// [`MIN_KEY_BITS`], the entropy source fails, or generation fails.
    pub fn generate(bits: usize) -> Result<Self, CryptoError> {
        if bits < MIN_KEY_BITS {
            return Err(CryptoError::KeyGenerationFailed(format!(
                "key size {} is below the minimum of {} bits",
                bits, MIN_KEY_BITS
            )));
        }

        let mut rng = random::seeded_rng()?;
        let private = RsaPrivateKey::new(&mut rng, bits)
            .map_err(|e| CryptoError::KeyGenerationFailed(e.to_string()))?;
        let public = RsaPublicKey::from(&private);

        info!(bits, "RSA key pair generated");

        Ok(Self {
            private,
            public,
            bits,
        })
    }

    /// Builds a key pair around an existing private key, deriving the public half.
    ///
    /// The private key is validated first.
    pub fn from_private_key(private: RsaPrivateKey) -> Result<Self, CryptoError> {
        private
            .validate()
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;

        let public = RsaPublicKey::from(&private);
        let bits = public.n().bits();

        Ok(Self {
            private,
            public,
            bits,
        })
    }

    /// Imports a key pair from a PEM private key.
    pub fn from_private_pem(pem_bytes: &[u8]) -> Result<Self, CryptoError> {
        Self::from_private_key(import_private_key(pem_bytes)?)
    }

    /// Returns the public key.
    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public
    }

    /// Returns the private key.
    pub fn private_key(&self) -> &RsaPrivateKey {
        &self.private
    }

    /// Declared modulus size in bits.
    pub fn bits(&self) -> usize {
        self.bits
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("bits", &self.bits)
            .field("private", &"[REDACTED]")
            .finish()
    }
}

/// Generates a new RSA key pair. See [`KeyPair::generate`].
pub fn generate_key_pair(bits: usize) -> Result<KeyPair, CryptoError> {
    KeyPair::generate(bits)
}

/// Largest plaintext [`encrypt`] accepts under `public`.
pub fn max_plaintext_len(public: &RsaPublicKey) -> usize {
    public.size().saturating_sub(2 * OAEP_HASH_LEN + 2)
}

/// Exports a public key as a SubjectPublicKeyInfo PEM document.
pub fn export_public_key(public: &RsaPublicKey) -> Result<Vec<u8>, CryptoError> {
    public
        .to_public_key_pem(LineEnding::LF)
        .map(String::into_bytes)
        .map_err(|e| CryptoError::InvalidKey(e.to_string()))
}

/// Exports a private key as a PKCS#1 PEM document.
pub fn export_private_key(private: &RsaPrivateKey) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    let document = private
        .to_pkcs1_pem(LineEnding::LF)
        .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
    Ok(Zeroizing::new(document.as_bytes().to_vec()))
}

/// Imports an RSA public key from PEM.
///
/// Accepts SubjectPublicKeyInfo and PKCS#1 bodies, including SubjectPublicKeyInfo
/// mislabeled as `RSA PUBLIC KEY`.
///
/// # Errors
///
/// Returns [`CryptoError::Parse`] on malformed PEM/DER or a non-RSA key.
pub fn import_public_key(pem_bytes: &[u8]) -> Result<RsaPublicKey, CryptoError> {
    let (label, der) =
        pem::decode_vec(pem_bytes).map_err(|e| CryptoError::Parse(e.to_string()))?;

    match label {
        LABEL_SPKI_PUBLIC => {
            RsaPublicKey::from_public_key_der(&der).map_err(|e| CryptoError::Parse(e.to_string()))
        }
        LABEL_PKCS1_PUBLIC => RsaPublicKey::from_pkcs1_der(&der)
            .or_else(|_| RsaPublicKey::from_public_key_der(&der))
            .map_err(|e| CryptoError::Parse(e.to_string())),
        other => Err(CryptoError::Parse(format!(
            "unexpected PEM label for public key: {}",
            other
        ))),
    }
}

/// Imports an RSA private key from PEM (PKCS#1 or PKCS#8).
///
/// # Errors
///
/// Returns [`CryptoError::Parse`] on malformed PEM/DER, a non-RSA key, or a key
/// that fails consistency checks.
pub fn import_private_key(pem_bytes: &[u8]) -> Result<RsaPrivateKey, CryptoError> {
    let (label, der) =
        pem::decode_vec(pem_bytes).map_err(|e| CryptoError::Parse(e.to_string()))?;
    let der = Zeroizing::new(der);

    let private = match label {
        LABEL_PKCS1_PRIVATE => RsaPrivateKey::from_pkcs1_der(&der)
            .map_err(|e| CryptoError::Parse(e.to_string()))?,
        LABEL_PKCS8_PRIVATE => RsaPrivateKey::from_pkcs8_der(&der)
            .map_err(|e| CryptoError::Parse(e.to_string()))?,
        other => {
            return Err(CryptoError::Parse(format!(
                "unexpected PEM label for private key: {}",
                other
            )))
        }
    };

    private
        .validate()
        .map_err(|e| CryptoError::Parse(e.to_string()))?;

    Ok(private)
}

/// Encrypts a short plaintext with RSA-OAEP (SHA-256, no label).
///
/// # Errors
///
/// Returns [`CryptoError::EncryptionFailed`] if the plaintext exceeds
/// [`max_plaintext_len`] or the entropy source fails.
pub fn encrypt(public: &RsaPublicKey, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let limit = max_plaintext_len(public);
    if plaintext.len() > limit {
        return Err(CryptoError::EncryptionFailed(format!(
            "plaintext of {} bytes exceeds the {}-byte limit for this key",
            plaintext.len(),
            limit
        )));
    }

    public
        .encrypt(&mut OsRng, Oaep::new::<Sha256>(), plaintext)
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))
}

/// Decrypts an RSA-OAEP ciphertext.
///
/// Every failure maps to [`CryptoError::DecryptionFailed`] without detail.
pub fn decrypt(
    private: &RsaPrivateKey,
    ciphertext: &[u8],
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    private
        .decrypt_blinded(&mut OsRng, Oaep::new::<Sha256>(), ciphertext)
        .map(Zeroizing::new)
        .map_err(|_| {
            debug!("RSA-OAEP decryption rejected");
            CryptoError::DecryptionFailed
        })
}

/// RSA-OAEP-SHA256 as a [`KeyEncapsulation`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RsaOaep;

impl KeyEncapsulation for RsaOaep {
    type PublicKey = RsaPublicKey;
    type PrivateKey = RsaPrivateKey;

    fn name(&self) -> &'static str {
        "RSA-OAEP-SHA256"
    }

    fn wrap_key(&self, public: &RsaPublicKey, secret: &[u8]) -> Result<Vec<u8>, CryptoError> {
        encrypt(public, secret)
    }

    fn unwrap_key(
        &self,
        private: &RsaPrivateKey,
        wrapped: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
        decrypt(private, wrapped)
    }
}
