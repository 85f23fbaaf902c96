//! Key types for JWT signing and verification
//!
//! This module provides a type-safe abstraction over different key types:
//! - Symmetric keys (for HMAC algorithms)
//! - RSA keys (PKCS#8 private key pair, or public key only)
//! - ECDSA keys bound to a curve (PKCS#8 private key pair, or public point only)
//!
//! The key type decides which algorithm family it can serve. An HMAC secret
//! can never be handed to an RSA verifier and vice versa.

use std::sync::Arc;

use aws_lc_rs::signature::{EcdsaKeyPair, KeyPair, RsaKeyPair};
use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// A key that can be used for JWT signing and/or verification
#[derive(Debug, Clone)]
pub enum Key {
    /// Symmetric key for HMAC algorithms
    Symmetric(SymmetricKey),

    /// Asymmetric key for RSA/ECDSA algorithms
    Asymmetric(AsymmetricKey),
}

impl Key {
    /// Create a symmetric key from bytes
    pub fn symmetric(secret: impl Into<Vec<u8>>) -> Self {
        Key::Symmetric(SymmetricKey::new(secret.into()))
    }

    /// Load an RSA key pair from a PKCS#8 DER private key
    pub fn rsa_pkcs8(der: &[u8]) -> Result<Self> {
        RsaKey::from_pkcs8(der).map(|key| Key::Asymmetric(AsymmetricKey::Rsa(key)))
    }

    /// Create a verification-only RSA key from a DER-encoded public key
    pub fn rsa_public(der: impl Into<Vec<u8>>) -> Self {
        Key::Asymmetric(AsymmetricKey::Rsa(RsaKey::public(der.into())))
    }

    /// Load an ECDSA key pair from a PKCS#8 DER private key
    pub fn ecdsa_pkcs8(der: &[u8], curve: EcdsaCurve) -> Result<Self> {
        EcdsaKey::from_pkcs8(der, curve).map(|key| Key::Asymmetric(AsymmetricKey::Ecdsa(key)))
    }

    /// Create a verification-only ECDSA key from an uncompressed public point
    pub fn ecdsa_public(point: impl Into<Vec<u8>>, curve: EcdsaCurve) -> Self {
        Key::Asymmetric(AsymmetricKey::Ecdsa(EcdsaKey::public(point.into(), curve)))
    }

    /// Get key type name for error messages
    pub fn key_type(&self) -> &'static str {
        match self {
            Key::Symmetric(_) => "Symmetric",
            Key::Asymmetric(AsymmetricKey::Rsa(_)) => "RSA",
            Key::Asymmetric(AsymmetricKey::Ecdsa(_)) => "ECDSA",
        }
    }

    /// Whether the key holds private material and can produce signatures
    pub fn can_sign(&self) -> bool {
        match self {
            Key::Symmetric(_) => true,
            Key::Asymmetric(AsymmetricKey::Rsa(key)) => key.key_pair.is_some(),
            Key::Asymmetric(AsymmetricKey::Ecdsa(key)) => key.key_pair.is_some(),
        }
    }

    /// A verification-only copy of this key
    ///
    /// Symmetric keys are returned unchanged.
    pub fn to_public(&self) -> Key {
        match self {
            Key::Symmetric(_) => self.clone(),
            Key::Asymmetric(AsymmetricKey::Rsa(key)) => Key::rsa_public(key.public_der.clone()),
            Key::Asymmetric(AsymmetricKey::Ecdsa(key)) => {
                Key::ecdsa_public(key.public_point.clone(), key.curve)
            }
        }
    }

    /// Get as symmetric key or return error
    pub fn as_symmetric(&self) -> Result<&SymmetricKey> {
        match self {
            Key::Symmetric(key) => Ok(key),
            _ => Err(self.mismatch("HMAC", "Symmetric")),
        }
    }

    /// Get as RSA key or return error
    pub fn as_rsa(&self) -> Result<&RsaKey> {
        match self {
            Key::Asymmetric(AsymmetricKey::Rsa(key)) => Ok(key),
            _ => Err(self.mismatch("RSA", "RSA")),
        }
    }

    /// Get as ECDSA key or return error
    pub fn as_ecdsa(&self) -> Result<&EcdsaKey> {
        match self {
            Key::Asymmetric(AsymmetricKey::Ecdsa(key)) => Ok(key),
            _ => Err(self.mismatch("ECDSA", "ECDSA")),
        }
    }

    fn mismatch(&self, algorithm: &str, expected: &str) -> Error {
        Error::KeyTypeMismatch {
            algorithm: algorithm.to_string(),
            expected: expected.to_string(),
            actual: self.key_type().to_string(),
        }
    }
}

/// Symmetric key for HMAC algorithms
///
/// The secret is wiped from memory on drop.
#[derive(Clone)]
pub struct SymmetricKey {
    secret: Zeroizing<Vec<u8>>,
}

impl SymmetricKey {
    /// Create a new symmetric key
    pub fn new(secret: Vec<u8>) -> Self {
        Self {
            secret: Zeroizing::new(secret),
        }
    }

    /// Get the secret bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.secret
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymmetricKey")
            .field("len", &self.secret.len())
            .finish_non_exhaustive()
    }
}

impl From<Vec<u8>> for SymmetricKey {
    fn from(secret: Vec<u8>) -> Self {
        Self::new(secret)
    }
}

impl From<&[u8]> for SymmetricKey {
    fn from(secret: &[u8]) -> Self {
        Self::new(secret.to_vec())
    }
}

impl From<String> for SymmetricKey {
    fn from(secret: String) -> Self {
        Self::new(secret.into_bytes())
    }
}

impl From<&str> for SymmetricKey {
    fn from(secret: &str) -> Self {
        Self::new(secret.as_bytes().to_vec())
    }
}

/// Asymmetric key for RSA/ECDSA algorithms
#[derive(Debug, Clone)]
pub enum AsymmetricKey {
    Rsa(RsaKey),
    Ecdsa(EcdsaKey),
}

/// RSA key: optional private key pair plus DER public key
#[derive(Clone)]
pub struct RsaKey {
    key_pair: Option<Arc<RsaKeyPair>>,
    public_der: Vec<u8>,
}

impl RsaKey {
    /// Parse a PKCS#8 DER private key
    pub fn from_pkcs8(der: &[u8]) -> Result<Self> {
        let key_pair =
            RsaKeyPair::from_pkcs8(der).map_err(|e| Error::KeyRejected(format!("RSA: {e}")))?;
        let public_der = key_pair.public_key().as_ref().to_vec();

        Ok(Self {
            key_pair: Some(Arc::new(key_pair)),
            public_der,
        })
    }

    /// Create a verification-only key from DER public key bytes
    pub fn public(der: Vec<u8>) -> Self {
        Self {
            key_pair: None,
            public_der: der,
        }
    }

    /// Get the DER-encoded public key bytes
    pub fn public_der(&self) -> &[u8] {
        &self.public_der
    }

    pub(crate) fn key_pair(&self) -> Option<&RsaKeyPair> {
        self.key_pair.as_deref()
    }
}

impl std::fmt::Debug for RsaKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaKey")
            .field("private", &self.key_pair.is_some())
            .field("public_der_len", &self.public_der.len())
            .finish()
    }
}

/// ECDSA curve identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcdsaCurve {
    /// P-256 (secp256r1) curve
    P256,
    /// P-384 (secp384r1) curve
    P384,
    /// P-521 (secp521r1) curve
    P521,
}

/// ECDSA key: optional private key pair plus uncompressed public point
#[derive(Clone)]
pub struct EcdsaKey {
    key_pair: Option<Arc<EcdsaKeyPair>>,
    public_point: Vec<u8>,
    curve: EcdsaCurve,
}

impl EcdsaKey {
    /// Parse a PKCS#8 DER private key for the given curve
    pub fn from_pkcs8(der: &[u8], curve: EcdsaCurve) -> Result<Self> {
        let key_pair = EcdsaKeyPair::from_pkcs8(crate::algorithm::ecdsa::signing_algorithm(curve), der)
            .map_err(|e| Error::KeyRejected(format!("ECDSA {curve:?}: {e}")))?;
        let public_point = key_pair.public_key().as_ref().to_vec();

        Ok(Self {
            key_pair: Some(Arc::new(key_pair)),
            public_point,
            curve,
        })
    }

    /// Create a verification-only key from an uncompressed public point
    pub fn public(point: Vec<u8>, curve: EcdsaCurve) -> Self {
        Self {
            key_pair: None,
            public_point: point,
            curve,
        }
    }

    /// Get the public point bytes
    pub fn public_point(&self) -> &[u8] {
        &self.public_point
    }

    /// Get the curve
    pub fn curve(&self) -> EcdsaCurve {
        self.curve
    }

    pub(crate) fn key_pair(&self) -> Option<&EcdsaKeyPair> {
        self.key_pair.as_deref()
    }
}

impl std::fmt::Debug for EcdsaKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EcdsaKey")
            .field("curve", &self.curve)
            .field("private", &self.key_pair.is_some())
            .finish()
    }
}
