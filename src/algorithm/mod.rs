mod traits;

pub mod ecdsa;
pub mod hmac;
pub mod rsa;

pub use traits::{get_algorithm, Algorithm, SignatureAlgorithm};

use crate::error::{Error, Result};
use crate::keys::Key;
use crate::limits::{MAX_ALG_LENGTH, MAX_DECODED_SIGNATURE_SIZE};

/// Algorithm identifier from the JWT `alg` header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmId {
    /// HMAC with SHA-256
    HS256,
    /// HMAC with SHA-384
    HS384,
    /// HMAC with SHA-512
    HS512,

    /// RSA PKCS#1 v1.5 with SHA-256
    RS256,
    /// RSA PKCS#1 v1.5 with SHA-384
    RS384,
    /// RSA PKCS#1 v1.5 with SHA-512
    RS512,

    /// ECDSA with P-256 and SHA-256
    ES256,
    /// ECDSA with P-384 and SHA-384
    ES384,
    /// ECDSA with P-521 and SHA-512
    ES512,

    /// Unsecured JWT (RFC 7519 §6)
    None,
}

/// Algorithm family, which decides the key shape an algorithm accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmFamily {
    Hmac,
    Rsa,
    Ecdsa,
    None,
}

impl AlgorithmId {
    /// Parse algorithm string from JWT header
    ///
    /// Matching is exact: `"none"` is the only accepted spelling of the
    /// unsecured algorithm, and `"hs256"` is not `HS256`.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self> {
        if s.len() > MAX_ALG_LENGTH {
            return Err(Error::AlgorithmUnsupported(format!(
                "algorithm name exceeds {MAX_ALG_LENGTH} bytes"
            )));
        }

        match s {
            "HS256" => Ok(AlgorithmId::HS256),
            "HS384" => Ok(AlgorithmId::HS384),
            "HS512" => Ok(AlgorithmId::HS512),

            "RS256" => Ok(AlgorithmId::RS256),
            "RS384" => Ok(AlgorithmId::RS384),
            "RS512" => Ok(AlgorithmId::RS512),

            "ES256" => Ok(AlgorithmId::ES256),
            "ES384" => Ok(AlgorithmId::ES384),
            "ES512" => Ok(AlgorithmId::ES512),

            "none" => Ok(AlgorithmId::None),

            _ => Err(Error::AlgorithmUnsupported(s.to_string())),
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            AlgorithmId::HS256 => "HS256",
            AlgorithmId::HS384 => "HS384",
            AlgorithmId::HS512 => "HS512",
            AlgorithmId::RS256 => "RS256",
            AlgorithmId::RS384 => "RS384",
            AlgorithmId::RS512 => "RS512",
            AlgorithmId::ES256 => "ES256",
            AlgorithmId::ES384 => "ES384",
            AlgorithmId::ES512 => "ES512",
            AlgorithmId::None => "none",
        }
    }

    pub fn family(&self) -> AlgorithmFamily {
        match self {
            AlgorithmId::HS256 | AlgorithmId::HS384 | AlgorithmId::HS512 => AlgorithmFamily::Hmac,
            AlgorithmId::RS256 | AlgorithmId::RS384 | AlgorithmId::RS512 => AlgorithmFamily::Rsa,
            AlgorithmId::ES256 | AlgorithmId::ES384 | AlgorithmId::ES512 => AlgorithmFamily::Ecdsa,
            AlgorithmId::None => AlgorithmFamily::None,
        }
    }

    /// Check if algorithm is HMAC-based (symmetric)
    pub fn is_symmetric(&self) -> bool {
        self.family() == AlgorithmFamily::Hmac
    }

    /// Check if this is the unsecured `none` algorithm
    pub fn is_unsigned(&self) -> bool {
        *self == AlgorithmId::None
    }
}

impl std::fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AlgorithmId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        AlgorithmId::from_str(s)
    }
}

/// Policy for allowed algorithms
///
/// `none` is never part of a predefined policy. Unsigned tokens are governed
/// by the separate `allow_unsigned_tokens` toggle; listing `AlgorithmId::None`
/// in [`allow_only`](Self::allow_only) is still required when a policy is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmPolicy {
    allowed: Vec<AlgorithmId>,
}

impl AlgorithmPolicy {
    /// Create a policy that allows only specific algorithms
    pub fn allow_only(algorithms: Vec<AlgorithmId>) -> Self {
        Self {
            allowed: algorithms,
        }
    }

    /// Create a policy that allows every signing algorithm
    pub fn allow_all() -> Self {
        Self::allow_only(vec![
            AlgorithmId::HS256,
            AlgorithmId::HS384,
            AlgorithmId::HS512,
            AlgorithmId::RS256,
            AlgorithmId::RS384,
            AlgorithmId::RS512,
            AlgorithmId::ES256,
            AlgorithmId::ES384,
            AlgorithmId::ES512,
        ])
    }

    /// Policy that allows only HS256
    pub fn hs256_only() -> Self {
        Self::allow_only(vec![AlgorithmId::HS256])
    }

    /// Policy that allows any HMAC algorithm (HS256, HS384, HS512)
    ///
    /// # Security Warning
    ///
    /// Using multiple HMAC variants with the same key is not recommended.
    /// Prefer [`hs256_only()`](Self::hs256_only).
    pub fn hmac_any() -> Self {
        Self::allow_only(vec![
            AlgorithmId::HS256,
            AlgorithmId::HS384,
            AlgorithmId::HS512,
        ])
    }

    /// Policy that allows only RS256
    pub fn rs256_only() -> Self {
        Self::allow_only(vec![AlgorithmId::RS256])
    }

    /// Policy that allows any RSA algorithm (RS256, RS384, RS512)
    pub fn rsa_any() -> Self {
        Self::allow_only(vec![
            AlgorithmId::RS256,
            AlgorithmId::RS384,
            AlgorithmId::RS512,
        ])
    }

    /// Policy that allows only ES256 (ECDSA with P-256)
    pub fn es256_only() -> Self {
        Self::allow_only(vec![AlgorithmId::ES256])
    }

    /// Policy that allows any ECDSA algorithm (ES256, ES384, ES512)
    pub fn ecdsa_any() -> Self {
        Self::allow_only(vec![
            AlgorithmId::ES256,
            AlgorithmId::ES384,
            AlgorithmId::ES512,
        ])
    }

    /// Policy that allows recommended asymmetric algorithms (RS256 + ES256)
    pub fn recommended_asymmetric() -> Self {
        Self::allow_only(vec![AlgorithmId::RS256, AlgorithmId::ES256])
    }

    /// Check if an algorithm is allowed
    pub fn is_allowed(&self, algorithm: AlgorithmId) -> bool {
        self.allowed.contains(&algorithm)
    }

    /// Validate algorithm against policy
    pub fn validate(&self, algorithm: AlgorithmId) -> Result<()> {
        if self.is_allowed(algorithm) {
            Ok(())
        } else {
            let allowed: Vec<&str> = self.allowed.iter().map(AlgorithmId::as_str).collect();
            Err(Error::AlgorithmUnsupported(format!(
                "{algorithm} is not allowed by policy (allowed: {})",
                allowed.join(", ")
            )))
        }
    }

    /// Get list of allowed algorithms
    pub fn allowed_algorithms(&self) -> &[AlgorithmId] {
        &self.allowed
    }
}

impl Default for AlgorithmPolicy {
    fn default() -> Self {
        Self::allow_all()
    }
}

/// Signs and verifies signing inputs for every supported algorithm
///
/// The engine holds no key material. Keys are passed per call and must match
/// the algorithm's family; an HMAC secret handed to `RS256` fails with
/// [`Error::KeyTypeMismatch`] before any cryptography runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureEngine {
    allow_unsigned: bool,
}

impl SignatureEngine {
    /// Engine that rejects unsigned tokens
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `alg = none` with an empty signature during verification
    pub fn allow_unsigned(mut self, allow: bool) -> Self {
        self.allow_unsigned = allow;
        self
    }

    pub fn allows_unsigned(&self) -> bool {
        self.allow_unsigned
    }

    /// Produce raw signature bytes over `signing_input`
    pub fn sign(&self, signing_input: &[u8], algorithm: AlgorithmId, key: &Key) -> Result<Vec<u8>> {
        let implementation = get_algorithm(algorithm).ok_or(Error::AlgorithmNoneRejected)?;

        let signature = implementation.sign(signing_input, key).inspect_err(|e| {
            tracing::debug!(algorithm = %algorithm, error = %e, "signing failed");
        })?;

        tracing::trace!(algorithm = %algorithm, len = signature.len(), "signed");
        Ok(signature)
    }

    /// Verify a signature, reporting only success or failure
    pub fn verify(
        &self,
        signing_input: &[u8],
        signature: &[u8],
        algorithm: AlgorithmId,
        key: &Key,
    ) -> bool {
        self.verify_detailed(signing_input, signature, algorithm, key)
            .is_ok()
    }

    /// Verify a signature and return the reason on failure
    pub fn verify_detailed(
        &self,
        signing_input: &[u8],
        signature: &[u8],
        algorithm: AlgorithmId,
        key: &Key,
    ) -> Result<()> {
        let Some(implementation) = get_algorithm(algorithm) else {
            return self.check_unsigned(signature);
        };

        if signature.len() > MAX_DECODED_SIGNATURE_SIZE {
            return Err(Error::SignatureInvalid);
        }

        implementation
            .verify(signing_input, signature, key)
            .inspect_err(|e| {
                tracing::debug!(algorithm = %algorithm, error = %e, "signature verification failed");
            })
    }

    /// Accept an unsigned token only when enabled and the signature is empty
    pub fn check_unsigned(&self, signature: &[u8]) -> Result<()> {
        if !self.allow_unsigned {
            return Err(Error::AlgorithmNoneRejected);
        }
        if !signature.is_empty() {
            return Err(Error::SignatureInvalid);
        }
        Ok(())
    }
}
