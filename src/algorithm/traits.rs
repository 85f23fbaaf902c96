use crate::error::Result;
use crate::keys::Key;

use super::AlgorithmId;

/// Core algorithm trait that all JWT signature algorithms implement
///
/// Different algorithm families (HMAC, RSA, ECDSA) implement this trait.
/// Each implementation checks that the key belongs to its family before
/// touching any cryptography.
pub trait Algorithm {
    /// The algorithm identifier (e.g., "HS256", "RS256")
    fn name(&self) -> &'static str;

    /// Sign the signing input (`header.payload`) and return raw signature bytes
    fn sign(&self, signing_input: &[u8], key: &Key) -> Result<Vec<u8>>;

    /// Verify raw signature bytes over the signing input
    fn verify(&self, signing_input: &[u8], signature: &[u8], key: &Key) -> Result<()>;
}

/// Shared reference to a signature algorithm implementation
pub type SignatureAlgorithm = &'static (dyn Algorithm + Send + Sync);

/// Get the implementation for the given algorithm ID
///
/// Returns `None` for the unsigned `none` algorithm, which has no implementation.
pub fn get_algorithm(algorithm: AlgorithmId) -> Option<SignatureAlgorithm> {
    match algorithm {
        AlgorithmId::HS256 => Some(&super::hmac::HS256),
        AlgorithmId::HS384 => Some(&super::hmac::HS384),
        AlgorithmId::HS512 => Some(&super::hmac::HS512),

        AlgorithmId::RS256 => Some(&super::rsa::RS256),
        AlgorithmId::RS384 => Some(&super::rsa::RS384),
        AlgorithmId::RS512 => Some(&super::rsa::RS512),

        AlgorithmId::ES256 => Some(&super::ecdsa::ES256),
        AlgorithmId::ES384 => Some(&super::ecdsa::ES384),
        AlgorithmId::ES512 => Some(&super::ecdsa::ES512),

        AlgorithmId::None => None,
    }
}
