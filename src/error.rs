//! Error types for jwtkit
//!
//! `Error` covers failures that are reported immediately at the call that
//! caused them: malformed compact strings, signing problems, bad arguments and
//! invalid configuration. Problems with the *content* of a token found during
//! validation are not errors in this sense; they accumulate into a
//! [`ValidationResult`](crate::ValidationResult) instead.

use thiserror::Error;

/// jwtkit errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // ============================================================================
    // Structural errors (the InvalidToken family)
    // ============================================================================
    #[error("Token too large: {size} bytes (maximum: {max} bytes)")]
    TokenTooLarge { size: usize, max: usize },

    #[error("Invalid JWT format: {0}")]
    FormatInvalid(String),

    #[error("Base64URL decoding failed: {0}")]
    FormatInvalidBase64(String),

    #[error("JSON parsing failed: {0}")]
    FormatInvalidJson(String),

    #[error("JWT {segment} must be a JSON object, found {found}")]
    FormatNotAnObject {
        segment: &'static str,
        found: &'static str,
    },

    // ============================================================================
    // Algorithm errors
    // ============================================================================
    #[error("Algorithm '{0}' is not supported")]
    AlgorithmUnsupported(String),

    #[error("The 'none' algorithm cannot be used to sign or verify (RFC 8725)")]
    AlgorithmNoneRejected,

    // ============================================================================
    // Key and signature errors
    // ============================================================================
    #[error("Key type mismatch for algorithm '{algorithm}': expected {expected}, got {actual}")]
    KeyTypeMismatch {
        algorithm: String,
        expected: String,
        actual: String,
    },

    #[error("Key rejected: {0}")]
    KeyRejected(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Signature verification failed")]
    SignatureInvalid,

    // ============================================================================
    // Claim access errors
    // ============================================================================
    #[error("Claim '{0}' is missing")]
    ClaimMissing(String),

    #[error("Claim '{claim}' cannot be read as {expected} (found {found})")]
    ClaimConversion {
        claim: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("JSON serialization failed: {0}")]
    JsonSerialization(String),

    // ============================================================================
    // Caller errors
    // ============================================================================
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    ConfigurationInvalid(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl Error {
    /// Whether this error describes a malformed compact token
    ///
    /// These are the failures surfaced as `InvalidToken` during validation.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Error::TokenTooLarge { .. }
                | Error::FormatInvalid(_)
                | Error::FormatInvalidBase64(_)
                | Error::FormatInvalidJson(_)
                | Error::FormatNotAnObject { .. }
        )
    }
}

/// Result type alias for jwtkit operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_classification() {
        assert!(Error::TokenTooLarge { size: 9000, max: 8192 }.is_structural());
        assert!(Error::FormatInvalid("x".into()).is_structural());
        assert!(Error::FormatNotAnObject {
            segment: "header",
            found: "array"
        }
        .is_structural());

        assert!(!Error::SignatureInvalid.is_structural());
        assert!(!Error::Cancelled.is_structural());
        assert!(!Error::InvalidArgument("token".into()).is_structural());
    }

    #[test]
    fn test_messages() {
        let err = Error::TokenTooLarge { size: 9000, max: 8192 };
        assert_eq!(
            err.to_string(),
            "Token too large: 9000 bytes (maximum: 8192 bytes)"
        );

        let err = Error::ClaimConversion {
            claim: "exp".into(),
            expected: "integer",
            found: "string",
        };
        assert_eq!(
            err.to_string(),
            "Claim 'exp' cannot be read as integer (found string)"
        );
    }
}
