//! Accumulated validation outcome

use crate::json::ClaimValue;
use crate::revocation::RevocationStatus;

/// Category of a validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorCode {
    /// The compact string is malformed, or the header `typ` is not the required one
    InvalidToken,
    InvalidSignature,
    TokenExpired,
    TokenNotYetValid,
    InvalidIssuer,
    InvalidAudience,
    MissingClaim,
    InvalidClaimValue,
    JtiMissing,
    JtiAlreadyUsed,
    TokenRevoked,
}

impl ValidationErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationErrorCode::InvalidToken => "InvalidToken",
            ValidationErrorCode::InvalidSignature => "InvalidSignature",
            ValidationErrorCode::TokenExpired => "TokenExpired",
            ValidationErrorCode::TokenNotYetValid => "TokenNotYetValid",
            ValidationErrorCode::InvalidIssuer => "InvalidIssuer",
            ValidationErrorCode::InvalidAudience => "InvalidAudience",
            ValidationErrorCode::MissingClaim => "MissingClaim",
            ValidationErrorCode::InvalidClaimValue => "InvalidClaimValue",
            ValidationErrorCode::JtiMissing => "JtiMissing",
            ValidationErrorCode::JtiAlreadyUsed => "JtiAlreadyUsed",
            ValidationErrorCode::TokenRevoked => "TokenRevoked",
        }
    }
}

impl std::fmt::Display for ValidationErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One validation failure
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    code: ValidationErrorCode,
    message: String,
    details: Option<ClaimValue>,
}

impl ValidationError {
    pub fn new(code: ValidationErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Attach structured details (e.g. the offending claim value)
    pub fn with_details(mut self, details: impl Into<ClaimValue>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn code(&self) -> ValidationErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&ClaimValue> {
        self.details.as_ref()
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// Validity flag plus the ordered list of failures found
///
/// The flag is set by the constructor or [`mark_invalid`](Self::mark_invalid)
/// and is independent of the error list: [`add_error`](Self::add_error) only
/// records. The validator marks a result invalid whenever it records an error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    is_valid: bool,
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn new(is_valid: bool, errors: Vec<ValidationError>) -> Self {
        Self { is_valid, errors }
    }

    pub fn success() -> Self {
        Self::new(true, Vec::new())
    }

    pub fn failure(error: ValidationError) -> Self {
        Self::new(false, vec![error])
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    /// Whether any recorded error has the given code
    pub fn has_error(&self, code: ValidationErrorCode) -> bool {
        self.errors.iter().any(|e| e.code == code)
    }

    /// Append an error without touching the validity flag
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn mark_invalid(&mut self) {
        self.is_valid = false;
    }

    /// Append another result's errors and AND in its validity
    ///
    /// A merged result that carries errors invalidates this one even when its
    /// own flag is still set.
    pub fn merge(&mut self, other: ValidationResult) {
        self.is_valid &= other.is_valid && other.errors.is_empty();
        self.errors.extend(other.errors);
    }

    /// Fold an external revocation verdict into this result
    pub fn apply_revocation(&mut self, status: &RevocationStatus) {
        if !status.revoked {
            return;
        }

        let message = match &status.reason {
            Some(reason) => format!("Token has been revoked: {reason}"),
            None => "Token has been revoked".to_string(),
        };
        self.add_error(ValidationError::new(ValidationErrorCode::TokenRevoked, message));
        self.mark_invalid();
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::success()
    }
}
