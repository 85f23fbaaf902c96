//! Registered claim names and the per-claim checks run by the validator

mod checks;

pub(crate) use checks::{
    check_audience, check_confirmation, check_issued_at, check_issuer, check_lifetime,
    check_replay, check_token_type,
};

/// Registered payload claim names (RFC 7519 §4.1)
pub mod registered {
    pub const ISSUER: &str = "iss";
    pub const SUBJECT: &str = "sub";
    pub const AUDIENCE: &str = "aud";
    pub const EXPIRATION: &str = "exp";
    pub const NOT_BEFORE: &str = "nbf";
    pub const ISSUED_AT: &str = "iat";
    pub const JWT_ID: &str = "jti";
    /// Confirmation (RFC 7800)
    pub const CONFIRMATION: &str = "cnf";
}

/// JOSE header parameter names (RFC 7515 §4.1)
pub mod header {
    pub const ALGORITHM: &str = "alg";
    pub const KEY_ID: &str = "kid";
    pub const TOKEN_TYPE: &str = "typ";
    pub const CONTENT_TYPE: &str = "cty";
}
