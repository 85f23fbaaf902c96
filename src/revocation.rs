//! Revocation hook
//!
//! Revocation is decided outside this crate. A caller that keeps a revocation
//! list asks it about the token's identifier after validation and folds the
//! answer in with [`ValidationResult::apply_revocation`]. Tokens without a
//! `jti` are identified by their compact string:
//!
//! ```ignore
//! let mut result = validator.validate(&token, &params)?;
//! result.apply_revocation(&revocations.check(revocation_id(&token)));
//! ```
//!
//! [`ValidationResult::apply_revocation`]: crate::ValidationResult::apply_revocation

use std::collections::HashSet;

use crate::token::Token;

/// Answer from a revocation backend
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RevocationStatus {
    pub revoked: bool,
    pub reason: Option<String>,
}

impl RevocationStatus {
    /// Not revoked
    pub fn active() -> Self {
        Self::default()
    }

    pub fn revoked(reason: Option<String>) -> Self {
        Self {
            revoked: true,
            reason,
        }
    }
}

/// A source of revocation decisions keyed by token identifier
pub trait RevocationCheck {
    fn check(&self, token_id: &str) -> RevocationStatus;
}

impl<F> RevocationCheck for F
where
    F: Fn(&str) -> RevocationStatus,
{
    fn check(&self, token_id: &str) -> RevocationStatus {
        self(token_id)
    }
}

impl RevocationCheck for HashSet<String> {
    fn check(&self, token_id: &str) -> RevocationStatus {
        if self.contains(token_id) {
            RevocationStatus::revoked(None)
        } else {
            RevocationStatus::active()
        }
    }
}

/// Identifier a token is revoked by
///
/// The `jti` claim when present, otherwise the compact string itself.
pub fn revocation_id(token: &Token) -> &str {
    token.jwt_id().unwrap_or_else(|| token.raw())
}
