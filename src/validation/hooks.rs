//! Extension points used by [`Validator`](crate::Validator)
//!
//! Storage and refresh policy live outside this crate. The validator only
//! calls these traits at fixed points: the cache before and after a run, the
//! sliding expiration policy after a successful one.

use std::time::Duration;

use crate::token::Token;

use super::{ValidationParameters, ValidationResult};

/// Result cache keyed by the raw compact string
pub trait ValidationCache: Send + Sync {
    fn get(&self, raw_token: &str) -> Option<ValidationResult>;

    /// Store a result for `ttl`; only valid results are ever passed in
    fn put(&self, raw_token: &str, result: &ValidationResult, ttl: Duration);
}

/// Called after a successful validation when sliding expiration is enabled
///
/// What sliding means (re-issuing the token, extending a session or cache
/// entry) is up to the implementation.
pub trait SlidingExpirationPolicy: Send + Sync {
    fn on_validated(&self, token: &Token, parameters: &ValidationParameters, window: Duration);
}
