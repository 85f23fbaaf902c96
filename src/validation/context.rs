use std::collections::HashMap;

use crate::json::ClaimValue;
use crate::token::Token;

use super::ValidationParameters;

/// Per-call state for one validation run
///
/// `now` is captured once when the context is created; every temporal check
/// in the run compares against it.
#[derive(Debug)]
pub struct ValidationContext<'a> {
    pub token: &'a Token,
    pub parameters: &'a ValidationParameters,
    /// Unix timestamp in seconds
    pub now: i64,
    /// Values recorded during the run (`alg`, `kid`) for callers and hooks
    pub extensions: HashMap<String, ClaimValue>,
}

impl<'a> ValidationContext<'a> {
    pub fn new(token: &'a Token, parameters: &'a ValidationParameters, now: i64) -> Self {
        Self {
            token,
            parameters,
            now,
            extensions: HashMap::new(),
        }
    }

    pub fn set_extension(&mut self, name: impl Into<String>, value: impl Into<ClaimValue>) {
        self.extensions.insert(name.into(), value.into());
    }

    pub fn extension(&self, name: &str) -> Option<&ClaimValue> {
        self.extensions.get(name)
    }
}
