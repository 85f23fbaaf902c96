use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::algorithm::AlgorithmPolicy;
use crate::error::{Error, Result};
use crate::json::ClaimMap;
use crate::keys::Key;
use crate::limits::{DEFAULT_CLOCK_SKEW_SECONDS, DEFAULT_MAX_TOKEN_SIZE, MAX_CLOCK_SKEW_SECONDS};
use crate::token::Token;

use super::ValidationResult;

/// Replay check: returns `true` when the `jti` has not been seen before
pub type ReplayCallback = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Proof-of-possession check over the `cnf` object
pub type ConfirmationCallback = Arc<dyn Fn(&ClaimMap) -> bool + Send + Sync>;

/// Application-specific validation run after the built-in checks
pub type CustomValidator = Arc<dyn Fn(&Token) -> ValidationResult + Send + Sync>;

const DEFAULT_CACHE_DURATION: Duration = Duration::from_secs(5 * 60);
const DEFAULT_SLIDING_EXPIRATION: Duration = Duration::from_secs(30 * 60);

/// What a validation run checks and with which keys
///
/// Fields are public; the consuming setters exist for chained construction.
///
/// # Examples
///
/// ```ignore
/// use jwtkit::*;
///
/// let params = ValidationParameters::new()
///     .issuer("https://auth.example.com")
///     .audience("my-api")
///     .symmetric_key(Key::symmetric(secret))
///     .algorithm_policy(AlgorithmPolicy::hs256_only());
/// ```
#[derive(Clone)]
pub struct ValidationParameters {
    pub valid_issuer: Option<String>,
    pub valid_issuers: Vec<String>,
    pub valid_audience: Option<String>,
    pub valid_audiences: Vec<String>,

    /// Tolerance applied to every time comparison (default: 5 minutes)
    pub clock_skew: Duration,

    pub validate_lifetime: bool,
    pub validate_issuer: bool,
    pub validate_audience: bool,
    pub validate_signature: bool,
    pub validate_jti: bool,

    /// Reject `iat` values in the future
    pub validate_issued_at: bool,
    /// Reject tokens issued longer ago than this; only with `validate_issued_at`
    pub max_token_age: Option<Duration>,

    /// Accept `alg = none` tokens with an empty signature
    pub allow_unsigned_tokens: bool,
    /// Allow-list for the header `alg`; `None` accepts any known algorithm
    pub algorithm_policy: Option<AlgorithmPolicy>,

    pub symmetric_key: Option<Key>,
    pub rsa_key: Option<Key>,
    pub ecdsa_key: Option<Key>,
    /// Keys selected by the `kid` header
    pub signing_keys: HashMap<String, Key>,

    pub replay_check: Option<ReplayCallback>,
    pub confirmation_check: Option<ConfirmationCallback>,
    pub custom_validator: Option<CustomValidator>,

    /// Store valid results in the validator's cache
    pub enable_caching: bool,
    pub cache_duration: Duration,

    /// Invoke the validator's sliding expiration policy on success
    pub enable_sliding_expiration: bool,
    pub sliding_expiration: Duration,

    pub max_token_size: usize,

    pub require_token_type: bool,
    pub required_token_type: String,
}

impl Default for ValidationParameters {
    fn default() -> Self {
        Self {
            valid_issuer: None,
            valid_issuers: Vec::new(),
            valid_audience: None,
            valid_audiences: Vec::new(),
            clock_skew: Duration::from_secs(DEFAULT_CLOCK_SKEW_SECONDS),
            validate_lifetime: true,
            validate_issuer: true,
            validate_audience: true,
            validate_signature: true,
            validate_jti: false,
            validate_issued_at: false,
            max_token_age: None,
            allow_unsigned_tokens: false,
            algorithm_policy: None,
            symmetric_key: None,
            rsa_key: None,
            ecdsa_key: None,
            signing_keys: HashMap::new(),
            replay_check: None,
            confirmation_check: None,
            custom_validator: None,
            enable_caching: false,
            cache_duration: DEFAULT_CACHE_DURATION,
            enable_sliding_expiration: false,
            sliding_expiration: DEFAULT_SLIDING_EXPIRATION,
            max_token_size: DEFAULT_MAX_TOKEN_SIZE,
            require_token_type: false,
            required_token_type: "JWT".to_string(),
        }
    }
}

impl std::fmt::Debug for ValidationParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationParameters")
            .field("valid_issuer", &self.valid_issuer)
            .field("valid_issuers", &self.valid_issuers)
            .field("valid_audience", &self.valid_audience)
            .field("valid_audiences", &self.valid_audiences)
            .field("clock_skew", &self.clock_skew)
            .field("validate_lifetime", &self.validate_lifetime)
            .field("validate_issuer", &self.validate_issuer)
            .field("validate_audience", &self.validate_audience)
            .field("validate_signature", &self.validate_signature)
            .field("validate_jti", &self.validate_jti)
            .field("allow_unsigned_tokens", &self.allow_unsigned_tokens)
            .field("algorithm_policy", &self.algorithm_policy)
            .field("signing_key_ids", &self.signing_keys.keys().collect::<Vec<_>>())
            .field("max_token_size", &self.max_token_size)
            .finish_non_exhaustive()
    }
}

impl ValidationParameters {
    /// Create parameters with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a single issuer
    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.valid_issuer = Some(issuer.into());
        self
    }

    /// Accept any of these issuers
    pub fn issuers<I, S>(mut self, issuers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.valid_issuers = issuers.into_iter().map(Into::into).collect();
        self
    }

    /// Require a single audience
    pub fn audience(mut self, audience: impl Into<String>) -> Self {
        self.valid_audience = Some(audience.into());
        self
    }

    /// Accept tokens addressed to any of these audiences
    pub fn audiences<I, S>(mut self, audiences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.valid_audiences = audiences.into_iter().map(Into::into).collect();
        self
    }

    /// Set clock skew tolerance
    pub fn clock_skew(mut self, skew: Duration) -> Self {
        self.clock_skew = skew;
        self
    }

    pub fn validate_lifetime(mut self, enabled: bool) -> Self {
        self.validate_lifetime = enabled;
        self
    }

    pub fn validate_issuer(mut self, enabled: bool) -> Self {
        self.validate_issuer = enabled;
        self
    }

    pub fn validate_audience(mut self, enabled: bool) -> Self {
        self.validate_audience = enabled;
        self
    }

    pub fn validate_signature(mut self, enabled: bool) -> Self {
        self.validate_signature = enabled;
        self
    }

    pub fn validate_jti(mut self, enabled: bool) -> Self {
        self.validate_jti = enabled;
        self
    }

    /// Check `iat`, optionally bounding the token age
    pub fn validate_issued_at(mut self, max_age: Option<Duration>) -> Self {
        self.validate_issued_at = true;
        self.max_token_age = max_age;
        self
    }

    /// Accept `alg = none` tokens (use with extreme caution!)
    pub fn allow_unsigned_tokens(mut self, allow: bool) -> Self {
        self.allow_unsigned_tokens = allow;
        self
    }

    pub fn algorithm_policy(mut self, policy: AlgorithmPolicy) -> Self {
        self.algorithm_policy = Some(policy);
        self
    }

    /// Key for HS256/384/512
    pub fn symmetric_key(mut self, key: Key) -> Self {
        self.symmetric_key = Some(key);
        self
    }

    /// Key for RS256/384/512
    pub fn rsa_key(mut self, key: Key) -> Self {
        self.rsa_key = Some(key);
        self
    }

    /// Key for ES256/384/512
    pub fn ecdsa_key(mut self, key: Key) -> Self {
        self.ecdsa_key = Some(key);
        self
    }

    /// Register a key under a `kid`
    pub fn signing_key(mut self, kid: impl Into<String>, key: Key) -> Self {
        self.signing_keys.insert(kid.into(), key);
        self
    }

    /// Enable `jti` replay detection with the given callback
    pub fn replay_check<F>(mut self, check: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.validate_jti = true;
        self.replay_check = Some(Arc::new(check));
        self
    }

    pub fn confirmation_check<F>(mut self, check: F) -> Self
    where
        F: Fn(&ClaimMap) -> bool + Send + Sync + 'static,
    {
        self.confirmation_check = Some(Arc::new(check));
        self
    }

    /// Add custom validation function
    pub fn custom<F>(mut self, validator: F) -> Self
    where
        F: Fn(&Token) -> ValidationResult + Send + Sync + 'static,
    {
        self.custom_validator = Some(Arc::new(validator));
        self
    }

    pub fn caching(mut self, duration: Duration) -> Self {
        self.enable_caching = true;
        self.cache_duration = duration;
        self
    }

    pub fn sliding_expiration(mut self, duration: Duration) -> Self {
        self.enable_sliding_expiration = true;
        self.sliding_expiration = duration;
        self
    }

    pub fn max_token_size(mut self, bytes: usize) -> Self {
        self.max_token_size = bytes;
        self
    }

    /// Require the header `typ` to equal `token_type`
    pub fn require_token_type(mut self, token_type: impl Into<String>) -> Self {
        self.require_token_type = true;
        self.required_token_type = token_type.into();
        self
    }

    /// Skip all built-in claim validation (use with extreme caution!)
    ///
    /// Signature verification stays enabled.
    pub fn skip_claims(mut self) -> Self {
        self.validate_lifetime = false;
        self.validate_issuer = false;
        self.validate_audience = false;
        self.validate_jti = false;
        self.validate_issued_at = false;
        self
    }

    /// Reject configurations that cannot be validated against
    pub fn check(&self) -> Result<()> {
        if self.max_token_size == 0 {
            return Err(Error::ConfigurationInvalid(
                "max_token_size must be greater than zero".to_string(),
            ));
        }

        if self.clock_skew.as_secs() > MAX_CLOCK_SKEW_SECONDS {
            return Err(Error::ConfigurationInvalid(format!(
                "clock_skew must not exceed {MAX_CLOCK_SKEW_SECONDS} seconds"
            )));
        }

        if self.enable_caching && self.cache_duration.is_zero() {
            return Err(Error::ConfigurationInvalid(
                "cache_duration must be greater than zero when caching is enabled".to_string(),
            ));
        }

        if self.enable_sliding_expiration && self.sliding_expiration.is_zero() {
            return Err(Error::ConfigurationInvalid(
                "sliding_expiration must be greater than zero when enabled".to_string(),
            ));
        }

        if self.require_token_type && self.required_token_type.is_empty() {
            return Err(Error::ConfigurationInvalid(
                "required_token_type must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
