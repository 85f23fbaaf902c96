//! Token validation
//!
//! Validation runs as a fixed sequence of stages:
//!
//! 1. **Structural** (raw-string entry points only): the compact string is
//!    parsed. A malformed token yields a result with exactly one
//!    `InvalidToken` error and nothing else runs.
//! 2. **Signature**: the header `alg` is resolved and checked against the
//!    configured policy, the key is selected (by `kid` when a key map is
//!    configured, otherwise by algorithm family) and the signature verified.
//! 3. **Claims**: lifetime, issued-at, issuer, audience, token type, replay
//!    and confirmation checks, each when enabled.
//! 4. **Extensions**: the custom validator, whose verdict is ANDed in.
//!
//! Stages 2 to 4 never stop early. Every failure they find lands in the
//! returned [`ValidationResult`], so a caller sees all problems at once.
//! `Err` is reserved for caller mistakes (empty input, invalid
//! configuration) and cancellation.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::algorithm::{AlgorithmFamily, AlgorithmId, AlgorithmPolicy, SignatureEngine};
use crate::claims::{self, header};
use crate::error::{Error, Result};
use crate::json::{default_provider, ClaimMap, ClaimValue, JsonProvider};
use crate::keys::Key;
use crate::parser::TokenParser;
use crate::token::Token;
use crate::utils::{base64url, current_timestamp};
use crate::validation::{
    SlidingExpirationPolicy, ValidationCache, ValidationContext, ValidationError,
    ValidationErrorCode, ValidationParameters, ValidationResult,
};

/// Stateless validator
///
/// Holds only the JSON provider used to parse raw strings, so one instance
/// can be shared freely across threads.
///
/// # Examples
///
/// ```ignore
/// use jwtkit::*;
///
/// let params = ValidationParameters::new()
///     .issuer("https://auth.example.com")
///     .audience("my-api")
///     .symmetric_key(Key::symmetric(secret));
///
/// let result = ClaimsValidator::default().validate_str(raw, &params)?;
/// if !result.is_valid() {
///     for error in result.errors() {
///         eprintln!("{error}");
///     }
/// }
/// ```
#[derive(Clone)]
pub struct ClaimsValidator {
    json: Arc<dyn JsonProvider>,
}

impl Default for ClaimsValidator {
    fn default() -> Self {
        Self::new(default_provider())
    }
}

impl std::fmt::Debug for ClaimsValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimsValidator").finish_non_exhaustive()
    }
}

impl ClaimsValidator {
    pub fn new(json: Arc<dyn JsonProvider>) -> Self {
        Self { json }
    }

    fn parser(&self, params: &ValidationParameters) -> TokenParser {
        TokenParser::new(Arc::clone(&self.json)).with_max_token_size(params.max_token_size)
    }

    /// Validate a parsed token against the current time
    pub fn validate(&self, token: &Token, params: &ValidationParameters) -> Result<ValidationResult> {
        self.validate_at(token, params, current_timestamp())
    }

    /// Validate a parsed token against an explicit Unix timestamp
    pub fn validate_at(
        &self,
        token: &Token,
        params: &ValidationParameters,
        now: i64,
    ) -> Result<ValidationResult> {
        let mut ctx = ValidationContext::new(token, params, now);
        self.validate_context(&mut ctx)
    }

    /// Validate using a caller-built context
    ///
    /// After the call the context's extensions hold the resolved `alg` and
    /// `kid`.
    pub fn validate_context(&self, ctx: &mut ValidationContext<'_>) -> Result<ValidationResult> {
        ctx.parameters.check()?;

        let mut errors = Vec::new();
        if ctx.parameters.validate_signature {
            check_signature(ctx, &mut errors);
        }
        run_claim_checks(ctx, &mut errors);

        let mut result = ValidationResult::new(errors.is_empty(), errors);
        if let Some(custom) = &ctx.parameters.custom_validator {
            result.merge(custom(ctx.token));
        }

        if result.is_valid() {
            tracing::debug!(subject = ?ctx.token.subject(), "token validated");
        } else {
            let codes: Vec<&str> = result.errors().iter().map(|e| e.code().as_str()).collect();
            tracing::debug!(errors = ?codes, "token validation failed");
        }

        Ok(result)
    }

    /// Parse and validate a compact string
    pub fn validate_str(&self, raw: &str, params: &ValidationParameters) -> Result<ValidationResult> {
        if raw.is_empty() {
            return Err(Error::InvalidArgument("token must not be empty".to_string()));
        }
        params.check()?;

        match self.parser(params).parse(raw) {
            Ok(token) => self.validate(&token, params),
            Err(e) => Ok(structural_failure(&e)),
        }
    }

    /// [`validate_str`](Self::validate_str) unless `cancel` has already fired
    pub async fn validate_async(
        &self,
        raw: &str,
        params: &ValidationParameters,
        cancel: &CancellationToken,
    ) -> Result<ValidationResult> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        self.validate_str(raw, params)
    }

    /// [`validate_str`](Self::validate_str), with caller errors folded into `None`
    pub fn try_validate(&self, raw: &str, params: &ValidationParameters) -> Option<ValidationResult> {
        self.validate_str(raw, params).ok()
    }
}

fn structural_failure(error: &Error) -> ValidationResult {
    ValidationResult::failure(ValidationError::new(
        ValidationErrorCode::InvalidToken,
        error.to_string(),
    ))
}

fn run_claim_checks(ctx: &ValidationContext<'_>, errors: &mut Vec<ValidationError>) {
    let params = ctx.parameters;

    if params.validate_lifetime {
        claims::check_lifetime(ctx, errors);
    }
    if params.validate_issued_at {
        claims::check_issued_at(ctx, errors);
    }
    if params.validate_issuer {
        claims::check_issuer(ctx, errors);
    }
    if params.validate_audience {
        claims::check_audience(ctx, errors);
    }
    if params.require_token_type {
        claims::check_token_type(ctx, errors);
    }
    if params.validate_jti {
        claims::check_replay(ctx, errors);
    }
    claims::check_confirmation(ctx, errors);
}

fn signature_error(message: impl Into<String>) -> ValidationError {
    ValidationError::new(ValidationErrorCode::InvalidSignature, message)
}

fn check_signature(ctx: &mut ValidationContext<'_>, errors: &mut Vec<ValidationError>) {
    let token = ctx.token;
    let params = ctx.parameters;

    let alg = match token.header_value(header::ALGORITHM) {
        Some(ClaimValue::String(alg)) => alg.as_str(),
        Some(other) => {
            errors.push(
                signature_error(format!("Header 'alg' must be a string, found {}", other.kind()))
                    .with_details(other.clone()),
            );
            return;
        }
        None => {
            errors.push(signature_error("Header has no 'alg' parameter"));
            return;
        }
    };

    let algorithm = match AlgorithmId::from_str(alg) {
        Ok(algorithm) => algorithm,
        Err(e) => {
            tracing::warn!(alg, "rejected token with unsupported algorithm");
            errors.push(signature_error(e.to_string()).with_details(alg));
            return;
        }
    };
    ctx.set_extension(header::ALGORITHM, algorithm.as_str());

    if let Some(policy) = &params.algorithm_policy {
        if let Err(e) = policy.validate(algorithm) {
            tracing::warn!(algorithm = %algorithm, "rejected token by algorithm policy");
            errors.push(signature_error(e.to_string()).with_details(alg));
            return;
        }
    }

    let signature = match base64url::decode_bytes(token.signature_segment()) {
        Ok(signature) => signature,
        Err(e) => {
            errors.push(signature_error(e.to_string()));
            return;
        }
    };

    let engine = SignatureEngine::new().allow_unsigned(params.allow_unsigned_tokens);

    if algorithm.is_unsigned() {
        if let Err(e) = engine.check_unsigned(&signature) {
            tracing::warn!("rejected unsigned token");
            errors.push(signature_error(e.to_string()));
        }
        return;
    }

    let kid = token.key_id();
    if let Some(kid) = kid {
        ctx.set_extension(header::KEY_ID, kid);
    }

    let key = match resolve_key(params, kid, algorithm) {
        Ok(key) => key,
        Err(message) => {
            errors.push(signature_error(message));
            return;
        }
    };

    if let Err(e) =
        engine.verify_detailed(token.signing_input().as_bytes(), &signature, algorithm, key)
    {
        errors.push(signature_error(e.to_string()));
    }
}

/// Select the verification key
///
/// With a `kid` and a non-empty key map the map is authoritative: an unknown
/// `kid` fails instead of falling back to the per-family keys.
fn resolve_key<'p>(
    params: &'p ValidationParameters,
    kid: Option<&str>,
    algorithm: AlgorithmId,
) -> std::result::Result<&'p Key, String> {
    if let Some(kid) = kid {
        if !params.signing_keys.is_empty() {
            return params
                .signing_keys
                .get(kid)
                .ok_or_else(|| format!("No key configured for kid '{kid}'"));
        }
    }

    let (slot, family) = match algorithm.family() {
        AlgorithmFamily::Hmac => (&params.symmetric_key, "symmetric"),
        AlgorithmFamily::Rsa => (&params.rsa_key, "RSA"),
        AlgorithmFamily::Ecdsa => (&params.ecdsa_key, "ECDSA"),
        AlgorithmFamily::None => return Err("Unsigned tokens have no key".to_string()),
    };

    slot.as_ref()
        .ok_or_else(|| format!("No {family} key configured for {algorithm}"))
}

/// Fluent, mutable validator with optional result caching and sliding expiration
///
/// Configure it once, then share it behind `&`; setters need `&mut self`.
///
/// # Examples
///
/// ```ignore
/// use jwtkit::*;
///
/// let mut validator = Validator::new();
/// validator
///     .set_issuer("https://auth.example.com")
///     .set_audience("my-api")
///     .set_symmetric_key(Key::symmetric(secret));
///
/// let result = validator.validate(raw)?;
/// ```
#[derive(Clone, Default)]
pub struct Validator {
    claims_validator: ClaimsValidator,
    parameters: ValidationParameters,
    cache: Option<Arc<dyn ValidationCache>>,
    sliding_policy: Option<Arc<dyn SlidingExpirationPolicy>>,
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("parameters", &self.parameters)
            .field("cache", &self.cache.is_some())
            .field("sliding_policy", &self.sliding_policy.is_some())
            .finish()
    }
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validator parsing through the given JSON provider
    pub fn with_json(json: Arc<dyn JsonProvider>) -> Self {
        Self {
            claims_validator: ClaimsValidator::new(json),
            ..Self::default()
        }
    }

    /// Start from existing parameters
    pub fn with_parameters(parameters: ValidationParameters) -> Self {
        Self {
            parameters,
            ..Self::default()
        }
    }

    pub fn parameters(&self) -> &ValidationParameters {
        &self.parameters
    }

    pub fn parameters_mut(&mut self) -> &mut ValidationParameters {
        &mut self.parameters
    }

    pub fn set_issuer(&mut self, issuer: impl Into<String>) -> &mut Self {
        self.parameters.valid_issuer = Some(issuer.into());
        self
    }

    pub fn set_issuers<I, S>(&mut self, issuers: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameters.valid_issuers = issuers.into_iter().map(Into::into).collect();
        self
    }

    pub fn set_audience(&mut self, audience: impl Into<String>) -> &mut Self {
        self.parameters.valid_audience = Some(audience.into());
        self
    }

    pub fn set_audiences<I, S>(&mut self, audiences: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameters.valid_audiences = audiences.into_iter().map(Into::into).collect();
        self
    }

    pub fn set_clock_skew(&mut self, skew: Duration) -> &mut Self {
        self.parameters.clock_skew = skew;
        self
    }

    pub fn set_validate_lifetime(&mut self, enabled: bool) -> &mut Self {
        self.parameters.validate_lifetime = enabled;
        self
    }

    pub fn set_validate_issuer(&mut self, enabled: bool) -> &mut Self {
        self.parameters.validate_issuer = enabled;
        self
    }

    pub fn set_validate_audience(&mut self, enabled: bool) -> &mut Self {
        self.parameters.validate_audience = enabled;
        self
    }

    pub fn set_validate_signature(&mut self, enabled: bool) -> &mut Self {
        self.parameters.validate_signature = enabled;
        self
    }

    pub fn set_validate_jti(&mut self, enabled: bool) -> &mut Self {
        self.parameters.validate_jti = enabled;
        self
    }

    pub fn set_allow_unsigned_tokens(&mut self, allow: bool) -> &mut Self {
        self.parameters.allow_unsigned_tokens = allow;
        self
    }

    pub fn set_algorithm_policy(&mut self, policy: AlgorithmPolicy) -> &mut Self {
        self.parameters.algorithm_policy = Some(policy);
        self
    }

    pub fn set_symmetric_key(&mut self, key: Key) -> &mut Self {
        self.parameters.symmetric_key = Some(key);
        self
    }

    pub fn set_rsa_key(&mut self, key: Key) -> &mut Self {
        self.parameters.rsa_key = Some(key);
        self
    }

    pub fn set_ecdsa_key(&mut self, key: Key) -> &mut Self {
        self.parameters.ecdsa_key = Some(key);
        self
    }

    pub fn add_signing_key(&mut self, kid: impl Into<String>, key: Key) -> &mut Self {
        self.parameters.signing_keys.insert(kid.into(), key);
        self
    }

    pub fn set_replay_check<F>(&mut self, check: F) -> &mut Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.parameters.validate_jti = true;
        self.parameters.replay_check = Some(Arc::new(check));
        self
    }

    pub fn set_confirmation_check<F>(&mut self, check: F) -> &mut Self
    where
        F: Fn(&ClaimMap) -> bool + Send + Sync + 'static,
    {
        self.parameters.confirmation_check = Some(Arc::new(check));
        self
    }

    pub fn set_custom_validator<F>(&mut self, validator: F) -> &mut Self
    where
        F: Fn(&Token) -> ValidationResult + Send + Sync + 'static,
    {
        self.parameters.custom_validator = Some(Arc::new(validator));
        self
    }

    pub fn set_max_token_size(&mut self, bytes: usize) -> &mut Self {
        self.parameters.max_token_size = bytes;
        self
    }

    /// Require the header `typ` to equal `token_type`; `None` disables the check
    pub fn set_required_token_type(&mut self, token_type: Option<String>) -> &mut Self {
        match token_type {
            Some(typ) => {
                self.parameters.require_token_type = true;
                self.parameters.required_token_type = typ;
            }
            None => self.parameters.require_token_type = false,
        }
        self
    }

    /// Cache valid results for `duration` in `cache`
    pub fn set_cache(&mut self, cache: Arc<dyn ValidationCache>, duration: Duration) -> &mut Self {
        self.cache = Some(cache);
        self.parameters.enable_caching = true;
        self.parameters.cache_duration = duration;
        self
    }

    /// Invoke `policy` with a `window` after every successful validation
    pub fn set_sliding_expiration(
        &mut self,
        policy: Arc<dyn SlidingExpirationPolicy>,
        window: Duration,
    ) -> &mut Self {
        self.sliding_policy = Some(policy);
        self.parameters.enable_sliding_expiration = true;
        self.parameters.sliding_expiration = window;
        self
    }

    /// The result cache, unless disabled or bypassed by replay detection
    ///
    /// Every presentation of a token must reach the replay callback, so a
    /// cached verdict can never stand in for it.
    fn cache(&self) -> Option<&dyn ValidationCache> {
        if self.parameters.enable_caching && !self.parameters.validate_jti {
            self.cache.as_deref()
        } else {
            None
        }
    }

    /// Parse and validate a compact string
    ///
    /// With caching enabled, valid results are served from the cache until
    /// the configured duration or the token's expiry (plus skew) runs out,
    /// whichever comes first.
    pub fn validate(&self, raw: &str) -> Result<ValidationResult> {
        if raw.is_empty() {
            return Err(Error::InvalidArgument("token must not be empty".to_string()));
        }
        let params = &self.parameters;
        params.check()?;

        if let Some(hit) = self.cache().and_then(|cache| cache.get(raw)) {
            tracing::trace!("validation cache hit");
            return Ok(hit);
        }

        let token = match self.claims_validator.parser(params).parse(raw) {
            Ok(token) => token,
            Err(e) => return Ok(structural_failure(&e)),
        };

        let result = self.validate_token(&token)?;

        if result.is_valid() {
            if let Some(cache) = self.cache() {
                match cache_ttl(&token, params, current_timestamp()) {
                    Some(ttl) => cache.put(raw, &result, ttl),
                    None => tracing::trace!("token too close to expiry to cache"),
                }
            }
        }

        Ok(result)
    }

    /// Validate an already parsed token (the cache is not consulted)
    pub fn validate_token(&self, token: &Token) -> Result<ValidationResult> {
        let params = &self.parameters;
        let result = self.claims_validator.validate(token, params)?;

        if result.is_valid() && params.enable_sliding_expiration {
            if let Some(policy) = &self.sliding_policy {
                policy.on_validated(token, params, params.sliding_expiration);
            }
        }

        Ok(result)
    }

    /// [`validate`](Self::validate) unless `cancel` has already fired
    pub async fn validate_async(
        &self,
        raw: &str,
        cancel: &CancellationToken,
    ) -> Result<ValidationResult> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        self.validate(raw)
    }
}

/// How long a valid result for `token` may be cached at `now`
///
/// `None` when the token expires (skew included) before any time is left.
fn cache_ttl(token: &Token, params: &ValidationParameters, now: i64) -> Option<Duration> {
    let configured = params.cache_duration;
    let Some(exp) = token.expiration().filter(|_| params.validate_lifetime) else {
        return Some(configured);
    };

    let skew = i64::try_from(params.clock_skew.as_secs()).unwrap_or(i64::MAX);
    let remaining = exp.saturating_add(skew).saturating_sub(now);
    if remaining <= 0 {
        return None;
    }
    Some(configured.min(Duration::from_secs(remaining as u64)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TokenBuilder;
    use std::sync::Mutex;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";
    const NOW: i64 = 1_700_000_000;

    fn params() -> ValidationParameters {
        ValidationParameters::new()
            .issuer("test-issuer")
            .audience("test-audience")
            .symmetric_key(Key::symmetric(SECRET))
    }

    fn builder() -> TokenBuilder {
        TokenBuilder::default()
            .set_issuer("test-issuer")
            .set_audience("test-audience")
            .set_expiration(NOW + 1800)
    }

    fn parse(raw: &str) -> Token {
        TokenParser::default().parse(raw).unwrap()
    }

    fn codes(result: &ValidationResult) -> Vec<ValidationErrorCode> {
        result.errors().iter().map(ValidationError::code).collect()
    }

    #[test]
    fn test_valid_token() {
        let raw = builder().sign_with_secret(AlgorithmId::HS256, SECRET).unwrap();
        let result = ClaimsValidator::default()
            .validate_at(&parse(&raw), &params(), NOW)
            .unwrap();
        assert!(result.is_valid(), "{:?}", result.errors());
    }

    #[test]
    fn test_context_records_alg_and_kid() {
        let raw = builder()
            .set_key_id("k1")
            .sign_with_secret(AlgorithmId::HS256, SECRET)
            .unwrap();
        let token = parse(&raw);
        let params = params();
        let mut ctx = ValidationContext::new(&token, &params, NOW);

        ClaimsValidator::default().validate_context(&mut ctx).unwrap();
        assert_eq!(ctx.extension("alg"), Some(&ClaimValue::from("HS256")));
        assert_eq!(ctx.extension("kid"), Some(&ClaimValue::from("k1")));
    }

    #[test]
    fn test_errors_accumulate() {
        let raw = TokenBuilder::default()
            .set_issuer("other")
            .set_audience("other")
            .set_expiration(NOW - 3600)
            .sign_with_secret(AlgorithmId::HS256, SECRET)
            .unwrap();

        let result = ClaimsValidator::default()
            .validate_at(&parse(&raw), &params(), NOW)
            .unwrap();
        assert!(!result.is_valid());
        assert_eq!(
            codes(&result),
            vec![
                ValidationErrorCode::TokenExpired,
                ValidationErrorCode::InvalidIssuer,
                ValidationErrorCode::InvalidAudience
            ]
        );
    }

    #[test]
    fn test_signature_failure_does_not_stop_claim_checks() {
        let raw = TokenBuilder::default()
            .set_issuer("other")
            .set_audience("test-audience")
            .set_expiration(NOW + 60)
            .sign_with_secret(AlgorithmId::HS256, b"another-secret")
            .unwrap();

        let result = ClaimsValidator::default()
            .validate_at(&parse(&raw), &params(), NOW)
            .unwrap();
        assert_eq!(
            codes(&result),
            vec![
                ValidationErrorCode::InvalidSignature,
                ValidationErrorCode::InvalidIssuer
            ]
        );
    }

    #[test]
    fn test_structural_failure_is_single_error() {
        let result = ClaimsValidator::default()
            .validate_str("not.a.token", &params())
            .unwrap();
        assert!(!result.is_valid());
        assert_eq!(codes(&result), vec![ValidationErrorCode::InvalidToken]);
    }

    #[test]
    fn test_caller_errors() {
        let validator = ClaimsValidator::default();
        assert!(matches!(
            validator.validate_str("", &params()),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            validator.validate_str("a.b", &params().max_token_size(0)),
            Err(Error::ConfigurationInvalid(_))
        ));
        assert!(validator.try_validate("", &params()).is_none());
    }

    #[test]
    fn test_policy_rejects_algorithm() {
        let raw = builder().sign_with_secret(AlgorithmId::HS512, SECRET).unwrap();
        let params = params().algorithm_policy(AlgorithmPolicy::hs256_only());

        let result = ClaimsValidator::default()
            .validate_at(&parse(&raw), &params, NOW)
            .unwrap();
        assert_eq!(codes(&result), vec![ValidationErrorCode::InvalidSignature]);
    }

    #[test]
    fn test_kid_lookup_without_fallback() {
        let raw = builder()
            .set_key_id("unknown")
            .sign_with_secret(AlgorithmId::HS256, SECRET)
            .unwrap();

        // The family key would verify, but the key map is authoritative
        let params = params().signing_key("k1", Key::symmetric(b"other".to_vec()));
        let result = ClaimsValidator::default()
            .validate_at(&parse(&raw), &params, NOW)
            .unwrap();
        assert_eq!(codes(&result), vec![ValidationErrorCode::InvalidSignature]);

        let params = params.signing_key("unknown", Key::symmetric(SECRET));
        let result = ClaimsValidator::default()
            .validate_at(&parse(&raw), &params, NOW)
            .unwrap();
        assert!(result.is_valid());
    }

    #[test]
    fn test_unsigned_tokens() {
        let raw = builder().create_unsecured().unwrap();
        let token = parse(&raw);
        let validator = ClaimsValidator::default();

        let result = validator.validate_at(&token, &params(), NOW).unwrap();
        assert_eq!(codes(&result), vec![ValidationErrorCode::InvalidSignature]);

        let lenient = params().allow_unsigned_tokens(true);
        assert!(validator.validate_at(&token, &lenient, NOW).unwrap().is_valid());
    }

    #[test]
    fn test_custom_validator_is_anded() {
        let raw = builder().sign_with_secret(AlgorithmId::HS256, SECRET).unwrap();
        let params = params().custom(|token| {
            if token.subject().is_some() {
                ValidationResult::success()
            } else {
                ValidationResult::failure(ValidationError::new(
                    ValidationErrorCode::MissingClaim,
                    "sub is required",
                ))
            }
        });

        let result = ClaimsValidator::default()
            .validate_at(&parse(&raw), &params, NOW)
            .unwrap();
        assert!(!result.is_valid());
        assert_eq!(codes(&result), vec![ValidationErrorCode::MissingClaim]);

        // A custom result can be invalid without recording an error
        let params = params.custom(|_| ValidationResult::new(false, Vec::new()));
        let result = ClaimsValidator::default()
            .validate_at(&parse(&raw), &params, NOW)
            .unwrap();
        assert!(!result.is_valid());
        assert!(result.errors().is_empty());
    }

    #[test]
    fn test_signature_check_can_be_disabled() {
        let raw = builder().sign_with_secret(AlgorithmId::HS256, b"whatever").unwrap();
        let params = params().validate_signature(false);
        let result = ClaimsValidator::default()
            .validate_at(&parse(&raw), &params, NOW)
            .unwrap();
        assert!(result.is_valid());
    }

    #[derive(Default)]
    struct MemoryCache {
        entries: Mutex<Vec<(String, Duration)>>,
    }

    impl ValidationCache for MemoryCache {
        fn get(&self, raw_token: &str) -> Option<ValidationResult> {
            let entries = self.entries.lock().unwrap();
            entries
                .iter()
                .any(|(raw, _)| raw == raw_token)
                .then(ValidationResult::success)
        }

        fn put(&self, raw_token: &str, _result: &ValidationResult, ttl: Duration) {
            self.entries
                .lock()
                .unwrap()
                .push((raw_token.to_string(), ttl));
        }
    }

    #[derive(Default)]
    struct RecordingSlider {
        subjects: Mutex<Vec<Option<String>>>,
    }

    impl SlidingExpirationPolicy for RecordingSlider {
        fn on_validated(&self, token: &Token, _: &ValidationParameters, _: Duration) {
            self.subjects
                .lock()
                .unwrap()
                .push(token.subject().map(str::to_string));
        }
    }

    #[test]
    fn test_validator_cache_and_sliding_hooks() {
        let cache = Arc::new(MemoryCache::default());
        let slider = Arc::new(RecordingSlider::default());

        let mut validator = Validator::new();
        validator
            .set_issuer("test-issuer")
            .set_audience("test-audience")
            .set_symmetric_key(Key::symmetric(SECRET))
            .set_cache(cache.clone(), Duration::from_secs(60))
            .set_sliding_expiration(slider.clone(), Duration::from_secs(600));

        let valid = TokenBuilder::default()
            .set_issuer("test-issuer")
            .set_audience("test-audience")
            .set_subject("alice")
            .expires_in(Duration::from_secs(600))
            .sign_with_secret(AlgorithmId::HS256, SECRET)
            .unwrap();
        let invalid = TokenBuilder::default()
            .set_issuer("someone-else")
            .expires_in(Duration::from_secs(600))
            .sign_with_secret(AlgorithmId::HS256, SECRET)
            .unwrap();

        assert!(validator.validate(&valid).unwrap().is_valid());
        assert!(!validator.validate(&invalid).unwrap().is_valid());

        // Only the valid result is cached, with the configured TTL
        let entries = cache.entries.lock().unwrap().clone();
        assert_eq!(entries, vec![(valid.clone(), Duration::from_secs(60))]);

        // Second call is served from the cache; the sliding policy is not re-run
        assert!(validator.validate(&valid).unwrap().is_valid());
        assert_eq!(
            *slider.subjects.lock().unwrap(),
            vec![Some("alice".to_string())]
        );
    }

    #[test]
    fn test_validator_cache_does_not_bypass_replay_check() {
        let cache = Arc::new(MemoryCache::default());
        let seen = Arc::new(Mutex::new(std::collections::HashSet::new()));

        let mut validator = Validator::new();
        let seen_ids = seen.clone();
        validator
            .set_issuer("test-issuer")
            .set_audience("test-audience")
            .set_symmetric_key(Key::symmetric(SECRET))
            .set_cache(cache.clone(), Duration::from_secs(60))
            .set_replay_check(move |jti| seen_ids.lock().unwrap().insert(jti.to_string()));

        let raw = TokenBuilder::default()
            .set_issuer("test-issuer")
            .set_audience("test-audience")
            .set_jwt_id("once")
            .expires_in(Duration::from_secs(600))
            .sign_with_secret(AlgorithmId::HS256, SECRET)
            .unwrap();

        assert!(validator.validate(&raw).unwrap().is_valid());
        let second = validator.validate(&raw).unwrap();
        assert!(!second.is_valid());
        assert_eq!(codes(&second), vec![ValidationErrorCode::JtiAlreadyUsed]);
        assert!(cache.entries.lock().unwrap().is_empty());
    }

    #[test]
    fn test_cache_ttl_bounded_by_expiry() {
        let mut params = params().clock_skew(Duration::from_secs(30));
        params.cache_duration = Duration::from_secs(600);
        let expiring_at = |exp: i64| {
            parse(
                &builder()
                    .set_expiration(exp)
                    .sign_with_secret(AlgorithmId::HS256, SECRET)
                    .unwrap(),
            )
        };

        let soon = expiring_at(NOW + 90);
        assert_eq!(cache_ttl(&soon, &params, NOW), Some(Duration::from_secs(120)));

        let later = expiring_at(NOW + 1800);
        assert_eq!(cache_ttl(&later, &params, NOW), Some(Duration::from_secs(600)));

        let expired = expiring_at(NOW - 30);
        assert_eq!(cache_ttl(&expired, &params, NOW), None);

        let no_exp = parse(
            &TokenBuilder::default()
                .set_issuer("test-issuer")
                .sign_with_secret(AlgorithmId::HS256, SECRET)
                .unwrap(),
        );
        assert_eq!(cache_ttl(&no_exp, &params, NOW), Some(Duration::from_secs(600)));
    }

    #[test]
    fn test_validator_required_token_type() {
        let raw = builder().sign_with_secret(AlgorithmId::HS256, SECRET).unwrap();

        let mut validator = Validator::with_parameters(params().validate_lifetime(false));
        validator.set_required_token_type(Some("at+jwt".to_string()));
        let result = validator.validate(&raw).unwrap();
        assert_eq!(codes(&result), vec![ValidationErrorCode::InvalidToken]);

        validator.set_required_token_type(None);
        assert!(validator.validate(&raw).unwrap().is_valid());
    }

    #[tokio::test]
    async fn test_async_cancellation() {
        let raw = builder().sign_with_secret(AlgorithmId::HS256, SECRET).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = ClaimsValidator::default()
            .validate_async(&raw, &params(), &cancel)
            .await;
        assert_eq!(result, Err(Error::Cancelled));

        let result = Validator::with_parameters(params())
            .validate_async(&raw, &cancel)
            .await;
        assert_eq!(result, Err(Error::Cancelled));
    }
}
