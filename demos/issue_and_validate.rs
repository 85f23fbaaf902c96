//! Issue a few tokens and validate them
//!
//! Run with `RUST_LOG=jwtkit=trace cargo run --example issue_and_validate` to
//! see the library's own log events.
//!
//! 1. Mint an HS256 token and validate it
//! 2. Validate an expired token from the wrong issuer and list every error
//! 3. Switch to ES256 with a key selected by `kid`
//! 4. Revoke a token by its `jti`
//! 5. Use the fluent `Validator` with a result cache

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::{EcdsaKeyPair, ECDSA_P256_SHA256_FIXED_SIGNING};
use jwtkit::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SECRET: &[u8] = b"your-256-bit-secret-key-here!!!!";
const ISSUER: &str = "https://auth.example.com";
const AUDIENCE: &str = "my-api";

/// Cache entries expire after their ttl
#[derive(Default)]
struct MemoryCache {
    entries: Mutex<HashMap<String, (ValidationResult, Instant)>>,
}

impl ValidationCache for MemoryCache {
    fn get(&self, raw_token: &str) -> Option<ValidationResult> {
        let entries = self.entries.lock().ok()?;
        entries
            .get(raw_token)
            .filter(|(_, expires)| *expires > Instant::now())
            .map(|(result, _)| result.clone())
    }

    fn put(&self, raw_token: &str, result: &ValidationResult, ttl: Duration) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(raw_token.to_string(), (result.clone(), Instant::now() + ttl));
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jwtkit=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== jwtkit - Issue and Validate ===\n");

    hmac_round_trip()?;
    accumulated_errors()?;
    ecdsa_with_kid()?;
    revocation()?;
    fluent_validator()?;

    Ok(())
}

fn base_params() -> ValidationParameters {
    ValidationParameters::new().issuer(ISSUER).audience(AUDIENCE)
}

fn print_result(result: &ValidationResult) {
    if result.is_valid() {
        println!("  ✓ valid");
    }
    for error in result.errors() {
        println!("  ✗ {error}");
    }
}

fn hmac_round_trip() -> Result<()> {
    println!("--- HS256 ---");

    let jwt = TokenBuilder::default()
        .set_issuer(ISSUER)
        .set_audience(AUDIENCE)
        .set_subject("user-42")
        .issued_now()
        .expires_in(Duration::from_secs(1800))
        .add_claim("roles", vec!["reader", "writer"])
        .sign_with_secret(AlgorithmId::HS256, SECRET)?;
    println!("Token: {jwt}");

    let params = base_params()
        .symmetric_key(Key::symmetric(SECRET))
        .algorithm_policy(AlgorithmPolicy::hs256_only());
    print_result(&ClaimsValidator::default().validate_str(&jwt, &params)?);

    let token = TokenParser::default().parse(&jwt)?;
    println!("  subject: {:?}", token.subject());
    println!("  roles:   {:?}\n", token.get_claim::<Vec<String>>("roles")?);
    Ok(())
}

fn accumulated_errors() -> Result<()> {
    println!("--- Every problem at once ---");

    let jwt = TokenBuilder::default()
        .set_issuer("https://evil.example.com")
        .set_audience("other-api")
        .set_expiration(1_000_000_000)
        .sign_with_secret(AlgorithmId::HS256, SECRET)?;

    let params = base_params().symmetric_key(Key::symmetric(SECRET));
    print_result(&ClaimsValidator::default().validate_str(&jwt, &params)?);
    println!();
    Ok(())
}

fn ecdsa_with_kid() -> Result<()> {
    println!("--- ES256 with kid ---");

    let pkcs8 = EcdsaKeyPair::generate_pkcs8(&ECDSA_P256_SHA256_FIXED_SIGNING, &SystemRandom::new())
        .map_err(|_| Error::KeyRejected("EC key generation failed".to_string()))?;
    let key = Key::ecdsa_pkcs8(pkcs8.as_ref(), EcdsaCurve::P256)?;

    let jwt = TokenBuilder::default()
        .set_issuer(ISSUER)
        .set_audience(AUDIENCE)
        .set_key_id("2024-signing")
        .expires_in(Duration::from_secs(600))
        .sign(AlgorithmId::ES256, &key)?;

    let params = base_params()
        .signing_key("2024-signing", key.to_public())
        .algorithm_policy(AlgorithmPolicy::recommended_asymmetric());
    print_result(&ClaimsValidator::default().validate_str(&jwt, &params)?);

    let rotated = base_params()
        .signing_key("2025-signing", key.to_public())
        .algorithm_policy(AlgorithmPolicy::recommended_asymmetric());
    println!("After rotation:");
    print_result(&ClaimsValidator::default().validate_str(&jwt, &rotated)?);
    println!();
    Ok(())
}

fn revocation() -> Result<()> {
    println!("--- Revocation ---");

    let jwt = TokenBuilder::default()
        .set_issuer(ISSUER)
        .set_audience(AUDIENCE)
        .set_jwt_id("session-7")
        .expires_in(Duration::from_secs(600))
        .sign_with_secret(AlgorithmId::HS256, SECRET)?;

    let token = TokenParser::default().parse(&jwt)?;
    let params = base_params().symmetric_key(Key::symmetric(SECRET));
    let mut result = ClaimsValidator::default().validate(&token, &params)?;

    let revoked: HashSet<String> = ["session-7".to_string()].into_iter().collect();
    result.apply_revocation(&revoked.check(revocation_id(&token)));
    print_result(&result);
    println!();
    Ok(())
}

fn fluent_validator() -> Result<()> {
    println!("--- Validator with cache ---");

    let cache = Arc::new(MemoryCache::default());
    let mut validator = Validator::new();
    validator
        .set_issuer(ISSUER)
        .set_audience(AUDIENCE)
        .set_symmetric_key(Key::symmetric(SECRET))
        .set_cache(cache.clone(), Duration::from_secs(60));

    let jwt = TokenBuilder::default()
        .set_issuer(ISSUER)
        .set_audience(AUDIENCE)
        .expires_in(Duration::from_secs(600))
        .sign_with_secret(AlgorithmId::HS256, SECRET)?;

    for attempt in 1..=2 {
        println!("Attempt {attempt}:");
        print_result(&validator.validate(&jwt)?);
    }

    let cached = cache.entries.lock().map(|entries| entries.len()).unwrap_or(0);
    println!("Cached results: {cached}");
    Ok(())
}
