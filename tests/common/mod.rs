//! Shared fixtures for integration tests
#![allow(dead_code)]

use std::sync::OnceLock;

use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::{self, EcdsaKeyPair};
use jwtkit::*;
use rsa::pkcs1::EncodeRsaPrivateKey;
use rsa::pkcs8::EncodePrivateKey;
use rsa::traits::PublicKeyParts;
use rsa::RsaPrivateKey;

pub const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";
pub const ISSUER: &str = "test-issuer";
pub const AUDIENCE: &str = "test-audience";

/// Route library log events to the test output, filtered by `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

/// 2048-bit RSA key, generated once per test binary
pub fn rsa_private_key() -> &'static RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(|| {
        let mut rng = rand::thread_rng();
        RsaPrivateKey::new(&mut rng, 2048).expect("Failed to generate RSA key")
    })
}

pub fn rsa_pkcs8() -> Vec<u8> {
    rsa_private_key()
        .to_pkcs8_der()
        .expect("Failed to encode PKCS#8")
        .as_bytes()
        .to_vec()
}

pub fn rsa_pkcs1() -> Vec<u8> {
    rsa_private_key()
        .to_pkcs1_der()
        .expect("Failed to encode PKCS#1")
        .as_bytes()
        .to_vec()
}

/// Big-endian modulus and exponent
pub fn rsa_components() -> (Vec<u8>, Vec<u8>) {
    let key = rsa_private_key();
    (key.n().to_bytes_be(), key.e().to_bytes_be())
}

pub fn rsa_key() -> Key {
    Key::rsa_pkcs8(&rsa_pkcs8()).expect("Failed to load RSA key")
}

pub fn ec_pkcs8(curve: EcdsaCurve) -> Vec<u8> {
    let algorithm = match curve {
        EcdsaCurve::P256 => &signature::ECDSA_P256_SHA256_FIXED_SIGNING,
        EcdsaCurve::P384 => &signature::ECDSA_P384_SHA384_FIXED_SIGNING,
        EcdsaCurve::P521 => &signature::ECDSA_P521_SHA512_FIXED_SIGNING,
    };
    EcdsaKeyPair::generate_pkcs8(algorithm, &SystemRandom::new())
        .expect("Failed to generate EC key")
        .as_ref()
        .to_vec()
}

pub fn ec_key(curve: EcdsaCurve) -> Key {
    Key::ecdsa_pkcs8(&ec_pkcs8(curve), curve).expect("Failed to load EC key")
}

/// Builder with the standard test issuer, audience and a 30 minute lifetime
pub fn standard_builder() -> TokenBuilder {
    TokenBuilder::default()
        .set_issuer(ISSUER)
        .set_audience(AUDIENCE)
        .set_subject("test-subject")
        .issued_now()
        .set_expiration(now() + 30 * 60)
}

/// Parameters accepting [`standard_builder`] tokens
pub fn standard_params() -> ValidationParameters {
    ValidationParameters::new().issuer(ISSUER).audience(AUDIENCE)
}

pub fn codes(result: &ValidationResult) -> Vec<ValidationErrorCode> {
    result.errors().iter().map(ValidationError::code).collect()
}

/// Hand-assemble a compact token from raw JSON
pub fn compact(header: &str, payload: &str, signature: &[u8]) -> String {
    format!(
        "{}.{}.{}",
        jwtkit::utils::base64url::encode(header),
        jwtkit::utils::base64url::encode(payload),
        jwtkit::utils::base64url::encode_bytes(signature)
    )
}
