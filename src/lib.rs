//! # jwtkit - Issue, Parse and Validate JSON Web Tokens
//!
//! **jwtkit** mints signed compact tokens, parses presented ones, and validates
//! them into a structured result that lists every problem found instead of
//! stopping at the first.
//!
//! ## Overview
//!
//! A JWT is three Base64URL segments joined by `.`: a JSON header, a JSON
//! payload of claims, and a signature over the first two. Trusting one
//! requires a structural check of the compact form, a signature check with a
//! key of the right family, and semantic checks of claims like `exp`, `iss`
//! and `aud`. Common pitfalls include algorithm confusion (verifying an `HS256`
//! token with an RSA public key used as an HMAC secret), accepting
//! `alg = none`, and timing leaks in signature comparison.
//!
//! **jwtkit** keeps those concerns in separate pieces:
//!
//! ```text
//!                TokenBuilder ──sign──▶ "header.payload.signature"
//!                                               │
//!                                         TokenParser   (size + structure only)
//!                                               │
//!                                               ▼
//!                                             Token     (untrusted snapshot)
//!                                               │
//!    ValidationParameters ──▶ ClaimsValidator ──┤  signature → claims → custom
//!                                               ▼
//!                                      ValidationResult (is_valid + errors)
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use jwtkit::*;
//! use std::time::Duration;
//!
//! let secret = b"0123456789abcdef0123456789abcdef";
//!
//! let jwt = TokenBuilder::default()
//!     .set_issuer("https://auth.example.com")
//!     .set_audience("my-api")
//!     .set_subject("user-42")
//!     .expires_in(Duration::from_secs(1800))
//!     .sign_with_secret(AlgorithmId::HS256, secret)?;
//!
//! let params = ValidationParameters::new()
//!     .issuer("https://auth.example.com")
//!     .audience("my-api")
//!     .symmetric_key(Key::symmetric(secret.to_vec()))
//!     .algorithm_policy(AlgorithmPolicy::hs256_only());
//!
//! let result = ClaimsValidator::default().validate_str(&jwt, &params)?;
//! assert!(result.is_valid());
//! ```
//!
//! ## Algorithm Support
//!
//! All algorithms implement a common `Algorithm` trait:
//!
//! - **HMAC**: HS256, HS384, HS512
//! - **RSA** (PKCS#1 v1.5): RS256, RS384, RS512
//! - **ECDSA**: ES256 (P-256), ES384 (P-384), ES512 (P-521)
//!
//! The unsecured `none` algorithm can only be produced with
//! [`TokenBuilder::create_unsecured`] and only validates when
//! `allow_unsigned_tokens` is set.
//!
//! ## Errors
//!
//! Two layers:
//!
//! - [`Error`] for failures reported at the call that caused them: malformed
//!   input to the parser, signing problems, empty arguments, invalid
//!   configuration and cancellation.
//! - [`ValidationError`] entries inside a [`ValidationResult`] for problems
//!   with a token's content. Validation entry points never return `Err` for
//!   these.
//!
//! ## Features
//!
//! - **`serde-json`**: a [`JsonProvider`] backed by `serde_json`. The default
//!   provider uses `miniserde`.
//!
//! ## Security
//!
//! ### Algorithm Confusion Prevention
//!
//! Keys are bound to an algorithm family. The validator picks the key for the
//! declared algorithm's family (or by `kid`), and a key of the wrong family
//! fails verification. Restrict algorithms further with an
//! [`AlgorithmPolicy`].
//!
//! ### Timing Attack Protection
//!
//! HMAC signature verification uses constant-time comparison via the [`constant_time_eq`](https://crates.io/crates/constant_time_eq)
//! crate.
//!
//! ## References
//!
//! - [RFC 7515](https://datatracker.ietf.org/doc/html/rfc7515) - JSON Web Signature (JWS)
//! - [RFC 7519](https://datatracker.ietf.org/doc/html/rfc7519) - JSON Web Token (JWT)
//! - [RFC 8725](https://datatracker.ietf.org/doc/html/rfc8725) - JSON Web Signature Best Practices

// Core modules
pub mod error;
pub mod limits;
pub mod utils;

// Encoding
pub mod codec;
pub mod json;

// Algorithm system
pub mod algorithm;
pub mod keys;

// Token model
pub mod claims;
pub mod token;

// Issuance and parsing
pub mod builder;
pub mod parser;

// Validation
pub mod revocation;
pub mod validation;
pub mod validator;

// ============================================================================
// PUBLIC API
// ============================================================================

pub use builder::TokenBuilder;
pub use parser::TokenParser;
pub use token::Token;
pub use validator::{ClaimsValidator, Validator};

pub use validation::{
    SlidingExpirationPolicy, ValidationCache, ValidationContext, ValidationError,
    ValidationErrorCode, ValidationParameters, ValidationResult,
};

pub use algorithm::{AlgorithmFamily, AlgorithmId, AlgorithmPolicy, SignatureEngine};
pub use codec::{Codec, DecodedToken, EncodedSegments};
pub use error::{Error, Result};
pub use json::{ClaimMap, ClaimValue, FromClaimValue, JsonProvider, MiniserdeJson};
pub use keys::{EcdsaCurve, Key};
pub use revocation::{revocation_id, RevocationCheck, RevocationStatus};

#[cfg(feature = "serde-json")]
pub use json::SerdeJson;
