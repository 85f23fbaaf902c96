//! Token issuance
//!
//! [`TokenBuilder`] accumulates header and payload claims and produces a
//! compact string. It never hands back a [`Token`](crate::Token); parse the
//! output if you need one.
//!
//! # Examples
//!
//! ```ignore
//! use jwtkit::*;
//! use std::time::Duration;
//!
//! let jwt = TokenBuilder::default()
//!     .set_issuer("https://auth.example.com")
//!     .set_subject("user-42")
//!     .set_audience("my-api")
//!     .issued_now()
//!     .expires_in(Duration::from_secs(30 * 60))
//!     .sign_with_secret(AlgorithmId::HS256, b"0123456789abcdef0123456789abcdef")?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use crate::algorithm::{AlgorithmId, SignatureEngine};
use crate::claims::{header, registered};
use crate::codec::Codec;
use crate::error::{Error, Result};
use crate::json::{ClaimMap, ClaimValue, JsonProvider};
use crate::keys::Key;
use crate::utils::{base64url, current_timestamp};

/// Fluent builder for signed and unsecured tokens
#[derive(Debug, Clone)]
pub struct TokenBuilder {
    codec: Codec,
    header: ClaimMap,
    payload: ClaimMap,
}

impl Default for TokenBuilder {
    fn default() -> Self {
        Self::with_codec(Codec::default())
    }
}

impl TokenBuilder {
    /// Builder serializing through the given JSON provider
    pub fn new(json: Arc<dyn JsonProvider>) -> Self {
        Self::with_codec(Codec::new(json))
    }

    fn with_codec(codec: Codec) -> Self {
        let mut header = ClaimMap::new();
        header.insert(header::TOKEN_TYPE.to_string(), ClaimValue::from("JWT"));

        Self {
            codec,
            header,
            payload: ClaimMap::new(),
        }
    }

    pub fn header(&self) -> &ClaimMap {
        &self.header
    }

    pub fn payload(&self) -> &ClaimMap {
        &self.payload
    }

    fn claim(mut self, name: &str, value: impl Into<ClaimValue>) -> Self {
        self.payload.insert(name.to_string(), value.into());
        self
    }

    fn header_param(mut self, name: &str, value: impl Into<ClaimValue>) -> Self {
        self.header.insert(name.to_string(), value.into());
        self
    }

    // ------------------------------------------------------------------------
    // Registered claims
    // ------------------------------------------------------------------------

    pub fn set_issuer(self, issuer: impl Into<String>) -> Self {
        self.claim(registered::ISSUER, issuer.into())
    }

    pub fn set_subject(self, subject: impl Into<String>) -> Self {
        self.claim(registered::SUBJECT, subject.into())
    }

    /// Set a single audience, replacing any previous value
    pub fn set_audience(self, audience: impl Into<String>) -> Self {
        self.claim(registered::AUDIENCE, audience.into())
    }

    /// Add an audience; a second audience turns `aud` into an array
    pub fn add_audience(mut self, audience: impl Into<String>) -> Self {
        let audience = ClaimValue::String(audience.into());
        let aud = match self.payload.remove(registered::AUDIENCE) {
            None => audience,
            Some(ClaimValue::Array(mut items)) => {
                items.push(audience);
                ClaimValue::Array(items)
            }
            Some(existing) => ClaimValue::Array(vec![existing, audience]),
        };
        self.claim(registered::AUDIENCE, aud)
    }

    /// Set `aud` to an array of audiences
    pub fn set_audiences<I, S>(self, audiences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let audiences: Vec<String> = audiences.into_iter().map(Into::into).collect();
        self.claim(registered::AUDIENCE, audiences)
    }

    /// Expiration as Unix timestamp
    pub fn set_expiration(self, exp: i64) -> Self {
        self.claim(registered::EXPIRATION, exp)
    }

    /// Expiration relative to the current time
    pub fn expires_in(self, lifetime: Duration) -> Self {
        let lifetime = i64::try_from(lifetime.as_secs()).unwrap_or(i64::MAX);
        self.set_expiration(current_timestamp().saturating_add(lifetime))
    }

    pub fn set_not_before(self, nbf: i64) -> Self {
        self.claim(registered::NOT_BEFORE, nbf)
    }

    pub fn set_issued_at(self, iat: i64) -> Self {
        self.claim(registered::ISSUED_AT, iat)
    }

    /// Set `iat` to the current time
    pub fn issued_now(self) -> Self {
        self.set_issued_at(current_timestamp())
    }

    pub fn set_jwt_id(self, jti: impl Into<String>) -> Self {
        self.claim(registered::JWT_ID, jti.into())
    }

    // ------------------------------------------------------------------------
    // Header parameters
    // ------------------------------------------------------------------------

    pub fn set_key_id(self, kid: impl Into<String>) -> Self {
        self.header_param(header::KEY_ID, kid.into())
    }

    pub fn set_token_type(self, typ: impl Into<String>) -> Self {
        self.header_param(header::TOKEN_TYPE, typ.into())
    }

    pub fn set_content_type(self, cty: impl Into<String>) -> Self {
        self.header_param(header::CONTENT_TYPE, cty.into())
    }

    // ------------------------------------------------------------------------
    // Arbitrary claims
    // ------------------------------------------------------------------------

    /// Set a payload claim
    pub fn add_claim(mut self, name: impl Into<String>, value: impl Into<ClaimValue>) -> Self {
        self.payload.insert(name.into(), value.into());
        self
    }

    /// Set a header parameter
    ///
    /// `alg` is always overwritten when the token is produced.
    pub fn add_header(mut self, name: impl Into<String>, value: impl Into<ClaimValue>) -> Self {
        self.header.insert(name.into(), value.into());
        self
    }

    /// Set several payload claims at once
    pub fn add_claims<I, K, V>(mut self, claims: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ClaimValue>,
    {
        self.payload
            .extend(claims.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    // ------------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------------

    /// Produce `header.payload.signature`
    pub fn sign(&self, algorithm: AlgorithmId, key: &Key) -> Result<String> {
        if algorithm.is_unsigned() {
            return Err(Error::AlgorithmNoneRejected);
        }

        let mut header = self.header.clone();
        header.insert(
            header::ALGORITHM.to_string(),
            ClaimValue::from(algorithm.as_str()),
        );

        let encoded = self.codec.encode(&header, &self.payload)?;
        let signature =
            SignatureEngine::new().sign(encoded.signing_input.as_bytes(), algorithm, key)?;

        tracing::debug!(algorithm = %algorithm, claims = self.payload.len(), "issued token");
        Ok(format!(
            "{}.{}",
            encoded.signing_input,
            base64url::encode_bytes(&signature)
        ))
    }

    /// Sign with an HMAC secret
    pub fn sign_with_secret(&self, algorithm: AlgorithmId, secret: &[u8]) -> Result<String> {
        if secret.is_empty() {
            return Err(Error::InvalidArgument("secret must not be empty".to_string()));
        }
        self.sign(algorithm, &Key::symmetric(secret))
    }

    /// Produce the unsecured two-segment form `header.payload` with `alg = none`
    ///
    /// Validators reject these unless unsigned tokens are explicitly allowed.
    pub fn create_unsecured(&self) -> Result<String> {
        let mut header = self.header.clone();
        header.insert(
            header::ALGORITHM.to_string(),
            ClaimValue::from(AlgorithmId::None.as_str()),
        );

        let encoded = self.codec.encode(&header, &self.payload)?;
        tracing::warn!("issued unsecured token");
        Ok(encoded.signing_input)
    }
}
