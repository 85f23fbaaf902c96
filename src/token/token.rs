//! The `Token` snapshot type
//!
//! A `Token` is what the parser hands back: both decoded maps plus the exact
//! compact string they came from. It carries no verdict. Whether the token can
//! be trusted is answered by
//! [`ClaimsValidator`](crate::ClaimsValidator), which reads the token through
//! the accessors below.

use crate::algorithm::AlgorithmId;
use crate::claims::{header, registered};
use crate::error::{Error, Result};
use crate::json::{ClaimMap, ClaimValue, FromClaimValue};

/// Immutable header/payload snapshot of a compact token
///
/// Edits through [`with_claim`](Self::with_claim) and friends return a new
/// token with copied maps and the **same** raw string. The raw string and its
/// signature no longer describe the edited maps; re-serialize through a
/// [`TokenBuilder`](crate::TokenBuilder) when a consistent compact form is
/// needed.
///
/// # Examples
///
/// ```ignore
/// use jwtkit::*;
///
/// let token = TokenParser::default().parse(raw)?;
///
/// let user: String = token.get_claim("sub")?;
/// let roles: Vec<String> = token.get_claim("roles")?;
/// let tenant: Option<u64> = token.try_get_claim("tenant_id");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    header: ClaimMap,
    payload: ClaimMap,
    raw: String,
}

impl Token {
    pub(crate) fn from_parts(header: ClaimMap, payload: ClaimMap, raw: String) -> Self {
        Self {
            header,
            payload,
            raw,
        }
    }

    /// Header map
    pub fn header(&self) -> &ClaimMap {
        &self.header
    }

    /// Payload (claims) map
    pub fn payload(&self) -> &ClaimMap {
        &self.payload
    }

    /// The compact string this token was parsed from
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Third segment of the raw string, or `""` for unsigned tokens
    pub fn signature_segment(&self) -> &str {
        self.raw.splitn(3, '.').nth(2).unwrap_or("")
    }

    /// First two segments of the raw string, joined by `.`
    pub fn signing_input(&self) -> &str {
        match self.raw.match_indices('.').nth(1) {
            Some((index, _)) => &self.raw[..index],
            None => &self.raw,
        }
    }

    // ------------------------------------------------------------------------
    // Typed claim access
    // ------------------------------------------------------------------------

    /// Read a payload claim as `T`
    ///
    /// Fails with [`Error::ClaimMissing`] when the claim is absent and
    /// [`Error::ClaimConversion`] when it cannot be read as `T`.
    pub fn get_claim<T: FromClaimValue>(&self, name: &str) -> Result<T> {
        let value = self
            .payload
            .get(name)
            .ok_or_else(|| Error::ClaimMissing(name.to_string()))?;

        T::from_claim_value(value).ok_or_else(|| Error::ClaimConversion {
            claim: name.to_string(),
            expected: T::EXPECTED,
            found: value.kind(),
        })
    }

    /// Read a payload claim as `T`, or `None` if absent or not convertible
    pub fn try_get_claim<T: FromClaimValue>(&self, name: &str) -> Option<T> {
        self.payload.get(name).and_then(T::from_claim_value)
    }

    /// Raw payload claim value
    pub fn claim_value(&self, name: &str) -> Option<&ClaimValue> {
        self.payload.get(name)
    }

    /// Raw header value
    pub fn header_value(&self, name: &str) -> Option<&ClaimValue> {
        self.header.get(name)
    }

    pub fn has_claim(&self, name: &str) -> bool {
        self.payload.contains_key(name)
    }

    // ------------------------------------------------------------------------
    // Registered claims
    // ------------------------------------------------------------------------

    /// Issuer (`iss`)
    pub fn issuer(&self) -> Option<&str> {
        self.payload_str(registered::ISSUER)
    }

    /// Subject (`sub`)
    pub fn subject(&self) -> Option<&str> {
        self.payload_str(registered::SUBJECT)
    }

    /// Audiences (`aud`), accepting both the string and the array form
    pub fn audiences(&self) -> Vec<&str> {
        self.payload
            .get(registered::AUDIENCE)
            .map(ClaimValue::string_values)
            .unwrap_or_default()
    }

    /// Expiration time (`exp`) as Unix timestamp
    pub fn expiration(&self) -> Option<i64> {
        self.payload_date(registered::EXPIRATION)
    }

    /// Not-before time (`nbf`) as Unix timestamp
    pub fn not_before(&self) -> Option<i64> {
        self.payload_date(registered::NOT_BEFORE)
    }

    /// Issued-at time (`iat`) as Unix timestamp
    pub fn issued_at(&self) -> Option<i64> {
        self.payload_date(registered::ISSUED_AT)
    }

    /// JWT ID (`jti`)
    pub fn jwt_id(&self) -> Option<&str> {
        self.payload_str(registered::JWT_ID)
    }

    /// Declared algorithm, if the `alg` header names a known one
    pub fn algorithm(&self) -> Option<AlgorithmId> {
        self.header_str(header::ALGORITHM)
            .and_then(|alg| AlgorithmId::from_str(alg).ok())
    }

    /// Key ID (`kid` header)
    pub fn key_id(&self) -> Option<&str> {
        self.header_str(header::KEY_ID)
    }

    /// Token type (`typ` header)
    pub fn token_type(&self) -> Option<&str> {
        self.header_str(header::TOKEN_TYPE)
    }

    // ------------------------------------------------------------------------
    // Copy-on-write edits
    // ------------------------------------------------------------------------

    /// New token with a payload claim set; the raw string is kept as-is
    pub fn with_claim(&self, name: impl Into<String>, value: impl Into<ClaimValue>) -> Token {
        let mut payload = self.payload.clone();
        payload.insert(name.into(), value.into());
        Token::from_parts(self.header.clone(), payload, self.raw.clone())
    }

    /// New token without a payload claim; the raw string is kept as-is
    pub fn without_claim(&self, name: &str) -> Token {
        let mut payload = self.payload.clone();
        payload.remove(name);
        Token::from_parts(self.header.clone(), payload, self.raw.clone())
    }

    /// New token with a header value set; the raw string is kept as-is
    pub fn with_header(&self, name: impl Into<String>, value: impl Into<ClaimValue>) -> Token {
        let mut header = self.header.clone();
        header.insert(name.into(), value.into());
        Token::from_parts(header, self.payload.clone(), self.raw.clone())
    }

    /// New token without a header value; the raw string is kept as-is
    pub fn without_header(&self, name: &str) -> Token {
        let mut header = self.header.clone();
        header.remove(name);
        Token::from_parts(header, self.payload.clone(), self.raw.clone())
    }

    fn payload_str(&self, name: &str) -> Option<&str> {
        self.payload.get(name).and_then(ClaimValue::as_str)
    }

    fn payload_date(&self, name: &str) -> Option<i64> {
        self.payload.get(name).and_then(ClaimValue::as_numeric_date)
    }

    fn header_str(&self, name: &str) -> Option<&str> {
        self.header.get(name).and_then(ClaimValue::as_str)
    }
}
