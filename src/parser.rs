//! Compact string to [`Token`]
//!
//! Parsing is purely structural. The size limit is enforced before any
//! Base64URL or JSON work, and nothing here touches signatures: a parsed token
//! is untrusted until [`ClaimsValidator`](crate::ClaimsValidator) says otherwise.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::codec::Codec;
use crate::error::{Error, Result};
use crate::json::JsonProvider;
use crate::token::Token;

/// Parses compact strings into tokens
#[derive(Debug, Clone, Default)]
pub struct TokenParser {
    codec: Codec,
}

impl TokenParser {
    pub fn new(json: Arc<dyn JsonProvider>) -> Self {
        Self {
            codec: Codec::new(json),
        }
    }

    /// Set the maximum accepted token length in bytes (default: 8192)
    pub fn with_max_token_size(mut self, bytes: usize) -> Self {
        self.codec = self.codec.with_max_token_size(bytes);
        self
    }

    pub fn max_token_size(&self) -> usize {
        self.codec.max_token_size()
    }

    /// Parse a compact token
    ///
    /// Every failure is structural ([`Error::is_structural`]).
    pub fn parse(&self, raw: &str) -> Result<Token> {
        let decoded = self.codec.decode(raw).inspect_err(|e| {
            tracing::debug!(error = %e, len = raw.len(), "token parsing failed");
        })?;

        tracing::trace!(
            signed = !decoded.signature.is_empty(),
            claims = decoded.payload.len(),
            "parsed token"
        );
        Ok(Token::from_parts(
            decoded.header,
            decoded.payload,
            raw.to_string(),
        ))
    }

    /// Parse, discarding the failure reason
    pub fn try_parse(&self, raw: &str) -> Option<Token> {
        self.parse(raw).ok()
    }

    /// Parse unless `cancel` has already fired
    pub async fn parse_async(&self, raw: &str, cancel: &CancellationToken) -> Result<Token> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        self.parse(raw)
    }

    /// Like [`parse_async`](Self::parse_async), but `None` on structural failure
    ///
    /// Cancellation is still reported as an error.
    pub async fn try_parse_async(
        &self,
        raw: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Token>> {
        match self.parse_async(raw, cancel).await {
            Ok(token) => Ok(Some(token)),
            Err(Error::Cancelled) => Err(Error::Cancelled),
            Err(_) => Ok(None),
        }
    }
}
