//! Compact serialization codec
//!
//! Converts between the compact `header.payload[.signature]` form and its
//! decoded parts. No cryptography happens here: the codec only enforces the
//! wire format (size limit, segment count, Base64URL alphabet, JSON object
//! roots) and reports every violation as a structural error.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::json::{default_provider, ClaimMap, ClaimValue, JsonProvider};
use crate::limits::DEFAULT_MAX_TOKEN_SIZE;
use crate::utils::base64url;

/// Output of [`Codec::encode`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedSegments {
    /// `header_segment + "." + payload_segment`
    pub signing_input: String,
    pub header_segment: String,
    pub payload_segment: String,
}

/// Output of [`Codec::decode`]
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedToken {
    pub header: ClaimMap,
    pub payload: ClaimMap,
    /// The first two segments joined by `.`, exactly as they appeared
    pub signing_input: String,
    /// Decoded signature bytes; empty for two-segment (unsigned) input
    pub signature: Vec<u8>,
}

/// Compact-serialization codec
#[derive(Clone)]
pub struct Codec {
    json: Arc<dyn JsonProvider>,
    max_token_size: usize,
}

impl std::fmt::Debug for Codec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Codec")
            .field("max_token_size", &self.max_token_size)
            .finish_non_exhaustive()
    }
}

impl Default for Codec {
    fn default() -> Self {
        Self::new(default_provider())
    }
}

impl Codec {
    pub fn new(json: Arc<dyn JsonProvider>) -> Self {
        Self {
            json,
            max_token_size: DEFAULT_MAX_TOKEN_SIZE,
        }
    }

    /// Set the maximum accepted compact string length in bytes
    pub fn with_max_token_size(mut self, bytes: usize) -> Self {
        self.max_token_size = bytes;
        self
    }

    pub fn max_token_size(&self) -> usize {
        self.max_token_size
    }

    pub fn json(&self) -> &Arc<dyn JsonProvider> {
        &self.json
    }

    /// Serialize and Base64URL-encode a header/payload pair
    pub fn encode(&self, header: &ClaimMap, payload: &ClaimMap) -> Result<EncodedSegments> {
        let header_json = self.json.serialize_object(header)?;
        let payload_json = self.json.serialize_object(payload)?;

        let header_segment = base64url::encode(&header_json);
        let payload_segment = base64url::encode(&payload_json);
        let signing_input = format!("{header_segment}.{payload_segment}");

        Ok(EncodedSegments {
            signing_input,
            header_segment,
            payload_segment,
        })
    }

    /// Split and decode a compact token
    pub fn decode(&self, compact: &str) -> Result<DecodedToken> {
        // Size limit applies before any decoding work
        if compact.len() > self.max_token_size {
            return Err(Error::TokenTooLarge {
                size: compact.len(),
                max: self.max_token_size,
            });
        }

        if compact.trim().is_empty() {
            return Err(Error::FormatInvalid("token is empty".to_string()));
        }

        let segments: Vec<&str> = compact.split('.').collect();
        let (header_segment, payload_segment, signature_segment) = match segments.as_slice() {
            [header, payload] => (*header, *payload, ""),
            [header, payload, signature] => (*header, *payload, *signature),
            other => {
                return Err(Error::FormatInvalid(format!(
                    "expected 2 or 3 segments separated by '.', found {}",
                    other.len()
                )))
            }
        };

        let header = self.decode_object(header_segment, "header")?;
        let payload = self.decode_object(payload_segment, "payload")?;
        let signature = base64url::decode_bytes(signature_segment)?;

        Ok(DecodedToken {
            header,
            payload,
            signing_input: format!("{header_segment}.{payload_segment}"),
            signature,
        })
    }

    fn decode_object(&self, segment: &str, name: &'static str) -> Result<ClaimMap> {
        if segment.is_empty() {
            return Err(Error::FormatInvalid(format!("{name} segment is empty")));
        }

        let json = base64url::decode(segment)?;
        match self.json.deserialize(&json) {
            Ok(ClaimValue::Object(map)) => Ok(map),
            Ok(other) => Err(Error::FormatNotAnObject {
                segment: name,
                found: other.kind(),
            }),
            Err(Error::FormatInvalidJson(msg)) => Err(Error::FormatInvalidJson(format!(
                "failed to parse {name}: {msg}"
            ))),
            Err(e) => Err(e),
        }
    }
}
