pub mod base64url;

pub use base64url::{decode, decode_bytes, encode, encode_bytes};

use std::time::{SystemTime, UNIX_EPOCH};

/// Get current Unix timestamp
///
/// A clock set before the epoch reads as negative seconds.
pub(crate) fn current_timestamp() -> i64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX),
        Err(before) => i64::try_from(before.duration().as_secs()).map_or(i64::MIN, |secs| -secs),
    }
}
