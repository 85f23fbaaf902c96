//! Size and range limits

/// Default maximum length of a compact token string (8KB)
pub const DEFAULT_MAX_TOKEN_SIZE: usize = 8 * 1024;

/// Default clock skew tolerance (5 minutes)
pub const DEFAULT_CLOCK_SKEW_SECONDS: u64 = 300;

/// Upper bound for configured clock skew (24 hours)
/// A larger skew effectively disables lifetime checks
pub(crate) const MAX_CLOCK_SKEW_SECONDS: u64 = 24 * 60 * 60;

/// Maximum size for decoded signature bytes (1KB)
/// RS512 with an 8192-bit modulus produces exactly 1024 bytes
pub(crate) const MAX_DECODED_SIGNATURE_SIZE: usize = 1024;

/// Maximum length of the `alg` header value
pub(crate) const MAX_ALG_LENGTH: usize = 16;

/// Maximum nesting of arrays and objects in header or payload JSON
pub(crate) const MAX_JSON_DEPTH: usize = 128;
