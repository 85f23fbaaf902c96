//! Claim value model and the pluggable JSON provider

mod provider;
mod value;

#[cfg(feature = "serde-json")]
pub use provider::SerdeJson;
pub use provider::{JsonProvider, MiniserdeJson};
pub use value::{ClaimMap, ClaimValue, FromClaimValue};

use std::sync::Arc;

/// The provider used by `Default` constructors
pub fn default_provider() -> Arc<dyn JsonProvider> {
    Arc::new(MiniserdeJson)
}
