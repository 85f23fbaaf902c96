//! Validation configuration, per-call context and the result model

mod context;
mod hooks;
mod parameters;
mod result;

pub use context::ValidationContext;
pub use hooks::{SlidingExpirationPolicy, ValidationCache};
pub use parameters::{ConfirmationCallback, CustomValidator, ReplayCallback, ValidationParameters};
pub use result::{ValidationError, ValidationErrorCode, ValidationResult};
