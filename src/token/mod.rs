#[allow(clippy::module_inception)]
mod token;

pub use token::Token;
