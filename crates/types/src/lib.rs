/// Shared types for the concentrated liquidity engine
///
/// This crate provides the constants, error taxonomy, token and owner
/// identifiers, and deterministic key derivation used by the math crate
/// and the engine program.

pub mod constants;
pub mod errors;
pub mod keys;
pub mod market;

// Re-export all public types
pub use constants::*;
pub use errors::*;
pub use keys::*;
pub use market::*;

/// Result type alias using the shared error type
pub type ClammResult<T> = std::result::Result<T, ClammError>;
