//! Challenge Gate Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Value objects, repository traits, PIN verification
//! - `application/` - Use cases
//! - `infra/` - JSON file store implementations
//! - `presentation/` - HTTP handlers and page rendering
//!
//! ## Security Model
//! - Levels 0-1 are plain PIN checks with no replay defense
//! - Level 2 guards each submission with a single-use challenge token;
//!   the token is spent on first use whether or not the PIN was right
//! - Level 3 additionally binds the token to the caller's session cookie;
//!   only the most recently issued token per session is live
//! - Stores serialize their read-modify-write cycles behind one lock each

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::GateConfig;
pub use domain::value_objects::{Level, Pin};
pub use error::{GateError, GateResult};
pub use infra::json_file::{JsonBindingStore, JsonTokenStore};
pub use presentation::router::{gate_router, gate_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult, OptionExt, ResultExt},
    kind::ErrorKind,
};

#[cfg(test)]
mod tests;
