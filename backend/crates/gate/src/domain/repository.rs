//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infra layer.

use crate::domain::value_objects::{SessionId, Token};
use crate::error::GateResult;

/// Single-use token store trait (level 2)
#[trait_variant::make(TokenStore: Send)]
pub trait LocalTokenStore {
    /// Generate a fresh token and persist it into the outstanding set
    async fn issue(&self) -> GateResult<Token>;

    /// Membership test; pure read, no mutation
    async fn is_valid(&self, token: &Token) -> GateResult<bool>;

    /// Remove the token if present, returning whether it was outstanding.
    /// Removal and the presence check are one atomic step, so two racing
    /// submissions cannot both spend the same token. Absence is `Ok(false)`,
    /// never an error.
    async fn consume(&self, token: &Token) -> GateResult<bool>;
}

/// Session-token binding store trait (level 3)
#[trait_variant::make(SessionBindingStore: Send)]
pub trait LocalSessionBindingStore {
    /// Bind a token to a session, overwriting any existing binding.
    /// Only the most recently bound token per session is live.
    async fn bind(&self, session: &SessionId, token: &Token) -> GateResult<()>;

    /// Exact pair match; an absent session is simply `Ok(false)`
    async fn is_valid(&self, session: &SessionId, token: &Token) -> GateResult<bool>;

    /// Remove the session's binding entirely.
    /// `GateError::BindingNotFound` if the session has none; callers must
    /// check validity first.
    async fn unbind(&self, session: &SessionId) -> GateResult<()>;
}
