//! Issue Challenge Use Case (level 2)

use crate::domain::repository::TokenStore;
use crate::domain::value_objects::Token;
use crate::error::GateResult;
use std::sync::Arc;

/// Issue Challenge Use Case
///
/// Issues the single-use token that a challenge page embeds for the caller
/// to echo back. Every page view issues a fresh one; the outstanding set
/// only shrinks through consumption.
pub struct IssueChallengeUseCase<T>
where
    T: TokenStore,
{
    token_store: Arc<T>,
}

impl<T> IssueChallengeUseCase<T>
where
    T: TokenStore,
{
    pub fn new(token_store: Arc<T>) -> Self {
        Self { token_store }
    }

    pub async fn execute(&self) -> GateResult<Token> {
        let token = self.token_store.issue().await?;

        tracing::info!(token = %token, "Issued challenge token");

        Ok(token)
    }
}
