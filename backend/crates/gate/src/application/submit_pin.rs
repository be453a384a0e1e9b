//! Submit PIN Use Case (level 2)

use crate::application::config::GateConfig;
use crate::domain::repository::TokenStore;
use crate::domain::services::verify_pin;
use crate::domain::value_objects::{Level, Token};
use crate::error::GateResult;
use std::sync::Arc;

/// Outcome of a submission against a token-guarded level
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// PIN matched and the token was outstanding; the caller advances
    Advanced,
    /// Anything else; carries the fresh token for the re-rendered page
    Retry { token: Token },
}

/// Submit PIN Use Case
pub struct SubmitPinUseCase<T>
where
    T: TokenStore,
{
    token_store: Arc<T>,
    config: Arc<GateConfig>,
}

impl<T> SubmitPinUseCase<T>
where
    T: TokenStore,
{
    pub fn new(token_store: Arc<T>, config: Arc<GateConfig>) -> Self {
        Self {
            token_store,
            config,
        }
    }

    pub async fn execute(
        &self,
        level: Level,
        pin: Option<&str>,
        token: Option<&Token>,
    ) -> GateResult<SubmitOutcome> {
        // The token is spent on its first submission whatever the PIN says:
        // one attempt per issued token. Consumption doubles as the validity
        // check so no second request can slip between a lookup and the
        // removal.
        let token_live = match token {
            Some(token) => self.token_store.consume(token).await?,
            None => false,
        };

        let pin_ok = pin.is_some_and(|pin| verify_pin(pin, self.config.pin(level)));

        if pin_ok && token_live {
            tracing::info!(level = level.number(), "Level cleared");
            return Ok(SubmitOutcome::Advanced);
        }

        if !token_live {
            tracing::debug!(level = level.number(), "Submission with stale or unknown token");
        }

        // The re-rendered page always carries a fresh token so a
        // well-behaved client can keep trying.
        let token = self.token_store.issue().await?;
        Ok(SubmitOutcome::Retry { token })
    }
}
