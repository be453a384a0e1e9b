//! Submit Session PIN Use Case (level 3)

use crate::application::config::GateConfig;
use crate::application::issue_session_challenge::{
    IssueSessionChallengeUseCase, SessionChallenge,
};
use crate::domain::repository::SessionBindingStore;
use crate::domain::services::verify_pin;
use crate::domain::value_objects::{Level, SessionId, Token};
use crate::error::{GateError, GateResult};
use std::sync::Arc;

/// Outcome of a submission against the session-bound level
#[derive(Debug, Clone)]
pub enum SessionSubmitOutcome {
    /// PIN matched and the (session, token) pair was live; the caller advances
    Advanced,
    /// Anything else; carries the rebound challenge for the re-rendered page
    Retry(SessionChallenge),
}

/// Submit Session PIN Use Case
pub struct SubmitSessionPinUseCase<B>
where
    B: SessionBindingStore,
{
    binding_store: Arc<B>,
    config: Arc<GateConfig>,
}

impl<B> SubmitSessionPinUseCase<B>
where
    B: SessionBindingStore,
{
    pub fn new(binding_store: Arc<B>, config: Arc<GateConfig>) -> Self {
        Self {
            binding_store,
            config,
        }
    }

    /// `cookie` is the raw session cookie value, if any.
    ///
    /// A missing or wrong-length cookie short-circuits to invalid without
    /// touching any stored binding: a caller who cannot name a session
    /// cannot spend - or rotate - another session's token.
    pub async fn execute(
        &self,
        pin: Option<&str>,
        token: Option<&Token>,
        cookie: Option<&str>,
    ) -> GateResult<SessionSubmitOutcome> {
        let session_id =
            cookie.and_then(|raw| SessionId::parse(raw, self.config.session_id_len()));

        let credential_ok = match (&session_id, token) {
            (Some(session), Some(token)) => self.check_and_consume(session, token).await?,
            _ => false,
        };

        let pin_ok = pin.is_some_and(|pin| verify_pin(pin, self.config.pin(Level::Three)));

        if pin_ok && credential_ok {
            tracing::info!(level = Level::Three.number(), "Level cleared");
            return Ok(SessionSubmitOutcome::Advanced);
        }

        // Re-render: rebind a fresh token to the session resolved above, or
        // to a newly minted one when the cookie was absent or malformed.
        let issue =
            IssueSessionChallengeUseCase::new(self.binding_store.clone(), self.config.clone());
        let challenge = issue
            .execute(session_id.as_ref().map(SessionId::as_str))
            .await?;

        Ok(SessionSubmitOutcome::Retry(challenge))
    }

    /// Validity check followed by consumption of the whole binding.
    ///
    /// Unbind only runs after a positive check. If it still reports the
    /// binding missing, a concurrent submission spent it first: that is
    /// logged as the internal fault it is and the token counts as consumed
    /// here too.
    async fn check_and_consume(&self, session: &SessionId, token: &Token) -> GateResult<bool> {
        let valid = self.binding_store.is_valid(session, token).await?;
        if !valid {
            tracing::debug!(session = %session, "Submission with stale or foreign token");
            return Ok(false);
        }

        match self.binding_store.unbind(session).await {
            Ok(()) => Ok(true),
            Err(GateError::BindingNotFound) => {
                tracing::error!(session = %session, "Unbind raced: binding already gone");
                Ok(true)
            }
            Err(e) => Err(e),
        }
    }
}
