//! Issue Session Challenge Use Case (level 3)

use crate::application::config::GateConfig;
use crate::domain::repository::SessionBindingStore;
use crate::domain::value_objects::{SessionId, Token};
use crate::error::GateResult;
use platform::crypto::random_hex_id;
use std::sync::Arc;

/// Output DTO: the session the caller must keep presenting and the token
/// currently bound to it
#[derive(Debug, Clone)]
pub struct SessionChallenge {
    pub session_id: SessionId,
    pub token: Token,
}

/// Issue Session Challenge Use Case
pub struct IssueSessionChallengeUseCase<B>
where
    B: SessionBindingStore,
{
    binding_store: Arc<B>,
    config: Arc<GateConfig>,
}

impl<B> IssueSessionChallengeUseCase<B>
where
    B: SessionBindingStore,
{
    pub fn new(binding_store: Arc<B>, config: Arc<GateConfig>) -> Self {
        Self {
            binding_store,
            config,
        }
    }

    /// Resolve the caller's session and bind a fresh token to it.
    ///
    /// `presented` is the raw cookie value, if any. A value of the wrong
    /// length counts as absent and a new session is minted. Binding
    /// overwrites: whatever token the session held before is dead now.
    pub async fn execute(&self, presented: Option<&str>) -> GateResult<SessionChallenge> {
        let session_id = self.resolve_session(presented);
        let token = Token::from_string(random_hex_id(self.config.token_bytes_len));

        self.binding_store.bind(&session_id, &token).await?;

        tracing::info!(session = %session_id, token = %token, "Bound challenge token to session");

        Ok(SessionChallenge { session_id, token })
    }

    fn resolve_session(&self, presented: Option<&str>) -> SessionId {
        presented
            .and_then(|raw| SessionId::parse(raw, self.config.session_id_len()))
            .unwrap_or_else(|| {
                SessionId::from_string(random_hex_id(self.config.session_id_bytes_len))
            })
    }
}
