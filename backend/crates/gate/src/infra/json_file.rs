//! JSON File Repository Implementations
//!
//! Each store owns one JSON document on disk, read before and written
//! after every mutation; no in-memory copy survives between operations, so
//! a restart (or a second process on the same files) sees current state.
//! One `Mutex` per store keeps each load-mutate-save cycle atomic with
//! respect to every other operation on that store.
//!
//! A missing, unreadable or corrupt document is treated as an empty store:
//! every credential in it is forfeit, but the gate keeps serving.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use crate::domain::repository::{SessionBindingStore, TokenStore};
use crate::domain::value_objects::{SessionId, Token};
use crate::error::GateResult;
use platform::crypto::random_hex_id;

/// On-disk document holding the outstanding single-use token set
#[derive(Debug, Default, Serialize, Deserialize)]
struct TokenDocument {
    tokens: BTreeSet<String>,
}

/// On-disk document holding the session -> token map
#[derive(Debug, Default, Serialize, Deserialize)]
struct BindingDocument {
    bindings: BTreeMap<String, String>,
}

async fn load_document<D: Default + DeserializeOwned>(path: &Path) -> D {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return D::default(),
        Err(e) => {
            tracing::warn!(path = ?path, error = %e, "Store unreadable, treating as empty");
            return D::default();
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::warn!(path = ?path, error = %e, "Store corrupt, treating as empty");
            D::default()
        }
    }
}

async fn store_document<D: Serialize>(path: &Path, doc: &D) -> GateResult<()> {
    let bytes = serde_json::to_vec(doc)?;
    tokio::fs::write(path, bytes).await?;
    Ok(())
}

/// File-backed single-use token store (level 2)
#[derive(Clone)]
pub struct JsonTokenStore {
    inner: Arc<TokenStoreInner>,
}

struct TokenStoreInner {
    path: PathBuf,
    token_bytes_len: usize,
    lock: Mutex<()>,
}

impl JsonTokenStore {
    pub fn new(path: impl Into<PathBuf>, token_bytes_len: usize) -> Self {
        Self {
            inner: Arc::new(TokenStoreInner {
                path: path.into(),
                token_bytes_len,
                lock: Mutex::new(()),
            }),
        }
    }
}

impl TokenStore for JsonTokenStore {
    async fn issue(&self) -> GateResult<Token> {
        let _guard = self.inner.lock.lock().await;
        let mut doc: TokenDocument = load_document(&self.inner.path).await;

        let token = Token::from_string(random_hex_id(self.inner.token_bytes_len));
        doc.tokens.insert(token.as_str().to_owned());
        store_document(&self.inner.path, &doc).await?;

        tracing::debug!(token = %token, outstanding = doc.tokens.len(), "Token issued");
        Ok(token)
    }

    async fn is_valid(&self, token: &Token) -> GateResult<bool> {
        let _guard = self.inner.lock.lock().await;
        let doc: TokenDocument = load_document(&self.inner.path).await;
        Ok(doc.tokens.contains(token.as_str()))
    }

    async fn consume(&self, token: &Token) -> GateResult<bool> {
        let _guard = self.inner.lock.lock().await;
        let mut doc: TokenDocument = load_document(&self.inner.path).await;

        let was_outstanding = doc.tokens.remove(token.as_str());
        store_document(&self.inner.path, &doc).await?;

        if was_outstanding {
            tracing::debug!(token = %token, "Token consumed");
        } else {
            tracing::debug!(token = %token, "Consume of unknown token ignored");
        }
        Ok(was_outstanding)
    }
}

/// File-backed session-token binding store (level 3)
#[derive(Clone)]
pub struct JsonBindingStore {
    inner: Arc<BindingStoreInner>,
}

struct BindingStoreInner {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonBindingStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(BindingStoreInner {
                path: path.into(),
                lock: Mutex::new(()),
            }),
        }
    }
}

impl SessionBindingStore for JsonBindingStore {
    async fn bind(&self, session: &SessionId, token: &Token) -> GateResult<()> {
        let _guard = self.inner.lock.lock().await;
        let mut doc: BindingDocument = load_document(&self.inner.path).await;

        let previous = doc
            .bindings
            .insert(session.as_str().to_owned(), token.as_str().to_owned());
        store_document(&self.inner.path, &doc).await?;

        tracing::debug!(
            session = %session,
            token = %token,
            replaced = previous.is_some(),
            "Token bound to session"
        );
        Ok(())
    }

    async fn is_valid(&self, session: &SessionId, token: &Token) -> GateResult<bool> {
        let _guard = self.inner.lock.lock().await;
        let doc: BindingDocument = load_document(&self.inner.path).await;
        Ok(doc
            .bindings
            .get(session.as_str())
            .is_some_and(|bound| bound.as_str() == token.as_str()))
    }

    async fn unbind(&self, session: &SessionId) -> GateResult<()> {
        let _guard = self.inner.lock.lock().await;
        let mut doc: BindingDocument = load_document(&self.inner.path).await;

        if doc.bindings.remove(session.as_str()).is_none() {
            return Err(crate::error::GateError::BindingNotFound);
        }
        store_document(&self.inner.path, &doc).await?;

        tracing::debug!(session = %session, "Session binding removed");
        Ok(())
    }
}
