//! Gate Router

use crate::application::config::GateConfig;
use crate::domain::repository::{SessionBindingStore, TokenStore};
use crate::infra::json_file::{JsonBindingStore, JsonTokenStore};
use crate::presentation::handlers::{self, GateAppState};
use axum::{Router, routing::get};
use std::sync::Arc;

/// Create the gate router with the JSON file stores
pub fn gate_router(
    tokens: JsonTokenStore,
    bindings: JsonBindingStore,
    config: GateConfig,
) -> Router {
    gate_router_generic(tokens, bindings, config)
}

/// Create a gate router for any store implementations
pub fn gate_router_generic<T, B>(tokens: T, bindings: B, config: GateConfig) -> Router
where
    T: TokenStore + Clone + Send + Sync + 'static,
    B: SessionBindingStore + Clone + Send + Sync + 'static,
{
    let state = GateAppState {
        tokens: Arc::new(tokens),
        bindings: Arc::new(bindings),
        config: Arc::new(config),
    };

    Router::new()
        .route("/", get(handlers::root))
        .route("/level0", get(handlers::level0::<T, B>))
        .route(
            "/level1",
            get(handlers::level1_entry).post(handlers::level1_submit::<T, B>),
        )
        .route(
            "/level2",
            get(handlers::level2_entry::<T, B>).post(handlers::level2_submit::<T, B>),
        )
        .route(
            "/level3",
            get(handlers::level3_entry::<T, B>).post(handlers::level3_submit::<T, B>),
        )
        .with_state(state)
}
