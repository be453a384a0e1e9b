//! HTTP Handlers

use crate::application::config::GateConfig;
use crate::application::issue_challenge::IssueChallengeUseCase;
use crate::application::issue_session_challenge::{
    IssueSessionChallengeUseCase, SessionChallenge,
};
use crate::application::submit_pin::{SubmitOutcome, SubmitPinUseCase};
use crate::application::submit_session_pin::{SessionSubmitOutcome, SubmitSessionPinUseCase};
use crate::domain::repository::{SessionBindingStore, TokenStore};
use crate::domain::services::verify_pin;
use crate::domain::value_objects::{Level, Token};
use crate::error::GateResult;
use crate::presentation::dto::{PinForm, PinQuery, TokenPinForm};
use crate::presentation::pages;
use axum::extract::{Form, Query, State};
use axum::http::{HeaderMap, header};
use axum::response::{Html, IntoResponse, Redirect, Response};
use std::sync::Arc;

/// Shared state for gate handlers
#[derive(Clone)]
pub struct GateAppState<T, B>
where
    T: TokenStore + Clone + Send + Sync + 'static,
    B: SessionBindingStore + Clone + Send + Sync + 'static,
{
    pub tokens: Arc<T>,
    pub bindings: Arc<B>,
    pub config: Arc<GateConfig>,
}

/// GET /
pub async fn root() -> Redirect {
    Redirect::temporary(Level::Zero.path())
}

/// GET /level0
///
/// The whole level rides on the query string; the invalid flag only shows
/// when a pin was actually supplied.
pub async fn level0<T, B>(
    State(state): State<GateAppState<T, B>>,
    Query(query): Query<PinQuery>,
) -> Html<String>
where
    T: TokenStore + Clone + Send + Sync + 'static,
    B: SessionBindingStore + Clone + Send + Sync + 'static,
{
    let pin_ok = query
        .pin
        .as_deref()
        .is_some_and(|pin| verify_pin(pin, state.config.pin(Level::Zero)));

    if pin_ok {
        Html(pages::success_page(Level::Zero))
    } else {
        Html(pages::entry_page(Level::Zero, query.pin.is_some(), None))
    }
}

/// GET /level1
pub async fn level1_entry() -> Html<String> {
    Html(pages::entry_page(Level::One, false, None))
}

/// POST /level1
pub async fn level1_submit<T, B>(
    State(state): State<GateAppState<T, B>>,
    Form(form): Form<PinForm>,
) -> Html<String>
where
    T: TokenStore + Clone + Send + Sync + 'static,
    B: SessionBindingStore + Clone + Send + Sync + 'static,
{
    let pin_ok = form
        .pin
        .as_deref()
        .is_some_and(|pin| verify_pin(pin, state.config.pin(Level::One)));

    if pin_ok {
        Html(pages::success_page(Level::One))
    } else {
        Html(pages::entry_page(Level::One, true, None))
    }
}

/// GET /level2
pub async fn level2_entry<T, B>(
    State(state): State<GateAppState<T, B>>,
) -> GateResult<Html<String>>
where
    T: TokenStore + Clone + Send + Sync + 'static,
    B: SessionBindingStore + Clone + Send + Sync + 'static,
{
    let use_case = IssueChallengeUseCase::new(state.tokens.clone());
    let token = use_case.execute().await?;

    Ok(Html(pages::entry_page(Level::Two, false, Some(&token))))
}

/// POST /level2
pub async fn level2_submit<T, B>(
    State(state): State<GateAppState<T, B>>,
    Form(form): Form<TokenPinForm>,
) -> GateResult<Html<String>>
where
    T: TokenStore + Clone + Send + Sync + 'static,
    B: SessionBindingStore + Clone + Send + Sync + 'static,
{
    let token = form
        .token
        .as_deref()
        .and_then(|raw| Token::parse(raw, state.config.token_len()));

    let use_case = SubmitPinUseCase::new(state.tokens.clone(), state.config.clone());
    let outcome = use_case
        .execute(Level::Two, form.pin.as_deref(), token.as_ref())
        .await?;

    Ok(match outcome {
        SubmitOutcome::Advanced => Html(pages::success_page(Level::Two)),
        SubmitOutcome::Retry { token } => {
            Html(pages::entry_page(Level::Two, true, Some(&token)))
        }
    })
}

/// GET /level3
pub async fn level3_entry<T, B>(
    State(state): State<GateAppState<T, B>>,
    headers: HeaderMap,
) -> GateResult<Response>
where
    T: TokenStore + Clone + Send + Sync + 'static,
    B: SessionBindingStore + Clone + Send + Sync + 'static,
{
    let presented =
        platform::cookie::extract_cookie(&headers, &state.config.session_cookie_name);

    let use_case =
        IssueSessionChallengeUseCase::new(state.bindings.clone(), state.config.clone());
    let challenge = use_case.execute(presented.as_deref()).await?;

    Ok(bound_entry_page(&state.config, &challenge, false))
}

/// POST /level3
pub async fn level3_submit<T, B>(
    State(state): State<GateAppState<T, B>>,
    headers: HeaderMap,
    Form(form): Form<TokenPinForm>,
) -> GateResult<Response>
where
    T: TokenStore + Clone + Send + Sync + 'static,
    B: SessionBindingStore + Clone + Send + Sync + 'static,
{
    let cookie = platform::cookie::extract_cookie(&headers, &state.config.session_cookie_name);
    let token = form
        .token
        .as_deref()
        .and_then(|raw| Token::parse(raw, state.config.token_len()));

    let use_case = SubmitSessionPinUseCase::new(state.bindings.clone(), state.config.clone());
    let outcome = use_case
        .execute(form.pin.as_deref(), token.as_ref(), cookie.as_deref())
        .await?;

    Ok(match outcome {
        SessionSubmitOutcome::Advanced => {
            Html(pages::success_page(Level::Three)).into_response()
        }
        SessionSubmitOutcome::Retry(challenge) => {
            bound_entry_page(&state.config, &challenge, true)
        }
    })
}

/// Level-3 entry page response: the page carrying the bound token, with
/// the session cookie set (idempotent when the client already holds it)
fn bound_entry_page(config: &GateConfig, challenge: &SessionChallenge, invalid_pin: bool) -> Response {
    let cookie = config
        .session_cookie()
        .build_set_cookie(challenge.session_id.as_str());

    (
        [(header::SET_COOKIE, cookie)],
        Html(pages::entry_page(
            Level::Three,
            invalid_pin,
            Some(&challenge.token),
        )),
    )
        .into_response()
}
