//! Auth routes — sign-in, sign-up, sign-out, session state, guard verdicts.

use axum::extract::{FromRef, FromRequestParts, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use serde_json::json;
use time::Duration;
use tracing::{error, info, warn};

use crate::guard::{self, Verdict};
use crate::identity::{AuthError, Credentials, Identity, Registration};
use crate::services::session;
use crate::session::SessionState;
use crate::state::AppState;

pub(crate) const COOKIE_NAME: &str = "session_token";
const SESSION_DAYS: i64 = 7;

pub(crate) fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::days(SESSION_DAYS))
        .build()
}

pub(crate) fn clear_session_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::ZERO)
        .build()
}

/// Resolve the session behind the request's cookie, if any. No cookie means
/// no database round trip.
pub(crate) async fn resolve_session(
    state: &AppState,
    jar: &CookieJar,
) -> Result<Option<(String, Identity)>, sqlx::Error> {
    let token = jar.get(COOKIE_NAME).map(Cookie::value).unwrap_or_default();
    if token.is_empty() {
        return Ok(None);
    }
    let identity = session::load_session(&state.pool, token).await?;
    Ok(identity.map(|identity| (token.to_owned(), identity)))
}

// =============================================================================
// EXTRACTORS
// =============================================================================

/// The caller's session, possibly anonymous.
pub struct CurrentSession {
    pub token: Option<String>,
    pub identity: Option<Identity>,
}

impl<S> FromRequestParts<S> for CurrentSession
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let app_state = AppState::from_ref(state);
        let resolved = resolve_session(&app_state, &jar).await.map_err(|e| {
            error!(error = %e, "session lookup failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
        Ok(match resolved {
            Some((token, identity)) => Self { token: Some(token), identity: Some(identity) },
            None => Self { token: None, identity: None },
        })
    }
}

/// Signed-in admin. Rejects with 401 without a session and 403 for any
/// other account.
pub struct AdminUser {
    pub identity: Identity,
}

impl<S> FromRequestParts<S> for AdminUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let current = CurrentSession::from_request_parts(parts, state).await?;
        let identity = current.identity.ok_or(StatusCode::UNAUTHORIZED)?;
        if !AppState::from_ref(state).admin().matches(Some(&identity)) {
            return Err(StatusCode::FORBIDDEN);
        }
        Ok(Self { identity })
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

pub(crate) fn auth_error_to_status(err: &AuthError) -> StatusCode {
    match err {
        AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        AuthError::EmailInUse => StatusCode::CONFLICT,
        AuthError::WeakCredential | AuthError::InvalidEmail => StatusCode::UNPROCESSABLE_ENTITY,
        AuthError::NetworkFailure(_) | AuthError::Provider(_) => StatusCode::BAD_GATEWAY,
    }
}

fn auth_error_response(err: &AuthError) -> Response {
    (auth_error_to_status(err), Json(json!({ "error": err.to_string() }))).into_response()
}

/// Store a session for `identity` and answer with the cookie and identity.
async fn start_session(state: &AppState, jar: CookieJar, identity: Identity) -> Response {
    match session::create_session(&state.pool, &identity).await {
        Ok(token) => {
            info!(uid = %identity.uid, "session started");
            let jar = jar.add(session_cookie(token, state.config.cookie_secure));
            (jar, Json(identity)).into_response()
        }
        Err(e) => {
            error!(error = %e, "session creation failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to create session").into_response()
        }
    }
}

/// `POST /api/auth/sign-in`
pub async fn sign_in(State(state): State<AppState>, jar: CookieJar, Json(mut credentials): Json<Credentials>) -> Response {
    credentials.email = credentials.email.trim().to_owned();
    if let Err(e) = credentials.validate() {
        return auth_error_response(&e);
    }
    match state.identity.sign_in(&credentials).await {
        Ok(identity) => start_session(&state, jar, identity).await,
        Err(e) => {
            warn!(error = %e, "sign-in rejected");
            auth_error_response(&e)
        }
    }
}

/// `POST /api/auth/sign-up`
pub async fn sign_up(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(mut registration): Json<Registration>,
) -> Response {
    registration.email = registration.email.trim().to_owned();
    registration.display_name = registration
        .display_name
        .map(|name| name.trim().to_owned())
        .filter(|name| !name.is_empty());
    if let Err(e) = registration.validate() {
        return auth_error_response(&e);
    }
    match state.identity.sign_up(&registration).await {
        Ok(identity) => start_session(&state, jar, identity).await,
        Err(e) => {
            warn!(error = %e, "sign-up rejected");
            auth_error_response(&e)
        }
    }
}

/// `POST /api/auth/sign-out` — the session and its cookie survive a failed
/// provider sign-out or a failed session delete.
pub async fn sign_out(State(state): State<AppState>, current: CurrentSession) -> Response {
    if let Some(identity) = &current.identity {
        if let Err(e) = state.identity.sign_out(identity).await {
            warn!(uid = %identity.uid, error = %e, "provider sign-out failed");
            return auth_error_response(&e);
        }
    }
    if let Some(token) = &current.token {
        if let Err(e) = session::delete_session(&state.pool, token).await {
            error!(error = %e, "session delete failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to end session").into_response();
        }
    }

    let jar = CookieJar::new().add(clear_session_cookie(state.config.cookie_secure));
    (jar, StatusCode::NO_CONTENT).into_response()
}

/// `GET /api/auth/session`
pub async fn session_state(State(state): State<AppState>, current: CurrentSession) -> Json<SessionState> {
    Json(state.session_state(current.identity))
}

#[derive(Deserialize)]
pub struct GuardQuery {
    path: String,
}

/// `GET /api/guard?path=` — what the guard would do for this caller.
pub async fn guard_verdict(
    State(state): State<AppState>,
    current: CurrentSession,
    Query(query): Query<GuardQuery>,
) -> Json<Verdict> {
    Json(guard::decide(&query.path, &state.session_state(current.identity)))
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
