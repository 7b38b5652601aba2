use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use super::cookie::SESSION_COOKIE;
use super::routes::{RouteAccess, RoutePolicy};
use super::token::{SessionClaims, TokenCodec};

/// Redirect target for every denied request
pub const SIGN_IN_PATH: &str = "/sign-in";

/// Per-request session state, inserted by the gate on every request so
/// public pages can also personalize. `None` is the routine
/// unauthenticated case.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Option<SessionClaims>);

/// Authentication state shared with the gate middleware
pub struct AuthState {
    pub codec: TokenCodec,
    pub policy: RoutePolicy,
}

impl AuthState {
    pub fn new(codec: TokenCodec, policy: RoutePolicy) -> Self {
        Self { codec, policy }
    }
}

/// Route authorization gate.
///
/// Runs once per request before any handler: reads the session cookie,
/// decodes it, classifies the path and either forwards the request or
/// redirects to the sign-in page. This is the sole enforcement point;
/// handlers downstream read the decoded claims from request extensions and
/// do not re-verify.
///
/// A role mismatch gets the same redirect as a missing session, so probing
/// a role-specific path never reveals whether some other role would have
/// been accepted.
pub async fn auth_gate(
    State(state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let jar = CookieJar::from_headers(request.headers());
    let token = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .unwrap_or_default();

    let session = state.codec.decode(&token);

    // Make the identity available to handlers on any route, public ones
    // included, so pages can personalize without a second decode. Handlers
    // on role-gated routes can rely on the bare claims being present.
    if let Some(claims) = &session {
        request.extensions_mut().insert(claims.clone());
    }
    request
        .extensions_mut()
        .insert(CurrentSession(session.clone()));

    match state.policy.classify(request.uri().path()) {
        RouteAccess::Public => next.run(request).await,
        RouteAccess::AnyRole => match session {
            Some(_) => next.run(request).await,
            None => Redirect::to(SIGN_IN_PATH).into_response(),
        },
        RouteAccess::RoleOnly(required) => match session {
            Some(claims) if claims.role == required => next.run(request).await,
            _ => Redirect::to(SIGN_IN_PATH).into_response(),
        },
    }
}
