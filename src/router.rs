use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::auth::auth_gate;
use crate::handlers::{
    assistant_dashboard, current_session, dentist_dashboard, health_check, index, messages,
    patient_home, register, sign_in, sign_in_page, sign_out,
};
use crate::state::ServerState;

/// Build the application router.
///
/// Every route sits behind the authorization gate; the gate's route policy
/// decides which of them require a session, so there is a single
/// enforcement point rather than per-route guards.
pub fn build_router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/sign-in", get(sign_in_page))
        .route("/health", get(health_check))
        .route("/api/auth/sign-in", post(sign_in))
        .route("/api/auth/register", post(register))
        .route("/api/auth/sign-out", post(sign_out))
        .route("/api/session", get(current_session))
        .route("/dentist/dashboard", get(dentist_dashboard))
        .route("/assistant/dashboard", get(assistant_dashboard))
        .route("/patient/home", get(patient_home))
        .route("/messages", get(messages))
        .layer(middleware::from_fn_with_state(
            state.auth.clone(),
            auth_gate,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
