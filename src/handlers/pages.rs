//! Minimal page endpoints behind the authorization gate.
//!
//! The real portals are rendered by the frontend; these endpoints return
//! the per-role payloads it needs and, more importantly, sit behind the
//! gate so access control is exercised end to end.

use axum::{Extension, Json};
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::SessionClaims;
use crate::storage::Role;

/// Payload for a role-specific portal page
#[derive(Debug, Serialize)]
pub struct PortalResponse {
    pub portal: Role,
    pub account_id: Uuid,
}

/// Public landing page
pub async fn index() -> Json<Value> {
    Json(json!({
        "service": "endoflow",
        "sign_in": "/api/auth/sign-in",
    }))
}

/// Public sign-in page, also the redirect target for every denied request
pub async fn sign_in_page() -> Json<Value> {
    Json(json!({
        "page": "sign-in",
        "message": "Sign in to access your portal",
    }))
}

pub async fn dentist_dashboard(
    Extension(claims): Extension<SessionClaims>,
) -> Json<PortalResponse> {
    Json(PortalResponse {
        portal: Role::Dentist,
        account_id: claims.sub,
    })
}

pub async fn assistant_dashboard(
    Extension(claims): Extension<SessionClaims>,
) -> Json<PortalResponse> {
    Json(PortalResponse {
        portal: Role::Assistant,
        account_id: claims.sub,
    })
}

pub async fn patient_home(Extension(claims): Extension<SessionClaims>) -> Json<PortalResponse> {
    Json(PortalResponse {
        portal: Role::Patient,
        account_id: claims.sub,
    })
}

/// Messaging inbox stub, readable by any signed-in role
pub async fn messages(Extension(claims): Extension<SessionClaims>) -> Json<Value> {
    Json(json!({
        "account_id": claims.sub,
        "role": claims.role,
        "messages": [],
    }))
}
