use axum::{extract::State, http::StatusCode, Extension, Json};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::{
    clear_session_cookie, hash_password, session_cookie, verify_password, CurrentSession,
    SIGN_IN_PATH,
};
use crate::state::ServerState;
use crate::storage::{CreateAccount, Role, StorageError};

/// Minimum accepted password length, matching the sign-in form validation
const MIN_PASSWORD_LEN: usize = 8;

/// Sign-in request
#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Sign-in response: the role drives which dashboard the frontend renders
#[derive(Debug, Serialize)]
pub struct SignInResponse {
    pub role: Role,
    pub redirect_to: String,
}

/// Registration request (self-service, always creates a patient account)
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

/// Sign-out response
#[derive(Debug, Serialize)]
pub struct SignOutResponse {
    pub redirect_to: String,
}

/// Session introspection response
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in_seconds: Option<i64>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn error(status: StatusCode, message: &str, code: &str) -> HandlerError {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
            code: code.to_string(),
        }),
    )
}

/// Undifferentiated credential failure: the caller cannot tell whether the
/// email or the password was wrong.
fn auth_failed() -> HandlerError {
    error(
        StatusCode::UNAUTHORIZED,
        "Invalid email or password",
        "AUTH_FAILED",
    )
}

fn invalid_form() -> HandlerError {
    error(
        StatusCode::BAD_REQUEST,
        "Invalid form data. Please check your inputs.",
        "INVALID_FORM",
    )
}

fn internal_error() -> HandlerError {
    error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal error",
        "INTERNAL_ERROR",
    )
}

fn validate_credentials(email: &str, password: &str) -> Result<(), HandlerError> {
    if !email.contains('@') || email.len() > 255 || password.len() < MIN_PASSWORD_LEN {
        return Err(invalid_form());
    }
    Ok(())
}

/// Sign-in endpoint: verifies credentials, mints a session token and sets
/// the session cookie.
pub async fn sign_in(
    State(state): State<Arc<ServerState>>,
    jar: CookieJar,
    Json(request): Json<SignInRequest>,
) -> Result<(CookieJar, Json<SignInResponse>), HandlerError> {
    validate_credentials(&request.email, &request.password)?;

    let account = match state.accounts.get_account_by_email(&request.email).await {
        Ok(account) => account,
        Err(StorageError::AccountNotFound(_)) => {
            warn!("Sign-in attempt for unknown email: {}", request.email);
            return Err(auth_failed());
        }
        Err(e) => {
            warn!("Database error during sign-in: {}", e);
            return Err(internal_error());
        }
    };

    if !verify_password(&request.password, &account.password_hash) {
        warn!("Invalid password for account: {}", request.email);
        return Err(auth_failed());
    }

    info!("Account {} signed in as {}", account.email, account.role);

    // Non-fatal, continue with sign-in
    if let Err(e) = state.accounts.update_last_login(account.id).await {
        warn!("Failed to update last login for {}: {}", account.email, e);
    }

    let token = state
        .auth
        .codec
        .encode(account.id, account.role)
        .map_err(|e| {
            warn!("Token signing failed: {}", e);
            internal_error()
        })?;

    let jar = jar.add(session_cookie(
        token,
        state.auth.codec.ttl_seconds(),
        state.config.secure_cookies,
    ));

    Ok((
        jar,
        Json(SignInResponse {
            role: account.role,
            redirect_to: account.role.landing_path().to_string(),
        }),
    ))
}

/// Self-service registration: creates a patient account and signs it in.
/// Staff accounts (dentist, assistant) are created by an operator via the
/// CLI instead.
pub async fn register(
    State(state): State<Arc<ServerState>>,
    jar: CookieJar,
    Json(request): Json<RegisterRequest>,
) -> Result<(CookieJar, Json<SignInResponse>), HandlerError> {
    validate_credentials(&request.email, &request.password)?;
    if request.full_name.trim().is_empty() {
        return Err(invalid_form());
    }

    let password_hash = hash_password(&request.password).map_err(|e| {
        warn!("Password hashing failed during registration: {}", e);
        internal_error()
    })?;

    let account = match state
        .accounts
        .create_account(CreateAccount {
            email: request.email,
            full_name: request.full_name,
            password_hash,
            role: Role::Patient,
        })
        .await
    {
        Ok(account) => account,
        Err(StorageError::DuplicateEmail(email)) => {
            warn!("Registration attempt with existing email: {}", email);
            return Err(error(
                StatusCode::CONFLICT,
                "An account with this email already exists",
                "DUPLICATE_EMAIL",
            ));
        }
        Err(e) => {
            warn!("Database error during registration: {}", e);
            return Err(internal_error());
        }
    };

    info!("Registered new patient account: {}", account.email);

    let token = state
        .auth
        .codec
        .encode(account.id, account.role)
        .map_err(|e| {
            warn!("Token signing failed: {}", e);
            internal_error()
        })?;

    let jar = jar.add(session_cookie(
        token,
        state.auth.codec.ttl_seconds(),
        state.config.secure_cookies,
    ));

    Ok((
        jar,
        Json(SignInResponse {
            role: account.role,
            redirect_to: account.role.landing_path().to_string(),
        }),
    ))
}

/// Sign-out endpoint: clears the session cookie. Valid with or without an
/// active session; clearing an absent cookie is harmless.
pub async fn sign_out(jar: CookieJar) -> (CookieJar, Json<SignOutResponse>) {
    (
        jar.add(clear_session_cookie()),
        Json(SignOutResponse {
            redirect_to: SIGN_IN_PATH.to_string(),
        }),
    )
}

/// Session introspection: reports whether the request carries a valid
/// session. Missing or invalid tokens are the routine case, never an error.
pub async fn current_session(
    Extension(CurrentSession(claims)): Extension<CurrentSession>,
) -> Json<SessionResponse> {
    match claims {
        Some(claims) => Json(SessionResponse {
            authenticated: true,
            role: Some(claims.role),
            expires_in_seconds: Some((claims.exp - Utc::now().timestamp()).max(0)),
        }),
        None => Json(SessionResponse {
            authenticated: false,
            role: None,
            expires_in_seconds: None,
        }),
    }
}
