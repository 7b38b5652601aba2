//! End-to-end tests for sign-in, sign-out and the route authorization
//! gate, driven through the router against an in-memory SQLite store.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use endoflow_server::{
    auth::{hash_password, TokenCodec, SESSION_COOKIE},
    build_router,
    storage::{AccountStore, CreateAccount, Role, SqliteAccountStore},
    ServerConfig, ServerState,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;

const SECRET: &str = "integration-test-secret-key-0123456789";

fn test_config() -> ServerConfig {
    ServerConfig {
        port: 0,
        bind_addr: "127.0.0.1".to_string(),
        postgres_url: None,
        sqlite_path: PathBuf::from(":memory:"),
        session_secret: SECRET.to_string(),
        session_ttl_seconds: 3600,
        secure_cookies: false,
        cors_origins: vec![],
    }
}

async fn test_app() -> Router {
    let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
    let store = SqliteAccountStore::new(pool);
    store.initialize().await.unwrap();

    for (email, name, role) in [
        ("doc@example.com", "Dr. Sarah Johnson", Role::Dentist),
        ("assistant@example.com", "Lisa Martinez", Role::Assistant),
        ("patient@example.com", "John Smith", Role::Patient),
    ] {
        store
            .create_account(CreateAccount {
                email: email.to_string(),
                full_name: name.to_string(),
                password_hash: hash_password("correct-password").unwrap(),
                role,
            })
            .await
            .unwrap();
    }

    let state = Arc::new(ServerState::new(test_config(), Arc::new(store)));
    build_router(state)
}

fn sign_in_request(email: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/auth/sign-in")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "email": email, "password": password }).to_string(),
        ))
        .unwrap()
}

fn get_with_cookie(path: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(path)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

fn get(path: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(path)
        .body(Body::empty())
        .unwrap()
}

/// Extract the `session=...` pair from a response's Set-Cookie header
fn session_cookie_pair(response: &axum::response::Response) -> String {
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("response should set a session cookie")
        .to_str()
        .unwrap();
    assert!(set_cookie.starts_with(&format!("{}=", SESSION_COOKIE)));
    set_cookie.split(';').next().unwrap().to_string()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn assert_redirects_to_sign_in(response: &axum::response::Response) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/sign-in"
    );
}

#[tokio::test]
async fn dentist_sign_in_sets_cookie_and_redirect_target() {
    let app = test_app().await;

    let response = app
        .oneshot(sign_in_request("doc@example.com", "correct-password"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie_pair(&response);
    assert!(cookie.len() > SESSION_COOKIE.len() + 1);

    // The token embeds the dentist role
    let token = cookie.splitn(2, '=').nth(1).unwrap();
    let claims = TokenCodec::new(SECRET, 3600).decode(token).unwrap();
    assert_eq!(claims.role, Role::Dentist);

    let body = body_json(response).await;
    assert_eq!(body["role"], "dentist");
    assert_eq!(body["redirect_to"], "/dentist/dashboard");
}

#[tokio::test]
async fn signed_in_dentist_reaches_dentist_dashboard() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(sign_in_request("doc@example.com", "correct-password"))
        .await
        .unwrap();
    let cookie = session_cookie_pair(&response);

    let response = app
        .oneshot(get_with_cookie("/dentist/dashboard", &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["portal"], "dentist");
}

#[tokio::test]
async fn patient_session_is_redirected_from_dentist_route() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(sign_in_request("patient@example.com", "correct-password"))
        .await
        .unwrap();
    let cookie = session_cookie_pair(&response);

    // Role mismatch looks exactly like no session
    let response = app
        .oneshot(get_with_cookie("/dentist/dashboard", &cookie))
        .await
        .unwrap();
    assert_redirects_to_sign_in(&response);
}

#[tokio::test]
async fn any_role_route_accepts_every_signed_in_role() {
    let app = test_app().await;

    for email in ["doc@example.com", "assistant@example.com", "patient@example.com"] {
        let response = app
            .clone()
            .oneshot(sign_in_request(email, "correct-password"))
            .await
            .unwrap();
        let cookie = session_cookie_pair(&response);

        let response = app
            .clone()
            .oneshot(get_with_cookie("/messages", &cookie))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn public_routes_render_without_a_cookie() {
    let app = test_app().await;

    for path in ["/", "/sign-in", "/health", "/api/session"] {
        let response = app.clone().oneshot(get(path)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "path {}", path);
    }
}

#[tokio::test]
async fn protected_routes_redirect_without_a_cookie() {
    let app = test_app().await;

    for path in [
        "/dentist/dashboard",
        "/assistant/dashboard",
        "/patient/home",
        "/messages",
    ] {
        let response = app.clone().oneshot(get(path)).await.unwrap();
        assert_redirects_to_sign_in(&response);
    }
}

#[tokio::test]
async fn wrong_password_and_unknown_email_are_indistinguishable() {
    let app = test_app().await;

    let wrong_password = app
        .clone()
        .oneshot(sign_in_request("doc@example.com", "wrong-password"))
        .await
        .unwrap();
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);

    let unknown_email = app
        .oneshot(sign_in_request("nobody@example.com", "wrong-password"))
        .await
        .unwrap();
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);

    let a = body_json(wrong_password).await;
    let b = body_json(unknown_email).await;
    assert_eq!(a, b);
}

#[tokio::test]
async fn tampered_cookie_is_redirected() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(sign_in_request("doc@example.com", "correct-password"))
        .await
        .unwrap();
    let cookie = session_cookie_pair(&response);

    // Clip the signature
    let tampered: String = cookie[..cookie.len() - 4].to_string();
    let response = app
        .oneshot(get_with_cookie("/dentist/dashboard", &tampered))
        .await
        .unwrap();
    assert_redirects_to_sign_in(&response);
}

#[tokio::test]
async fn expired_token_is_redirected() {
    let app = test_app().await;

    // Valid signature, expiry in the past
    let expired_codec = TokenCodec::new(SECRET, -60);
    let token = expired_codec
        .encode(uuid::Uuid::new_v4(), Role::Dentist)
        .unwrap();

    let response = app
        .oneshot(get_with_cookie(
            "/dentist/dashboard",
            &format!("{}={}", SESSION_COOKIE, token),
        ))
        .await
        .unwrap();
    assert_redirects_to_sign_in(&response);
}

#[tokio::test]
async fn sign_out_clears_cookie_and_protected_routes_redirect() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(sign_in_request("doc@example.com", "correct-password"))
        .await
        .unwrap();
    let _signed_in = session_cookie_pair(&response);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/sign-out")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with(&format!("{}=", SESSION_COOKIE)));
    assert!(set_cookie.contains("Max-Age=0"));

    let body = body_json(response).await;
    assert_eq!(body["redirect_to"], "/sign-in");

    // A client honoring the removal carries no cookie anymore
    let response = app.oneshot(get("/dentist/dashboard")).await.unwrap();
    assert_redirects_to_sign_in(&response);
}

#[tokio::test]
async fn session_introspection_reflects_cookie_state() {
    let app = test_app().await;

    let response = app.clone().oneshot(get("/api/session")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["authenticated"], false);

    let response = app
        .clone()
        .oneshot(sign_in_request("assistant@example.com", "correct-password"))
        .await
        .unwrap();
    let cookie = session_cookie_pair(&response);

    let response = app
        .oneshot(get_with_cookie("/api/session", &cookie))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["authenticated"], true);
    assert_eq!(body["role"], "assistant");
}

#[tokio::test]
async fn registration_creates_patient_and_signs_in() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({
                        "email": "new@example.com",
                        "password": "a-long-password",
                        "full_name": "New Patient"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie_pair(&response);
    let body = body_json(response).await;
    assert_eq!(body["role"], "patient");
    assert_eq!(body["redirect_to"], "/patient/home");

    let response = app
        .oneshot(get_with_cookie("/patient/home", &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let app = test_app().await;

    let request = || {
        Request::builder()
            .method("POST")
            .uri("/api/auth/register")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({
                    "email": "patient@example.com",
                    "password": "a-long-password",
                    "full_name": "Imposter"
                })
                .to_string(),
            ))
            .unwrap()
    };

    let response = app.oneshot(request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn malformed_sign_in_input_is_rejected() {
    let app = test_app().await;

    // Not an email
    let response = app
        .clone()
        .oneshot(sign_in_request("not-an-email", "long-enough-password"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Password below minimum length
    let response = app
        .oneshot(sign_in_request("doc@example.com", "short"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
