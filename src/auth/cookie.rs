use axum_extra::extract::cookie::{Cookie, SameSite};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "session";

/// Build the session cookie carrying a signed token.
///
/// HttpOnly keeps it away from client-side scripts, SameSite=Lax restricts
/// cross-site sends, and Max-Age mirrors the token's own TTL so browser and
/// server expire the session together. `secure` is set in production where
/// the portals are served over HTTPS.
pub fn session_cookie(token: String, ttl_seconds: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .path("/")
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::seconds(ttl_seconds))
        .build()
}

/// Build a removal cookie that clears the session on the client
pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .http_only(true)
        .path("/")
        .same_site(SameSite::Lax)
        .max_age(time::Duration::ZERO)
        .build()
}
