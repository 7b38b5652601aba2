mod cookie;
mod middleware;
mod password;
mod routes;
mod token;

pub use cookie::{clear_session_cookie, session_cookie, SESSION_COOKIE};
pub use middleware::{auth_gate, AuthState, CurrentSession, SIGN_IN_PATH};
pub use password::{hash_password, verify_password, PasswordError};
pub use routes::{RouteAccess, RoutePolicy};
pub use token::{SessionClaims, TokenCodec, TokenError};
