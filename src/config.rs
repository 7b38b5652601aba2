use std::env;
use std::path::PathBuf;

/// Minimum length for the session signing secret. Anything shorter is too
/// weak to key an HMAC and is rejected at startup.
const MIN_SECRET_LEN: usize = 32;

/// Server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,
    /// Bind address (0.0.0.0 for LAN, 127.0.0.1 for localhost)
    pub bind_addr: String,
    /// PostgreSQL database URL (primary store; optional)
    pub postgres_url: Option<String>,
    /// SQLite database path (local fallback store)
    pub sqlite_path: PathBuf,
    /// Symmetric secret used to sign session tokens
    pub session_secret: String,
    /// Session token time-to-live in seconds
    pub session_ttl_seconds: u64,
    /// Mark session cookies `Secure` (HTTPS-only transport)
    pub secure_cookies: bool,
    /// CORS allowed origins (comma-separated in env var)
    pub cors_origins: Vec<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        // SECURITY: the signing secret has no default. A process without a
        // secret cannot mint or verify sessions and must not start.
        let session_secret = env::var("SESSION_SECRET")
            .map_err(|_| ConfigError::MissingEnvVar("SESSION_SECRET".to_string()))?;

        if session_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::InvalidValue(format!(
                "SESSION_SECRET must be at least {} characters",
                MIN_SECRET_LEN
            )));
        }

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidPort)?,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string()),
            postgres_url: env::var("POSTGRES_URL").ok(),
            sqlite_path: env::var("SQLITE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("endoflow.db")),
            session_secret,
            session_ttl_seconds: env::var("SESSION_TTL_SECONDS")
                .unwrap_or_else(|_| "86400".to_string()) // 24 hours
                .parse()
                .unwrap_or(86400),
            secure_cookies: env::var("SECURE_COOKIES")
                .map(|v| v.to_lowercase() == "true")
                .unwrap_or(false),
            cors_origins: env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(|_| {
                    vec![
                        "http://localhost:3000".to_string(),
                        "http://127.0.0.1:3000".to_string(),
                    ]
                }),
        })
    }

    /// Get the full bind address (addr:port)
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid port number")]
    InvalidPort,
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}
