use axum::http::{header, HeaderValue, Method};
use clap::Parser;
use endoflow_server::{
    build_router,
    cli::{seed_demo_accounts, Cli, Commands},
    storage::open_account_store,
    ServerConfig, ServerState,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "endoflow_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration; a missing or weak session secret is fatal here,
    // before anything is bound or connected.
    let config = ServerConfig::from_env()?;

    // Open the account store (primary Postgres, SQLite fallback)
    let accounts = open_account_store(&config).await?;

    // Handle CLI commands
    match cli.command {
        Some(Commands::Account(cmd)) => {
            return cmd.execute(accounts).await;
        }
        Some(Commands::Seed) => {
            return seed_demo_accounts(accounts).await;
        }
        Some(Commands::Serve) | None => {
            // Continue to run server
        }
    }

    // Server mode
    info!("🦷 Starting ENDOFLOW Server v{}", VERSION);
    info!("📋 Configuration loaded:");
    info!("   Port: {}", config.port);
    info!("   Bind address: {}", config.bind_addr);
    info!("   Session TTL: {}s", config.session_ttl_seconds);
    info!("   Secure cookies: {}", config.secure_cookies);

    // CORS configuration - configurable via CORS_ORIGINS env var
    let cors_origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect();
    info!("   CORS origins: {:?}", config.cors_origins);
    let cors = CorsLayer::new()
        .allow_origin(cors_origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true);

    let state = Arc::new(ServerState::new(config.clone(), accounts));
    let app = build_router(state).layer(cors);

    // Start server
    let addr: SocketAddr = config.bind_address().parse()?;
    info!("🎧 Listening on http://{}", addr);
    info!("🔑 Health endpoint: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
