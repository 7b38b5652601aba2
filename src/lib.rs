pub mod auth;
pub mod cli;
pub mod config;
pub mod handlers;
pub mod router;
pub mod state;
pub mod storage;

pub use config::ServerConfig;
pub use router::build_router;
pub use state::ServerState;
