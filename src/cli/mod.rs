mod accounts;
mod seed;

pub use accounts::AccountCommands;
pub use seed::seed_demo_accounts;

use clap::{Parser, Subcommand};

/// ENDOFLOW Server - Clinic portal authentication server
#[derive(Parser)]
#[command(name = "endoflow-server")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the server (default)
    Serve,

    /// Account management commands
    #[command(subcommand)]
    Account(AccountCommands),

    /// Create the demo clinic accounts
    Seed,
}
