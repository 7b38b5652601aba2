use clap::Subcommand;
use rand::Rng;
use std::sync::Arc;

use crate::auth::hash_password;
use crate::storage::{AccountStore, CreateAccount, Role};

/// Account management subcommands
#[derive(Subcommand)]
pub enum AccountCommands {
    /// Create a new account
    Create {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Full name
        #[arg(short, long)]
        name: String,

        /// Role: dentist, assistant or patient
        #[arg(short, long, default_value = "patient")]
        role: String,

        /// Password (if not provided, a random one will be generated)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// List all accounts
    List,

    /// Show account details
    Show {
        /// Account email address
        email: String,
    },

    /// Reset an account's password
    ResetPassword {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// New password (if not provided, a random one will be generated)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Delete an account
    Delete {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

impl AccountCommands {
    /// Execute the account command
    pub async fn execute(
        self,
        store: Arc<dyn AccountStore>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match self {
            AccountCommands::Create {
                email,
                name,
                role,
                password,
            } => {
                let role: Role = role.parse()?;
                let password = password.unwrap_or_else(generate_secure_password);
                let password_hash = hash_password(&password)
                    .map_err(|e| format!("Failed to hash password: {}", e))?;

                let account = store
                    .create_account(CreateAccount {
                        email,
                        full_name: name,
                        password_hash,
                        role,
                    })
                    .await?;

                println!("✅ Account created successfully!");
                println!();
                println!("   Email:    {}", account.email);
                println!("   Name:     {}", account.full_name);
                println!("   Role:     {}", account.role);
                println!("   Password: {}", password);
                println!();
                println!("⚠️  Please securely share these credentials with the account holder.");
            }

            AccountCommands::List => {
                let accounts = store.list_accounts().await?;

                if accounts.is_empty() {
                    println!("No accounts found.");
                    return Ok(());
                }

                println!(
                    "{:<36} {:<30} {:<20} {:<10}",
                    "ID", "Email", "Name", "Role"
                );
                println!("{}", "-".repeat(98));

                for account in accounts {
                    println!(
                        "{:<36} {:<30} {:<20} {:<10}",
                        account.id,
                        truncate(&account.email, 28),
                        truncate(&account.full_name, 18),
                        account.role
                    );
                }
            }

            AccountCommands::Show { email } => {
                let account = store.get_account_by_email(&email).await?;

                println!("Account Details:");
                println!("  ID:         {}", account.id);
                println!("  Email:      {}", account.email);
                println!("  Name:       {}", account.full_name);
                println!("  Role:       {}", account.role);
                println!("  Created:    {}", account.created_at);
                println!(
                    "  Last Login: {}",
                    account
                        .last_login
                        .map(|t| t.to_string())
                        .unwrap_or_else(|| "Never".to_string())
                );
            }

            AccountCommands::ResetPassword { email, password } => {
                let account = store.get_account_by_email(&email).await?;
                let password = password.unwrap_or_else(generate_secure_password);
                let password_hash = hash_password(&password)
                    .map_err(|e| format!("Failed to hash password: {}", e))?;

                store.update_password(account.id, &password_hash).await?;

                println!("✅ Password reset successfully!");
                println!();
                println!("   Email:        {}", account.email);
                println!("   New Password: {}", password);
                println!();
                println!("⚠️  Please securely share the new password with the account holder.");
            }

            AccountCommands::Delete { email, force } => {
                let account = store.get_account_by_email(&email).await?;

                if !force {
                    println!("Are you sure you want to delete account {}? (y/N)", email);
                    let mut input = String::new();
                    std::io::stdin().read_line(&mut input)?;
                    if !input.trim().eq_ignore_ascii_case("y") {
                        println!("Cancelled.");
                        return Ok(());
                    }
                }

                store.delete_account(account.id).await?;
                println!("✅ Account {} has been deleted.", email);
            }
        }

        Ok(())
    }
}

/// Generate a secure random password
fn generate_secure_password() -> String {
    const CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghjkmnpqrstuvwxyz23456789!@#$%&*";
    let mut rng = rand::thread_rng();

    (0..16)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Truncate string to max length with ellipsis
fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len - 3])
    }
}
