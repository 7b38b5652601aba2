use std::sync::Arc;

use crate::auth::hash_password;
use crate::storage::{AccountStore, CreateAccount, Role, StorageError};

/// Shared password for the demo accounts
const DEMO_PASSWORD: &str = "password123";

/// Create the three demo clinic accounts, one per role. Safe to rerun:
/// accounts that already exist are skipped.
pub async fn seed_demo_accounts(
    store: Arc<dyn AccountStore>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("🦷 Seeding ENDOFLOW demo accounts...");

    let demo = [
        ("dentist@endoflow.com", "Dr. Sarah Johnson", Role::Dentist),
        ("assistant@endoflow.com", "Lisa Martinez", Role::Assistant),
        ("patient@endoflow.com", "John Smith", Role::Patient),
    ];

    for (email, name, role) in demo {
        let password_hash =
            hash_password(DEMO_PASSWORD).map_err(|e| format!("Failed to hash password: {}", e))?;

        match store
            .create_account(CreateAccount {
                email: email.to_string(),
                full_name: name.to_string(),
                password_hash,
                role,
            })
            .await
        {
            Ok(_) => println!("- {}: {} / {}", role, email, DEMO_PASSWORD),
            Err(StorageError::DuplicateEmail(_)) => {
                println!("- {}: {} already exists, skipped", role, email)
            }
            Err(e) => return Err(e.into()),
        }
    }

    println!("Seed finished.");
    Ok(())
}
