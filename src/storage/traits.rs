use async_trait::async_trait;
use uuid::Uuid;

use super::accounts::{Account, CreateAccount};

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Email already exists: {0}")]
    DuplicateEmail(String),

    #[error("Invalid role stored for account: {0}")]
    InvalidRole(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Account store trait
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Create a new account
    async fn create_account(&self, account: CreateAccount) -> StorageResult<Account>;

    /// Get account by ID
    async fn get_account(&self, id: Uuid) -> StorageResult<Account>;

    /// Get account by email
    async fn get_account_by_email(&self, email: &str) -> StorageResult<Account>;

    /// List all accounts
    async fn list_accounts(&self) -> StorageResult<Vec<Account>>;

    /// Update an account's password hash
    async fn update_password(&self, id: Uuid, password_hash: &str) -> StorageResult<()>;

    /// Update last login timestamp
    async fn update_last_login(&self, id: Uuid) -> StorageResult<()>;

    /// Delete an account
    async fn delete_account(&self, id: Uuid) -> StorageResult<()>;

    /// Check if any accounts exist
    async fn has_accounts(&self) -> StorageResult<bool>;
}
