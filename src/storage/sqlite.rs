use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::accounts::{Account, CreateAccount, Role};
use super::traits::{AccountStore, StorageError, StorageResult};

/// SQLite implementation of AccountStore (local fallback backend).
///
/// Identifiers are stored as hyphenated UUID text so the file is readable
/// with stock sqlite tooling.
pub struct SqliteAccountStore {
    pool: SqlitePool,
}

impl SqliteAccountStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Initialize database schema for accounts
    pub async fn initialize(&self) -> StorageResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS accounts (
                id TEXT PRIMARY KEY,
                email TEXT UNIQUE NOT NULL,
                full_name TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL,
                created_at TEXT NOT NULL,
                last_login TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_accounts_email ON accounts(email)
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    fn row_to_account(row: sqlx::sqlite::SqliteRow) -> StorageResult<Account> {
        let id_str: String = row.get("id");
        let id = Uuid::parse_str(&id_str)
            .map_err(|_| StorageError::Internal(format!("invalid account id: {}", id_str)))?;

        let role_str: String = row.get("role");
        let role: Role = role_str
            .parse()
            .map_err(|_| StorageError::InvalidRole(role_str))?;

        let created_at: DateTime<Utc> = row.get("created_at");
        let last_login: Option<DateTime<Utc>> = row.get("last_login");

        Ok(Account {
            id,
            email: row.get("email"),
            full_name: row.get("full_name"),
            password_hash: row.get("password_hash"),
            role,
            created_at,
            last_login,
        })
    }
}

#[async_trait]
impl AccountStore for SqliteAccountStore {
    async fn create_account(&self, account: CreateAccount) -> StorageResult<Account> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO accounts (id, email, full_name, password_hash, role, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id.to_string())
        .bind(&account.email)
        .bind(&account.full_name)
        .bind(&account.password_hash)
        .bind(account.role.as_str())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return StorageError::DuplicateEmail(account.email.clone());
                }
            }
            StorageError::Database(e)
        })?;

        Ok(Account {
            id,
            email: account.email,
            full_name: account.full_name,
            password_hash: account.password_hash,
            role: account.role,
            created_at: now,
            last_login: None,
        })
    }

    async fn get_account(&self, id: Uuid) -> StorageResult<Account> {
        let row = sqlx::query(
            r#"
            SELECT id, email, full_name, password_hash, role, created_at, last_login
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StorageError::AccountNotFound(id.to_string()))?;

        Self::row_to_account(row)
    }

    async fn get_account_by_email(&self, email: &str) -> StorageResult<Account> {
        let row = sqlx::query(
            r#"
            SELECT id, email, full_name, password_hash, role, created_at, last_login
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StorageError::AccountNotFound(email.to_string()))?;

        Self::row_to_account(row)
    }

    async fn list_accounts(&self) -> StorageResult<Vec<Account>> {
        let rows = sqlx::query(
            r#"
            SELECT id, email, full_name, password_hash, role, created_at, last_login
            FROM accounts
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_account).collect()
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> StorageResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE accounts SET password_hash = $2 WHERE id = $1
            "#,
        )
        .bind(id.to_string())
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::AccountNotFound(id.to_string()));
        }

        Ok(())
    }

    async fn update_last_login(&self, id: Uuid) -> StorageResult<()> {
        sqlx::query(
            r#"
            UPDATE accounts SET last_login = $2 WHERE id = $1
            "#,
        )
        .bind(id.to_string())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_account(&self, id: Uuid) -> StorageResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM accounts WHERE id = $1
            "#,
        )
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::AccountNotFound(id.to_string()));
        }

        Ok(())
    }

    async fn has_accounts(&self) -> StorageResult<bool> {
        let row = sqlx::query(
            r#"
            SELECT EXISTS(SELECT 1 FROM accounts) as has_accounts
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get("has_accounts"))
    }
}
