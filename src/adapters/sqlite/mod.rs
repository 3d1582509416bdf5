//! SQLite adapter: Implementation of UserStore.
//!
//! Provides local persistence for accounts.
//!
//! # Security
//!
//! Only Argon2id PHC strings are stored; plaintext passwords never reach
//! this adapter.
//!
//! # Mutex Behavior
//!
//! The connection is protected by a `Mutex`. A poisoned mutex surfaces as
//! `StorageError::LockPoisoned` rather than a panic.
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, types::Type, Connection, ErrorCode, OptionalExtension, Row};

use crate::domain::{PasswordHash, Role, User};
use crate::ports::UserStore;

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// SQLite account store.
pub struct SqliteUserStore {
    conn: Mutex<Connection>,
}

const USER_COLUMNS: &str = "id, name, email, role, username, password_hash, created_at";

impl SqliteUserStore {
    /// Open (or create) the database at `path`.
    ///
    /// # Errors
    /// Returns error if database cannot be opened or initialized.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory SQLite database (for testing).
    ///
    /// # Errors
    /// Returns error if database cannot be created.
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    /// Initialize the database schema.
    fn init_schema(&self) -> Result<(), StorageError> {
        let conn = self.conn()?;

        conn.execute_batch(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                role TEXT NOT NULL,
                username TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE UNIQUE INDEX IF NOT EXISTS idx_users_username
                ON users(username COLLATE NOCASE);

            CREATE UNIQUE INDEX IF NOT EXISTS idx_users_email
                ON users(email COLLATE NOCASE);
            ",
        )?;

        Ok(())
    }

    fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
        let role_str: String = row.get(3)?;
        let role = Role::parse(&role_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                3,
                Type::Text,
                format!("unknown role '{role_str}'").into(),
            )
        })?;
        let password: String = row.get(5)?;
        let created_at_str: String = row.get(6)?;

        let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&chrono::Utc))
            .unwrap_or_else(|_| chrono::Utc::now());

        Ok(User {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            role,
            username: row.get(4)?,
            password: PasswordHash::from_phc(password),
            created_at,
        })
    }

    fn find_one(&self, column: &str, value: &str) -> Result<Option<User>, StorageError> {
        let conn = self.conn()?;
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = ?1 COLLATE NOCASE");
        let user = conn
            .query_row(&sql, params![value], Self::row_to_user)
            .optional()?;
        Ok(user)
    }
}

impl UserStore for SqliteUserStore {
    type Error = StorageError;

    fn insert_user(&self, user: &User) -> Result<(), Self::Error> {
        let conn = self.conn()?;

        let result = conn.execute(
            r"
            INSERT INTO users (
                id, name, email, role, username, password_hash, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
            params![
                user.id,
                user.name,
                user.email,
                user.role.as_str(),
                user.username,
                user.password.as_str(),
                user.created_at.to_rfc3339(),
            ],
        );

        match result {
            Ok(_) => {
                tracing::debug!(role = user.role.as_str(), "Inserted user");
                Ok(())
            }
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                Err(StorageError::Conflict(
                    "id, username or email already exists".to_string(),
                ))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn find_by_id(&self, id: &str) -> Result<Option<User>, Self::Error> {
        let conn = self.conn()?;
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1");
        let user = conn
            .query_row(&sql, params![id], Self::row_to_user)
            .optional()?;
        Ok(user)
    }

    fn find_by_username(&self, username: &str) -> Result<Option<User>, Self::Error> {
        self.find_one("username", username.trim())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>, Self::Error> {
        self.find_one("email", email.trim())
    }

    fn update_password(&self, id: &str, password: &PasswordHash) -> Result<(), Self::Error> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE users SET password_hash = ?1 WHERE id = ?2",
            params![password.as_str(), id],
        )?;

        if updated == 0 {
            return Err(StorageError::NotFound(format!("user {id}")));
        }
        Ok(())
    }

    fn count_users(&self) -> Result<usize, Self::Error> {
        let conn = self.conn()?;

        let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;

        Ok(usize::try_from(count).unwrap_or(0))
    }
}
