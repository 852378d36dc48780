// src/db/mod.rs
use thiserror::Error;

pub mod sqlite;

pub use sqlite::Database;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database error: {0}")]
    SqlxError(String),

    #[error("Password not found")]
    NotFound,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Initialization error: {0}")]
    InitError(String),
}

// Convert database-specific errors to our DbError
impl From<sqlx::Error> for DbError {
    fn from(error: sqlx::Error) -> Self {
        DbError::SqlxError(error.to_string())
    }
}

// Function to initialize the database
pub async fn init_db(db_url: &str) -> Result<Database, DbError> {
    Database::connect(db_url).await
}
