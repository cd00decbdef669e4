use thiserror::Error;

/// Errors surfaced by the record store, dish queries and the role gate
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid value for '{field}': {reason}")]
    Validation { field: String, reason: String },

    #[error("No row with id {id} in {table}")]
    NotFound { table: &'static str, id: i64 },

    #[error("Permission denied: {action} requires the admin role")]
    Forbidden { action: String },

    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl StoreError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        StoreError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
