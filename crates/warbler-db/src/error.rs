use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A UNIQUE constraint rejected the write.
    #[error("duplicate value for {column}")]
    Duplicate { column: &'static str },

    /// A CHECK constraint rejected the write (message text over the limit).
    #[error("value rejected by check constraint")]
    CheckViolation,

    #[error("row not found")]
    NotFound,

    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    #[error("database lock poisoned")]
    LockPoisoned,

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

impl StoreError {
    /// Map constraint failures on writes into typed errors so handlers can
    /// turn them into form feedback instead of a 500.
    pub(crate) fn from_sqlite(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(e, Some(ref msg)) = err {
            if e.code == rusqlite::ErrorCode::ConstraintViolation {
                if msg.contains("users.username") {
                    return StoreError::Duplicate { column: "username" };
                }
                if msg.contains("users.email") {
                    return StoreError::Duplicate { column: "email" };
                }
                if msg.contains("CHECK constraint failed") {
                    return StoreError::CheckViolation;
                }
            }
        }
        StoreError::Sqlite(err)
    }
}
