//! Shared database error helpers (SQLSTATE categorization, etc.)

use sqlx::error::ErrorKind;

/// Coarse category of a storage failure, independent of the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaultKind {
    /// A unique / foreign key / not-null / check constraint rejected the statement.
    Constraint,
    /// The store could not be reached or the pool gave up waiting.
    Connectivity,
    /// Anything else (bad SQL, decode errors, ...).
    Other,
}

/// Returns true if the given SQLSTATE code represents a unique constraint violation
/// across popular backends (Postgres 23505, SQLite 2067, MySQL 1062).
pub fn is_unique_violation_code(code: &str) -> bool {
    matches!(code, "23505" | "2067" | "1062")
}

pub fn is_sqlx_unique_violation(db: &dyn sqlx::error::DatabaseError) -> bool {
    db.is_unique_violation()
        || db
            .code()
            .map(|c| is_unique_violation_code(c.as_ref()))
            .unwrap_or(false)
}

/// Categorize a sqlx error.
pub fn classify(err: &sqlx::Error) -> FaultKind {
    match err {
        sqlx::Error::Database(db) => {
            if is_sqlx_unique_violation(db.as_ref()) {
                return FaultKind::Constraint;
            }
            match db.kind() {
                ErrorKind::UniqueViolation
                | ErrorKind::ForeignKeyViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation => FaultKind::Constraint,
                _ => FaultKind::Other,
            }
        }
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => FaultKind::Connectivity,
        _ => FaultKind::Other,
    }
}
