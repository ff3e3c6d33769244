use db::FaultKind;
use thiserror::Error;

/// Faults raised by a repository. "Not found" is not one of them: it is `Ok(None)`.
#[derive(Debug, Error)]
pub enum RepoError {
    /// A store-enforced rule (unique email, ...) rejected the write.
    #[error("{detail}")]
    ConstraintViolation {
        constraint: Option<String>,
        detail: String,
    },

    /// The store could not be reached, or no connection became available in time.
    #[error("database unavailable")]
    Connectivity(#[source] sqlx::Error),

    #[error("query failed")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match db::classify(&err) {
            FaultKind::Constraint => match &err {
                sqlx::Error::Database(db_err) => RepoError::ConstraintViolation {
                    constraint: db_err.constraint().map(str::to_owned),
                    detail: db_err.message().to_owned(),
                },
                _ => RepoError::ConstraintViolation {
                    constraint: None,
                    detail: err.to_string(),
                },
            },
            FaultKind::Connectivity => RepoError::Connectivity(err),
            FaultKind::Other => RepoError::Database(err),
        }
    }
}
