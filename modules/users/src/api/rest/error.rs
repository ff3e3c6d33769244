use apikit::ApiError;

use crate::domain::error::RepoError;

/// Every repository fault is a 500; the translator logs it and keeps the detail chain.
impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        ApiError::Internal(anyhow::Error::new(err))
    }
}
