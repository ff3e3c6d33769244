use async_trait::async_trait;

use crate::contract::model::{NewUser, User};
use crate::domain::error::RepoError;

/// Persistence port for the user table.
/// Object-safe and async-friendly via `async_trait`.
///
/// Inputs are trusted: validation happens before a repository is called.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// Insert and return the stored row (with `id` and `created_at`).
    async fn create(&self, new_user: &NewUser) -> Result<User, RepoError>;
    /// All rows, ascending by `id`.
    async fn list(&self) -> Result<Vec<User>, RepoError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, RepoError>;
    /// Replace both `name` and `email`; `None` when no row has `id`.
    async fn update(&self, id: i32, changes: &NewUser) -> Result<Option<User>, RepoError>;
    /// Remove and return the row; `None` when no row has `id`.
    async fn delete_by_id(&self, id: i32) -> Result<Option<User>, RepoError>;
}
