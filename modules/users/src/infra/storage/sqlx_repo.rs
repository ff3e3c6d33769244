//! sqlx adapters for [`UsersRepository`]. Both engines run the statements in
//! [`sql`](super::sql) with identical bindings; only the pool type differs.

use async_trait::async_trait;
use tracing::instrument;

use crate::contract::model::{NewUser, User};
use crate::domain::{error::RepoError, repo::UsersRepository};
use crate::infra::storage::sql::{self, UserRecord};

macro_rules! sqlx_users_repository {
    ($(#[$meta:meta])* $name:ident, $pool:ty) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name {
            pool: $pool,
        }

        impl $name {
            pub fn new(pool: $pool) -> Self {
                Self { pool }
            }
        }

        #[async_trait]
        impl UsersRepository for $name {
            #[instrument(name = "users.repo.create", skip_all)]
            async fn create(&self, new_user: &NewUser) -> Result<User, RepoError> {
                let row: UserRecord = sqlx::query_as(sql::INSERT_USER)
                    .bind(&new_user.name)
                    .bind(&new_user.email)
                    .fetch_one(&self.pool)
                    .await?;
                Ok(row.into())
            }

            #[instrument(name = "users.repo.list", skip_all)]
            async fn list(&self) -> Result<Vec<User>, RepoError> {
                let rows: Vec<UserRecord> = sqlx::query_as(sql::SELECT_ALL_USERS)
                    .fetch_all(&self.pool)
                    .await?;
                Ok(rows.into_iter().map(User::from).collect())
            }

            #[instrument(name = "users.repo.find_by_id", skip(self))]
            async fn find_by_id(&self, id: i32) -> Result<Option<User>, RepoError> {
                let row: Option<UserRecord> = sqlx::query_as(sql::SELECT_USER_BY_ID)
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?;
                Ok(row.map(User::from))
            }

            #[instrument(name = "users.repo.update", skip(self, changes))]
            async fn update(&self, id: i32, changes: &NewUser) -> Result<Option<User>, RepoError> {
                let row: Option<UserRecord> = sqlx::query_as(sql::UPDATE_USER)
                    .bind(&changes.name)
                    .bind(&changes.email)
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?;
                Ok(row.map(User::from))
            }

            #[instrument(name = "users.repo.delete_by_id", skip(self))]
            async fn delete_by_id(&self, id: i32) -> Result<Option<User>, RepoError> {
                let row: Option<UserRecord> = sqlx::query_as(sql::DELETE_USER)
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await?;
                Ok(row.map(User::from))
            }
        }
    };
}

sqlx_users_repository!(
    /// PostgreSQL adapter (production).
    PgUsersRepository,
    sqlx::PgPool
);

sqlx_users_repository!(
    /// SQLite adapter (`--mock` runs and tests).
    SqliteUsersRepository,
    sqlx::SqlitePool
);
