use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use db::{DbEngine, DbHandle};
use tracing::info;

use crate::api::rest::routes;
use crate::domain::repo::UsersRepository;
use crate::infra::storage::{ensure_users_table, PgUsersRepository, SqliteUsersRepository};

/// Versioned mount point of the resource.
pub const BASE_PATH: &str = "/api/v1/users";

/// The user resource, wired to one repository.
#[derive(Clone)]
pub struct UsersModule {
    repo: Arc<dyn UsersRepository>,
}

impl UsersModule {
    pub fn new(repo: Arc<dyn UsersRepository>) -> Self {
        Self { repo }
    }

    /// Pick the repository adapter matching the pool's engine.
    pub fn from_db(db: &DbHandle) -> anyhow::Result<Self> {
        let repo: Arc<dyn UsersRepository> = match db.engine() {
            DbEngine::Postgres => Arc::new(PgUsersRepository::new(
                db.sqlx_postgres()
                    .context("PostgreSQL handle without a PostgreSQL pool")?
                    .clone(),
            )),
            DbEngine::Sqlite => Arc::new(SqliteUsersRepository::new(
                db.sqlx_sqlite()
                    .context("SQLite handle without a SQLite pool")?
                    .clone(),
            )),
        };
        info!(engine = ?db.engine(), "users repository wired");
        Ok(Self::new(repo))
    }

    /// Table bootstrap; run once before the router takes traffic.
    pub async fn migrate(db: &DbHandle) -> anyhow::Result<()> {
        ensure_users_table(db).await
    }

    /// Routes mounted under [`BASE_PATH`].
    pub fn router(&self) -> Router {
        Router::new().nest(BASE_PATH, routes::register_routes(self.repo.clone()))
    }
}
