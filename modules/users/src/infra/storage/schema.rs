use anyhow::Context;
use db::{DbEngine, DbHandle};

const CREATE_USERS_PG: &str = "CREATE TABLE IF NOT EXISTS users (
    id SERIAL PRIMARY KEY,
    name VARCHAR(100) NOT NULL,
    email VARCHAR(150) UNIQUE NOT NULL,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

// AUTOINCREMENT keeps ids from being reused after deletes.
const CREATE_USERS_SQLITE: &str = "CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name VARCHAR(100) NOT NULL,
    email VARCHAR(150) UNIQUE NOT NULL,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

/// Create the `users` table if it does not exist. Idempotent.
pub async fn ensure_users_table(db: &DbHandle) -> anyhow::Result<()> {
    match db.engine() {
        DbEngine::Postgres => {
            let pool = db
                .sqlx_postgres()
                .context("PostgreSQL handle without a PostgreSQL pool")?;
            sqlx::query(CREATE_USERS_PG).execute(pool).await?;
        }
        DbEngine::Sqlite => {
            let pool = db
                .sqlx_sqlite()
                .context("SQLite handle without a SQLite pool")?;
            sqlx::query(CREATE_USERS_SQLITE).execute(pool).await?;
        }
    }
    tracing::info!(engine = ?db.engine(), "users table ready");
    Ok(())
}
