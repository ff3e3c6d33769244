pub mod schema;
pub mod sql;
pub mod sqlx_repo;

pub use schema::ensure_users_table;
pub use sqlx_repo::{PgUsersRepository, SqliteUsersRepository};
