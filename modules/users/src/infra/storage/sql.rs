//! Statements shared by both backends. Values are always bound, never spliced in.

use chrono::NaiveDateTime;

use crate::contract::model::User;

pub const INSERT_USER: &str =
    "INSERT INTO users (name, email) VALUES ($1, $2) RETURNING id, name, email, created_at";

pub const SELECT_ALL_USERS: &str = "SELECT id, name, email, created_at FROM users ORDER BY id ASC";

pub const SELECT_USER_BY_ID: &str = "SELECT id, name, email, created_at FROM users WHERE id = $1";

pub const UPDATE_USER: &str = "UPDATE users SET name = $1, email = $2 WHERE id = $3 \
     RETURNING id, name, email, created_at";

pub const DELETE_USER: &str =
    "DELETE FROM users WHERE id = $1 RETURNING id, name, email, created_at";

/// Row shape of `users`. `created_at` is a zone-less TIMESTAMP written in UTC.
#[derive(Debug, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub created_at: NaiveDateTime,
}

impl From<UserRecord> for User {
    fn from(r: UserRecord) -> Self {
        Self {
            id: r.id,
            name: r.name,
            email: r.email,
            created_at: r.created_at.and_utc(),
        }
    }
}
