//! `users` table bootstrap
//!
//! Creates the table when it is missing. Column names and unique constraints
//! match what `SqlxUserDao` expects; anything beyond creation belongs to the
//! migration tooling.

use common::error::{DatabaseError, DatabaseResult};
use sqlx::AnyPool;
use tracing::info;

const POSTGRES_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id BIGSERIAL PRIMARY KEY,
    email VARCHAR(255) UNIQUE,
    phone VARCHAR(32) UNIQUE,
    name VARCHAR(255) UNIQUE,
    birthday VARCHAR(64) NOT NULL DEFAULT '',
    resume TEXT NOT NULL DEFAULT '',
    password VARCHAR(255) NOT NULL DEFAULT '',
    wechat_union_id VARCHAR(1024),
    wechat_open_id VARCHAR(1024) UNIQUE,
    ctime BIGINT NOT NULL,
    utime BIGINT NOT NULL
)
"#;

const SQLITE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT UNIQUE,
    phone TEXT UNIQUE,
    name TEXT UNIQUE,
    birthday TEXT NOT NULL DEFAULT '',
    resume TEXT NOT NULL DEFAULT '',
    password TEXT NOT NULL DEFAULT '',
    wechat_union_id TEXT,
    wechat_open_id TEXT UNIQUE,
    ctime INTEGER NOT NULL,
    utime INTEGER NOT NULL
)
"#;

/// SQL dialect of the database behind a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    Sqlite,
}

impl Backend {
    /// Pick the dialect from a connection URL's scheme.
    pub fn from_url(url: &str) -> DatabaseResult<Self> {
        let scheme = url.split_once(':').map(|(scheme, _)| scheme).unwrap_or("");
        match scheme {
            "postgres" | "postgresql" => Ok(Backend::Postgres),
            "sqlite" => Ok(Backend::Sqlite),
            other => Err(DatabaseError::Configuration(format!(
                "unsupported database scheme: {other:?}"
            ))),
        }
    }

    fn users_table_ddl(self) -> &'static str {
        match self {
            Backend::Postgres => POSTGRES_USERS_TABLE,
            Backend::Sqlite => SQLITE_USERS_TABLE,
        }
    }
}

/// Create the `users` table if it does not exist yet.
pub async fn create_users_table(pool: &AnyPool, backend: Backend) -> DatabaseResult<()> {
    info!(?backend, "Ensuring users table exists");

    sqlx::query(backend.users_table_ddl())
        .execute(pool)
        .await
        .map_err(DatabaseError::Query)?;

    Ok(())
}
