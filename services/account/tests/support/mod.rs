//! Shared fixtures for account integration tests

#![allow(dead_code)]

use account::User;
use account::schema::{Backend, create_users_table};
use common::database::{DatabaseConfig, init_pool};
use sqlx::AnyPool;
use tempfile::TempDir;

/// A single-connection in-memory SQLite pool with the `users` table created.
///
/// One connection keeps every query on the same in-memory database.
pub async fn memory_pool() -> AnyPool {
    sqlite_pool("sqlite::memory:".to_string(), 1).await
}

/// A SQLite database file under `dir` shared by `connections` connections.
///
/// Unlike the in-memory pool, statements from different connections reach
/// the database concurrently.
pub async fn file_pool(dir: &TempDir, connections: u32) -> AnyPool {
    let path = dir.path().join("users.db");
    sqlite_pool(format!("sqlite://{}?mode=rwc", path.display()), connections).await
}

async fn sqlite_pool(database_url: String, connections: u32) -> AnyPool {
    common::telemetry::init_tracing();

    let config = DatabaseConfig {
        database_url,
        max_connections: connections,
        min_connections: 1,
        connection_timeout: 5,
    };
    let pool = init_pool(&config).await.expect("sqlite pool");
    create_users_table(&pool, Backend::Sqlite)
        .await
        .expect("users table");
    pool
}

pub fn sample_user(tag: &str) -> User {
    User {
        email: Some(format!("{tag}@example.com")),
        phone: Some(format!("1380000{tag}")),
        name: Some(format!("user-{tag}")),
        birthday: "1990-05-17".to_string(),
        resume: format!("resume of {tag}"),
        password: format!("hashed-{tag}"),
        wechat_union_id: Some(format!("union-{tag}")),
        wechat_open_id: Some(format!("open-{tag}")),
        ..Default::default()
    }
}

/// A user with every unique column left NULL.
pub fn anonymous_user() -> User {
    User {
        birthday: "2001-01-01".to_string(),
        password: "hashed".to_string(),
        ..Default::default()
    }
}
