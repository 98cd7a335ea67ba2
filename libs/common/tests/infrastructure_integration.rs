//! Integration tests for the infrastructure components
//!
//! These run against an in-memory SQLite database through the same `Any`
//! pool the services use, so no external service is required.

use common::database::{DatabaseConfig, DbHandle, health_check, init_pool};
use sqlx::Row;

fn memory_config() -> DatabaseConfig {
    DatabaseConfig {
        database_url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        connection_timeout: 5,
    }
}

#[tokio::test]
async fn test_infrastructure_integration() -> Result<(), Box<dyn std::error::Error>> {
    common::telemetry::init_tracing();

    let pool = init_pool(&memory_config()).await?;

    assert!(health_check(&pool).await?, "Database health check failed");

    let row = sqlx::query("SELECT 1 AS result").fetch_one(&pool).await?;
    let result: i64 = row.get("result");
    assert_eq!(result, 1, "simple query test failed");

    Ok(())
}

#[tokio::test]
async fn test_init_pool_rejects_unknown_scheme() {
    let config = DatabaseConfig {
        database_url: "nosuchdb://localhost/none".to_string(),
        ..memory_config()
    };

    let result = init_pool(&config).await;
    assert!(matches!(
        result,
        Err(common::error::DatabaseError::Connection(_))
    ));
}

#[tokio::test]
async fn test_db_handle_rotation() -> Result<(), Box<dyn std::error::Error>> {
    let first = init_pool(&memory_config()).await?;
    let second = init_pool(&memory_config()).await?;

    sqlx::query("CREATE TABLE marker (name TEXT NOT NULL)")
        .execute(&first)
        .await?;
    sqlx::query("INSERT INTO marker (name) VALUES ('first')")
        .execute(&first)
        .await?;

    let handle = DbHandle::new(first);
    let in_flight = handle.current();

    let previous = handle.replace(second);

    // The pool taken before the swap still reaches the old database.
    let name: String = sqlx::query_scalar("SELECT name FROM marker")
        .fetch_one(&in_flight)
        .await?;
    assert_eq!(name, "first");

    // New readers see the new database, which has no such table.
    let missing = sqlx::query("SELECT name FROM marker")
        .fetch_optional(&handle.current())
        .await;
    assert!(missing.is_err());

    previous.close().await;
    Ok(())
}
