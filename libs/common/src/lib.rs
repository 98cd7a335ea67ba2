//! Common library for the account services
//!
//! This crate provides shared functionality used across services: database
//! connectivity, request contexts, error handling and tracing setup.
//!
//! ```rust,no_run
//! use common::database::{DatabaseConfig, init_pool, health_check};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env()?;
//!     let pool = init_pool(&config).await?;
//!     let is_healthy = health_check(&pool).await?;
//!     println!("Database health check: {}", is_healthy);
//!     Ok(())
//! }
//! ```

pub mod context;
pub mod database;
pub mod error;
pub mod telemetry;

pub use context::{ContextError, RequestContext};
