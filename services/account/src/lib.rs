//! User account persistence
//!
//! Maps the `users` table onto [`User`] and exposes lookups and edits through
//! the [`UserDao`] trait. Unique-key violations come back as typed duplicate
//! errors; every call honours the caller's [`common::RequestContext`].

pub mod error;
pub mod models;
pub mod repositories;
pub mod schema;

pub use error::{UniqueColumn, UserRepoError, UserRepoResult};
pub use models::User;
pub use repositories::{SqlxUserDao, UserDao};
