//! Custom error types for user persistence

use common::ContextError;
use sqlx::error::DatabaseError;
use thiserror::Error;

/// Error returned by user store operations
#[derive(Error, Debug)]
pub enum UserRepoError {
    /// Email collided with an existing user
    #[error("Email already registered")]
    DuplicateEmail,

    /// Phone collided with an existing user
    #[error("Phone already registered")]
    DuplicatePhone,

    /// User name collided with an existing user
    #[error("User name already taken")]
    DuplicateName,

    /// WeChat open id collided with an existing user
    #[error("WeChat account already bound")]
    DuplicateWechatOpenId,

    /// Lookup matched no row
    #[error("User not found")]
    NotFound,

    /// The request context was cancelled first
    #[error("Operation cancelled")]
    Cancelled,

    /// The request context's deadline passed first
    #[error("Deadline exceeded")]
    DeadlineExceeded,

    /// Any other database failure, with the driver error as source
    #[error("Data access error: {0}")]
    DataAccess(#[from] sqlx::Error),
}

impl From<ContextError> for UserRepoError {
    fn from(err: ContextError) -> Self {
        match err {
            ContextError::Cancelled => UserRepoError::Cancelled,
            ContextError::DeadlineExceeded => UserRepoError::DeadlineExceeded,
        }
    }
}

impl From<UniqueColumn> for UserRepoError {
    fn from(column: UniqueColumn) -> Self {
        match column {
            UniqueColumn::Email => UserRepoError::DuplicateEmail,
            UniqueColumn::Phone => UserRepoError::DuplicatePhone,
            UniqueColumn::Name => UserRepoError::DuplicateName,
            UniqueColumn::WechatOpenId => UserRepoError::DuplicateWechatOpenId,
        }
    }
}

/// Type alias for user store results
pub type UserRepoResult<T> = Result<T, UserRepoError>;

/// A uniquely indexed column of the `users` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueColumn {
    /// `email`
    Email,
    /// `phone`
    Phone,
    /// `name`
    Name,
    /// `wechat_open_id`
    WechatOpenId,
}

impl UniqueColumn {
    // Multi-word columns first so `wechat_open_id` is never read as a shorter match.
    const ALL: [UniqueColumn; 4] = [
        UniqueColumn::WechatOpenId,
        UniqueColumn::Email,
        UniqueColumn::Phone,
        UniqueColumn::Name,
    ];

    /// Column name as it appears in the table
    pub fn column(self) -> &'static str {
        match self {
            UniqueColumn::Email => "email",
            UniqueColumn::Phone => "phone",
            UniqueColumn::Name => "name",
            UniqueColumn::WechatOpenId => "wechat_open_id",
        }
    }

    /// Work out which column a unique violation hit.
    ///
    /// Uses the constraint name when the driver reports one (PostgreSQL
    /// `users_email_key`), otherwise the message: SQLite's
    /// `UNIQUE constraint failed: users.email` or MySQL's
    /// `Duplicate entry '..' for key 'users.email'`.
    pub fn from_database_error(err: &dyn DatabaseError) -> Option<Self> {
        if let Some(column) = err.constraint().and_then(Self::from_identifier) {
            return Some(column);
        }

        let message = err.message();
        let detail = message
            .rsplit_once("for key")
            .or_else(|| message.rsplit_once("failed:"))
            .map_or(message, |(_, tail)| tail);
        Self::from_identifier(detail)
    }

    /// Match a constraint, index or `table.column` identifier.
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        let identifier = identifier.to_ascii_lowercase();
        let segments: Vec<&str> = identifier
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|s| !s.is_empty())
            .collect();

        Self::ALL.into_iter().find(|candidate| {
            let words: Vec<&str> = candidate.column().split('_').collect();
            segments.windows(words.len()).any(|w| w == words.as_slice())
        })
    }
}
