//! User model

use serde::{Deserialize, Serialize};

/// Row of the `users` table.
///
/// `email`, `phone`, `name` and `wechat_open_id` are unique across the table
/// when present; `None` is stored as NULL, which is distinct from `Some("")`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Assigned by the store on insert.
    pub id: i64,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub name: Option<String>,
    pub birthday: String,
    pub resume: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    pub wechat_union_id: Option<String>,
    pub wechat_open_id: Option<String>,
    /// Creation time, epoch milliseconds.
    pub ctime: i64,
    /// Last modification time, epoch milliseconds.
    pub utime: i64,
}
