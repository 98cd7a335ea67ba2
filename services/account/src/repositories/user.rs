//! User repository for database operations

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::RequestContext;
use common::database::DbHandle;
use sqlx::any::{AnyArguments, AnyRow};
use sqlx::query::Query;
use sqlx::{Any, AnyPool, Row};
use tracing::{debug, info, instrument, warn};

use crate::error::{UniqueColumn, UserRepoError, UserRepoResult};
use crate::models::User;

/// Data access for the `users` table.
///
/// Every call is a single statement bounded by `ctx`. Uniqueness is left to
/// the database; a violation comes back as the matching duplicate error.
#[async_trait]
pub trait UserDao: Send + Sync {
    /// Persist a new user. `id` on the input is ignored; `ctime` and `utime`
    /// are stamped with the current time. Returns the stored record.
    async fn insert(&self, ctx: &RequestContext, user: User) -> UserRepoResult<User>;

    /// Overwrite name, birthday and resume and refresh `utime`.
    ///
    /// Succeeds even when no row has this id.
    async fn edit_by_id(
        &self,
        ctx: &RequestContext,
        id: i64,
        name: &str,
        birthday: &str,
        resume: &str,
    ) -> UserRepoResult<()>;

    /// Find a user by primary key
    async fn find_by_id(&self, ctx: &RequestContext, id: i64) -> UserRepoResult<User>;

    /// Find a user by exact email, as stored
    async fn find_by_email(&self, ctx: &RequestContext, email: &str) -> UserRepoResult<User>;

    /// Find a user by exact phone number, as stored
    async fn find_by_phone(&self, ctx: &RequestContext, phone: &str) -> UserRepoResult<User>;

    /// Find a user by WeChat open id
    async fn find_by_wechat_open_id(
        &self,
        ctx: &RequestContext,
        open_id: &str,
    ) -> UserRepoResult<User>;
}

/// sqlx-backed `UserDao`
#[derive(Debug, Clone)]
pub struct SqlxUserDao {
    handle: Arc<DbHandle>,
}

impl SqlxUserDao {
    /// Create a repository over a fixed pool
    pub fn new(pool: AnyPool) -> Self {
        Self::with_handle(Arc::new(DbHandle::new(pool)))
    }

    /// Create a repository that reads the pool from a shared, rotatable handle
    pub fn with_handle(handle: Arc<DbHandle>) -> Self {
        Self { handle }
    }

    async fn fetch_user<'q>(
        &self,
        ctx: &RequestContext,
        query: Query<'q, Any, AnyArguments<'q>>,
    ) -> UserRepoResult<User> {
        let pool = self.handle.current();
        let row = ctx.run(query.fetch_optional(&pool)).await??;

        match row {
            Some(row) => Ok(user_from_row(&row)?),
            None => Err(UserRepoError::NotFound),
        }
    }
}

#[async_trait]
impl UserDao for SqlxUserDao {
    #[instrument(level = "debug", skip(self, ctx, user))]
    async fn insert(&self, ctx: &RequestContext, mut user: User) -> UserRepoResult<User> {
        let now = now_millis();
        user.ctime = now;
        user.utime = now;

        let pool = self.handle.current();
        let insert = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (email, phone, name, birthday, resume, password,
                               wechat_union_id, wechat_open_id, ctime, utime)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.name)
        .bind(&user.birthday)
        .bind(&user.resume)
        .bind(&user.password)
        .bind(&user.wechat_union_id)
        .bind(&user.wechat_open_id)
        .bind(user.ctime)
        .bind(user.utime);

        let id = ctx
            .run(insert.fetch_one(&pool))
            .await?
            .map_err(|e| map_write_error(e, UniqueColumn::Email))?;

        user.id = id;
        info!(id, "Inserted user");
        Ok(user)
    }

    #[instrument(level = "debug", skip(self, ctx, name, birthday, resume))]
    async fn edit_by_id(
        &self,
        ctx: &RequestContext,
        id: i64,
        name: &str,
        birthday: &str,
        resume: &str,
    ) -> UserRepoResult<()> {
        let pool = self.handle.current();
        let update = sqlx::query(
            r#"
            UPDATE users
            SET name = $1, birthday = $2, resume = $3, utime = $4
            WHERE id = $5
            "#,
        )
        .bind(name)
        .bind(birthday)
        .bind(resume)
        .bind(now_millis())
        .bind(id);

        let result = ctx
            .run(update.execute(&pool))
            .await?
            .map_err(|e| map_write_error(e, UniqueColumn::Name))?;

        if result.rows_affected() == 0 {
            debug!(id, "No user matched edit");
        }
        Ok(())
    }

    #[instrument(level = "debug", skip(self, ctx))]
    async fn find_by_id(&self, ctx: &RequestContext, id: i64) -> UserRepoResult<User> {
        let query = sqlx::query(
            r#"
            SELECT id, email, phone, name, birthday, resume, password,
                   wechat_union_id, wechat_open_id, ctime, utime
            FROM users
            WHERE id = $1
            LIMIT 1
            "#,
        )
        .bind(id);

        self.fetch_user(ctx, query).await
    }

    #[instrument(level = "debug", skip_all)]
    async fn find_by_email(&self, ctx: &RequestContext, email: &str) -> UserRepoResult<User> {
        let query = sqlx::query(
            r#"
            SELECT id, email, phone, name, birthday, resume, password,
                   wechat_union_id, wechat_open_id, ctime, utime
            FROM users
            WHERE email = $1
            LIMIT 1
            "#,
        )
        .bind(email);

        self.fetch_user(ctx, query).await
    }

    #[instrument(level = "debug", skip_all)]
    async fn find_by_phone(&self, ctx: &RequestContext, phone: &str) -> UserRepoResult<User> {
        let query = sqlx::query(
            r#"
            SELECT id, email, phone, name, birthday, resume, password,
                   wechat_union_id, wechat_open_id, ctime, utime
            FROM users
            WHERE phone = $1
            LIMIT 1
            "#,
        )
        .bind(phone);

        self.fetch_user(ctx, query).await
    }

    #[instrument(level = "debug", skip_all)]
    async fn find_by_wechat_open_id(
        &self,
        ctx: &RequestContext,
        open_id: &str,
    ) -> UserRepoResult<User> {
        let query = sqlx::query(
            r#"
            SELECT id, email, phone, name, birthday, resume, password,
                   wechat_union_id, wechat_open_id, ctime, utime
            FROM users
            WHERE wechat_open_id = $1
            LIMIT 1
            "#,
        )
        .bind(open_id);

        self.fetch_user(ctx, query).await
    }
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn user_from_row(row: &AnyRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        name: row.try_get("name")?,
        birthday: row.try_get("birthday")?,
        resume: row.try_get("resume")?,
        password: row.try_get("password")?,
        wechat_union_id: row.try_get("wechat_union_id")?,
        wechat_open_id: row.try_get("wechat_open_id")?,
        ctime: row.try_get("ctime")?,
        utime: row.try_get("utime")?,
    })
}

/// Turn a unique violation into the duplicate error for the column it hit.
///
/// `fallback` is reported when the driver doesn't say which column collided.
fn map_write_error(err: sqlx::Error, fallback: UniqueColumn) -> UserRepoError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            let column = UniqueColumn::from_database_error(&**db_err).unwrap_or(fallback);
            warn!(column = column.column(), "Unique constraint violated");
            column.into()
        }
        _ => UserRepoError::DataAccess(err),
    }
}
