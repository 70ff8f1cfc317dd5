use async_trait::async_trait;
use deadpool_postgres::Pool;
use tokio_postgres::Row;
use uuid::Uuid;
use crate::{
    error::{AppError, Result},
    models::user::User,
};

/// The record store every component reads and writes users through.
///
/// "Not found" is a normal outcome (`Ok(None)`), not an error; implementations
/// only fail when the store itself is unavailable.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Finds a user by mobile number.
    async fn find_by_mobile(&self, mobile: &str) -> Result<Option<User>>;

    /// Finds a user by mobile number and case-insensitive email.
    async fn find_by_mobile_and_email(&self, mobile: &str, email: &str) -> Result<Option<User>>;

    /// Finds the user holding any entitlement created under the given order.
    async fn find_by_order_id(&self, order_id: &str) -> Result<Option<User>>;

    /// Finds a user by id.
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>>;

    /// Inserts a new user.
    async fn create(&self, user: &User) -> Result<()>;

    /// Writes the full user record back.
    async fn save(&self, user: &User) -> Result<()>;
}

/// The production `UserStore` over PostgreSQL. Entitlements and legacy
/// scalars live in JSONB columns on the users row.
pub struct PgUserStore {
    pool: Pool,
}

impl PgUserStore {
    /// Creates a new `PgUserStore` over a connection pool.
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

/// A helper function to map a `tokio_postgres::Row` to a `User`.
fn row_to_user(row: &Row) -> Result<User> {
    let courses: serde_json::Value = row
        .try_get("courses")
        .map_err(|_| AppError::Storage("missing column: courses".to_string()))?;
    let legacy: serde_json::Value = row
        .try_get("legacy")
        .map_err(|_| AppError::Storage("missing column: legacy".to_string()))?;

    Ok(User {
        id: row.try_get("id").map_err(|_| AppError::Storage("missing column: id".to_string()))?,
        name: row.try_get("name").map_err(|_| AppError::Storage("missing column: name".to_string()))?,
        email: row.try_get("email").map_err(|_| AppError::Storage("missing column: email".to_string()))?,
        mobile: row.try_get("mobile").map_err(|_| AppError::Storage("missing column: mobile".to_string()))?,
        center: row.try_get("center").map_err(|_| AppError::Storage("missing column: center".to_string()))?,
        session_token: row.try_get("session_token").map_err(|_| AppError::Storage("missing column: session_token".to_string()))?,
        courses: serde_json::from_value(courses)
            .map_err(|e| AppError::Storage(format!("bad courses payload: {}", e)))?,
        legacy: serde_json::from_value(legacy)
            .map_err(|e| AppError::Storage(format!("bad legacy payload: {}", e)))?,
        created_at: row.try_get("created_at").map_err(|_| AppError::Storage("missing column: created_at".to_string()))?,
        updated_at: row.try_get("updated_at").map_err(|_| AppError::Storage("missing column: updated_at".to_string()))?,
    })
}

fn courses_json(user: &User) -> Result<serde_json::Value> {
    serde_json::to_value(&user.courses)
        .map_err(|e| AppError::Storage(format!("courses serialization failed: {}", e)))
}

fn legacy_json(user: &User) -> Result<serde_json::Value> {
    serde_json::to_value(&user.legacy)
        .map_err(|e| AppError::Storage(format!("legacy serialization failed: {}", e)))
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_mobile(&self, mobile: &str) -> Result<Option<User>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                r#"
                SELECT *
                FROM users
                WHERE mobile = $1
                "#,
                &[&mobile],
            )
            .await?;
        row.map(|r| row_to_user(&r)).transpose()
    }

    async fn find_by_mobile_and_email(&self, mobile: &str, email: &str) -> Result<Option<User>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                r#"
                SELECT *
                FROM users
                WHERE mobile = $1 AND lower(email) = lower($2)
                "#,
                &[&mobile, &email],
            )
            .await?;
        row.map(|r| row_to_user(&r)).transpose()
    }

    async fn find_by_order_id(&self, order_id: &str) -> Result<Option<User>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                r#"
                SELECT *
                FROM users
                WHERE courses @> jsonb_build_array(jsonb_build_object('order_id', $1::text))
                "#,
                &[&order_id],
            )
            .await?;
        row.map(|r| row_to_user(&r)).transpose()
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                r#"
                SELECT *
                FROM users
                WHERE id = $1
                "#,
                &[id],
            )
            .await?;
        row.map(|r| row_to_user(&r)).transpose()
    }

    async fn create(&self, user: &User) -> Result<()> {
        let courses = courses_json(user)?;
        let legacy = legacy_json(user)?;
        let client = self.pool.get().await?;
        client
            .execute(
                r#"
                INSERT INTO users (id, name, email, mobile, center, session_token,
                                   courses, legacy, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                "#,
                &[
                    &user.id,
                    &user.name,
                    &user.email,
                    &user.mobile,
                    &user.center,
                    &user.session_token,
                    &courses,
                    &legacy,
                    &user.created_at,
                    &user.updated_at,
                ],
            )
            .await?;
        Ok(())
    }

    async fn save(&self, user: &User) -> Result<()> {
        let courses = courses_json(user)?;
        let legacy = legacy_json(user)?;
        let client = self.pool.get().await?;
        client
            .execute(
                r#"
                UPDATE users
                SET
                    name = $1,
                    email = $2,
                    center = $3,
                    session_token = $4,
                    courses = $5,
                    legacy = $6,
                    updated_at = NOW()
                WHERE id = $7
                "#,
                &[
                    &user.name,
                    &user.email,
                    &user.center,
                    &user.session_token,
                    &courses,
                    &legacy,
                    &user.id,
                ],
            )
            .await?;
        Ok(())
    }
}
