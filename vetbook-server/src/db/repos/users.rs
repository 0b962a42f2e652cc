//! User repository
//!
//! Write operations report whether a row was actually affected; a missing
//! row surfaces as `DbError::NotFound`, never as silent success.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },
}

/// User record without the password hash (safe to return to callers)
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// User record including the stored credential, for login verification
#[derive(Debug, Clone, FromRow)]
pub struct StoredUser {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub phone: Option<String>,
}

/// Fields for a new user row (hash computed by the caller)
#[derive(Debug)]
pub struct NewUser {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub phone: Option<String>,
}

/// User repository
pub struct UserRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new user row.
    ///
    /// A duplicate email surfaces as a unique-constraint database error for
    /// the HTTP layer to classify.
    pub async fn create(&self, user: NewUser) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO users (user_id, name, email, password_hash, role, phone)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.user_id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.role)
        .bind(user.phone.as_deref())
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Look up a user by email, including the stored credential.
    ///
    /// Returns `None` when absent: login treats a missing account the same
    /// as a bad password, so this is not a not-found error.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<StoredUser>, DbError> {
        let user = sqlx::query_as(
            r#"
            SELECT user_id, name, email, password_hash, role, phone
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Get a single user by id.
    pub async fn get_by_id(&self, user_id: Uuid) -> Result<User, DbError> {
        let user = sqlx::query_as(
            r#"
            SELECT user_id, name, email, role, phone, created_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound {
            resource: "user",
            id: user_id.to_string(),
        })?;

        Ok(user)
    }

    /// List all users.
    pub async fn list(&self) -> Result<Vec<User>, DbError> {
        let users = sqlx::query_as(
            r#"
            SELECT user_id, name, email, role, phone, created_at
            FROM users
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(users)
    }

    /// Update the self-service profile fields (name, phone).
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        name: &str,
        phone: Option<&str>,
    ) -> Result<(), DbError> {
        let result = sqlx::query("UPDATE users SET name = $2, phone = $3 WHERE user_id = $1")
            .bind(user_id)
            .bind(name)
            .bind(phone)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: "user",
                id: user_id.to_string(),
            });
        }

        Ok(())
    }

    /// Delete a user account.
    pub async fn delete(&self, user_id: Uuid) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: "user",
                id: user_id.to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations;
    use crate::db::pool::create_pool;

    async fn test_pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool(&url).await.expect("pool creation failed");
        migrations::run(&pool).await.expect("migrations failed");
        pool
    }

    fn sample_user(email: &str) -> NewUser {
        NewUser {
            user_id: Uuid::new_v4(),
            name: "Test User".into(),
            email: email.into(),
            password_hash: "not-a-real-hash".into(),
            role: "client".into(),
            phone: None,
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn duplicate_email_is_rejected() {
        let pool = test_pool().await;
        let repo = UserRepo::new(&pool);

        let email = format!("{}@example.com", Uuid::new_v4());
        repo.create(sample_user(&email)).await.expect("first insert");

        let err = repo
            .create(sample_user(&email))
            .await
            .expect_err("second insert must fail");

        let DbError::Sqlx(sqlx_err) = err else {
            panic!("expected a database error, got {err:?}");
        };
        let code = sqlx_err
            .as_database_error()
            .and_then(|e| e.code())
            .expect("database error code");
        assert_eq!(code, "23505");

        // The failed insert must not have created a second row.
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = $1")
            .bind(&email)
            .fetch_one(&pool)
            .await
            .expect("count query");
        assert_eq!(count, 1);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn update_of_missing_user_is_not_found() {
        let pool = test_pool().await;
        let repo = UserRepo::new(&pool);

        let err = repo
            .update_profile(Uuid::new_v4(), "Nobody", None)
            .await
            .expect_err("update of missing row must fail");
        assert!(matches!(err, DbError::NotFound { resource: "user", .. }));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn delete_reports_missing_row() {
        let pool = test_pool().await;
        let repo = UserRepo::new(&pool);

        let user = sample_user(&format!("{}@example.com", Uuid::new_v4()));
        let id = user.user_id;
        repo.create(user).await.expect("insert");

        repo.delete(id).await.expect("first delete succeeds");
        let err = repo.delete(id).await.expect_err("second delete must fail");
        assert!(matches!(err, DbError::NotFound { resource: "user", .. }));
    }
}
