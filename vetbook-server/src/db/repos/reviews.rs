//! Review repository

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::Rating;

use super::DbError;

/// Review row
#[derive(Debug, Clone, FromRow)]
pub struct Review {
    pub review_id: Uuid,
    pub vet_id: Uuid,
    pub client_id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Fields for a new review
#[derive(Debug)]
pub struct NewReview {
    pub vet_id: Uuid,
    pub client_id: Uuid,
    pub rating: Rating,
    pub comment: String,
}

/// Review repository
pub struct ReviewRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all reviews, newest first.
    pub async fn list(&self) -> Result<Vec<Review>, DbError> {
        let reviews = sqlx::query_as(
            r#"
            SELECT review_id, vet_id, client_id, rating, comment, created_at
            FROM reviews
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(reviews)
    }

    /// Insert a review, returning its id.
    ///
    /// An unknown vet or client surfaces as a foreign-key database error.
    pub async fn create(&self, review: NewReview) -> Result<Uuid, DbError> {
        let review_id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO reviews (review_id, vet_id, client_id, rating, comment)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(review_id)
        .bind(review.vet_id)
        .bind(review.client_id)
        .bind(review.rating.value())
        .bind(&review.comment)
        .execute(self.pool)
        .await?;

        Ok(review_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations;
    use crate::db::pool::create_pool;
    use crate::db::repos::{NewUser, UserRepo};

    #[tokio::test]
    #[ignore = "requires database"]
    async fn review_for_unknown_vet_is_a_foreign_key_error() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool(&url).await.expect("pool creation failed");
        migrations::run(&pool).await.expect("migrations failed");

        let client_id = Uuid::new_v4();
        UserRepo::new(&pool)
            .create(NewUser {
                user_id: client_id,
                name: "Reviewer".into(),
                email: format!("{}@example.com", client_id),
                password_hash: "not-a-real-hash".into(),
                role: "client".into(),
                phone: None,
            })
            .await
            .expect("seed client");

        let err = ReviewRepo::new(&pool)
            .create(NewReview {
                vet_id: Uuid::new_v4(),
                client_id,
                rating: Rating::new(5).unwrap(),
                comment: "Great care".into(),
            })
            .await
            .expect_err("insert must fail");

        let DbError::Sqlx(sqlx_err) = err else {
            panic!("expected a database error, got {err:?}");
        };
        assert_eq!(
            sqlx_err.as_database_error().and_then(|e| e.code()).as_deref(),
            Some("23503")
        );
    }
}
