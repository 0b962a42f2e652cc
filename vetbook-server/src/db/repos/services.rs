//! Service catalog repository

use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::ServiceName;

use super::DbError;

/// Catalog row
#[derive(Debug, Clone, FromRow)]
pub struct Service {
    pub service_id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

/// Service catalog repository
pub struct ServiceRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ServiceRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List the whole catalog.
    pub async fn list(&self) -> Result<Vec<Service>, DbError> {
        let services = sqlx::query_as(
            r#"
            SELECT service_id, name, description
            FROM services
            ORDER BY name
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(services)
    }

    /// Insert a catalog row (system-level create).
    ///
    /// A duplicate name surfaces as a unique-constraint database error.
    pub async fn create(
        &self,
        name: &ServiceName,
        description: Option<&str>,
    ) -> Result<Service, DbError> {
        let service = sqlx::query_as(
            r#"
            INSERT INTO services (service_id, name, description)
            VALUES ($1, $2, $3)
            RETURNING service_id, name, description
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name.as_str())
        .bind(description)
        .fetch_one(self.pool)
        .await?;

        Ok(service)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations;
    use crate::db::pool::create_pool;

    #[tokio::test]
    #[ignore = "requires database"]
    async fn duplicate_catalog_name_is_rejected() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool(&url).await.expect("pool creation failed");
        migrations::run(&pool).await.expect("migrations failed");
        let repo = ServiceRepo::new(&pool);

        let name = ServiceName::new(&format!("Acupuncture {}", Uuid::new_v4())).unwrap();
        repo.create(&name, Some("needle therapy")).await.expect("first insert");

        let err = repo.create(&name, None).await.expect_err("duplicate must fail");
        let DbError::Sqlx(sqlx_err) = err else {
            panic!("expected a database error, got {err:?}");
        };
        assert_eq!(
            sqlx_err.as_database_error().and_then(|e| e.code()).as_deref(),
            Some("23505")
        );
    }
}
