//! Vet profile repository
//!
//! Profile writes that carry a service list run the profile statement and
//! the service reconciliation in one transaction, so a failure in either
//! leaves both untouched.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::ServiceName;

use super::vet_services::reconcile_in_tx;
use super::DbError;

/// Placeholder values for the profile auto-created at vet registration.
const PLACEHOLDER_BIO: &str = "Please update your professional biography.";
const PLACEHOLDER_CLINIC: &str = "Unspecified Clinic";

/// Writable profile fields
#[derive(Debug, Clone, Default)]
pub struct VetProfileFields {
    pub bio: String,
    pub clinic_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub profile_pic_url: Option<String>,
}

/// Profile joined with user contact columns, rating average, and linked
/// service names
#[derive(Debug, Clone)]
pub struct VetProfileDetail {
    pub vet_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub bio: String,
    pub clinic_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub profile_pic_url: Option<String>,
    pub avg_rating: f64,
    pub services: Vec<String>,
}

/// Optional listing filters; substring matches, case-insensitive
#[derive(Debug, Clone, Default)]
pub struct ProfileFilters {
    pub location: Option<String>,
    pub service: Option<String>,
}

/// Vet profile repository
pub struct VetProfileRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> VetProfileRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create the placeholder profile for a freshly registered vet.
    pub async fn create_initial(&self, vet_id: Uuid) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO vet_profiles (vet_id, bio, clinic_name, address, city, state, zip_code)
            VALUES ($1, $2, $3, 'N/A', 'N/A', 'N/A', 'N/A')
            "#,
        )
        .bind(vet_id)
        .bind(PLACEHOLDER_BIO)
        .bind(PLACEHOLDER_CLINIC)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Create or replace a vet's profile, reconciling services in the same
    /// transaction when a list is supplied.
    ///
    /// Upserts because registration already created a placeholder row for
    /// the vet.
    pub async fn upsert(
        &self,
        vet_id: Uuid,
        fields: &VetProfileFields,
        services: Option<&[ServiceName]>,
    ) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO vet_profiles
                (vet_id, bio, clinic_name, address, city, state, zip_code,
                 latitude, longitude, profile_pic_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (vet_id) DO UPDATE
            SET bio = EXCLUDED.bio,
                clinic_name = EXCLUDED.clinic_name,
                address = EXCLUDED.address,
                city = EXCLUDED.city,
                state = EXCLUDED.state,
                zip_code = EXCLUDED.zip_code,
                latitude = EXCLUDED.latitude,
                longitude = EXCLUDED.longitude,
                profile_pic_url = EXCLUDED.profile_pic_url
            "#,
        )
        .bind(vet_id)
        .bind(&fields.bio)
        .bind(&fields.clinic_name)
        .bind(&fields.address)
        .bind(&fields.city)
        .bind(&fields.state)
        .bind(&fields.zip_code)
        .bind(fields.latitude)
        .bind(fields.longitude)
        .bind(fields.profile_pic_url.as_deref())
        .execute(&mut *tx)
        .await?;

        if let Some(names) = services {
            reconcile_in_tx(&mut tx, vet_id, names).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Update an existing profile, reconciling services in the same
    /// transaction when a list is supplied.
    pub async fn update(
        &self,
        vet_id: Uuid,
        fields: &VetProfileFields,
        services: Option<&[ServiceName]>,
    ) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE vet_profiles
            SET bio = $2,
                clinic_name = $3,
                address = $4,
                city = $5,
                state = $6,
                zip_code = $7,
                latitude = $8,
                longitude = $9,
                profile_pic_url = $10
            WHERE vet_id = $1
            "#,
        )
        .bind(vet_id)
        .bind(&fields.bio)
        .bind(&fields.clinic_name)
        .bind(&fields.address)
        .bind(&fields.city)
        .bind(&fields.state)
        .bind(&fields.zip_code)
        .bind(fields.latitude)
        .bind(fields.longitude)
        .bind(fields.profile_pic_url.as_deref())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: "vet profile",
                id: vet_id.to_string(),
            });
        }

        if let Some(names) = services {
            reconcile_in_tx(&mut tx, vet_id, names).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Get a single profile with services and rating average.
    pub async fn get(&self, vet_id: Uuid) -> Result<VetProfileDetail, DbError> {
        let row = sqlx::query(&detail_query("u.user_id = $1"))
            .bind(vet_id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::NotFound {
                resource: "vet profile",
                id: vet_id.to_string(),
            })?;

        Ok(map_detail_row(&row))
    }

    /// List profiles, optionally filtered by location or offered service.
    pub async fn list(&self, filters: &ProfileFilters) -> Result<Vec<VetProfileDetail>, DbError> {
        let location = filters.location.as_deref().map(|t| format!("%{t}%"));
        let service = filters.service.as_deref().map(|t| format!("%{t}%"));

        let rows = sqlx::query(&detail_query(
            r#"($1::TEXT IS NULL
                OR vp.city ILIKE $1 OR vp.state ILIKE $1 OR vp.clinic_name ILIKE $1)
            AND ($2::TEXT IS NULL OR EXISTS (
                SELECT 1
                FROM vet_services fvs
                JOIN services fs ON fs.service_id = fvs.service_id
                WHERE fvs.vet_id = u.user_id AND fs.name ILIKE $2))"#,
        ))
        .bind(location)
        .bind(service)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.iter().map(map_detail_row).collect())
    }
}

/// Shared SELECT for detail/list; `predicate` narrows beyond the vet role.
fn detail_query(predicate: &str) -> String {
    format!(
        r#"
        SELECT
            u.user_id AS vet_id,
            u.name,
            u.email,
            u.phone,
            vp.bio,
            vp.clinic_name,
            vp.address,
            vp.city,
            vp.state,
            vp.zip_code,
            vp.latitude,
            vp.longitude,
            vp.profile_pic_url,
            COALESCE(r.avg_rating, 0) AS avg_rating,
            COALESCE(sv.names, ARRAY[]::TEXT[]) AS services
        FROM users u
        JOIN vet_profiles vp ON vp.vet_id = u.user_id
        LEFT JOIN (
            SELECT vet_id, AVG(rating)::DOUBLE PRECISION AS avg_rating
            FROM reviews
            GROUP BY vet_id
        ) r ON r.vet_id = u.user_id
        LEFT JOIN (
            SELECT vs.vet_id, ARRAY_AGG(s.name ORDER BY s.name) AS names
            FROM vet_services vs
            JOIN services s ON s.service_id = vs.service_id
            GROUP BY vs.vet_id
        ) sv ON sv.vet_id = u.user_id
        WHERE u.role = 'vet' AND {predicate}
        ORDER BY u.name
        "#
    )
}

fn map_detail_row(row: &PgRow) -> VetProfileDetail {
    VetProfileDetail {
        vet_id: row.get("vet_id"),
        name: row.get("name"),
        email: row.get("email"),
        phone: row.get("phone"),
        bio: row.get("bio"),
        clinic_name: row.get("clinic_name"),
        address: row.get("address"),
        city: row.get("city"),
        state: row.get("state"),
        zip_code: row.get("zip_code"),
        latitude: row.get("latitude"),
        longitude: row.get("longitude"),
        profile_pic_url: row.get("profile_pic_url"),
        avg_rating: row.get("avg_rating"),
        services: row.get("services"),
    }
}
