//! Vet-service link repository
//!
//! Owns the `vet_services` linking table. The central operation is
//! `reconcile`: make the link set for a vet exactly match a submitted list
//! of service names, creating missing catalog rows on the way, all inside
//! one transaction.

use std::collections::HashSet;

use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

use crate::models::ServiceName;

use super::DbError;

/// Vet row for the public vets-with-services listing
#[derive(Debug, Clone)]
pub struct VetWithServices {
    pub vet_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub clinic_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub services: Vec<String>,
}

/// Vet-service link repository
pub struct VetServiceRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> VetServiceRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Replace the link set for a vet with exactly the submitted names.
    ///
    /// Runs in its own transaction: either the full new link set is visible
    /// or the previous one is left untouched. Duplicate names collapse to a
    /// single link. An empty list clears all links without touching the
    /// catalog.
    ///
    /// Two concurrent calls for the same vet are not serialized against each
    /// other; last commit wins.
    pub async fn reconcile(&self, vet_id: Uuid, names: &[ServiceName]) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;
        reconcile_in_tx(&mut tx, vet_id, names).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Service names currently linked to a vet.
    pub async fn names_for_vet(&self, vet_id: Uuid) -> Result<Vec<String>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT s.name
            FROM vet_services vs
            JOIN services s ON s.service_id = vs.service_id
            WHERE vs.vet_id = $1
            ORDER BY s.name
            "#,
        )
        .bind(vet_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.get("name")).collect())
    }

    /// Public listing: every vet with contact columns and their linked
    /// service names, aggregated in a single query.
    pub async fn list_vets_with_services(&self) -> Result<Vec<VetWithServices>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT
                u.user_id AS vet_id,
                u.name,
                u.email,
                u.phone,
                vp.clinic_name,
                vp.address,
                vp.city,
                vp.state,
                COALESCE(sv.names, ARRAY[]::TEXT[]) AS services
            FROM users u
            LEFT JOIN vet_profiles vp ON vp.vet_id = u.user_id
            LEFT JOIN (
                SELECT vs.vet_id, ARRAY_AGG(s.name ORDER BY s.name) AS names
                FROM vet_services vs
                JOIN services s ON s.service_id = vs.service_id
                GROUP BY vs.vet_id
            ) sv ON sv.vet_id = u.user_id
            WHERE u.role = 'vet'
            ORDER BY u.name
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| VetWithServices {
                vet_id: r.get("vet_id"),
                name: r.get("name"),
                email: r.get("email"),
                phone: r.get("phone"),
                clinic_name: r.get("clinic_name"),
                address: r.get("address"),
                city: r.get("city"),
                state: r.get("state"),
                services: r.get("services"),
            })
            .collect())
    }
}

/// Transaction-scoped reconciliation.
///
/// Exposed separately so profile create/update can run it inside their own
/// transaction alongside the profile write. Steps: delete all existing links
/// for the vet, then for each distinct name look up the catalog row by exact
/// (trimmed, case-sensitive) match, creating it with a fresh id if absent,
/// and insert the link.
pub async fn reconcile_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    vet_id: Uuid,
    names: &[ServiceName],
) -> Result<(), DbError> {
    sqlx::query("DELETE FROM vet_services WHERE vet_id = $1")
        .bind(vet_id)
        .execute(&mut **tx)
        .await?;

    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name.as_str()) {
            continue;
        }

        let existing = sqlx::query("SELECT service_id FROM services WHERE name = $1")
            .bind(name.as_str())
            .fetch_optional(&mut **tx)
            .await?;

        let service_id: Uuid = match existing {
            Some(row) => row.get("service_id"),
            None => {
                let service_id = Uuid::new_v4();
                sqlx::query(
                    "INSERT INTO services (service_id, name, description) VALUES ($1, $2, NULL)",
                )
                .bind(service_id)
                .bind(name.as_str())
                .execute(&mut **tx)
                .await?;
                service_id
            }
        };

        sqlx::query("INSERT INTO vet_services (vet_id, service_id) VALUES ($1, $2)")
            .bind(vet_id)
            .bind(service_id)
            .execute(&mut **tx)
            .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations;
    use crate::db::pool::create_pool;
    use crate::db::repos::{NewUser, UserRepo};

    async fn test_pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool(&url).await.expect("pool creation failed");
        migrations::run(&pool).await.expect("migrations failed");
        pool
    }

    async fn seed_vet(pool: &PgPool) -> Uuid {
        let vet_id = Uuid::new_v4();
        UserRepo::new(pool)
            .create(NewUser {
                user_id: vet_id,
                name: "Dr. Test".into(),
                email: format!("{}@example.com", vet_id),
                password_hash: "not-a-real-hash".into(),
                role: "vet".into(),
                phone: None,
            })
            .await
            .expect("seed vet");
        vet_id
    }

    /// Unique names per test run so reruns against a shared database don't
    /// collide on the catalog's unique constraint.
    fn unique_name(label: &str) -> ServiceName {
        ServiceName::new(&format!("{label} {}", Uuid::new_v4())).unwrap()
    }

    async fn catalog_count(pool: &PgPool, name: &str) -> i64 {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM services WHERE name = $1")
            .bind(name)
            .fetch_one(pool)
            .await
            .expect("count query");
        count
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn reconcile_matches_submitted_set() {
        let pool = test_pool().await;
        let repo = VetServiceRepo::new(&pool);
        let vet = seed_vet(&pool).await;

        let a = unique_name("Vaccination");
        let b = unique_name("Grooming");
        repo.reconcile(vet, &[a.clone(), b.clone()]).await.expect("reconcile");

        let mut expected = vec![a.as_str().to_owned(), b.as_str().to_owned()];
        expected.sort();
        assert_eq!(repo.names_for_vet(vet).await.expect("names"), expected);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn reconcile_empty_clears_links_without_touching_catalog() {
        let pool = test_pool().await;
        let repo = VetServiceRepo::new(&pool);
        let vet = seed_vet(&pool).await;

        let a = unique_name("Surgery");
        repo.reconcile(vet, &[a.clone()]).await.expect("seed links");
        assert_eq!(repo.names_for_vet(vet).await.expect("names").len(), 1);

        repo.reconcile(vet, &[]).await.expect("clear");
        assert!(repo.names_for_vet(vet).await.expect("names").is_empty());
        // The catalog row created earlier survives the clear.
        assert_eq!(catalog_count(&pool, a.as_str()).await, 1);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn duplicate_names_collapse_to_one_link_and_one_catalog_row() {
        let pool = test_pool().await;
        let repo = VetServiceRepo::new(&pool);
        let vet = seed_vet(&pool).await;

        let a = unique_name("Dental");
        repo.reconcile(vet, &[a.clone(), a.clone()]).await.expect("reconcile");

        assert_eq!(
            repo.names_for_vet(vet).await.expect("names"),
            vec![a.as_str().to_owned()]
        );
        assert_eq!(catalog_count(&pool, a.as_str()).await, 1);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn second_reconcile_replaces_first() {
        let pool = test_pool().await;
        let repo = VetServiceRepo::new(&pool);
        let vet = seed_vet(&pool).await;

        let a = unique_name("Checkup");
        let b = unique_name("X-Ray");
        repo.reconcile(vet, &[a]).await.expect("first");
        repo.reconcile(vet, &[b.clone()]).await.expect("second");

        assert_eq!(
            repo.names_for_vet(vet).await.expect("names"),
            vec![b.as_str().to_owned()]
        );
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn reconcile_reuses_existing_catalog_rows() {
        let pool = test_pool().await;
        let repo = VetServiceRepo::new(&pool);
        let first = seed_vet(&pool).await;
        let second = seed_vet(&pool).await;

        let a = unique_name("Microchipping");
        repo.reconcile(first, &[a.clone()]).await.expect("first vet");
        repo.reconcile(second, &[a.clone()]).await.expect("second vet");

        assert_eq!(catalog_count(&pool, a.as_str()).await, 1);
        assert_eq!(
            repo.names_for_vet(second).await.expect("names"),
            vec![a.as_str().to_owned()]
        );
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn rolled_back_reconcile_leaves_prior_links_intact() {
        let pool = test_pool().await;
        let repo = VetServiceRepo::new(&pool);
        let vet = seed_vet(&pool).await;

        let a = unique_name("Boarding");
        repo.reconcile(vet, &[a.clone()]).await.expect("seed links");
        let before = repo.names_for_vet(vet).await.expect("names");

        // Run the delete+insert sequence but drop the transaction instead of
        // committing, as a failure mid-call would.
        let mut tx = pool.begin().await.expect("begin");
        reconcile_in_tx(&mut tx, vet, &[unique_name("Never-Committed")])
            .await
            .expect("uncommitted reconcile");
        drop(tx);

        assert_eq!(repo.names_for_vet(vet).await.expect("names"), before);
    }
}
