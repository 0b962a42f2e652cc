//! Appointment repository
//!
//! One canonical schema: a single `scheduled_time` timestamp and a
//! `client_id` column, with nullable deposit fields filled in by the
//! payment flow.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::AppointmentStatus;

use super::DbError;

/// Appointment row
#[derive(Debug, Clone, FromRow)]
pub struct Appointment {
    pub appointment_id: Uuid,
    pub vet_id: Uuid,
    pub client_id: Uuid,
    pub service_id: Option<Uuid>,
    pub scheduled_time: DateTime<Utc>,
    pub status: String,
    pub deposit_amount: Option<f64>,
    pub transaction_id: Option<String>,
    pub description: Option<String>,
    pub client_phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Appointment row joined with display names for list views
#[derive(Debug, Clone, FromRow)]
pub struct AppointmentWithNames {
    pub appointment_id: Uuid,
    pub vet_id: Uuid,
    pub client_id: Uuid,
    pub service_id: Option<Uuid>,
    pub scheduled_time: DateTime<Utc>,
    pub status: String,
    pub vet_name: String,
    pub client_name: String,
    pub service_name: Option<String>,
}

/// Fields for a plain booking
#[derive(Debug)]
pub struct NewAppointment {
    pub vet_id: Uuid,
    pub client_id: Uuid,
    pub service_id: Option<Uuid>,
    pub scheduled_time: DateTime<Utc>,
    pub status: AppointmentStatus,
}

/// Fields for a deposit-paid booking recorded by the payment flow
#[derive(Debug)]
pub struct DepositBooking {
    pub vet_id: Uuid,
    pub client_id: Uuid,
    pub scheduled_time: DateTime<Utc>,
    pub deposit_amount: f64,
    pub description: Option<String>,
    pub transaction_id: String,
    pub client_phone: String,
}

const LIST_COLUMNS: &str = r#"
    a.appointment_id,
    a.vet_id,
    a.client_id,
    a.service_id,
    a.scheduled_time,
    a.status,
    v.name AS vet_name,
    c.name AS client_name,
    s.name AS service_name
"#;

/// Appointment repository
pub struct AppointmentRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> AppointmentRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a booking, returning its id.
    ///
    /// An unknown vet, client, or service surfaces as a foreign-key database
    /// error for the HTTP layer to classify; nothing is inserted.
    pub async fn create(&self, appointment: NewAppointment) -> Result<Uuid, DbError> {
        let appointment_id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO appointments
                (appointment_id, vet_id, client_id, service_id, scheduled_time, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(appointment_id)
        .bind(appointment.vet_id)
        .bind(appointment.client_id)
        .bind(appointment.service_id)
        .bind(appointment.scheduled_time)
        .bind(appointment.status.as_str())
        .execute(self.pool)
        .await?;

        Ok(appointment_id)
    }

    /// Insert a confirmed booking carrying the simulated deposit record.
    pub async fn create_confirmed_with_deposit(
        &self,
        booking: DepositBooking,
    ) -> Result<Uuid, DbError> {
        let appointment_id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO appointments
                (appointment_id, vet_id, client_id, service_id, scheduled_time, status,
                 deposit_amount, description, transaction_id, client_phone)
            VALUES ($1, $2, $3, NULL, $4, 'confirmed', $5, $6, $7, $8)
            "#,
        )
        .bind(appointment_id)
        .bind(booking.vet_id)
        .bind(booking.client_id)
        .bind(booking.scheduled_time)
        .bind(booking.deposit_amount)
        .bind(booking.description.as_deref())
        .bind(&booking.transaction_id)
        .bind(&booking.client_phone)
        .execute(self.pool)
        .await?;

        Ok(appointment_id)
    }

    /// List every appointment with vet/client display names (admin view).
    pub async fn list_all(&self) -> Result<Vec<AppointmentWithNames>, DbError> {
        let rows = sqlx::query_as(&format!(
            r#"
            SELECT {LIST_COLUMNS}
            FROM appointments a
            JOIN users v ON v.user_id = a.vet_id
            JOIN users c ON c.user_id = a.client_id
            LEFT JOIN services s ON s.service_id = a.service_id
            ORDER BY a.scheduled_time DESC
            "#
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Appointments booked by a client.
    pub async fn list_for_client(
        &self,
        client_id: Uuid,
    ) -> Result<Vec<AppointmentWithNames>, DbError> {
        let rows = sqlx::query_as(&format!(
            r#"
            SELECT {LIST_COLUMNS}
            FROM appointments a
            JOIN users v ON v.user_id = a.vet_id
            JOIN users c ON c.user_id = a.client_id
            LEFT JOIN services s ON s.service_id = a.service_id
            WHERE a.client_id = $1
            ORDER BY a.scheduled_time DESC
            "#
        ))
        .bind(client_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Appointments scheduled with a vet.
    pub async fn list_for_vet(&self, vet_id: Uuid) -> Result<Vec<AppointmentWithNames>, DbError> {
        let rows = sqlx::query_as(&format!(
            r#"
            SELECT {LIST_COLUMNS}
            FROM appointments a
            JOIN users v ON v.user_id = a.vet_id
            JOIN users c ON c.user_id = a.client_id
            LEFT JOIN services s ON s.service_id = a.service_id
            WHERE a.vet_id = $1
            ORDER BY a.scheduled_time DESC
            "#
        ))
        .bind(vet_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Move a booking to a new status.
    pub async fn update_status(
        &self,
        appointment_id: Uuid,
        status: AppointmentStatus,
    ) -> Result<(), DbError> {
        let result = sqlx::query("UPDATE appointments SET status = $2 WHERE appointment_id = $1")
            .bind(appointment_id)
            .bind(status.as_str())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: "appointment",
                id: appointment_id.to_string(),
            });
        }

        Ok(())
    }

    /// Delete a booking.
    pub async fn delete(&self, appointment_id: Uuid) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM appointments WHERE appointment_id = $1")
            .bind(appointment_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: "appointment",
                id: appointment_id.to_string(),
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
    use crate::db::repos::{NewUser, UserRepo};

    async fn test_pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool(&url).await.expect("pool creation failed");
        migrations::run(&pool).await.expect("migrations failed");
        pool
    }

    async fn seed_user(pool: &PgPool, role: &str) -> Uuid {
        let user_id = Uuid::new_v4();
        UserRepo::new(pool)
            .create(NewUser {
                user_id,
                name: format!("Seeded {role}"),
                email: format!("{}@example.com", user_id),
                password_hash: "not-a-real-hash".into(),
                role: role.into(),
                phone: None,
            })
            .await
            .expect("seed user");
        user_id
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn unknown_vet_is_a_foreign_key_error_and_inserts_nothing() {
        let pool = test_pool().await;
        let repo = AppointmentRepo::new(&pool);
        let client = seed_user(&pool, "client").await;
        let missing_vet = Uuid::new_v4();

        let err = repo
            .create(NewAppointment {
                vet_id: missing_vet,
                client_id: client,
                service_id: None,
                scheduled_time: Utc::now(),
                status: AppointmentStatus::Pending,
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

        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM appointments WHERE vet_id = $1")
                .bind(missing_vet)
                .fetch_one(&pool)
                .await
                .expect("count query");
        assert_eq!(count, 0);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn status_transition_and_not_found_discipline() {
        let pool = test_pool().await;
        let repo = AppointmentRepo::new(&pool);
        let vet = seed_user(&pool, "vet").await;
        let client = seed_user(&pool, "client").await;

        let id = repo
            .create(NewAppointment {
                vet_id: vet,
                client_id: client,
                service_id: None,
                scheduled_time: Utc::now(),
                status: AppointmentStatus::Pending,
            })
            .await
            .expect("create");

        repo.update_status(id, AppointmentStatus::Confirmed)
            .await
            .expect("update");

        let listed = repo.list_for_client(client).await.expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].status, "confirmed");
        assert_eq!(listed[0].appointment_id, id);

        let err = repo
            .update_status(Uuid::new_v4(), AppointmentStatus::Canceled)
            .await
            .expect_err("missing row must fail");
        assert!(matches!(
            err,
            DbError::NotFound {
                resource: "appointment",
                ..
            }
        ));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn deposit_booking_is_recorded_confirmed() {
        let pool = test_pool().await;
        let repo = AppointmentRepo::new(&pool);
        let vet = seed_user(&pool, "vet").await;
        let client = seed_user(&pool, "client").await;

        let id = repo
            .create_confirmed_with_deposit(DepositBooking {
                vet_id: vet,
                client_id: client,
                scheduled_time: Utc::now(),
                deposit_amount: 25.0,
                description: Some("Deposit for checkup".into()),
                transaction_id: "TXN-test".into(),
                client_phone: "555-0100".into(),
            })
            .await
            .expect("create");

        let row: Appointment = sqlx::query_as(
            "SELECT * FROM appointments WHERE appointment_id = $1",
        )
        .bind(id)
        .fetch_one(&pool)
        .await
        .expect("fetch");

        assert_eq!(row.status, "confirmed");
        assert_eq!(row.deposit_amount, Some(25.0));
        assert_eq!(row.transaction_id.as_deref(), Some("TXN-test"));
        assert!(row.service_id.is_none());
    }
}
