//! Database migrations
//!
//! Idempotent table and index creation, run at startup before the server
//! accepts traffic. Ids are generated by the application (UUID v4), not the
//! database.

use sqlx::PgPool;

use super::repos::DbError;

/// Run all migrations.
pub async fn run(pool: &PgPool) -> Result<(), DbError> {
    tracing::info!("Running migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            user_id UUID PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            role TEXT NOT NULL CHECK (role IN ('vet', 'client')),
            phone TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS vet_profiles (
            vet_id UUID PRIMARY KEY REFERENCES users(user_id) ON DELETE CASCADE,
            bio TEXT NOT NULL DEFAULT '',
            clinic_name TEXT NOT NULL DEFAULT '',
            address TEXT NOT NULL DEFAULT '',
            city TEXT NOT NULL DEFAULT '',
            state TEXT NOT NULL DEFAULT '',
            zip_code TEXT NOT NULL DEFAULT '',
            latitude DOUBLE PRECISION NOT NULL DEFAULT 0,
            longitude DOUBLE PRECISION NOT NULL DEFAULT 0,
            profile_pic_url TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS services (
            service_id UUID PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            description TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS vet_services (
            vet_id UUID NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
            service_id UUID NOT NULL REFERENCES services(service_id) ON DELETE CASCADE,
            PRIMARY KEY (vet_id, service_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS appointments (
            appointment_id UUID PRIMARY KEY,
            vet_id UUID NOT NULL REFERENCES users(user_id),
            client_id UUID NOT NULL REFERENCES users(user_id),
            service_id UUID REFERENCES services(service_id),
            scheduled_time TIMESTAMPTZ NOT NULL,
            status TEXT NOT NULL DEFAULT 'pending'
                CHECK (status IN ('pending', 'confirmed', 'completed', 'canceled')),
            deposit_amount DOUBLE PRECISION,
            transaction_id TEXT,
            description TEXT,
            client_phone TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reviews (
            review_id UUID PRIMARY KEY,
            vet_id UUID NOT NULL REFERENCES users(user_id),
            client_id UUID NOT NULL REFERENCES users(user_id),
            rating INT NOT NULL CHECK (rating BETWEEN 1 AND 5),
            comment TEXT NOT NULL DEFAULT '',
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    create_indexes(pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}

async fn create_indexes(pool: &PgPool) -> Result<(), DbError> {
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_role ON users(role)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_vet_services_vet ON vet_services(vet_id)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_appointments_vet ON appointments(vet_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_appointments_client ON appointments(client_id)")
        .execute(pool)
        .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_appointments_scheduled ON appointments(scheduled_time DESC)",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_reviews_vet ON reviews(vet_id)")
        .execute(pool)
        .await?;

    Ok(())
}
