//! Simulated deposit endpoint
//!
//! No real gateway is involved: the "transaction" always succeeds, and the
//! booking is recorded as confirmed with the deposit details attached.

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::repos::{AppointmentRepo, DepositBooking};
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::models::ValidationError;

/// Deposit request
#[derive(Deserialize)]
pub struct DepositRequest {
    pub client_id: Uuid,
    pub vet_id: Uuid,
    pub amount: f64,
    /// Accepted but unused by the simulation
    pub currency: Option<String>,
    pub description: Option<String>,
    pub client_phone: String,
    pub appointment_time: DateTime<Utc>,
}

/// Simulated gateway result
#[derive(Serialize)]
pub struct DepositResponse {
    pub transaction_id: String,
    pub status: &'static str,
    pub message: &'static str,
}

/// POST /api/payments/deposit - take a deposit and confirm the booking
async fn process_deposit(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DepositRequest>,
) -> Result<Json<DepositResponse>, ApiError> {
    if req.client_phone.trim().is_empty() {
        return Err(ValidationError::Empty {
            field: "client_phone",
        }
        .into());
    }
    if req.amount <= 0.0 {
        return Err(ValidationError::OutOfRange {
            field: "amount",
            min: 1,
            max: i64::MAX,
        }
        .into());
    }

    // Where a real gateway call would go; the simulated deposit is always
    // instantly successful.
    let transaction_id = format!(
        "TXN-{}-{}",
        Utc::now().timestamp_millis(),
        &req.vet_id.simple().to_string()[..4]
    );

    AppointmentRepo::new(&state.pool)
        .create_confirmed_with_deposit(DepositBooking {
            vet_id: req.vet_id,
            client_id: req.client_id,
            scheduled_time: req.appointment_time,
            deposit_amount: req.amount,
            description: req.description,
            transaction_id: transaction_id.clone(),
            client_phone: req.client_phone.trim().to_owned(),
        })
        .await?;

    tracing::info!(%transaction_id, "deposit recorded and booking confirmed");

    Ok(Json(DepositResponse {
        transaction_id,
        status: "completed",
        message: "Deposit processed successfully and booking is confirmed.",
    }))
}

/// Payment routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/payments/deposit", post(process_deposit))
}
