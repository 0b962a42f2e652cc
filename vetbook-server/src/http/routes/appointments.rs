//! Appointment endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::repos::{AppointmentRepo, AppointmentWithNames, NewAppointment};
use crate::http::error::ApiError;
use crate::http::extractors::AuthUser;
use crate::http::server::AppState;
use crate::models::{AppointmentStatus, UserRole};

/// Booking request
#[derive(Deserialize)]
pub struct CreateAppointmentRequest {
    pub vet_id: Uuid,
    pub service_id: Option<Uuid>,
    pub scheduled_time: DateTime<Utc>,
}

/// Status transition request
#[derive(Deserialize)]
pub struct UpdateAppointmentRequest {
    pub status: String,
}

/// Appointment response for list views
#[derive(Serialize)]
pub struct AppointmentResponse {
    pub appointment_id: Uuid,
    pub vet_id: Uuid,
    pub client_id: Uuid,
    pub service_id: Option<Uuid>,
    pub scheduled_time: String,
    pub status: String,
    pub vet_name: String,
    pub client_name: String,
    pub service_name: Option<String>,
}

/// Booking acknowledgement
#[derive(Serialize)]
pub struct CreatedAppointmentResponse {
    pub message: &'static str,
    pub appointment_id: Uuid,
}

/// Plain acknowledgement
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl From<AppointmentWithNames> for AppointmentResponse {
    fn from(a: AppointmentWithNames) -> Self {
        Self {
            appointment_id: a.appointment_id,
            vet_id: a.vet_id,
            client_id: a.client_id,
            service_id: a.service_id,
            scheduled_time: a.scheduled_time.to_rfc3339(),
            status: a.status,
            vet_name: a.vet_name,
            client_name: a.client_name,
            service_name: a.service_name,
        }
    }
}

/// GET /api/appointments - every appointment (admin view)
async fn list_appointments(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> Result<Json<Vec<AppointmentResponse>>, ApiError> {
    let appointments = AppointmentRepo::new(&state.pool).list_all().await?;
    Ok(Json(
        appointments.into_iter().map(AppointmentResponse::from).collect(),
    ))
}

/// GET /api/appointments/my-appointments - the caller's bookings
///
/// Clients see what they booked; vets see what is booked with them.
async fn my_appointments(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Vec<AppointmentResponse>>, ApiError> {
    let repo = AppointmentRepo::new(&state.pool);
    let appointments = match user.role {
        UserRole::Client => repo.list_for_client(user.id).await?,
        UserRole::Vet => repo.list_for_vet(user.id).await?,
    };

    Ok(Json(
        appointments.into_iter().map(AppointmentResponse::from).collect(),
    ))
}

/// GET /api/appointments/vet/{vet_id} - bookings scheduled with a vet
async fn vet_appointments(
    State(state): State<Arc<AppState>>,
    Path(vet_id): Path<Uuid>,
) -> Result<Json<Vec<AppointmentResponse>>, ApiError> {
    let appointments = AppointmentRepo::new(&state.pool).list_for_vet(vet_id).await?;
    Ok(Json(
        appointments.into_iter().map(AppointmentResponse::from).collect(),
    ))
}

/// POST /api/appointments - book an appointment (caller is the client)
async fn create_appointment(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<CreatedAppointmentResponse>), ApiError> {
    let appointment_id = AppointmentRepo::new(&state.pool)
        .create(NewAppointment {
            vet_id: req.vet_id,
            client_id: user.id,
            service_id: req.service_id,
            scheduled_time: req.scheduled_time,
            status: AppointmentStatus::Pending,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedAppointmentResponse {
            message: "Appointment created successfully",
            appointment_id,
        }),
    ))
}

/// PATCH|PUT /api/appointments/{id} - move to a new status
async fn update_appointment(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateAppointmentRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let status = AppointmentStatus::parse(&req.status)?;
    AppointmentRepo::new(&state.pool).update_status(id, status).await?;

    Ok(Json(MessageResponse {
        message: "Appointment updated successfully",
    }))
}

/// DELETE /api/appointments/{id}
async fn delete_appointment(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    AppointmentRepo::new(&state.pool).delete(id).await?;

    Ok(Json(MessageResponse {
        message: "Appointment deleted successfully",
    }))
}

/// Appointment routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/appointments",
            get(list_appointments).post(create_appointment),
        )
        .route("/api/appointments/my-appointments", get(my_appointments))
        .route("/api/appointments/vet/{vet_id}", get(vet_appointments))
        .route(
            "/api/appointments/{id}",
            axum::routing::patch(update_appointment)
                .put(update_appointment)
                .delete(delete_appointment),
        )
}
