//! Vet-service endpoints
//!
//! `PUT /api/vetservices/my` is the direct entry point to reconciliation:
//! the caller's link set is replaced by exactly the submitted names.

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::repos::{VetServiceRepo, VetWithServices};
use crate::http::error::ApiError;
use crate::http::extractors::RequireVet;
use crate::http::server::AppState;
use crate::models::ServiceName;

/// Replace-my-services request
#[derive(Deserialize)]
pub struct UpdateServicesRequest {
    pub services: Vec<String>,
}

/// Reconciliation acknowledgement echoing the normalized list
#[derive(Serialize)]
pub struct UpdateServicesResponse {
    pub message: &'static str,
    pub services: Vec<String>,
}

/// Public listing entry
#[derive(Serialize)]
pub struct VetWithServicesResponse {
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

impl From<VetWithServices> for VetWithServicesResponse {
    fn from(v: VetWithServices) -> Self {
        Self {
            vet_id: v.vet_id,
            name: v.name,
            email: v.email,
            phone: v.phone,
            clinic_name: v.clinic_name,
            address: v.address,
            city: v.city,
            state: v.state,
            services: v.services,
        }
    }
}

/// PUT /api/vetservices/my - reconcile the caller's services
async fn update_my_services(
    State(state): State<Arc<AppState>>,
    RequireVet(vet): RequireVet,
    Json(req): Json<UpdateServicesRequest>,
) -> Result<Json<UpdateServicesResponse>, ApiError> {
    let names = req
        .services
        .iter()
        .map(|n| ServiceName::new(n))
        .collect::<Result<Vec<_>, _>>()?;

    VetServiceRepo::new(&state.pool).reconcile(vet.id, &names).await?;

    // Echo the normalized list: trimmed, duplicates collapsed, input order.
    let mut normalized: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        let name = name.into_string();
        if !normalized.contains(&name) {
            normalized.push(name);
        }
    }

    Ok(Json(UpdateServicesResponse {
        message: "Services updated successfully",
        services: normalized,
    }))
}

/// GET /api/vetservices/all - public vets-with-services listing
async fn list_vets_with_services(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<VetWithServicesResponse>>, ApiError> {
    let vets = VetServiceRepo::new(&state.pool).list_vets_with_services().await?;
    Ok(Json(
        vets.into_iter().map(VetWithServicesResponse::from).collect(),
    ))
}

/// Vet-service routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/vetservices/my", put(update_my_services))
        .route("/api/vetservices/all", get(list_vets_with_services))
}
