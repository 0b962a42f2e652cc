//! Service catalog endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::repos::{Service, ServiceRepo};
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::models::ServiceName;

/// Create service request
#[derive(Deserialize)]
pub struct CreateServiceRequest {
    pub name: String,
    pub description: Option<String>,
}

/// Service response
#[derive(Serialize)]
pub struct ServiceResponse {
    pub service_id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

impl From<Service> for ServiceResponse {
    fn from(s: Service) -> Self {
        Self {
            service_id: s.service_id,
            name: s.name,
            description: s.description,
        }
    }
}

/// GET /api/services - list the catalog
async fn list_services(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ServiceResponse>>, ApiError> {
    let services = ServiceRepo::new(&state.pool).list().await?;
    Ok(Json(services.into_iter().map(ServiceResponse::from).collect()))
}

/// POST /api/services - add a catalog entry
async fn create_service(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateServiceRequest>,
) -> Result<(StatusCode, Json<ServiceResponse>), ApiError> {
    let name = ServiceName::new(&req.name)?;
    let service = ServiceRepo::new(&state.pool)
        .create(&name, req.description.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(ServiceResponse::from(service))))
}

/// Service catalog routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/services", get(list_services).post(create_service))
}
