//! Vet profile endpoints
//!
//! Create/update accept a `services` list and run the reconciliation inside
//! the profile transaction, so the profile row and its links never drift.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::repos::{ProfileFilters, VetProfileDetail, VetProfileFields, VetProfileRepo};
use crate::http::error::ApiError;
use crate::http::extractors::RequireVet;
use crate::http::server::AppState;
use crate::models::ServiceName;

/// Profile create/update request; omitted fields become empty
#[derive(Deserialize)]
pub struct ProfileRequest {
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub clinic_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    pub profile_pic_url: Option<String>,
    /// When present, the vet's links are reconciled to exactly this list
    pub services: Option<Vec<String>>,
}

/// Listing filters
#[derive(Deserialize, Default)]
pub struct ProfileQuery {
    pub location: Option<String>,
    pub service: Option<String>,
}

/// Profile response with nested services and rating average
#[derive(Serialize)]
pub struct VetProfileResponse {
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

/// Plain acknowledgement
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl From<VetProfileDetail> for VetProfileResponse {
    fn from(p: VetProfileDetail) -> Self {
        Self {
            vet_id: p.vet_id,
            name: p.name,
            email: p.email,
            phone: p.phone,
            bio: p.bio,
            clinic_name: p.clinic_name,
            address: p.address,
            city: p.city,
            state: p.state,
            zip_code: p.zip_code,
            latitude: p.latitude,
            longitude: p.longitude,
            profile_pic_url: p.profile_pic_url,
            avg_rating: p.avg_rating,
            services: p.services,
        }
    }
}

impl ProfileRequest {
    fn fields(&self) -> VetProfileFields {
        VetProfileFields {
            bio: self.bio.clone(),
            clinic_name: self.clinic_name.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            zip_code: self.zip_code.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            profile_pic_url: self.profile_pic_url.clone(),
        }
    }

    fn service_names(&self) -> Result<Option<Vec<ServiceName>>, ApiError> {
        self.services
            .as_deref()
            .map(|names| {
                names
                    .iter()
                    .map(|n| ServiceName::new(n))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(ApiError::from)
            })
            .transpose()
    }
}

/// GET /api/vetprofile - list profiles, optionally filtered
async fn list_profiles(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProfileQuery>,
) -> Result<Json<Vec<VetProfileResponse>>, ApiError> {
    let filters = ProfileFilters {
        location: query.location,
        service: query.service,
    };
    let profiles = VetProfileRepo::new(&state.pool).list(&filters).await?;
    Ok(Json(profiles.into_iter().map(VetProfileResponse::from).collect()))
}

/// GET /api/vetprofile/{id} - single profile
async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<VetProfileResponse>, ApiError> {
    let profile = VetProfileRepo::new(&state.pool).get(id).await?;
    Ok(Json(VetProfileResponse::from(profile)))
}

/// POST /api/vetprofile - create/replace the caller's profile
async fn create_profile(
    State(state): State<Arc<AppState>>,
    RequireVet(vet): RequireVet,
    Json(req): Json<ProfileRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let services = req.service_names()?;

    VetProfileRepo::new(&state.pool)
        .upsert(vet.id, &req.fields(), services.as_deref())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Vet profile created successfully",
        }),
    ))
}

/// PUT /api/vetprofile/{id} - update a profile (own profile only)
async fn update_profile(
    State(state): State<Arc<AppState>>,
    RequireVet(vet): RequireVet,
    Path(id): Path<Uuid>,
    Json(req): Json<ProfileRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if id != vet.id {
        return Err(ApiError::Forbidden {
            reason: "cannot update another vet's profile",
        });
    }

    let services = req.service_names()?;

    VetProfileRepo::new(&state.pool)
        .update(id, &req.fields(), services.as_deref())
        .await?;

    Ok(Json(MessageResponse {
        message: "Vet profile updated successfully",
    }))
}

/// Vet profile routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/vetprofile", get(list_profiles).post(create_profile))
        .route("/api/vetprofile/{id}", get(get_profile).put(update_profile))
}
