//! User endpoints
//!
//! `/api/users/me` is the self-service surface; the plain listing/detail
//! routes are public reads.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::repos::{User, UserRepo};
use crate::http::error::ApiError;
use crate::http::extractors::AuthUser;
use crate::http::server::AppState;
use crate::models::ValidationError;

/// Self-service profile update request
#[derive(Deserialize)]
pub struct UpdateMeRequest {
    pub name: String,
    pub phone: Option<String>,
}

/// User response
#[derive(Serialize)]
pub struct UserResponse {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub phone: Option<String>,
    pub created_at: String,
}

/// Plain acknowledgement
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            user_id: u.user_id,
            name: u.name,
            email: u.email,
            role: u.role,
            phone: u.phone,
            created_at: u.created_at.to_rfc3339(),
        }
    }
}

/// GET /api/users - list all users
async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = UserRepo::new(&state.pool).list().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// GET /api/users/{id} - get a single user
async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = UserRepo::new(&state.pool).get_by_id(id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// GET /api/users/me - the caller's own record
async fn get_me(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    let me = UserRepo::new(&state.pool).get_by_id(user.id).await?;
    Ok(Json(UserResponse::from(me)))
}

/// PUT /api/users/me - update name/phone
async fn update_me(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<UpdateMeRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if req.name.trim().is_empty() {
        return Err(ValidationError::Empty { field: "name" }.into());
    }

    UserRepo::new(&state.pool)
        .update_profile(user.id, req.name.trim(), req.phone.as_deref())
        .await?;

    Ok(Json(MessageResponse {
        message: "Profile updated successfully",
    }))
}

/// DELETE /api/users/me - delete the caller's account
async fn delete_me(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<MessageResponse>, ApiError> {
    UserRepo::new(&state.pool).delete(user.id).await?;
    Ok(Json(MessageResponse {
        message: "Account deleted successfully",
    }))
}

/// User routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/users", get(list_users))
        .route("/api/users/me", get(get_me).put(update_me).delete(delete_me))
        .route("/api/users/{id}", get(get_user))
}
