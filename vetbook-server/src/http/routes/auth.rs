//! Registration and login endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{hash_password, verify_password};
use crate::db::repos::{NewUser, UserRepo, VetProfileRepo};
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::models::{UserRole, ValidationError};

/// Registration request
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub phone: Option<String>,
}

/// Login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public user shape returned alongside tokens
#[derive(Serialize)]
pub struct UserResponse {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub phone: Option<String>,
}

/// Response for both register and login
#[derive(Serialize)]
pub struct AuthResponse {
    pub message: &'static str,
    pub token: String,
    pub user: UserResponse,
}

/// POST /api/auth/register
async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let role = UserRole::parse(&req.role)?;
    require_nonempty("name", &req.name)?;
    require_nonempty("email", &req.email)?;
    require_nonempty("password", &req.password)?;

    let repo = UserRepo::new(&state.pool);
    if repo.get_by_email(&req.email).await?.is_some() {
        return Err(ApiError::Conflict {
            message: "email already registered".into(),
        });
    }

    let password_hash = hash_password(&req.password)?;
    let user_id = Uuid::new_v4();

    repo.create(NewUser {
        user_id,
        name: req.name.clone(),
        email: req.email.clone(),
        password_hash,
        role: role.as_str().to_owned(),
        phone: req.phone.clone(),
    })
    .await?;

    // Vets get a placeholder profile immediately so their listing entry and
    // service reconciliation have a row to hang off.
    if role == UserRole::Vet {
        VetProfileRepo::new(&state.pool).create_initial(user_id).await?;
    }

    let token = state.auth.issue(user_id, role.as_str())?;
    tracing::info!(%user_id, role = role.as_str(), "user registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully",
            token,
            user: UserResponse {
                user_id,
                name: req.name,
                email: req.email,
                role: role.as_str().to_owned(),
                phone: req.phone,
            },
        }),
    ))
}

/// POST /api/auth/login
async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    require_nonempty("email", &req.email)?;
    require_nonempty("password", &req.password)?;

    // A missing account and a wrong password answer identically.
    let user = UserRepo::new(&state.pool)
        .get_by_email(&req.email)
        .await?
        .ok_or(ApiError::Unauthorized {
            reason: "invalid credentials",
        })?;

    if !verify_password(&req.password, &user.password_hash) {
        return Err(ApiError::Unauthorized {
            reason: "invalid credentials",
        });
    }

    let token = state.auth.issue(user.user_id, &user.role)?;

    Ok(Json(AuthResponse {
        message: "Login successful",
        token,
        user: UserResponse {
            user_id: user.user_id,
            name: user.name,
            email: user.email,
            role: user.role,
            phone: user.phone,
        },
    }))
}

fn require_nonempty(field: &'static str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field }.into());
    }
    Ok(())
}

/// Auth routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
}
