//! Custom Axum extractors

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::http::server::AppState;
use crate::models::UserRole;

use super::error::ApiError;

/// Identity attached to a request after bearer-token verification
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: UserRole,
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized {
                reason: "missing bearer token",
            })?;

        let token = header.strip_prefix("Bearer ").ok_or(ApiError::Unauthorized {
            reason: "missing bearer token",
        })?;

        let claims = state.auth.verify(token).map_err(|_| ApiError::Unauthorized {
            reason: "invalid or expired token",
        })?;

        // A token minted before a role rename would carry an unknown role;
        // treat it as invalid rather than guessing.
        let role = UserRole::parse(&claims.role).map_err(|_| ApiError::Unauthorized {
            reason: "invalid or expired token",
        })?;

        Ok(Self {
            id: claims.sub,
            role,
        })
    }
}

/// Extractor that additionally requires the vet role
#[derive(Debug, Clone, Copy)]
pub struct RequireVet(pub AuthUser);

impl FromRequestParts<Arc<AppState>> for RequireVet {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        if user.role != UserRole::Vet {
            return Err(ApiError::Forbidden {
                reason: "vet role required",
            });
        }

        Ok(Self(user))
    }
}
