//! Review endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::repos::{NewReview, Review, ReviewRepo};
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::models::Rating;

/// Create review request
#[derive(Deserialize)]
pub struct CreateReviewRequest {
    pub vet_id: Uuid,
    pub client_id: Uuid,
    pub rating: i32,
    #[serde(default)]
    pub comment: String,
}

/// Review response
#[derive(Serialize)]
pub struct ReviewResponse {
    pub review_id: Uuid,
    pub vet_id: Uuid,
    pub client_id: Uuid,
    pub rating: i32,
    pub comment: String,
    pub created_at: String,
}

/// Creation acknowledgement
#[derive(Serialize)]
pub struct CreatedReviewResponse {
    pub message: &'static str,
    pub review_id: Uuid,
}

impl From<Review> for ReviewResponse {
    fn from(r: Review) -> Self {
        Self {
            review_id: r.review_id,
            vet_id: r.vet_id,
            client_id: r.client_id,
            rating: r.rating,
            comment: r.comment,
            created_at: r.created_at.to_rfc3339(),
        }
    }
}

/// GET /api/reviews - list all reviews
async fn list_reviews(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ReviewResponse>>, ApiError> {
    let reviews = ReviewRepo::new(&state.pool).list().await?;
    Ok(Json(reviews.into_iter().map(ReviewResponse::from).collect()))
}

/// POST /api/reviews - create a review
async fn create_review(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<CreatedReviewResponse>), ApiError> {
    let rating = Rating::new(req.rating)?;

    let review_id = ReviewRepo::new(&state.pool)
        .create(NewReview {
            vet_id: req.vet_id,
            client_id: req.client_id,
            rating,
            comment: req.comment,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedReviewResponse {
            message: "Review created successfully",
            review_id,
        }),
    ))
}

/// Review routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/reviews", get(list_reviews).post(create_review))
}
