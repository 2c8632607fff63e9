use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use helpmap_types::api::{CreateReviewRequest, ReviewCreated};

use crate::auth::AppState;
use crate::error::{ApiError, ApiResult};
use crate::{ApiJson, blocking};

pub async fn list_reviews(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let reviews = blocking(&state, |store| store.list_reviews()).await?;
    Ok(Json(reviews))
}

pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<impl IntoResponse> {
    let review = blocking(&state, move |store| store.get_review(id))
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Review {} not found", id)))?;
    Ok(Json(review))
}

/// Reviewer and volunteer ids are stored as given; they are not checked
/// against the users collection.
pub async fn create_review(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateReviewRequest>,
) -> ApiResult<impl IntoResponse> {
    let review = blocking(&state, move |store| store.insert_review(req)).await?;

    Ok((StatusCode::CREATED, Json(ReviewCreated { success: true, review })))
}
