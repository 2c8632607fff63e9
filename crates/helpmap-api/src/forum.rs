use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use helpmap_types::api::{CreateTopicRequest, TopicCreated};

use crate::auth::AppState;
use crate::error::{ApiError, ApiResult};
use crate::{ApiJson, blocking};

pub async fn list_topics(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let topics = blocking(&state, |store| store.list_topics()).await?;
    Ok(Json(topics))
}

pub async fn get_topic(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<impl IntoResponse> {
    let topic = blocking(&state, move |store| store.get_topic(id))
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Topic {} not found", id)))?;
    Ok(Json(topic))
}

// comments_count starts at zero; there is no comment endpoint to bump it.
pub async fn create_topic(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateTopicRequest>,
) -> ApiResult<impl IntoResponse> {
    let topic = blocking(&state, move |store| store.insert_topic(req)).await?;

    Ok((StatusCode::CREATED, Json(TopicCreated { success: true, topic })))
}
