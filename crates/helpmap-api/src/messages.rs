use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use helpmap_types::api::{MessageSent, SendMessageRequest};

use crate::auth::AppState;
use crate::error::{ApiError, ApiResult};
use crate::{ApiJson, blocking};

/// All messages, every conversation. There is no per-participant filter.
pub async fn get_messages(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let messages = blocking(&state, |store| store.list_messages()).await?;
    Ok(Json(messages))
}

pub async fn get_message(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<impl IntoResponse> {
    let message = blocking(&state, move |store| store.get_message(id))
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Message {} not found", id)))?;
    Ok(Json(message))
}

pub async fn send_message(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SendMessageRequest>,
) -> ApiResult<impl IntoResponse> {
    let message = blocking(&state, move |store| store.insert_message(req)).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageSent {
            success: true,
            message,
        }),
    ))
}
