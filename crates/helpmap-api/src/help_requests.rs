use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use helpmap_types::api::{CreateHelpRequest, HelpRequestCreated};

use crate::auth::AppState;
use crate::error::{ApiError, ApiResult};
use crate::{ApiJson, blocking};

pub async fn list_help_requests(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let requests = blocking(&state, |store| store.list_help_requests()).await?;
    Ok(Json(requests))
}

pub async fn get_help_request(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<impl IntoResponse> {
    let request = blocking(&state, move |store| store.get_help_request(id))
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Help request {} not found", id)))?;
    Ok(Json(request))
}

/// POST /api/help-requests — new requests always start out `open`.
pub async fn create_help_request(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateHelpRequest>,
) -> ApiResult<impl IntoResponse> {
    let request = blocking(&state, move |store| store.insert_help_request(req)).await?;

    Ok((
        StatusCode::CREATED,
        Json(HelpRequestCreated {
            success: true,
            request,
        }),
    ))
}
