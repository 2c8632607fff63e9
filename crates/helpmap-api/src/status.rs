use axum::{Json, response::IntoResponse};

use helpmap_types::api::StatusResponse;

const SERVICE_NAME: &str = "HelpMap";
const FEATURES: &[&str] = &["auth", "help_requests", "chat", "forum", "reviews"];

pub async fn status() -> impl IntoResponse {
    Json(StatusResponse {
        status: "ok".to_string(),
        message: "API is working".to_string(),
        service: SERVICE_NAME.to_string(),
        features: FEATURES.iter().map(|f| f.to_string()).collect(),
    })
}

pub async fn home() -> &'static str {
    "HelpMap Backend - OK ✅"
}
