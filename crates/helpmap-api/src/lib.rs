pub mod auth;
pub mod error;
pub mod forum;
pub mod help_requests;
pub mod messages;
pub mod middleware;
pub mod password;
pub mod reviews;
pub mod status;

use axum::{
    Router,
    extract::FromRequest,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use helpmap_db::Store;

use crate::auth::AppState;
use crate::error::{ApiError, ApiResult};

/// `Json` extractor whose rejections use the API's error body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Run a store call off the async runtime.
pub(crate) async fn blocking<F, T>(state: &AppState, f: F) -> ApiResult<T>
where
    F: FnOnce(&Store) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    let out = tokio::task::spawn_blocking(move || f(&state.store)).await??;
    Ok(out)
}

/// Full application: every route, permissive CORS and request tracing.
pub fn app(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(status::home))
        .route("/api/status", get(status::status))
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route(
            "/api/help-requests",
            get(help_requests::list_help_requests).post(help_requests::create_help_request),
        )
        .route("/api/help-requests/{id}", get(help_requests::get_help_request))
        .route("/api/messages", get(messages::get_messages).post(messages::send_message))
        .route("/api/messages/{id}", get(messages::get_message))
        .route("/api/forum/topics", get(forum::list_topics).post(forum::create_topic))
        .route("/api/forum/topics/{id}", get(forum::get_topic))
        .route("/api/reviews", get(reviews::list_reviews).post(reviews::create_review))
        .route("/api/reviews/{id}", get(reviews::get_review));

    let protected_routes = Router::new()
        .route("/api/me", get(auth::me))
        .layer(from_fn_with_state(state.clone(), middleware::require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
