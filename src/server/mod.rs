mod api;
mod error;
mod page;
mod state;
mod types;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use utoipa::OpenApi;

pub use self::error::AppError;
pub use self::state::*;
pub use self::types::*;

#[derive(OpenApi)]
#[openapi(
    paths(api::search_handler, api::reload_handler),
    components(schemas(types::SearchRequest, types::SearchResponse, types::ReloadResponse))
)]
pub struct ApiDoc;

/// 构建API服务器
pub fn create_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(api::index_handler))
        .route("/search", post(api::search_form_handler))
        .route("/api/search", post(api::search_handler))
        .route("/reload", post(api::reload_handler))
        .route("/metrics", get(api::metrics_handler))
        .route("/api-docs/openapi.json", get(api::openapi_handler))
        .nest_service("/images", ServeDir::new(&state.image_dir))
        .nest_service("/uploads", ServeDir::new(&state.upload_dir))
        .layer(DefaultBodyLimit::disable())
        // 上传限制：10M
        .layer(RequestBodyLimitLayer::new(1024 * 1024 * 10))
        .with_state(state)
}
