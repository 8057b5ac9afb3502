use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use axum::Json;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse};
use axum_typed_multipart::TypedMultipart;
use base64::Engine;
use log::{error, info};

use super::ApiDoc;
use super::error::{AppError, Result};
use super::page::{self, ResultsView};
use super::state::AppState;
use super::types::*;
use crate::embedding::EmbeddingInput;
use crate::metrics;
use crate::searcher::{present, search_similar};
use crate::utils::{has_suffix, suffix_regex};

/// 可上传的图片格式
const UPLOAD_SUFFIX: &str = "png,jpg,jpeg";

/// 搜索页面
pub async fn index_handler(State(state): State<Arc<AppState>>) -> Result<Html<String>> {
    let counts = state.db.condition_counts().await?;
    Ok(Html(page::render_page("", &counts)))
}

/// 网页表单搜索，上传图片或输入文本
pub async fn search_form_handler(
    State(state): State<Arc<AppState>>,
    TypedMultipart(data): TypedMultipart<SearchFormRequest>,
) -> Result<(StatusCode, Html<String>)> {
    let counts = state.db.condition_counts().await?;
    let error_page = |status: StatusCode, message: &str| {
        (status, Html(page::render_page(&page::render_error(message), &counts)))
    };

    let mut query_image = None;
    let image = match data.file {
        Some(file) if !file.contents.is_empty() => {
            let name = match upload_name(file.metadata.file_name.as_deref()) {
                Ok(name) => name,
                Err(e) => return Ok(error_page(e.status(), &e.0.to_string())),
            };
            tokio::fs::create_dir_all(&state.upload_dir).await?;
            tokio::fs::write(state.upload_dir.join(&name), &file.contents).await?;
            info!("已保存上传图片: {}", name);
            query_image = Some(format!("/uploads/{}", urlencoding::encode(&name)));
            Some(file.contents.to_vec())
        }
        _ => None,
    };

    let input = EmbeddingInput { image, text: data.text }.normalized();
    if input.is_empty() {
        return Ok(error_page(StatusCode::BAD_REQUEST, "Please upload an image or enter a text query."));
    }

    match search_similar(state.embedder.as_ref(), &state.db, &input, state.search.params()).await {
        Ok(results) => {
            let (ranking, notice) = present(&results, state.search.count);
            let body = page::render_results(&ResultsView {
                query_image,
                query_text: input.text.as_deref(),
                ranking: &ranking,
                notice: notice.as_deref(),
            });
            Ok((StatusCode::OK, Html(page::render_page(&body, &counts))))
        }
        Err(e) => {
            error!("搜索失败: {}", e);
            let e = AppError::from(e);
            Ok(error_page(e.status(), &e.0.to_string()))
        }
    }
}

/// 以 JSON 方式搜索
#[utoipa::path(
    post,
    path = "/api/search",
    request_body = SearchRequest,
    responses(
        (status = 200, body = SearchResponse),
    )
)]
pub async fn search_handler(
    State(state): State<Arc<AppState>>,
    Json(data): Json<SearchRequest>,
) -> Result<Json<SearchResponse>> {
    let image = match data.image_base64 {
        Some(b64) => Some(
            base64::engine::general_purpose::STANDARD
                .decode(b64.trim())
                .map_err(|e| AppError::bad_request(format!("图片 base64 解码失败: {e}")))?,
        ),
        None => None,
    };
    let input = EmbeddingInput { image, text: data.text }.normalized();
    if input.is_empty() {
        return Err(AppError::bad_request("需要提供图片或文本"));
    }

    let start = Instant::now();
    let results = search_similar(state.embedder.as_ref(), &state.db, &input, state.search.params()).await?;
    let (ranking, notice) = present(&results, state.search.count);

    Ok(Json(SearchResponse { time: start.elapsed().as_millis() as u64, results, ranking, notice }))
}

/// 从数据库重新加载向量索引
#[utoipa::path(
    post,
    path = "/reload",
    responses(
        (status = 200, body = ReloadResponse),
    )
)]
pub async fn reload_handler(State(state): State<Arc<AppState>>) -> Result<Json<ReloadResponse>> {
    let indexed = state.db.reload_index().await?;
    Ok(Json(ReloadResponse { indexed }))
}

/// Prometheus 指标
pub async fn metrics_handler() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], metrics::gather_text())
}

pub async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    use utoipa::OpenApi;
    Json(ApiDoc::openapi())
}

/// 取上传文件名的最后一段，并检查图片格式
fn upload_name(file_name: Option<&str>) -> Result<String> {
    let name = file_name
        .and_then(|name| Path::new(name).file_name())
        .map(|name| name.to_string_lossy().to_string())
        .ok_or_else(|| AppError::bad_request("文件名不能为空"))?;
    let re_suf = suffix_regex(UPLOAD_SUFFIX)?;
    if !has_suffix(&name, &re_suf) {
        return Err(AppError::bad_request(format!("仅支持 {} 格式的图片", UPLOAD_SUFFIX)));
    }
    Ok(name)
}
