use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::error::{EmbeddingError, QueryError, StoreError};

/// API错误类型
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(anyhow::Error::new(BadRequest(msg.into())))
    }

    pub fn status(&self) -> StatusCode {
        status_of(&self.0)
    }
}

/// 请求参数错误
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct BadRequest(String);

fn embedding_status(e: &EmbeddingError) -> StatusCode {
    match e {
        EmbeddingError::EmptyInput => StatusCode::BAD_REQUEST,
        _ => StatusCode::BAD_GATEWAY,
    }
}

fn store_status(e: &StoreError) -> StatusCode {
    match e {
        StoreError::Dimension { .. } => StatusCode::BAD_GATEWAY,
        StoreError::InvalidParams(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// 根据错误类型选择 HTTP 状态码
fn status_of(err: &anyhow::Error) -> StatusCode {
    if err.is::<BadRequest>() {
        StatusCode::BAD_REQUEST
    } else if let Some(e) = err.downcast_ref::<QueryError>() {
        match e {
            QueryError::Embedding(e) => embedding_status(e),
            QueryError::Store(e) => store_status(e),
        }
    } else if let Some(e) = err.downcast_ref::<EmbeddingError>() {
        embedding_status(e)
    } else if let Some(e) = err.downcast_ref::<StoreError>() {
        store_status(e)
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), format!("Something went wrong: {}", self.0)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let e: AppError = QueryError::Embedding(EmbeddingError::MissingEmbedding).into();
        assert_eq!(e.status(), StatusCode::BAD_GATEWAY);
        let e: AppError = QueryError::Embedding(EmbeddingError::EmptyInput).into();
        assert_eq!(e.status(), StatusCode::BAD_REQUEST);
        let e: AppError = StoreError::InvalidParams("x".into()).into();
        assert_eq!(e.status(), StatusCode::BAD_REQUEST);
        let e: AppError = StoreError::Index("x".into()).into();
        assert_eq!(e.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(AppError::bad_request("x").status(), StatusCode::BAD_REQUEST);
    }
}
