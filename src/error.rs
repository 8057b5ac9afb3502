use reqwest::StatusCode;
use thiserror::Error;

/// 调用嵌入服务失败
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("嵌入请求为空：需要图片或文本")]
    EmptyInput,
    #[error("嵌入服务请求失败: {0}")]
    Request(#[from] reqwest::Error),
    #[error("嵌入服务返回 {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("嵌入服务响应中没有 embedding 字段")]
    MissingEmbedding,
}

/// 数据库或向量索引出错
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),
    #[error("数据库迁移失败: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("向量索引错误: {0}")]
    Index(String),
    #[error("向量维度不一致：期望 {expected}，实际 {actual}")]
    Dimension { expected: usize, actual: usize },
    #[error("搜索参数无效: {0}")]
    InvalidParams(String),
    #[error("embedding 数据损坏：{0} 字节不是 f32 的整数倍")]
    CorruptEmbedding(usize),
}

impl StoreError {
    pub(crate) fn index(e: impl std::fmt::Display) -> Self {
        Self::Index(e.to_string())
    }
}

/// 搜索结果不足以填满展示数量
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("搜索结果不足：需要 {expected} 条，实际 {actual} 条")]
pub struct InsufficientResults {
    pub expected: usize,
    pub actual: usize,
}

/// 一次完整查询（嵌入 + 向量搜索）的错误
#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
