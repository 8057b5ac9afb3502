use axum::body::Bytes;
use axum_typed_multipart::{FieldData, TryFromMultipart};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::ranking::{Ranking, SearchResult};

/// 网页表单搜索参数
#[derive(TryFromMultipart)]
pub struct SearchFormRequest {
    pub file: Option<FieldData<Bytes>>,
    pub text: Option<String>,
}

/// JSON 搜索请求，图片与文本至少提供一项
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SearchRequest {
    /// 搜索文本
    #[serde(default)]
    pub text: Option<String>,
    /// base64 编码的图片
    #[serde(default)]
    pub image_base64: Option<String>,
}

/// 搜索响应
#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResponse {
    /// 搜索耗时，单位为毫秒
    pub time: u64,
    /// 向量搜索返回的全部结果
    pub results: Vec<SearchResult>,
    /// 用于展示的前 K 条结果与推荐
    pub ranking: Ranking,
    /// 结果不足时的提示
    pub notice: Option<String>,
}

/// 重新加载索引的响应
#[derive(Debug, Serialize, ToSchema)]
pub struct ReloadResponse {
    /// 索引中的向量数量
    pub indexed: usize,
}
