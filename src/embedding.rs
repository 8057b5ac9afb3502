use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::EmbeddingOptions;
use crate::error::EmbeddingError;

/// 嵌入服务的输入，图片与文本至少提供一项
#[derive(Debug, Clone, Default)]
pub struct EmbeddingInput {
    /// 原始图片字节，发送前会进行 base64 编码
    pub image: Option<Vec<u8>>,
    pub text: Option<String>,
}

impl EmbeddingInput {
    pub fn image(data: Vec<u8>) -> Self {
        Self { image: Some(data), text: None }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self { image: None, text: Some(text.into()) }
    }

    /// 空图片、空文本视为未提供
    pub fn normalized(self) -> Self {
        Self {
            image: self.image.filter(|data| !data.is_empty()),
            text: self.text.filter(|text| !text.trim().is_empty()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.image.is_none() && self.text.is_none()
    }

    /// 用于指标标签的查询类型
    pub fn kind(&self) -> &'static str {
        match (&self.image, &self.text) {
            (Some(_), Some(_)) => "both",
            (Some(_), None) => "image",
            (None, Some(_)) => "text",
            (None, None) => "empty",
        }
    }
}

/// 多模态嵌入服务
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, input: &EmbeddingInput) -> Result<Vec<f32>, EmbeddingError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InvokeRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    input_text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    input_image: Option<String>,
    embedding_config: EmbeddingConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbeddingConfig {
    output_embedding_length: usize,
}

#[derive(Deserialize)]
struct InvokeResponse {
    embedding: Option<Vec<f32>>,
}

/// 通过 Bedrock Runtime `InvokeModel` 接口调用 Titan 多模态嵌入模型
pub struct BedrockEmbedder {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    dimensions: usize,
}

impl BedrockEmbedder {
    pub fn new(opts: &EmbeddingOptions) -> Result<Self, EmbeddingError> {
        let client =
            reqwest::Client::builder().timeout(Duration::from_secs(opts.embedding_timeout)).build()?;
        Ok(Self {
            client,
            url: opts.invoke_url(),
            api_key: opts.api_key.clone(),
            dimensions: opts.dimensions,
        })
    }

    fn request_body<'a>(&self, input: &'a EmbeddingInput) -> InvokeRequest<'a> {
        InvokeRequest {
            input_text: input.text.as_deref(),
            input_image: input
                .image
                .as_ref()
                .map(|data| base64::engine::general_purpose::STANDARD.encode(data)),
            embedding_config: EmbeddingConfig { output_embedding_length: self.dimensions },
        }
    }
}

#[async_trait]
impl Embedder for BedrockEmbedder {
    async fn embed(&self, input: &EmbeddingInput) -> Result<Vec<f32>, EmbeddingError> {
        if input.is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }

        let mut req = self
            .client
            .post(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&self.request_body(input));
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        debug!("请求嵌入服务: {} ({})", self.url, input.kind());
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(EmbeddingError::Status { status, body });
        }

        let body: InvokeResponse = resp.json().await?;
        body.embedding.ok_or(EmbeddingError::MissingEmbedding)
    }
}
