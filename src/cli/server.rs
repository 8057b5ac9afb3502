use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use log::info;
use tokio::net::TcpListener;

use crate::cli::SubCommandExtend;
use crate::config::{EmbeddingOptions, SearchOptions};
use crate::embedding::{BedrockEmbedder, Embedder};
use crate::{IMDBBuilder, Opts, server};

#[derive(Parser, Debug, Clone)]
pub struct ServerCommand {
    #[command(flatten)]
    pub embedding: EmbeddingOptions,
    #[command(flatten)]
    pub search: SearchOptions,
    /// 监听地址
    #[arg(long, default_value = "127.0.0.1:8000")]
    pub addr: String,
    /// 数据集图片目录，用于展示搜索结果
    #[arg(long, value_name = "DIR", default_value = "LungX-RayImage")]
    pub image_dir: PathBuf,
    /// 上传图片保存目录
    #[arg(long, value_name = "DIR", default_value = "uploaded")]
    pub upload_dir: PathBuf,
}

impl SubCommandExtend for ServerCommand {
    async fn run(&self, opts: &Opts) -> anyhow::Result<()> {
        let db = IMDBBuilder::new(opts.conf_dir.clone()).dimensions(self.embedding.dimensions).open().await?;
        let embedder: Arc<dyn Embedder> = Arc::new(BedrockEmbedder::new(&self.embedding)?);

        tokio::fs::create_dir_all(&self.upload_dir).await?;

        // 创建应用状态
        let state = server::AppState::new(
            db,
            embedder,
            self.search.clone(),
            self.image_dir.clone(),
            self.upload_dir.clone(),
        );

        // 创建应用
        let app = server::create_app(state);

        // 启动服务器
        info!("服务器启动：http://{}", &self.addr);
        let listener = TcpListener::bind(&self.addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
