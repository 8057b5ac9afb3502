use std::path::PathBuf;
use std::sync::Arc;

use crate::IMDB;
use crate::config::SearchOptions;
use crate::embedding::Embedder;

/// 应用状态
pub struct AppState {
    /// 图片数据库与向量索引
    pub db: IMDB,
    /// 嵌入服务客户端
    pub embedder: Arc<dyn Embedder>,
    /// 搜索配置选项
    pub search: SearchOptions,
    /// 数据集图片目录
    pub image_dir: PathBuf,
    /// 上传图片保存目录
    pub upload_dir: PathBuf,
}

impl AppState {
    /// 创建新的应用状态
    pub fn new(
        db: IMDB,
        embedder: Arc<dyn Embedder>,
        search: SearchOptions,
        image_dir: PathBuf,
        upload_dir: PathBuf,
    ) -> Arc<Self> {
        Arc::new(AppState { db, embedder, search, image_dir, upload_dir })
    }
}
