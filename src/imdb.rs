use std::collections::HashMap;

use log::{debug, info};
use tokio::sync::RwLock;
use tokio::task::block_in_place;

use crate::config::ConfDir;
use crate::db::{self, ConditionCount, Database, ImageInfo, crud, encode_vector};
use crate::error::StoreError;
use crate::index::VectorIndex;
use crate::ranking::SearchResult;

/// 向量搜索参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchParams {
    /// 索引内部考察的候选数量
    pub num_candidates: usize,
    /// 返回的结果数量
    pub limit: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self { num_candidates: 100, limit: 10 }
    }
}

impl SearchParams {
    fn validate(&self) -> Result<(), StoreError> {
        if self.limit > self.num_candidates {
            return Err(StoreError::InvalidParams(format!(
                "limit ({}) 不能大于 num_candidates ({})",
                self.limit, self.num_candidates
            )));
        }
        Ok(())
    }
}

pub struct IMDBBuilder {
    conf_dir: ConfDir,
    dimensions: usize,
    index: bool,
}

impl IMDBBuilder {
    pub fn new(conf_dir: ConfDir) -> Self {
        Self { conf_dir, dimensions: 384, index: true }
    }

    /// 嵌入向量维度
    pub fn dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// 打开时是否构建向量索引，只写入数据时可以关闭
    pub fn index(mut self, index: bool) -> Self {
        self.index = index;
        self
    }

    pub async fn open(self) -> Result<IMDB, StoreError> {
        let db = db::init_db(self.conf_dir.database()).await?;
        let imdb = IMDB {
            db,
            dimensions: self.dimensions,
            index: RwLock::new(VectorIndex::new(self.dimensions)?),
        };
        if self.index {
            imdb.reload_index().await?;
        }
        Ok(imdb)
    }
}

/// 图片记录与向量索引
pub struct IMDB {
    db: Database,
    dimensions: usize,
    index: RwLock<VectorIndex>,
}

impl IMDB {
    /// 添加一张图片，返回新记录的 ID
    ///
    /// 病症标签在入库时确定，之后不会重新计算
    pub async fn add_image(&self, filename: &str, condition: &str, embedding: &[f32]) -> Result<i64, StoreError> {
        let blob = encode_vector(embedding);
        Ok(crud::add_image(&self.db, filename, condition, &blob).await?)
    }

    /// 检查文件名是否已添加
    pub async fn check_filename(&self, filename: &str) -> Result<bool, StoreError> {
        Ok(crud::check_filename(&self.db, filename).await?)
    }

    pub async fn condition_counts(&self) -> Result<Vec<ConditionCount>, StoreError> {
        Ok(crud::count_by_condition(&self.db).await?)
    }

    pub async fn all_images(&self) -> Result<Vec<ImageInfo>, StoreError> {
        Ok(crud::get_all_image_info(&self.db).await?)
    }

    /// 从数据库重新构建向量索引
    pub async fn reload_index(&self) -> Result<usize, StoreError> {
        let records = crud::get_all_images(&self.db).await?;
        let vectors =
            records.iter().map(|record| Ok((record.id, record.vector()?))).collect::<Result<Vec<_>, StoreError>>()?;
        let index = block_in_place(|| VectorIndex::build(self.dimensions, vectors))?;
        let size = index.len();
        *self.index.write().await = index;
        info!("向量索引加载完成，共 {} 条", size);
        Ok(size)
    }

    /// 搜索与 `query` 最相似的图片，结果按分数降序排列
    pub async fn search(&self, query: &[f32], params: SearchParams) -> Result<Vec<SearchResult>, StoreError> {
        params.validate()?;

        let neighbors = {
            let index = self.index.read().await;
            block_in_place(|| index.search(query, params.num_candidates, params.limit))?
        };
        debug!("向量搜索返回 {} 条结果", neighbors.len());

        let ids = neighbors.iter().map(|n| n.id).collect::<Vec<_>>();
        let mut infos = crud::get_image_infos(&self.db, &ids)
            .await?
            .into_iter()
            .map(|info| (info.id, info))
            .collect::<HashMap<_, _>>();

        // 保持索引返回的顺序，索引重建之间被外部删除的记录直接跳过
        let results = neighbors
            .into_iter()
            .filter_map(|neighbor| {
                infos.remove(&neighbor.id).map(|info| SearchResult {
                    filename: info.filename,
                    condition: info.condition,
                    score: neighbor.score,
                })
            })
            .collect();
        Ok(results)
    }
}
