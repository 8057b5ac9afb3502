use std::sync::atomic::{AtomicUsize, Ordering};

use log::{debug, warn};
use usearch::{Index, IndexOptions, MetricKind, ScalarKind};

use crate::error::StoreError;

/// 单个近邻
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// 图片 ID
    pub id: i64,
    /// 相似度，范围 [0, 1]
    pub score: f32,
}

/// 基于 HNSW 的余弦相似度索引
pub struct VectorIndex {
    index: Index,
    dimensions: usize,
    expansion_search: AtomicUsize,
}

impl VectorIndex {
    pub fn new(dimensions: usize) -> Result<Self, StoreError> {
        let options = IndexOptions {
            dimensions,
            metric: MetricKind::Cos,
            quantization: ScalarKind::F32,
            // 此处为 usearch 默认参数
            connectivity: 16,
            expansion_add: 128,
            expansion_search: 64,
            ..Default::default()
        };
        let index = Index::new(&options).map_err(StoreError::index)?;
        Ok(Self { index, dimensions, expansion_search: AtomicUsize::new(options.expansion_search) })
    }

    /// 使用一组 `(ID, 向量)` 构建索引，维度不一致的向量会被跳过
    pub fn build<I>(dimensions: usize, vectors: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = (i64, Vec<f32>)>,
    {
        let vectors = vectors.into_iter().collect::<Vec<_>>();
        let s = Self::new(dimensions)?;
        s.index.reserve(vectors.len()).map_err(StoreError::index)?;
        for (id, vector) in vectors {
            if vector.len() != dimensions {
                warn!("跳过维度不一致的向量: id={}, 维度={}", id, vector.len());
                continue;
            }
            s.index.add(id as u64, vector.as_slice()).map_err(StoreError::index)?;
        }
        debug!("向量索引构建完成，共 {} 条", s.len());
        Ok(s)
    }

    pub fn len(&self) -> usize {
        self.index.size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 搜索最相似的 `limit` 个向量
    ///
    /// `num_candidates` 为搜索时考察的候选数量，结果按相似度降序排列
    pub fn search(&self, query: &[f32], num_candidates: usize, limit: usize) -> Result<Vec<Neighbor>, StoreError> {
        if query.len() != self.dimensions {
            return Err(StoreError::Dimension { expected: self.dimensions, actual: query.len() });
        }
        if self.is_empty() || limit == 0 {
            return Ok(vec![]);
        }

        // 候选数量通常不变，避免每次搜索都修改索引参数
        if self.expansion_search.swap(num_candidates, Ordering::Relaxed) != num_candidates {
            self.index.change_expansion_search(num_candidates);
        }
        let matches = self.index.search(query, limit).map_err(StoreError::index)?;

        let mut neighbors = matches
            .keys
            .into_iter()
            .zip(matches.distances)
            .map(|(key, distance)| Neighbor { id: key as i64, score: cosine_score(distance) })
            .collect::<Vec<_>>();
        neighbors.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ok(neighbors)
    }
}

/// 将余弦距离 `1 - cos` 转换为 `(1 + cos) / 2`
fn cosine_score(distance: f32) -> f32 {
    ((2.0 - distance) / 2.0).clamp(0.0, 1.0)
}
