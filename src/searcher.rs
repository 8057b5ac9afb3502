use std::time::Instant;

use log::{info, warn};

use crate::embedding::{Embedder, EmbeddingInput};
use crate::error::QueryError;
use crate::imdb::{IMDB, SearchParams};
use crate::metrics;
use crate::ranking::{Ranking, SearchResult, rank, rank_available};

/// 计算查询的嵌入向量，并在数据库中搜索相似图片
///
/// 嵌入失败时直接返回错误，不会以空向量继续搜索
pub async fn search_similar(
    embedder: &dyn Embedder,
    db: &IMDB,
    input: &EmbeddingInput,
    params: SearchParams,
) -> Result<Vec<SearchResult>, QueryError> {
    let kind = input.kind();
    let start = Instant::now();

    let vector = embedder.embed(input).await?;
    let results = db.search(&vector, params).await?;

    let elapsed = start.elapsed().as_secs_f32();
    metrics::inc_search_count(kind);
    metrics::observe_search_duration(kind, elapsed);
    if let Some(best) = results.first() {
        metrics::observe_search_max_score(best.score);
    }
    info!("{} 搜索完成，{} 条结果，耗时 {:.2}s", kind, results.len(), elapsed);

    Ok(results)
}

/// 选取前 `k` 条用于展示；结果不足时降级展示全部结果并返回提示信息
pub fn present(results: &[SearchResult], k: usize) -> (Ranking, Option<String>) {
    match rank(results, k) {
        Ok(ranking) => (ranking, None),
        Err(e) => {
            warn!("{}", e);
            (rank_available(results, k), Some(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results(n: usize) -> Vec<SearchResult> {
        (0..n)
            .map(|i| SearchResult {
                filename: format!("{i}.png"),
                condition: "x".into(),
                score: 1.0 - i as f32 * 0.1,
            })
            .collect()
    }

    #[test]
    fn present_full() {
        let (ranking, notice) = present(&results(10), 5);
        assert_eq!(ranking.top.len(), 5);
        assert!(notice.is_none());
    }

    #[test]
    fn present_degraded() {
        let (ranking, notice) = present(&results(3), 5);
        assert_eq!(ranking.top.len(), 3);
        assert!(notice.unwrap().contains('3'));
    }
}
