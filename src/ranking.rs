use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use crate::error::InsufficientResults;

/// 默认展示的结果数量
pub const DISPLAY_COUNT: usize = 5;

/// 推荐结果附带的免责声明
pub const DISCLAIMER: &str =
    "This is an recommendation and final decision and consultation with doctor is recommended.";

/// 单条搜索结果，按相似度从高到低排列
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SearchResult {
    /// 图片文件名
    pub filename: String,
    /// 入库时推导出的病症标签
    pub condition: String,
    /// 相似度，越大越相似
    pub score: f32,
}

/// 得分最高的结果给出的推荐
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Recommendation {
    pub condition: String,
    pub disclaimer: String,
}

impl Recommendation {
    fn from_best(best: &SearchResult) -> Self {
        Self { condition: best.condition.clone(), disclaimer: DISCLAIMER.to_string() }
    }
}

/// 用于展示的前 K 条结果与推荐
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Ranking {
    pub top: Vec<SearchResult>,
    pub recommendation: Option<Recommendation>,
}

/// 选取前 `k` 条结果，不足 `k` 条时返回 [`InsufficientResults`]
///
/// 结果必须已经按分数降序排列，这里不会重新排序。
pub fn rank(results: &[SearchResult], k: usize) -> Result<Ranking, InsufficientResults> {
    if results.len() < k {
        return Err(InsufficientResults { expected: k, actual: results.len() });
    }
    Ok(rank_available(results, k))
}

/// 选取至多 `k` 条结果，用于结果不足时的降级展示
pub fn rank_available(results: &[SearchResult], k: usize) -> Ranking {
    Ranking {
        top: results.iter().take(k).cloned().collect(),
        recommendation: results.first().map(Recommendation::from_best),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results(scores: &[f32]) -> Vec<SearchResult> {
        scores
            .iter()
            .enumerate()
            .map(|(i, &score)| SearchResult {
                filename: format!("img_{i}.png"),
                condition: format!("cond{i}"),
                score,
            })
            .collect()
    }

    #[test]
    fn top_five_in_upstream_order() {
        let input = results(&[0.95, 0.91, 0.88, 0.80, 0.75]);
        let ranking = rank(&input, DISPLAY_COUNT).unwrap();
        assert_eq!(ranking.top, input);
        let rec = ranking.recommendation.unwrap();
        assert_eq!(rec.condition, "cond0");
        assert_eq!(rec.disclaimer, DISCLAIMER);
    }

    #[test]
    fn truncates_to_k() {
        let input = results(&[0.9, 0.8, 0.7, 0.6, 0.5, 0.4, 0.3]);
        let ranking = rank(&input, 5).unwrap();
        assert_eq!(ranking.top.len(), 5);
        assert_eq!(ranking.top[4].filename, "img_4.png");
    }

    #[test]
    fn does_not_resort() {
        let input = results(&[0.5, 0.9, 0.7, 0.6, 0.8]);
        let ranking = rank(&input, 5).unwrap();
        assert_eq!(ranking.top, input);
        assert_eq!(ranking.recommendation.unwrap().condition, "cond0");
    }

    #[test]
    fn fewer_than_k_is_insufficient() {
        let input = results(&[0.9, 0.8, 0.7]);
        assert_eq!(rank(&input, 5), Err(InsufficientResults { expected: 5, actual: 3 }));

        let degraded = rank_available(&input, 5);
        assert_eq!(degraded.top, input);
        assert_eq!(degraded.recommendation.unwrap().condition, "cond0");
    }

    #[test]
    fn empty_results() {
        assert_eq!(rank(&[], 5), Err(InsufficientResults { expected: 5, actual: 0 }));
        let degraded = rank_available(&[], 5);
        assert!(degraded.top.is_empty());
        assert!(degraded.recommendation.is_none());
    }
}
