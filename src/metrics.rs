use std::sync::LazyLock;

use log::error;
use prometheus::*;

static METRIC_SEARCH_COUNT: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!("medsearch_search_count", "count of searches", &["kind"]).unwrap()
});

static METRIC_SEARCH_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    register_histogram_vec!(
        "medsearch_search_duration",
        "duration of the embedding and vector search in seconds",
        &["kind"]
    )
    .unwrap()
});

static METRIC_SEARCH_MAX_SCORE: LazyLock<Histogram> = LazyLock::new(|| {
    register_histogram!(
        "medsearch_search_max_score",
        "score of the best match per search",
        (1..=20).map(|x| x as f64 * 0.05).collect()
    )
    .unwrap()
});

static METRIC_INGEST_COUNT: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!("medsearch_ingest_count", "count of processed images during bulk load", &["status"])
        .unwrap()
});

/// 记录一次搜索
pub fn inc_search_count(kind: &str) {
    METRIC_SEARCH_COUNT.with_label_values(&[kind]).inc();
}

pub fn observe_search_duration(kind: &str, duration: f32) {
    METRIC_SEARCH_DURATION.with_label_values(&[kind]).observe(duration as f64);
}

pub fn observe_search_max_score(score: f32) {
    METRIC_SEARCH_MAX_SCORE.observe(score as f64);
}

/// 导入状态：inserted / skipped / failed
pub fn inc_ingest_count(status: &str) {
    METRIC_INGEST_COUNT.with_label_values(&[status]).inc();
}

/// 以文本格式导出全部指标
pub fn gather_text() -> String {
    let encoder = TextEncoder::new();
    encoder.encode_to_string(&prometheus::gather()).unwrap_or_else(|e| {
        error!("导出指标失败: {}", e);
        String::new()
    })
}
