use std::sync::atomic::{AtomicUsize, Ordering};

use crate::metrics;

/// 从目录读取的图片
pub struct ImageData {
    /// 文件名，不含目录
    pub filename: String,
    pub data: Vec<u8>,
}

/// 已计算嵌入向量的图片
pub struct EmbeddedImage {
    pub filename: String,
    pub embedding: Vec<f32>,
}

/// 导入统计
#[derive(Default)]
pub struct IngestStats {
    inserted: AtomicUsize,
    skipped: AtomicUsize,
    failed: AtomicUsize,
}

impl IngestStats {
    pub fn inserted(&self) {
        self.inserted.fetch_add(1, Ordering::Relaxed);
        metrics::inc_ingest_count("inserted");
    }

    pub fn skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
        metrics::inc_ingest_count("skipped");
    }

    pub fn failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
        metrics::inc_ingest_count("failed");
    }

    /// 返回 `(新增, 跳过, 失败)`
    pub fn snapshot(&self) -> (usize, usize, usize) {
        (
            self.inserted.load(Ordering::Relaxed),
            self.skipped.load(Ordering::Relaxed),
            self.failed.load(Ordering::Relaxed),
        )
    }
}
