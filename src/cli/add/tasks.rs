use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use futures::StreamExt;
use indicatif::ProgressBar;
use log::{error, info};
use regex::Regex;
use tokio::sync::mpsc::{Receiver, channel};
use tokio::task::JoinHandle;
use walkdir::WalkDir;

use super::types::*;
use crate::IMDB;
use crate::embedding::{Embedder, EmbeddingInput};
use crate::label::derive_condition;
use crate::utils::has_suffix;

/// 扫描目录下（不递归）符合后缀的文件并读取内容
pub fn task_scan(
    path: PathBuf,
    pb: ProgressBar,
    re_suf: Regex,
    stats: Arc<IngestStats>,
) -> (JoinHandle<Result<()>>, Receiver<ImageData>) {
    let (tx, rx) = channel(num_cpus::get());
    let t = tokio::spawn(async move {
        info!("开始扫描目录: {}", path.display());
        let entries = WalkDir::new(&path)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file() && has_suffix(entry.path(), &re_suf))
            .map(|entry| entry.into_path())
            .collect::<Vec<_>>();
        info!("扫描完成，共 {} 张图片", entries.len());

        pb.set_length(entries.len() as u64);

        for entry in entries {
            let filename = entry.file_name().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
            match tokio::fs::read(&entry).await {
                Ok(data) => tx.send(ImageData { filename, data }).await?,
                Err(e) => {
                    pb.println(format!("[ERR] 读取失败 {}: {}", entry.display(), e));
                    stats.failed();
                    pb.inc(1);
                }
            }
        }
        Ok(())
    });
    (t, rx)
}

/// 跳过数据库中已存在的文件名
pub fn task_filter(
    mut lrx: Receiver<ImageData>,
    pb: ProgressBar,
    db: Arc<IMDB>,
    skip_existing: bool,
    stats: Arc<IngestStats>,
) -> (JoinHandle<Result<()>>, Receiver<ImageData>) {
    let (tx, rx) = channel(num_cpus::get());
    let t = tokio::spawn(async move {
        while let Some(data) = lrx.recv().await {
            if skip_existing && db.check_filename(&data.filename).await? {
                pb.set_message(format!("跳过已添加图片: {}", data.filename));
                stats.skipped();
                pb.inc(1);
                continue;
            }
            tx.send(data).await?;
        }
        Ok(())
    });
    (t, rx)
}

/// 调用嵌入服务计算向量，同时最多 `jobs` 个请求，输出顺序与输入一致
pub fn task_embed(
    mut lrx: Receiver<ImageData>,
    pb: ProgressBar,
    embedder: Arc<dyn Embedder>,
    jobs: usize,
    stats: Arc<IngestStats>,
) -> (JoinHandle<Result<()>>, Receiver<EmbeddedImage>) {
    let (tx, rx) = channel(num_cpus::get());
    let t = tokio::spawn(async move {
        let stream = futures::stream::poll_fn(move |cx| lrx.poll_recv(cx));
        let mut embedded = stream
            .map(|data| {
                let embedder = embedder.clone();
                async move {
                    let input = EmbeddingInput::image(data.data);
                    (data.filename, embedder.embed(&input).await)
                }
            })
            .buffered(jobs.max(1));

        while let Some((filename, result)) = embedded.next().await {
            match result {
                Ok(embedding) => tx.send(EmbeddedImage { filename, embedding }).await?,
                Err(e) => {
                    error!("计算嵌入向量失败 {}: {}", filename, e);
                    pb.println(format!("[ERR] {}: {}", filename, e));
                    stats.failed();
                    pb.inc(1);
                }
            }
        }
        Ok(())
    });
    (t, rx)
}

/// 推导病症标签并写入数据库
pub fn task_add(
    mut lrx: Receiver<EmbeddedImage>,
    pb: ProgressBar,
    db: Arc<IMDB>,
    stats: Arc<IngestStats>,
) -> JoinHandle<Result<()>> {
    tokio::spawn(async move {
        while let Some(data) = lrx.recv().await {
            let condition = derive_condition(&data.filename);
            db.add_image(&data.filename, &condition, &data.embedding).await?;
            info!("Inserted: {} ({})", data.filename, condition);
            pb.set_message(format!("Inserted: {}", data.filename));
            stats.inserted();
            pb.inc(1);
        }
        Ok(())
    })
}
