use std::path::PathBuf;
use std::sync::Arc;

use anyhow::anyhow;
use clap::Parser;
use indicatif::ProgressBar;
use log::info;
use tasks::*;
use types::IngestStats;

mod tasks;
mod types;

use crate::IMDBBuilder;
use crate::cli::SubCommandExtend;
use crate::config::{EmbeddingOptions, Opts};
use crate::embedding::{BedrockEmbedder, Embedder};
use crate::utils::{pb_style, suffix_regex};

#[derive(Parser, Debug, Clone)]
pub struct AddCommand {
    #[command(flatten)]
    pub embedding: EmbeddingOptions,
    /// 图片所在目录，只扫描目录下的文件，不递归
    #[arg(default_value = "LungX-RayImage")]
    pub path: PathBuf,
    /// 扫描的文件后缀名，多个后缀用逗号分隔
    #[arg(short, long, default_value = "png,jpg,jpeg")]
    pub suffix: String,
    /// 同时进行的嵌入请求数量
    #[arg(short, long, value_name = "N", default_value_t = 1)]
    pub jobs: usize,
    /// 跳过数据库中已存在的文件名，默认会重复添加
    #[arg(long)]
    pub skip_existing: bool,
}

impl SubCommandExtend for AddCommand {
    async fn run(&self, opts: &Opts) -> anyhow::Result<()> {
        if !self.path.is_dir() {
            return Err(anyhow!("目录不存在: {}", self.path.display()));
        }

        let re_suf = suffix_regex(&self.suffix)?;
        let embedder: Arc<dyn Embedder> = Arc::new(BedrockEmbedder::new(&self.embedding)?);
        let db = Arc::new(
            IMDBBuilder::new(opts.conf_dir.clone()).dimensions(self.embedding.dimensions).index(false).open().await?,
        );

        let pb = ProgressBar::no_length().with_style(pb_style());
        let stats = Arc::new(IngestStats::default());

        let (t1, rx) = task_scan(self.path.clone(), pb.clone(), re_suf, stats.clone());
        let (t2, rx) = task_filter(rx, pb.clone(), db.clone(), self.skip_existing, stats.clone());
        let (t3, rx) = task_embed(rx, pb.clone(), embedder, self.jobs, stats.clone());
        let t4 = task_add(rx, pb.clone(), db, stats.clone());

        // 等待所有任务完成
        let (r1, r2, r3, r4) = tokio::try_join!(t1, t2, t3, t4)?;
        // 下游任务出错后上游只会得到 channel closed，先报告下游的错误
        r4?;
        r3?;
        r2?;
        r1?;

        pb.finish_with_message("图片添加完成");

        let (inserted, skipped, failed) = stats.snapshot();
        info!("导入完成：新增 {}，跳过 {}，失败 {}", inserted, skipped, failed);
        println!("All images inserted. inserted: {inserted}, skipped: {skipped}, failed: {failed}");

        Ok(())
    }
}
