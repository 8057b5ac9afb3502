use anyhow::Result;
use clap::Parser;
use log::info;

use crate::cli::SubCommandExtend;
use crate::config::Opts;
use crate::label::derive_condition;
use crate::{IMDBBuilder, db::ImageInfo};

#[derive(Parser, Debug, Clone)]
pub struct CheckCommand {}

impl SubCommandExtend for CheckCommand {
    async fn run(&self, opts: &Opts) -> Result<()> {
        let db = IMDBBuilder::new(opts.conf_dir.clone()).index(false).open().await?;
        let images = db.all_images().await?;
        let drifted = find_drifted(&images);

        for (image, expected) in &drifted {
            println!("{}\t{}\t{}\t{}", image.id, image.filename, image.condition, expected);
        }
        info!("共检查 {} 条记录，{} 条标签与当前规则不一致", images.len(), drifted.len());
        println!("checked: {}, mismatched: {}", images.len(), drifted.len());
        Ok(())
    }
}

/// 找出已保存标签与当前推导结果不同的记录，只报告不修改
fn find_drifted(images: &[ImageInfo]) -> Vec<(&ImageInfo, String)> {
    images
        .iter()
        .filter_map(|image| {
            let expected = derive_condition(&image.filename);
            (expected != image.condition).then_some((image, expected))
        })
        .collect()
}
