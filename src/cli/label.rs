use anyhow::Result;
use clap::Parser;

use crate::cli::SubCommandExtend;
use crate::config::Opts;
use crate::label::derive_condition;

#[derive(Parser, Debug, Clone)]
pub struct LabelCommand {
    /// 图片文件名
    #[arg(required = true)]
    pub filenames: Vec<String>,
}

impl SubCommandExtend for LabelCommand {
    async fn run(&self, _opts: &Opts) -> Result<()> {
        for filename in &self.filenames {
            println!("{}\t{}", filename, derive_condition(filename));
        }
        Ok(())
    }
}
