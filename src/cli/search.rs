use std::convert::Infallible;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;
use clap::{ArgGroup, Parser, ValueEnum};
use serde_json::json;

use crate::IMDBBuilder;
use crate::cli::SubCommandExtend;
use crate::config::{EmbeddingOptions, Opts, SearchOptions};
use crate::embedding::{BedrockEmbedder, EmbeddingInput};
use crate::ranking::Ranking;
use crate::searcher::{present, search_similar};

#[derive(Parser, Debug, Clone)]
#[command(group(ArgGroup::new("query").required(true).multiple(true).args(["image", "text"])))]
pub struct SearchCommand {
    #[command(flatten)]
    pub embedding: EmbeddingOptions,
    #[command(flatten)]
    pub search: SearchOptions,
    /// 以图片搜索
    #[arg(long, value_name = "PATH")]
    pub image: Option<PathBuf>,
    /// 以文本搜索
    #[arg(long, value_name = "TEXT")]
    pub text: Option<String>,
    /// 输出格式
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    pub output_format: OutputFormat,
}

impl SubCommandExtend for SearchCommand {
    async fn run(&self, opts: &Opts) -> anyhow::Result<()> {
        let image = match &self.image {
            Some(path) => Some(tokio::fs::read(path).await?),
            None => None,
        };
        let input = EmbeddingInput { image, text: self.text.clone() }.normalized();

        let embedder = BedrockEmbedder::new(&self.embedding)?;
        let db = IMDBBuilder::new(opts.conf_dir.clone()).dimensions(self.embedding.dimensions).open().await?;

        let results = search_similar(&embedder, &db, &input, self.search.params()).await?;

        let (ranking, notice) = present(&results, self.search.count);

        print_result(&ranking, notice.as_deref(), self)
    }
}

fn print_result(ranking: &Ranking, notice: Option<&str>, opts: &SearchCommand) -> Result<()> {
    match opts.output_format {
        OutputFormat::Json => {
            let value = json!({
                "results": ranking.top,
                "recommendation": ranking.recommendation,
                "notice": notice,
            });
            println!("{}", serde_json::to_string_pretty(&value)?)
        }
        OutputFormat::Table => {
            if let Some(notice) = notice {
                eprintln!("{}", notice);
            }
            for result in &ranking.top {
                println!("{:.4}\t{}\t{}", result.score, result.condition, result.filename);
            }
            if let Some(rec) = &ranking.recommendation {
                println!();
                println!("Recommendation: {}", rec.condition);
                println!("Disclaimer: {}", rec.disclaimer);
            }
        }
    }
    Ok(())
}

#[derive(ValueEnum, Debug, Clone)]
pub enum OutputFormat {
    Json,
    Table,
}

impl FromStr for OutputFormat {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(Self::Json),
            _ => Ok(Self::Table),
        }
    }
}
