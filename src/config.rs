use std::convert::Infallible;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;

use clap::{Parser, Subcommand};
use directories::ProjectDirs;

use crate::cli::*;
use crate::imdb::SearchParams;
use crate::ranking::DISPLAY_COUNT;

static CONF_DIR: LazyLock<ConfDir> = LazyLock::new(|| {
    let proj_dirs = ProjectDirs::from("", "medsearch", "medsearch").expect("failed to get project dir");
    ConfDir { path: proj_dirs.config_dir().to_path_buf() }
});

fn default_config_dir() -> &'static str {
    CONF_DIR.path().to_str().unwrap()
}

#[derive(Parser, Debug, Clone)]
pub struct EmbeddingOptions {
    /// Bedrock 所在区域
    #[arg(long, env = "AWS_REGION", default_value = "us-east-1")]
    pub region: String,
    /// 多模态嵌入模型 ID
    #[arg(long, value_name = "MODEL", default_value = "amazon.titan-embed-image-v1")]
    pub model: String,
    /// 嵌入服务地址，不填则根据区域使用 Bedrock Runtime 默认地址
    #[arg(long, value_name = "URL", env = "MEDSEARCH_EMBEDDING_ENDPOINT")]
    pub embedding_endpoint: Option<String>,
    /// Bedrock API key，以 Bearer token 方式发送
    #[arg(long, env = "AWS_BEARER_TOKEN_BEDROCK", hide_env_values = true)]
    pub api_key: Option<String>,
    /// 嵌入向量维度
    #[arg(long, value_name = "N", default_value_t = 384)]
    pub dimensions: usize,
    /// 嵌入请求超时时间，单位为秒
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    pub embedding_timeout: u64,
}

impl EmbeddingOptions {
    /// 返回 InvokeModel 接口地址
    pub fn invoke_url(&self) -> String {
        let base = match &self.embedding_endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://bedrock-runtime.{}.amazonaws.com", self.region),
        };
        format!("{}/model/{}/invoke", base, self.model)
    }
}

#[derive(Parser, Debug, Clone)]
pub struct SearchOptions {
    /// 向量索引内部考察的候选数量
    #[arg(long, value_name = "N", default_value_t = 100)]
    pub num_candidates: usize,
    /// 向量搜索返回的结果数量
    #[arg(long, value_name = "N", default_value_t = 10)]
    pub limit: usize,
    /// 展示的结果数量
    #[arg(long, value_name = "COUNT", default_value_t = DISPLAY_COUNT, value_parser = parse_count)]
    pub count: usize,
}

impl SearchOptions {
    pub fn params(&self) -> SearchParams {
        SearchParams { num_candidates: self.num_candidates, limit: self.limit }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "medsearch", version)]
pub struct Opts {
    #[command(subcommand)]
    pub subcmd: SubCommand,
    /// medsearch 配置文件目录
    #[arg(short, long, default_value = default_config_dir())]
    pub conf_dir: ConfDir,
}

#[derive(Subcommand, Debug, Clone)]
pub enum SubCommand {
    /// 计算目录下图片的嵌入向量并添加到数据库
    Add(AddCommand),
    /// 以图片或文本搜索相似图片
    Search(SearchCommand),
    /// 启动网页搜索服务
    Server(ServerCommand),
    /// 打印文件名推导出的病症标签
    Label(LabelCommand),
    /// 检查数据库中已保存的标签是否与当前推导规则一致
    Check(CheckCommand),
}

#[derive(Debug, Clone)]
pub struct ConfDir {
    path: PathBuf,
}

impl ConfDir {
    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    /// 返回数据库文件的路径
    pub fn database(&self) -> PathBuf {
        self.path.join("medsearch.db")
    }
}

impl FromStr for ConfDir {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self { path: PathBuf::from(s) })
    }
}

fn parse_count(s: &str) -> anyhow::Result<usize> {
    let n: usize = s.parse()?;
    if n == 0 {
        return Err(anyhow::anyhow!("展示数量至少为 1"));
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoke_url_default_region() {
        let opts = Opts::parse_from(["medsearch", "-c", "/tmp/x", "search", "--text", "a"]);
        let SubCommand::Search(cmd) = opts.subcmd else { panic!("unexpected subcommand") };
        if cmd.embedding.embedding_endpoint.is_none() {
            assert_eq!(
                cmd.embedding.invoke_url(),
                format!(
                    "https://bedrock-runtime.{}.amazonaws.com/model/amazon.titan-embed-image-v1/invoke",
                    cmd.embedding.region
                )
            );
        }
        assert_eq!(cmd.search.count, 5);
        assert_eq!(cmd.search.params(), SearchParams { num_candidates: 100, limit: 10 });
    }

    #[test]
    fn invoke_url_custom_endpoint() {
        let opts = Opts::parse_from([
            "medsearch",
            "search",
            "--text",
            "a",
            "--embedding-endpoint",
            "http://localhost:9000/",
            "--model",
            "m",
        ]);
        let SubCommand::Search(cmd) = opts.subcmd else { panic!("unexpected subcommand") };
        assert_eq!(cmd.embedding.invoke_url(), "http://localhost:9000/model/m/invoke");
    }

    #[test]
    fn zero_count_rejected() {
        let r = Opts::try_parse_from(["medsearch", "search", "--text", "a", "--count", "0"]);
        assert!(r.is_err());
    }

    #[test]
    fn database_path() {
        let dir: ConfDir = "/tmp/conf".parse().unwrap();
        assert_eq!(dir.database(), PathBuf::from("/tmp/conf/medsearch.db"));
    }
}
