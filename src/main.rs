use clap::Parser;
use medsearch::Opts;
use medsearch::cli::SubCommandExtend;
use medsearch::config::SubCommand;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let opts = Opts::parse();

    match &opts.subcmd {
        SubCommand::Add(config) => config.run(&opts).await,
        SubCommand::Search(config) => config.run(&opts).await,
        SubCommand::Server(config) => config.run(&opts).await,
        SubCommand::Label(config) => config.run(&opts).await,
        SubCommand::Check(config) => config.run(&opts).await,
    }
}
