use anyhow::Result;
use clap::Parser;

mod args;
mod cmd;
mod logging;
mod output;
mod store;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = args::Cli::parse();
    output::init(cli.json);
    logging::init(cli.verbose, cli.json);

    cmd::dispatch(cli).await
}
