use clap::Parser;
use ssi_wallet::{run, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let code = run(cli).await?;
    std::process::exit(code);
}
