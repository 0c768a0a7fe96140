use clap::Parser;
use climate_trends::cli::{run, Cli};
use climate_trends::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli).await
}
