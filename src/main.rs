use anyhow::Result;
use dayplan::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
