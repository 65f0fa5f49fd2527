use anyhow::Result;
use chatscope::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
