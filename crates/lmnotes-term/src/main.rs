use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    lmnotes_term::application::cli::run().await
}
