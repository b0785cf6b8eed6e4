use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    repochunk_cli::main_entry().await
}
