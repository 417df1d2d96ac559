#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = classhub_rust::run().await {
        eprintln!("classhub-rust fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
