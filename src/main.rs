#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = eduai::run().await {
        eprintln!("eduai fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
