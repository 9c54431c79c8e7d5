#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = staff_eval::run().await {
        eprintln!("staff-eval fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
