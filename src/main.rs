#[tokio::main]
async fn main() -> std::io::Result<()> {
    arena_sim::run_with_config().await?;
    // The blocking stdin reader cannot be cancelled; exit instead of waiting for another line.
    std::process::exit(0)
}
