use pos_server::utils::logger;
use pos_server::{Config, Server, ServerState, print_banner};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let config = Config::from_env();

    let log_dir = config.log_to_file.then(|| config.log_dir());
    let _log_guard = logger::init(&config.log_level, log_dir.as_deref());

    print_banner();
    tracing::info!("FoodPOS server starting...");

    let state = ServerState::initialize(&config).await;
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {e}");
        return Err(e.into());
    }

    Ok(())
}
