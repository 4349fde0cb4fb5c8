use floor_server::{Config, Server, ServerState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Environment (dotenv, logging)
    setup_environment()?;

    print_banner();

    tracing::info!("🍜 Floor server starting...");

    // 2. Configuration
    let config = Config::from_env();
    tracing::info!(
        environment = %config.environment,
        port = config.http_port,
        storage = ?config.storage,
        simulator = config.simulator_enabled,
        "Configuration loaded"
    );

    // 3. Server state (table store, manager, catalog, assistant)
    let state = ServerState::initialize(&config).await?;

    // 4. HTTP server (starts background tasks)
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
