use mock_server::config::ServerConfig;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = ServerConfig::load()?;
    mock_server::telemetry::init(&config.log_level)?;

    let addr = config.addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "mock listings backend listening");
    mock_server::run(listener).await?;
    Ok(())
}
