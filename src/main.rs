use agent_playground::adapters::mock_transport::MockAgentTransport;
use agent_playground::cli::Cli;
use agent_playground::config::Settings;
use agent_playground::directory::AgentDirectory;
use agent_playground::domain::AgentTransport;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let settings = Settings::new_with_cli(&cli)?;

    info!(
        "Starting Agent Playground on {}:{}",
        settings.server.host, settings.server.port
    );

    let directory = Arc::new(AgentDirectory::from_settings(&settings));
    info!("Agent directory loaded with {} agents", directory.len());

    let transport: Arc<dyn AgentTransport> =
        Arc::new(MockAgentTransport::new(directory, settings.transport.clone()));

    let app = agent_playground::create_app(transport, &settings.ui.dist_dir);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
