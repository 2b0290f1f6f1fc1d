//! Chatbridge HTTP server
//!
//! Starts an Axum web server that relays chat conversations to an upstream
//! LLM completion endpoint.

use chatbridge::{
    cli::{Cli, Command, generate_config_template},
    config::Config,
    handlers, telemetry,
};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Handle subcommands before touching the config file
    if let Some(Command::Config { output }) = cli.command {
        match output {
            Some(path) => {
                std::fs::write(&path, generate_config_template())?;
                println!("Wrote configuration template to {}", path);
            }
            None => print!("{}", generate_config_template()),
        }
        return Ok(());
    }

    // Load configuration and apply environment overrides
    let mut config = Config::from_file(&cli.config)?;
    config.apply_env_overrides();

    // Initialize telemetry
    telemetry::init(&config.observability.log_level);

    tracing::info!(
        "Starting Chatbridge server on {}:{}",
        config.server.host,
        config.server.port
    );
    if config.upstream.api_key().is_none() {
        tracing::warn!(
            "OPENAI_API_KEY is not set - relay requests will fail until it is provided"
        );
    }

    // Create socket address
    let addr = SocketAddr::from((
        config
            .server
            .host
            .parse::<std::net::IpAddr>()
            .unwrap_or_else(|_| std::net::IpAddr::from([0, 0, 0, 0])),
        config.server.port,
    ));

    // Build application state and router
    let state = handlers::AppState::new(Arc::new(config))?;
    let app = handlers::router(state);

    tracing::info!("Listening on {}", addr);
    tracing::info!("Chat endpoint available at http://{}/api/chat", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
