//! Command-line interface for Chatbridge
//!
//! Provides argument parsing and subcommand handling for the Chatbridge binary.

use clap::{Parser, Subcommand};

/// Stateless chat relay for LLM completion endpoints
#[derive(Parser)]
#[command(name = "chatbridge")]
#[command(version)]
#[command(about = "Stateless chat relay for LLM completion endpoints")]
#[command(
    long_about = "Chatbridge accepts chat conversations over HTTP, prepends a configured \
    system prompt, and forwards them to an upstream completion API, returning the \
    generated text to the caller."
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a template configuration file
    Config {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,
    },
}

/// Generate template configuration content
pub fn generate_config_template() -> &'static str {
    r#"# Chatbridge Configuration
# ========================
#
# This file configures the HTTP server, the upstream completion endpoint,
# the system prompt, and observability settings for Chatbridge.
#
# The upstream API credential is normally supplied via the OPENAI_API_KEY
# environment variable and should not be committed to this file. The PORT
# environment variable overrides server.port when set.

[server]
# IP address to bind to (0.0.0.0 for all interfaces, 127.0.0.1 for localhost only)
host = "0.0.0.0"

# Port to listen on
port = 3000

# Upstream request timeout in seconds (1-300)
request_timeout_seconds = 30

[upstream]
# Completion API base URL (must end with /v1; the relay posts to /v1/responses)
base_url = "https://api.openai.com/v1"

# Model identifier sent with every completion request
model = "gpt-5-mini"

# API credential - prefer the OPENAI_API_KEY environment variable
# api_key = "sk-..."

[prompt]
# System prompt template prepended to every conversation.
# {user_name} and {dimension} are replaced with the request's values.
# template = "You are a facilitator coach. ... User name: {user_name}. Dimension/context: {dimension}."

# Fallbacks used when the request omits the corresponding field
default_user_name = "Unknown"
default_dimension = "None"

[observability]
# Log level: trace, debug, info, warn, error (RUST_LOG overrides this)
log_level = "info"
"#
}
