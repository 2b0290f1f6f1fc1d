//! Chatbridge - stateless chat relay for LLM completion endpoints
//!
//! Accepts chat-style requests over HTTP, prepends a configured system
//! prompt, forwards the conversation to an upstream completion API, and
//! returns the generated text to the caller.

pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod telemetry;
pub mod upstream;
