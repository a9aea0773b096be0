//! Native side of the Shayli companion: the assistant backend that serves the
//! chat endpoint, and the HTTP transport used by the terminal client.

pub mod agent;
pub mod client;
pub mod config;
pub mod errors;
pub mod models;
pub mod routes;
pub mod service;

/// Installs the fmt subscriber, honouring `RUST_LOG` when set.
pub fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();
}
