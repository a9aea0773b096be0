use std::sync::Arc;

use tracing::info;

use shayli::agent::OllamaAssistant;
use shayli::config::ServerConfig;
use shayli::routes::router;
use shayli::service::chat_service::ChatService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (development convenience)
    dotenvy::dotenv().ok();

    shayli::init_tracing("shayli=debug,shayli_session=debug,tower_http=debug");

    let config = ServerConfig::from_env()?;

    // ── Dependency wiring ─────────────────────────────────────────────────────
    let assistant = OllamaAssistant::new(&config.ollama_base_url, &config.model)?;
    let chat_service = ChatService::new(Arc::new(assistant));
    info!(
        "Using model '{}' at {}",
        config.model, config.ollama_base_url
    );

    let app = router(chat_service, &config);

    // ── Listen ────────────────────────────────────────────────────────────────
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{addr}/");

    axum::serve(listener, app).await?;
    Ok(())
}
