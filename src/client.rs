use reqwest::Client;
use shayli_session::{ChatError, ChatRequest, ChatResponse, ChatTransport};
use tracing::debug;

use crate::config::ClientConfig;
use crate::errors::AppError;

/// Native [`ChatTransport`] posting JSON to the assistant endpoint.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    chat_url: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::Unexpected(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, chat_url: config.chat_url.clone() })
    }

    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }
}

impl ChatTransport for HttpTransport {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, ChatError> {
        debug!("POST {} (conversation: {:?})", self.chat_url, request.conversation_id);

        let resp = self
            .client
            .post(&self.chat_url)
            .json(request)
            .send()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ChatError::Status { status: status.as_u16() });
        }

        resp.json::<ChatResponse>()
            .await
            .map_err(|e| ChatError::Decode(e.to_string()))
    }
}
