use gloo_net::http::Request;
use shayli_session::{ChatError, ChatRequest, ChatResponse, ChatTransport, DEFAULT_CHAT_URL};

/// Browser [`ChatTransport`] posting JSON with `fetch`.
#[derive(Clone, Debug)]
pub struct GlooTransport {
    chat_url: String,
}

impl GlooTransport {
    pub fn new(chat_url: impl Into<String>) -> Self {
        Self { chat_url: chat_url.into() }
    }
}

impl Default for GlooTransport {
    fn default() -> Self {
        Self::new(DEFAULT_CHAT_URL)
    }
}

impl ChatTransport for GlooTransport {
    /// Sends one chat turn via the REST API (non-streaming).
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, ChatError> {
        let resp = Request::post(&self.chat_url)
            .json(request)
            .map_err(|e| ChatError::Decode(format!("Serialize error: {e}")))?
            .send()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;

        if !resp.ok() {
            return Err(ChatError::Status { status: resp.status() });
        }

        resp.json::<ChatResponse>()
            .await
            .map_err(|e| ChatError::Decode(e.to_string()))
    }
}
