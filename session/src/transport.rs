use crate::errors::ChatError;
use crate::models::{ChatRequest, ChatResponse};

/// Default chat endpoint of the local assistant backend.
pub const DEFAULT_CHAT_URL: &str = "http://localhost:8000/api/v1/chat";

/// Carries one chat request to the assistant backend.
///
/// Implementations must treat any non-success status as an error without
/// reading the body.
#[allow(async_fn_in_trait)]
pub trait ChatTransport {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, ChatError>;
}

