use async_trait::async_trait;
use rig::client::Nothing;
use rig::completion::Chat;
use rig::message::Message as RigMessage;
use rig::prelude::CompletionClient;
use rig::providers::ollama;
use tracing::error;

use crate::errors::AppError;
use crate::models::{MessageRole, StoredMessage};

const PREAMBLE: &str = "You are Shayli, a friendly skin and hair care advisor. \
                        Answer in the language the user writes in. \
                        Keep answers short and practical, \
                        and suggest simple routines and product types rather than brands. \
                        Your advice is educational only; recommend seeing a dermatologist \
                        for medical conditions. If you don't know something, say so.";

/// Produces the assistant's reply for one chat turn.
#[async_trait]
pub trait Assistant: Send + Sync {
    /// `history` holds the earlier turns of the conversation, oldest first,
    /// without `user_message`.
    async fn reply(
        &self,
        conversation_id: &str,
        history: &[StoredMessage],
        user_message: &str,
    ) -> Result<String, AppError>;
}

/// Builds a rig [`RigMessage`] history list from stored turns.
fn to_rig_history(messages: &[StoredMessage]) -> Vec<RigMessage> {
    messages
        .iter()
        .map(|m| match m.role {
            MessageRole::User => RigMessage::user(&m.content),
            MessageRole::Assistant => RigMessage::assistant(&m.content),
        })
        .collect()
}

/// [`Assistant`] backed by a local Ollama model through rig.
/// A fresh agent is built per request and the history replayed each time.
#[derive(Clone)]
pub struct OllamaAssistant {
    client: ollama::Client,
    base_url: String,
    model: String,
}

impl OllamaAssistant {
    pub fn new(base_url: &str, model: &str) -> Result<Self, AppError> {
        let client = ollama::Client::builder()
            .api_key(Nothing)
            .base_url(base_url)
            .build()
            .map_err(|e| AppError::Unexpected(format!("Failed to build Ollama client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl Assistant for OllamaAssistant {
    async fn reply(
        &self,
        conversation_id: &str,
        history: &[StoredMessage],
        user_message: &str,
    ) -> Result<String, AppError> {
        let agent = self.client.agent(&self.model).preamble(PREAMBLE).build();

        agent
            .chat(user_message, to_rig_history(history))
            .await
            .map_err(|e| {
                error!("Ollama inference failed for conversation {conversation_id}: {e}");
                let msg = e.to_string();
                if msg.contains("Connection refused") || msg.contains("connect") {
                    AppError::AssistantUnavailable { host: self.base_url.clone() }
                } else if msg.contains("model") {
                    AppError::ModelNotFound { model_name: self.model.clone() }
                } else {
                    AppError::InferenceError { message: msg }
                }
            })
    }
}
