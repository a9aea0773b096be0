use std::collections::HashMap;
use std::sync::Arc;

use shayli_session::{ChatRequest, ChatResponse};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use crate::agent::Assistant;
use crate::errors::AppError;
use crate::models::{Conversation, MessageRole, StoredMessage};

const MAX_MESSAGE_LENGTH: usize = 8000;

/// Conversation bookkeeping around the [`Assistant`]. Conversations live in
/// memory only and are gone when the process exits.
///
/// Turns on one conversation are serialized: its lock is held from the
/// history snapshot until both new turns are recorded.
#[derive(Clone)]
pub struct ChatService {
    conversations: Arc<RwLock<HashMap<String, Arc<Mutex<Conversation>>>>>,
    assistant: Arc<dyn Assistant>,
}

impl ChatService {
    pub fn new(assistant: Arc<dyn Assistant>) -> Self {
        Self {
            conversations: Arc::new(RwLock::new(HashMap::new())),
            assistant,
        }
    }

    pub async fn get_messages(
        &self,
        conversation_id: &str,
    ) -> Result<Vec<StoredMessage>, AppError> {
        let conversation = self.find(conversation_id).await?;
        let messages = conversation.lock().await.messages.clone();
        Ok(messages)
    }

    pub async fn conversation_count(&self) -> usize {
        self.conversations.read().await.len()
    }

    pub async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, AppError> {
        // ── Validation ────────────────────────────────────────────────────────
        let message = request.message.trim();
        if message.is_empty() {
            return Err(AppError::EmptyField { field_name: "message".to_string() });
        }
        if message.len() > MAX_MESSAGE_LENGTH {
            return Err(AppError::FieldTooLong {
                field_name: "message".to_string(),
                max_length: MAX_MESSAGE_LENGTH,
                actual_length: message.len(),
            });
        }

        match request.conversation_id {
            Some(id) => {
                let conversation = self.find(&id).await?;
                let mut conversation = conversation.lock().await;
                let response = self.exchange(&id, &mut conversation, message).await?;
                debug!("Conversation {id} now holds {} messages", conversation.messages.len());
                Ok(response)
            }
            None => {
                // Nobody else knows the new id, so the conversation is only
                // published once the assistant has answered.
                let id = Uuid::new_v4().to_string();
                let mut conversation = Conversation::default();
                let response = self.exchange(&id, &mut conversation, message).await?;
                self.conversations
                    .write()
                    .await
                    .insert(id.clone(), Arc::new(Mutex::new(conversation)));
                info!("Created conversation {id}");
                Ok(response)
            }
        }
    }

    async fn find(&self, conversation_id: &str) -> Result<Arc<Mutex<Conversation>>, AppError> {
        self.conversations
            .read()
            .await
            .get(conversation_id)
            .cloned()
            .ok_or_else(|| AppError::ConversationNotFound { id: conversation_id.to_string() })
    }

    /// Asks the assistant with the conversation's history and records both
    /// turns. Nothing is recorded when the assistant fails.
    async fn exchange(
        &self,
        conversation_id: &str,
        conversation: &mut Conversation,
        message: &str,
    ) -> Result<ChatResponse, AppError> {
        let content = self
            .assistant
            .reply(conversation_id, &conversation.messages, message)
            .await?;

        let user_message = StoredMessage::new(MessageRole::User, message.to_string());
        let assistant_message = StoredMessage::new(MessageRole::Assistant, content);
        let response = ChatResponse {
            response: assistant_message.content.clone(),
            conversation_id: conversation_id.to_string(),
            message_id: assistant_message.id.clone(),
            timestamp: assistant_message.created_at.to_rfc3339(),
        };

        conversation.messages.push(user_message);
        conversation.messages.push(assistant_message);
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    /// Echoes the user message and records the history length it was given.
    #[derive(Default)]
    struct EchoAssistant {
        history_lens: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl Assistant for EchoAssistant {
        async fn reply(
            &self,
            _conversation_id: &str,
            history: &[StoredMessage],
            user_message: &str,
        ) -> Result<String, AppError> {
            self.history_lens.lock().unwrap().push(history.len());
            Ok(format!("echo: {user_message}"))
        }
    }

    /// Like [`EchoAssistant`] but yields mid-reply so concurrent turns interleave.
    #[derive(Default)]
    struct YieldingAssistant {
        history_lens: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl Assistant for YieldingAssistant {
        async fn reply(
            &self,
            _conversation_id: &str,
            history: &[StoredMessage],
            user_message: &str,
        ) -> Result<String, AppError> {
            self.history_lens.lock().unwrap().push(history.len());
            tokio::task::yield_now().await;
            Ok(format!("echo: {user_message}"))
        }
    }

    struct DownAssistant;

    #[async_trait]
    impl Assistant for DownAssistant {
        async fn reply(&self, _: &str, _: &[StoredMessage], _: &str) -> Result<String, AppError> {
            Err(AppError::AssistantUnavailable { host: "http://localhost:11434".into() })
        }
    }

    fn request(message: &str, conversation_id: Option<&str>) -> ChatRequest {
        ChatRequest {
            message: message.to_string(),
            conversation_id: conversation_id.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn new_conversation_is_created_and_reused() {
        let assistant = Arc::new(EchoAssistant::default());
        let svc = ChatService::new(assistant.clone());

        let first = svc.chat(request("  Hello ", None)).await.unwrap();
        assert_eq!(first.response, "echo: Hello");
        assert!(!first.message_id.is_empty());

        let second = svc
            .chat(request("How are you?", Some(first.conversation_id.as_str())))
            .await
            .unwrap();
        assert_eq!(second.conversation_id, first.conversation_id);
        assert_ne!(second.message_id, first.message_id);

        assert_eq!(svc.conversation_count().await, 1);
        assert_eq!(*assistant.history_lens.lock().unwrap(), vec![0, 2]);

        let messages = svc.get_messages(&first.conversation_id).await.unwrap();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[0].content, "Hello");
        assert_eq!(messages[3].id, second.message_id);
    }

    #[tokio::test]
    async fn unknown_conversation_is_not_found() {
        let svc = ChatService::new(Arc::new(EchoAssistant::default()));
        let err = svc.chat(request("Hi", Some("missing"))).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(svc.get_messages("missing").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn message_validation() {
        let svc = ChatService::new(Arc::new(EchoAssistant::default()));

        let err = svc.chat(request("   ", None)).await.unwrap_err();
        assert!(matches!(err, AppError::EmptyField { .. }));

        let long = "a".repeat(MAX_MESSAGE_LENGTH + 1);
        let err = svc.chat(request(&long, None)).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::FieldTooLong { actual_length, .. } if actual_length == MAX_MESSAGE_LENGTH + 1
        ));

        assert_eq!(svc.conversation_count().await, 0);
    }

    #[tokio::test]
    async fn assistant_failure_surfaces_as_error() {
        let svc = ChatService::new(Arc::new(DownAssistant));
        for _ in 0..3 {
            let err = svc.chat(request("Hi", None)).await.unwrap_err();
            assert!(err.is_assistant_unavailable());
        }
        assert_eq!(svc.conversation_count().await, 0);
    }

    #[tokio::test]
    async fn concurrent_turns_on_one_conversation_see_each_other() {
        let assistant = Arc::new(YieldingAssistant::default());
        let svc = ChatService::new(assistant.clone());

        let first = svc.chat(request("Hello", None)).await.unwrap();
        let id = first.conversation_id.as_str();

        let (a, b) = tokio::join!(
            svc.chat(request("one", Some(id))),
            svc.chat(request("two", Some(id))),
        );
        a.unwrap();
        b.unwrap();

        assert_eq!(*assistant.history_lens.lock().unwrap(), vec![0, 2, 4]);
        assert_eq!(svc.get_messages(id).await.unwrap().len(), 6);
    }
}
