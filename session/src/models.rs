use chrono::Local;
use serde::{Deserialize, Serialize};

/// Who authored a [`Turn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// One line of the chat transcript. Turns are never mutated once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    /// Local wall-clock time for display only; ordering is insertion order.
    pub created_at: String,
}

impl Turn {
    /// A user turn with a freshly generated id.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
            sender: Sender::User,
            created_at: display_time(),
        }
    }

    /// An assistant turn carrying the id the backend assigned to the reply.
    pub fn assistant(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            sender: Sender::Assistant,
            created_at: display_time(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}

/// Formats the current local time the way the transcript shows it.
pub fn display_time() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

/// Request body for `POST /api/v1/chat`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

/// Successful response body from `POST /api/v1/chat`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub conversation_id: String,
    pub message_id: String,
    pub timestamp: String,
}

/// Profile collected during onboarding. Displayed by the host app; the chat
/// session never reads or sends it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub age: String,
    pub job: String,
    pub gender: String,
    pub skin_type: String,
    pub skin_concerns: Vec<String>,
    pub hair_type: String,
    pub hair_concerns: Vec<String>,
    pub current_skin_routine: String,
    pub current_hair_routine: String,
}
