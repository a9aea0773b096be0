//! Platform-neutral core of the Shayli chat widget: the transcript model, the
//! wire types of the assistant endpoint and the [`ChatSession`] state machine.

pub mod errors;
pub mod models;
pub mod session;
pub mod transport;

pub use errors::ChatError;
pub use models::{ChatRequest, ChatResponse, Sender, Turn, UserProfile};
pub use session::{
    ChatSession, IgnoreReason, SessionPhase, SessionSnapshot, SubmitOutcome, FALLBACK_REPLY,
};
pub use transport::{ChatTransport, DEFAULT_CHAT_URL};
