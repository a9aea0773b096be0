use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, info, warn};

use crate::errors::ChatError;
use crate::models::{ChatRequest, ChatResponse, Turn};
use crate::transport::ChatTransport;

/// Reply shown in place of the assistant's answer when a request fails.
pub const FALLBACK_REPLY: &str =
    "متأسفانه خطایی رخ داده است. لطفاً مطمئن شوید که سرور روی localhost:8000 در حال اجرا است.";

/// Where a session is in its request cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Awaiting,
}

/// Point-in-time copy of a session's state, handed to observers and callers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub transcript: Vec<Turn>,
    pub pending: bool,
    pub conversation_id: Option<String>,
    pub draft: String,
}

impl SessionSnapshot {
    pub fn phase(&self) -> SessionPhase {
        if self.pending {
            SessionPhase::Awaiting
        } else {
            SessionPhase::Idle
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The draft was empty after trimming.
    Empty,
    /// Another request is still in flight.
    Busy,
    /// The session has been closed.
    Closed,
}

/// What a call to [`ChatSession::submit`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing was appended and no request was sent.
    Ignored(IgnoreReason),
    /// The backend answered and its reply was appended.
    Replied,
    /// The request failed and the fallback reply was appended.
    Failed,
    /// The session was closed before the request settled; the result was dropped.
    Discarded,
}

type Observer = Arc<dyn Fn(&SessionSnapshot) + Send + Sync>;

#[derive(Default)]
struct SessionState {
    snapshot: SessionSnapshot,
    closed: bool,
}

/// Owns a chat transcript and drives the request/response cycle with the
/// assistant backend.
///
/// At most one request is in flight per session: the pending flag is checked
/// and set under the same lock before the transport is awaited, so parallel
/// callers cannot both pass the gate. The lock is never held across the
/// network call.
///
/// Clones share the same underlying state.
pub struct ChatSession<T> {
    state: Arc<Mutex<SessionState>>,
    transport: Arc<T>,
    observer: Option<Observer>,
    fallback_text: Arc<str>,
}

impl<T> Clone for ChatSession<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            transport: Arc::clone(&self.transport),
            observer: self.observer.clone(),
            fallback_text: Arc::clone(&self.fallback_text),
        }
    }
}

impl<T: ChatTransport> ChatSession<T> {
    pub fn new(transport: T) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState::default())),
            transport: Arc::new(transport),
            observer: None,
            fallback_text: Arc::from(FALLBACK_REPLY),
        }
    }

    /// Registers a callback invoked with a fresh snapshot after every
    /// observable change. Callbacks run outside the state lock.
    pub fn with_observer(
        mut self,
        observer: impl Fn(&SessionSnapshot) + Send + Sync + 'static,
    ) -> Self {
        self.observer = Some(Arc::new(observer));
        self
    }

    /// Replaces the canned reply appended on failure. Blank text is ignored
    /// so failure turns are never empty.
    pub fn with_fallback_text(mut self, text: impl Into<String>) -> Self {
        let text: String = text.into();
        let text = text.trim();
        if text.is_empty() {
            warn!("Ignoring blank fallback reply");
        } else {
            self.fallback_text = Arc::from(text);
        }
        self
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.lock().snapshot.clone()
    }

    pub fn is_pending(&self) -> bool {
        self.lock().snapshot.pending
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    pub fn conversation_id(&self) -> Option<String> {
        self.lock().snapshot.conversation_id.clone()
    }

    pub fn transcript_len(&self) -> usize {
        self.lock().snapshot.transcript.len()
    }

    /// Stores the not-yet-sent input text.
    pub fn set_draft(&self, text: impl Into<String>) {
        let snapshot = {
            let mut state = self.lock();
            if state.closed {
                return;
            }
            state.snapshot.draft = text.into();
            state.snapshot.clone()
        };
        self.notify(&snapshot);
    }

    /// Sends `draft_text` to the assistant and appends both sides of the
    /// exchange to the transcript.
    ///
    /// Blank input, a request already in flight, or a closed session make
    /// this a no-op. Failures never escape: they end up as the fallback
    /// reply in the transcript.
    pub async fn submit(&self, draft_text: &str) -> SubmitOutcome {
        let message = draft_text.trim();
        if message.is_empty() {
            return SubmitOutcome::Ignored(IgnoreReason::Empty);
        }

        let (request, snapshot) = {
            let mut state = self.lock();
            if state.closed {
                return SubmitOutcome::Ignored(IgnoreReason::Closed);
            }
            if state.snapshot.pending {
                debug!("Ignoring submit while a request is in flight");
                return SubmitOutcome::Ignored(IgnoreReason::Busy);
            }

            state.snapshot.transcript.push(Turn::user(message));
            state.snapshot.draft.clear();
            state.snapshot.pending = true;

            let request = ChatRequest {
                message: message.to_string(),
                conversation_id: state.snapshot.conversation_id.clone(),
            };
            (request, state.snapshot.clone())
        };
        self.notify(&snapshot);

        let result = self.transport.send(&request).await.and_then(non_blank_reply);

        let (outcome, snapshot) = {
            let mut state = self.lock();
            if state.closed {
                debug!("Session closed before the reply arrived; dropping result");
                return SubmitOutcome::Discarded;
            }

            let outcome = match result {
                Ok(response) => {
                    match state.snapshot.conversation_id.clone() {
                        None => {
                            info!("Conversation started: {}", response.conversation_id);
                            state.snapshot.conversation_id = Some(response.conversation_id);
                        }
                        Some(current) if current != response.conversation_id => {
                            warn!(
                                "Backend sent conversation {} but session is bound to {current}",
                                response.conversation_id
                            );
                        }
                        Some(_) => {}
                    }
                    state
                        .snapshot
                        .transcript
                        .push(Turn::assistant(response.message_id, response.response));
                    SubmitOutcome::Replied
                }
                Err(e) => {
                    if e.is_unreachable() {
                        error!("Assistant backend unreachable: {e}");
                    } else {
                        error!("Chat request failed: {e}");
                    }
                    let id = uuid::Uuid::new_v4().to_string();
                    state
                        .snapshot
                        .transcript
                        .push(Turn::assistant(id, &*self.fallback_text));
                    SubmitOutcome::Failed
                }
            };

            state.snapshot.pending = false;
            (outcome, state.snapshot.clone())
        };
        self.notify(&snapshot);

        outcome
    }

    /// Drops the transcript and stops applying results. No backend call is made.
    pub fn close(&self) {
        let mut state = self.lock();
        if !state.closed {
            debug!("Closing chat session");
        }
        state.closed = true;
        state.snapshot = SessionSnapshot::default();
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, snapshot: &SessionSnapshot) {
        if let Some(observer) = &self.observer {
            observer(snapshot);
        }
    }
}

fn non_blank_reply(response: ChatResponse) -> Result<ChatResponse, ChatError> {
    if response.response.trim().is_empty() {
        Err(ChatError::Decode("empty assistant reply".to_string()))
    } else {
        Ok(response)
    }
}
