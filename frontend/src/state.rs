use leptos::prelude::*;
use leptos::task::spawn_local;
use shayli_session::{ChatSession, SubmitOutcome, Turn};

use crate::api::GlooTransport;

/// Reactive mirror of one [`ChatSession`], provided via Leptos context.
///
/// The session is the source of truth; its observer copies every change into
/// the read signals below so views re-render.
#[derive(Clone, Copy)]
pub struct ChatState {
    pub transcript: ReadSignal<Vec<Turn>>,
    pub pending: ReadSignal<bool>,
    pub conversation_id: ReadSignal<Option<String>>,
    pub draft: ReadSignal<String>,
    session: StoredValue<ChatSession<GlooTransport>>,
}

impl ChatState {
    /// Create a fresh session and provide its state in the current context.
    pub fn provide() -> Self {
        let (transcript, set_transcript) = signal(Vec::<Turn>::new());
        let (pending, set_pending) = signal(false);
        let (conversation_id, set_conversation_id) = signal(None::<String>);
        let (draft, set_draft) = signal(String::new());

        let session = ChatSession::new(GlooTransport::default()).with_observer(move |snap| {
            set_transcript.set(snap.transcript.clone());
            set_conversation_id.set(snap.conversation_id.clone());
            set_draft.set(snap.draft.clone());
            set_pending.set(snap.pending);
        });

        let state = Self {
            transcript,
            pending,
            conversation_id,
            draft,
            session: StoredValue::new(session),
        };

        provide_context(state);
        state
    }

    pub fn session(&self) -> ChatSession<GlooTransport> {
        self.session.get_value()
    }

    pub fn set_draft(&self, text: String) {
        self.session.with_value(|session| session.set_draft(text));
    }

    /// Submit the current draft. Blank drafts and submits while a reply is
    /// pending are ignored by the session itself.
    pub fn send(&self) {
        let session = self.session();
        let draft = session.snapshot().draft;

        spawn_local(async move {
            match session.submit(&draft).await {
                SubmitOutcome::Failed => log::warn!("Chat request failed; fallback reply shown"),
                SubmitOutcome::Ignored(reason) => log::debug!("Submit ignored: {reason:?}"),
                _ => {}
            }
        });
    }
}
