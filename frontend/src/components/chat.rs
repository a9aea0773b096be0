use leptos::ev;
use leptos::html;
use leptos::prelude::*;
use shayli_session::Turn;

use crate::state::ChatState;

/// Chat overlay. Mounts a fresh session each time `is_open` turns true and
/// discards it when closed.
#[component]
pub fn AiChat(#[prop(into)] is_open: Signal<bool>, on_close: Callback<()>) -> impl IntoView {
    view! {
        <Show when=move || is_open.get()>
            <ChatPanel on_close=on_close />
        </Show>
    }
}

/// Header, transcript and input of one open chat.
#[component]
fn ChatPanel(on_close: Callback<()>) -> impl IntoView {
    let state = ChatState::provide();

    // A reply landing after unmount must not touch disposed signals.
    let session = state.session();
    on_cleanup(move || session.close());

    // Keep the transcript pinned to its end
    let scroll_ref = NodeRef::<html::Div>::new();
    Effect::new(move |_| {
        state.transcript.track();
        state.pending.track();
        if let Some(el) = scroll_ref.get() {
            el.set_scroll_top(el.scroll_height());
        }
    });

    view! {
        <div class="chat-overlay">
            <div class="chat-card">
                <div class="chat-header">
                    <div>
                        <h2>"🤖 مشاوره با شایلی"</h2>
                        {move || {
                            state.conversation_id.get().map(|id| {
                                view! {
                                    <span class="conversation-id">
                                        {id.chars().take(8).collect::<String>()}
                                    </span>
                                }
                            })
                        }}
                    </div>
                    <button class="close-btn" on:click=move |_| on_close.run(())>
                        "✕"
                    </button>
                </div>

                <div class="messages-container" node_ref=scroll_ref>
                    {move || {
                        state.transcript.with(|t| t.is_empty()).then(|| {
                            view! {
                                <div class="empty-state">
                                    <p class="greeting">"سلام! من شایلی هستم 👋"</p>
                                    <p>"درباره پوست و موهایت از من بپرس"</p>
                                </div>
                            }
                        })
                    }}
                    <For
                        each=move || state.transcript.get()
                        key=|turn| turn.id.clone()
                        let:turn
                    >
                        <MessageBubble turn=turn />
                    </For>
                    <Show when=move || state.pending.get()>
                        <div class="message assistant typing">"شایلی در حال تایپ است..."</div>
                    </Show>
                </div>

                <ChatInput />
                <p class="disclaimer">
                    "اطلاعات ارائه شده صرفاً جنبه آموزشی دارد و جایگزین مشاوره پزشک نیست"
                </p>
            </div>
        </div>
    }
}

/// A single chat message bubble.
#[component]
fn MessageBubble(turn: Turn) -> impl IntoView {
    let css_class = if turn.is_user() {
        "message user"
    } else {
        "message assistant"
    };

    view! {
        <div class=css_class>
            <p class="message-text">{turn.text}</p>
            <p class="message-time">{turn.created_at}</p>
        </div>
    }
}

/// Chat input with textarea and send button. Enter sends, Shift+Enter
/// inserts a newline.
#[component]
fn ChatInput() -> impl IntoView {
    let state = expect_context::<ChatState>();

    let is_sending = move || state.pending.get();

    let on_keydown = move |ev: ev::KeyboardEvent| {
        if ev.key() == "Enter" && !ev.shift_key() {
            ev.prevent_default();
            state.send();
        }
    };

    view! {
        <div class="input-area">
            <div class="input-row">
                <textarea
                    rows="2"
                    placeholder="سوالت رو بپرس..."
                    prop:value=move || state.draft.get()
                    on:input=move |ev| state.set_draft(event_target_value(&ev))
                    on:keydown=on_keydown
                    disabled=is_sending
                />
                <button
                    class="send-btn"
                    on:click=move |_| state.send()
                    disabled=move || is_sending() || state.draft.with(|d| d.trim().is_empty())
                >
                    {move || if is_sending() { "…" } else { "ارسال" }}
                </button>
            </div>
        </div>
    }
}
