mod api;
mod components;
mod state;

use leptos::mount::mount_to_body;
use leptos::prelude::*;
use shayli_session::UserProfile;

use components::chat::AiChat;

/// Root component. Stands in for the dashboard: it greets the user from the
/// onboarding profile and owns the chat's visibility.
#[component]
fn App(profile: UserProfile) -> impl IntoView {
    let (show_chat, set_show_chat) = signal(false);
    let on_close = Callback::new(move |_| set_show_chat.set(false));

    let greeting = if profile.name.is_empty() {
        "سلام! 👋".to_string()
    } else {
        format!("سلام {}! 👋", profile.name)
    };
    let badges: Vec<String> = [profile.skin_type, profile.hair_type]
        .into_iter()
        .filter(|t| !t.is_empty())
        .collect();

    view! {
        <div class="app-container" dir="rtl">
            <header class="dashboard-header">
                <div>
                    <h1>{greeting}</h1>
                    <p>"آماده‌ای برای مراقبت از خودت؟"</p>
                    <div class="profile-badges">
                        {badges
                            .into_iter()
                            .map(|b| view! { <span class="badge">{b}</span> })
                            .collect_view()}
                    </div>
                </div>
                <button class="open-chat-btn" on:click=move |_| set_show_chat.set(true)>
                    "💬 مشاوره با شایلی"
                </button>
            </header>
            <AiChat is_open=show_chat on_close=on_close />
        </div>
    }
}

fn main() {
    console_log::init_with_level(log::Level::Debug).expect("Failed to init logger");
    mount_to_body(|| view! { <App profile=UserProfile::default() /> });
}
