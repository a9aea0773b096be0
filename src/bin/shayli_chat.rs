//! Terminal chat with the assistant backend. Each line read from stdin is one
//! turn; `/quit` ends the session.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use shayli::client::HttpTransport;
use shayli::config::ClientConfig;
use shayli_session::{ChatSession, SessionSnapshot, Turn};

fn render(turn: &Turn) -> String {
    let who = if turn.is_user() { "you" } else { "shayli" };
    format!("[{}] {who}: {}", turn.created_at, turn.text)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    shayli::init_tracing("shayli=info,shayli_session=info");

    let config = ClientConfig::from_env()?;
    let transport = HttpTransport::new(&config)?;
    info!("Chatting with {}", transport.chat_url());

    let printed = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&printed);
    let session = ChatSession::new(transport).with_observer(move |snap: &SessionSnapshot| {
        let from = seen.swap(snap.transcript.len(), Ordering::SeqCst);
        for turn in snap.transcript.iter().skip(from) {
            println!("{}", render(turn));
        }
        if snap.pending {
            println!("shayli is typing…");
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim() == "/quit" {
            break;
        }
        session.set_draft(line.as_str());
        session.submit(&line).await;
    }

    session.close();
    Ok(())
}
