use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use shayli_session::ChatRequest;
use tracing::warn;

use crate::errors::AppError;
use crate::service::chat_service::ChatService;

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST `/api/v1/chat` — one chat turn, JSON in and out
pub async fn chat_handler(
    State(svc): State<ChatService>,
    Json(request): Json<ChatRequest>,
) -> Response {
    match svc.chat(request).await {
        Ok(response) => Json(response).into_response(),
        Err(err) => error_response(&err),
    }
}

/// GET `/api/v1/conversations/{id}/messages` — stored turns of a conversation
pub async fn list_messages_handler(
    Path(id): Path<String>,
    State(svc): State<ChatService>,
) -> Response {
    match svc.get_messages(&id).await {
        Ok(msgs) => Json(msgs).into_response(),
        Err(err) => error_response(&err),
    }
}

/// GET `/api/v1/health`
pub async fn health_handler() -> &'static str {
    "ok"
}

// ── Helper ────────────────────────────────────────────────────────────────────

fn error_response(err: &AppError) -> Response {
    let status = err.status_code();
    warn!("Request failed with {status}: {err}");
    (status, err.to_string()).into_response()
}
