// REST routes for the relay
// /chat always answers 200 with {"reply": ...}; failures live in the reply text.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tracing::debug;

use super::RelayServerState;
use crate::relay::{ChatReply, ChatRequest};

pub const LIVENESS_TEXT: &str = "Chatbot backend is running!";

// ---- Route registration ----

pub fn relay_routes() -> Router<Arc<RelayServerState>> {
    Router::new()
        .route("/", get(home))
        .route("/chat", post(chat))
}

// ---- Handlers ----

async fn home() -> &'static str {
    LIVENESS_TEXT
}

async fn chat(
    State(state): State<Arc<RelayServerState>>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Json<ChatReply> {
    // Unparseable bodies are treated like a missing message
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            debug!(error = %rejection, "Unreadable chat request body");
            ChatRequest::default()
        }
    };

    Json(state.relay.handle(request.message.as_deref()).await)
}
