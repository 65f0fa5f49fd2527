//! Router for the chat API

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};

use super::public;
use crate::api::public::ApiError;
use crate::api::routes::SharedState;
use crate::net::{CancelHandle, cancel_pair};

/// Fires the cancel handle unless disarmed, so a handler dropped
/// mid-request (client gone) still lets the send finish as cancelled.
struct CancelOnDrop(Option<CancelHandle>);

impl CancelOnDrop {
    fn disarm(&mut self) {
        self.0 = None;
    }
}

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        if let Some(handle) = self.0.take() {
            tracing::info!("Chat request abandoned, cancelling");
            handle.cancel();
        }
    }
}

/// Run one send against the shared session. The lock is only held
/// while recording, never while the transport is awaited, so cancel
/// and the read-only routes stay responsive.
///
/// The transport call and `complete` run in their own task so the
/// session is always released, even when this future is dropped.
async fn dispatch(state: &SharedState, text: &str) -> Result<public::ChatResponse, ApiError> {
    let (pending, transport, handle, token, user_message) = {
        let mut shared = state.write().expect("Unable to write shared state");
        let pending = shared.session.begin(text)?;
        let user_message = shared.session.messages().last().cloned();
        let (handle, token) = cancel_pair();
        shared.active_cancel = Some(handle.clone());
        (
            pending,
            Arc::clone(&shared.transport),
            handle,
            token,
            user_message,
        )
    };

    let mut guard = CancelOnDrop(Some(handle));
    let task_state = Arc::clone(state);
    let exchange = tokio::spawn(async move {
        let result = transport.send(&pending.request, token).await;

        let mut shared = task_state.write().expect("Unable to write shared state");
        shared.active_cancel = None;
        let outcome = shared.session.complete(pending, result);
        let reply = shared.session.messages().last().cloned();
        (outcome, reply)
    });

    let joined = exchange.await;
    guard.disarm();
    let (outcome, reply) = joined?;

    let messages = user_message.into_iter().chain(reply).collect();
    Ok(public::ChatResponse { outcome, messages })
}

/// Send a message and wait for the classified reply
async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<public::ChatRequest>,
) -> Result<Json<public::ChatResponse>, ApiError> {
    let resp = dispatch(&state, &payload.message).await?;
    Ok(Json(resp))
}

/// The full transcript, greeting first
async fn chat_messages(State(state): State<SharedState>) -> Json<public::MessagesResponse> {
    let shared = state.read().expect("Unable to read shared state");
    Json(public::MessagesResponse {
        messages: shared.session.messages().to_vec(),
    })
}

async fn chat_cancel(State(state): State<SharedState>) -> Json<public::CancelResponse> {
    let cancelled = state
        .write()
        .expect("Unable to write shared state")
        .cancel_active();
    if cancelled {
        tracing::info!("Cancelled in-flight chat request");
    }
    Json(public::CancelResponse { cancelled })
}

async fn chat_reset(State(state): State<SharedState>) -> Json<public::MessagesResponse> {
    let mut shared = state.write().expect("Unable to write shared state");
    shared.session.reset();
    Json(public::MessagesResponse {
        messages: shared.session.messages().to_vec(),
    })
}

/// Send the text of an earlier user message again
async fn chat_replay(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
) -> Result<Json<public::ChatResponse>, ApiError> {
    let text = state
        .read()
        .expect("Unable to read shared state")
        .session
        .replay_text(id)?;
    let resp = dispatch(&state, &text).await?;
    Ok(Json(resp))
}

/// Create the chat router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", post(chat_handler))
        .route("/messages", get(chat_messages))
        .route("/cancel", post(chat_cancel))
        .route("/reset", post(chat_reset))
        .route("/replay/{id}", post(chat_replay))
}
