//! Public types for the chat API
use serde::{Deserialize, Serialize};

use crate::chat::{ChatMessage, Outcome};

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub outcome: Outcome,
    // The user's message followed by the reply
    pub messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
pub struct MessagesResponse {
    pub messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
pub struct CancelResponse {
    pub cancelled: bool,
}
