//! API routes module

pub mod chat;
pub mod config;
pub mod logs;

use std::sync::{Arc, RwLock};

use crate::api::state::AppState;
use axum::Router;

pub type SharedState = Arc<RwLock<AppState>>;

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Conversation routes
        .nest("/chat", chat::router())
        // Network log routes
        .nest("/logs", logs::router())
        // Endpoint configuration routes
        .nest("/config", config::router())
}
