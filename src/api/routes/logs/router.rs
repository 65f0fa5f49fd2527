//! Router for the network log API

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use super::public;
use crate::api::routes::SharedState;
use crate::chat::NetworkLogStore;

fn logs_response(log: &NetworkLogStore) -> public::LogsResponse {
    public::LogsResponse {
        entries: log.entries().to_vec(),
        expanded: log.expanded().iter().copied().collect(),
    }
}

async fn logs_list(State(state): State<SharedState>) -> Json<public::LogsResponse> {
    let shared = state.read().expect("Unable to read shared state");
    Json(logs_response(shared.session.network_log()))
}

async fn logs_toggle(State(state): State<SharedState>, Path(id): Path<u64>) -> Response {
    let mut shared = state.write().expect("Unable to write shared state");
    match shared.session.toggle_log(id) {
        Some(expanded) => Json(public::ToggleResponse { id, expanded }).into_response(),
        None => (StatusCode::NOT_FOUND, format!("Log entry {} not found", id)).into_response(),
    }
}

async fn logs_expand(State(state): State<SharedState>) -> Json<public::LogsResponse> {
    let mut shared = state.write().expect("Unable to write shared state");
    shared.session.expand_all_logs();
    Json(logs_response(shared.session.network_log()))
}

async fn logs_collapse(State(state): State<SharedState>) -> Json<public::LogsResponse> {
    let mut shared = state.write().expect("Unable to write shared state");
    shared.session.collapse_all_logs();
    Json(logs_response(shared.session.network_log()))
}

/// Create the network log router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(logs_list))
        .route("/{id}/toggle", post(logs_toggle))
        .route("/expand", post(logs_expand))
        .route("/collapse", post(logs_collapse))
}
