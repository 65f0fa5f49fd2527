//! Router for the endpoint configuration API

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post, put},
};

use super::public;
use crate::api::routes::SharedState;
use crate::core::EndpointName;

async fn config_get(State(state): State<SharedState>) -> Json<public::ConfigResponse> {
    let shared = state.read().expect("Unable to read shared state");
    Json(public::ConfigResponse::from(shared.session.config()))
}

/// Edits take effect on the next send
async fn config_update(
    State(state): State<SharedState>,
    Path(endpoint): Path<EndpointName>,
    Json(payload): Json<public::UpdateEndpointRequest>,
) -> Json<public::ConfigResponse> {
    let mut shared = state.write().expect("Unable to write shared state");
    let config = shared.session.config_mut();
    if let Some(url) = payload.url {
        config.set_url(endpoint, &url);
    }
    if let Some(credential) = payload.credential {
        config.set_credential(endpoint, &credential);
    }
    if let Some(auth_scheme) = payload.auth_scheme {
        config.set_auth_scheme(endpoint, auth_scheme);
    }
    tracing::debug!("Updated {} endpoint", endpoint);
    Json(public::ConfigResponse::from(shared.session.config()))
}

async fn config_select(
    State(state): State<SharedState>,
    Json(payload): Json<public::SelectEndpointRequest>,
) -> Json<public::ConfigResponse> {
    let mut shared = state.write().expect("Unable to write shared state");
    shared.session.config_mut().select(payload.endpoint);
    tracing::debug!("Selected {} endpoint", payload.endpoint);
    Json(public::ConfigResponse::from(shared.session.config()))
}

/// Create the config router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(config_get))
        .route("/select", post(config_select))
        .route("/{endpoint}", put(config_update))
}
