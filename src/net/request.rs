use http::Method;
use thiserror::Error;
use url::Url;

use crate::core::{AuthScheme, EndpointConfig};
use crate::openai::{CHAT_COMPLETIONS_PATH, CompletionRequest, completion_url};

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("endpoint URL is not configured")]
    InvalidConfig,
    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Everything needed to dispatch one chat completion call. The body
/// is kept as the exact text that goes over the wire so the network
/// log shows what was sent byte for byte.
#[derive(Clone, Debug, PartialEq)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

pub fn auth_header(config: &EndpointConfig) -> (String, String) {
    match config.auth_scheme {
        AuthScheme::Bearer => (
            String::from("Authorization"),
            format!("Bearer {}", config.credential),
        ),
        AuthScheme::TestKey => (String::from("Test-Key"), config.credential.clone()),
    }
}

/// Build the request for a single user message against an endpoint.
pub fn build(
    user_text: &str,
    config: &EndpointConfig,
    model: &str,
) -> Result<OutboundRequest, RequestError> {
    if config.url.trim().is_empty() {
        return Err(RequestError::InvalidConfig);
    }

    let payload = CompletionRequest::single_turn(model, user_text);
    let body = serde_json::to_string_pretty(&payload)?;
    let headers = vec![
        (String::from("accept"), String::from("application/json")),
        (String::from("Content-Type"), String::from("application/json")),
        auth_header(config),
    ];

    Ok(OutboundRequest {
        method: Method::POST,
        url: completion_url(&config.url),
        headers,
        body,
    })
}

/// The part of a request URL worth showing in a log summary, starting
/// at `/chat/completions` when present.
pub fn resource_path(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => {
            let path = parsed.path();
            match path.find(CHAT_COMPLETIONS_PATH) {
                Some(idx) => path[idx..].to_string(),
                None => path.to_string(),
            }
        }
        Err(_) => match url.find('?') {
            Some(idx) => url[..idx].to_string(),
            None => url.to_string(),
        },
    }
}
