//! Maps the result of a transport attempt to what the user sees.
use serde::Serialize;

use crate::net::{TransportError, TransportResponse};
use crate::openai::{is_content_blocked, reply_content};

pub const CANCELLED_TEXT: &str = "Request cancelled.";
pub const TRANSPORT_ERROR_TEXT: &str =
    "Sorry, I encountered an error while processing your request. Please try again.";
pub const CONTENT_BLOCKED_TEXT: &str = "Content blocked due to Azure safety policy violation.";
pub const UNAUTHORIZED_TEXT: &str = "Authentication failed. Please check your API credentials.";
pub const RATE_LIMITED_TEXT: &str = "Too many requests.";
pub const NOT_FOUND_TEXT: &str = "Not found. Check endpoint URL.";
pub const NO_RESPONSE_TEXT: &str = "No response received";

#[derive(Clone, Serialize, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Cancelled,
    TransportError { message: String },
    ContentBlocked,
    Unauthorized,
    RateLimited,
    NotFound,
    Success { content: String },
}

// Checked in order after cancellation, transport failure and the
// content filter
const STATUS_RULES: [(u16, Outcome); 3] = [
    (401, Outcome::Unauthorized),
    (429, Outcome::RateLimited),
    (404, Outcome::NotFound),
];

/// First match wins: cancellation, transport failure, content
/// filter, then the status table, else success.
pub fn classify(result: &Result<TransportResponse, TransportError>) -> Outcome {
    let response = match result {
        Err(TransportError::Cancelled) => return Outcome::Cancelled,
        Err(TransportError::Failed(message)) => {
            return Outcome::TransportError {
                message: message.clone(),
            };
        }
        Ok(response) => response,
    };

    let body = response.body.as_json();
    if body.map(is_content_blocked).unwrap_or(false) {
        return Outcome::ContentBlocked;
    }

    if let Some((_, outcome)) = STATUS_RULES
        .iter()
        .find(|(status, _)| *status == response.status)
    {
        return outcome.clone();
    }

    // An empty string counts as no reply
    let content = body
        .and_then(reply_content)
        .filter(|c| !c.is_empty())
        .unwrap_or(NO_RESPONSE_TEXT);
    Outcome::Success {
        content: content.to_string(),
    }
}

impl Outcome {
    /// Chat text for this outcome. Never includes raw error details.
    pub fn reply_text(&self) -> &str {
        match self {
            Outcome::Cancelled => CANCELLED_TEXT,
            Outcome::TransportError { .. } => TRANSPORT_ERROR_TEXT,
            Outcome::ContentBlocked => CONTENT_BLOCKED_TEXT,
            Outcome::Unauthorized => UNAUTHORIZED_TEXT,
            Outcome::RateLimited => RATE_LIMITED_TEXT,
            Outcome::NotFound => NOT_FOUND_TEXT,
            Outcome::Success { content } => content,
        }
    }

    pub fn is_error(&self) -> bool {
        !matches!(self, Outcome::Success { .. })
    }

    /// Everything except a cancellation leaves a network log entry.
    pub fn is_logged(&self) -> bool {
        !matches!(self, Outcome::Cancelled)
    }
}
