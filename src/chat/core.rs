use thiserror::Error;

use super::models::{ChatMessage, ConversationStore, Sender};
use super::netlog::{NetworkLogEntry, NetworkLogStore};
use super::outcome::{Outcome, classify};
use crate::core::{ApiConfig, AppConfig, DEFAULT_GREETING, EndpointName};
use crate::net::{
    CancelToken, OutboundRequest, RequestError, Transport, TransportError, TransportResponse,
    build,
};
use crate::openai::DEFAULT_MODEL;

/// Reasons a send is refused before anything goes over the wire.
/// Nothing is appended to the transcript or the log when these occur.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SendError {
    #[error("message is empty")]
    EmptyMessage,
    #[error("a request is already in flight")]
    Busy,
    #[error("endpoint URL is not configured")]
    InvalidConfig,
    #[error("failed to encode request: {0}")]
    Encode(String),
    #[error("no user message with id {0}")]
    UnknownMessage(u64),
}

impl From<RequestError> for SendError {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::InvalidConfig => SendError::InvalidConfig,
            RequestError::Encode(e) => SendError::Encode(e.to_string()),
        }
    }
}

/// A send that has been recorded in the transcript and is waiting on
/// the transport. Hand it back to `Session::complete` with the result.
#[derive(Debug, Clone)]
pub struct PendingSend {
    pub request: OutboundRequest,
    pub endpoint: EndpointName,
}

/// One chat session: endpoint configuration, the transcript and the
/// network log.
///
/// Sending is split in two halves around the network call so a
/// session behind a lock doesn't have to stay locked while the
/// request is in flight:
///
/// ```ignore
/// let pending = session.begin("Hello")?;
/// let result = transport.send(&pending.request, token).await;
/// let outcome = session.complete(pending, result);
/// ```
///
/// `send` does all three for callers that own the session.
pub struct Session {
    config: ApiConfig,
    model: String,
    conversation: ConversationStore,
    network_log: NetworkLogStore,
    in_flight: bool,
}

impl Session {
    pub fn from_config(config: &AppConfig) -> Self {
        SessionBuilder::new(&config.model)
            .api_config(config.api.clone())
            .greeting(&config.greeting)
            .build()
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Edits apply to the next send, never the one in flight.
    pub fn config_mut(&mut self) -> &mut ApiConfig {
        &mut self.config
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.conversation.messages()
    }

    pub fn network_log(&self) -> &NetworkLogStore {
        &self.network_log
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    /// Record the user's message and build the request against a
    /// snapshot of the selected endpoint.
    pub fn begin(&mut self, text: &str) -> Result<PendingSend, SendError> {
        if text.trim().is_empty() {
            return Err(SendError::EmptyMessage);
        }
        if self.in_flight {
            return Err(SendError::Busy);
        }

        let (endpoint, endpoint_config) = self.config.snapshot();
        let request = build(text, &endpoint_config, &self.model)?;

        self.conversation.append(text, Sender::User, false);
        self.in_flight = true;
        tracing::debug!(
            "Sending message via [{}] {}",
            endpoint.label(),
            request.url
        );

        Ok(PendingSend { request, endpoint })
    }

    /// Classify the transport result, append the reply and, unless the
    /// request was cancelled, its log entry.
    pub fn complete(
        &mut self,
        pending: PendingSend,
        result: Result<TransportResponse, TransportError>,
    ) -> Outcome {
        self.in_flight = false;

        let outcome = classify(&result);
        tracing::info!("Request outcome: {:?}", outcome);

        self.conversation
            .append(outcome.reply_text(), Sender::Bot, outcome.is_error());

        let entry = match &result {
            Err(TransportError::Cancelled) => None,
            Err(TransportError::Failed(message)) => Some(NetworkLogEntry::from_failure(
                &pending.request,
                pending.endpoint,
                message,
            )),
            Ok(response) => Some(NetworkLogEntry::from_response(
                &pending.request,
                pending.endpoint,
                response,
            )),
        };
        if let Some(entry) = entry {
            self.network_log.append(entry);
        }

        outcome
    }

    pub async fn send<T: Transport + ?Sized>(
        &mut self,
        transport: &T,
        text: &str,
        cancel: CancelToken,
    ) -> Result<Outcome, SendError> {
        let pending = self.begin(text)?;
        let result = transport.send(&pending.request, cancel).await;
        Ok(self.complete(pending, result))
    }

    /// Text of an earlier user message, to send again.
    pub fn replay_text(&self, message_id: u64) -> Result<String, SendError> {
        self.conversation
            .get(message_id)
            .filter(|m| m.sender == Sender::User)
            .map(|m| m.text.clone())
            .ok_or(SendError::UnknownMessage(message_id))
    }

    pub async fn replay<T: Transport + ?Sized>(
        &mut self,
        transport: &T,
        message_id: u64,
        cancel: CancelToken,
    ) -> Result<Outcome, SendError> {
        let text = self.replay_text(message_id)?;
        self.send(transport, &text, cancel).await
    }

    /// Back to the greeting with an empty network log.
    pub fn reset(&mut self) {
        self.conversation.reset();
        self.network_log.clear();
        tracing::debug!("Conversation reset");
    }

    pub fn toggle_log(&mut self, id: u64) -> Option<bool> {
        self.network_log.toggle(id)
    }

    pub fn expand_all_logs(&mut self) {
        self.network_log.expand_all();
    }

    pub fn collapse_all_logs(&mut self) {
        self.network_log.collapse_all();
    }
}

pub struct SessionBuilder {
    config: ApiConfig,
    model: String,
    greeting: String,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL)
    }
}

impl SessionBuilder {
    pub fn new(model: &str) -> Self {
        Self {
            config: ApiConfig::default(),
            model: model.to_string(),
            greeting: DEFAULT_GREETING.to_string(),
        }
    }

    pub fn build(self) -> Session {
        Session {
            config: self.config,
            model: self.model,
            conversation: ConversationStore::new(&self.greeting),
            network_log: NetworkLogStore::new(),
            in_flight: false,
        }
    }

    pub fn api_config(mut self, config: ApiConfig) -> Self {
        self.config = config;
        self
    }

    pub fn greeting(mut self, greeting: &str) -> Self {
        self.greeting = greeting.to_string();
        self
    }
}
