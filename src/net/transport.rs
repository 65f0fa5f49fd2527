use std::error::Error as StdError;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::watch;

use super::request::OutboundRequest;

/// Shown in the log in place of a body that isn't valid JSON
pub const NO_RESPONSE_BODY: &str = "No response body";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransportError {
    /// The caller fired the cancel handle. Not a failure.
    #[error("request cancelled")]
    Cancelled,
    /// No usable response: DNS, connect, TLS, timeout, broken body...
    #[error("{0}")]
    Failed(String),
}

/// Fires the paired `CancelToken`. Cheap to clone and safe to fire
/// more than once or after the request already finished.
#[derive(Clone, Debug)]
pub struct CancelHandle(Arc<watch::Sender<bool>>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.send_replace(true);
    }
}

#[derive(Clone, Debug)]
pub struct CancelToken(watch::Receiver<bool>);

impl CancelToken {
    /// A token nobody can fire.
    pub fn never() -> Self {
        let (_handle, token) = cancel_pair();
        token
    }

    pub fn is_cancelled(&self) -> bool {
        *self.0.borrow()
    }

    /// Resolves once the paired handle fires. Pends forever if the
    /// handle is dropped without firing.
    pub async fn cancelled(&mut self) {
        if self.0.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

pub fn cancel_pair() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle(Arc::new(tx)), CancelToken(rx))
}

#[derive(Clone, Debug, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    /// Empty body, HTML error page, truncated JSON... anything that
    /// doesn't parse.
    Unparseable,
}

impl ResponseBody {
    pub fn parse(text: &str) -> Self {
        match serde_json::from_str::<Value>(text) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Unparseable,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Unparseable => None,
        }
    }

    /// Pretty printed with two space indentation for the log.
    pub fn log_text(&self) -> String {
        self.as_json()
            .and_then(|v| serde_json::to_string_pretty(v).ok())
            .unwrap_or_else(|| NO_RESPONSE_BODY.to_string())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub body: ResponseBody,
    /// Dispatch until response headers arrived, rounded to the
    /// nearest millisecond.
    pub elapsed_ms: u64,
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        request: &OutboundRequest,
        cancel: CancelToken,
    ) -> Result<TransportResponse, TransportError>;
}

pub fn round_millis(elapsed: Duration) -> u64 {
    (elapsed.as_secs_f64() * 1000.0).round() as u64
}

fn error_chain(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(&format!(": {}", cause));
        source = cause.source();
    }
    message
}

/// `Transport` backed by a shared `reqwest::Client`.
pub struct ReqwestTransport {
    client: reqwest::Client,
    timeout: Option<Duration>,
}

impl ReqwestTransport {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }

    async fn exchange(
        &self,
        request: &OutboundRequest,
    ) -> Result<TransportResponse, reqwest::Error> {
        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .body(request.body.clone());
        for (name, value) in request.headers.iter() {
            builder = builder.header(name, value);
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let started = Instant::now();
        let response = builder.send().await?;
        let elapsed_ms = round_millis(started.elapsed());

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), String::from_utf8_lossy(v.as_bytes()).into_owned()))
            .collect();
        let text = response.text().await?;

        Ok(TransportResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
            headers,
            body: ResponseBody::parse(&text),
            elapsed_ms,
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        request: &OutboundRequest,
        mut cancel: CancelToken,
    ) -> Result<TransportResponse, TransportError> {
        if cancel.is_cancelled() {
            return Err(TransportError::Cancelled);
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!("Request to {} cancelled", request.url);
                Err(TransportError::Cancelled)
            }
            result = self.exchange(request) => result.map_err(|e| {
                let message = error_chain(&e);
                tracing::error!("Request to {} failed: {}", request.url, message);
                TransportError::Failed(message)
            }),
        }
    }
}
