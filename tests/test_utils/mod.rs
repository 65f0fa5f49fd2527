//! Test utilities for integration tests
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use axum::{Router, body::Body};
use serde_json::Value;

use chatscope::api::{AppState, app};
use chatscope::core::{ApiConfig, AppConfig, DEFAULT_GREETING, EndpointName};
use chatscope::net::{
    CancelToken, OutboundRequest, ResponseBody, Transport, TransportError, TransportResponse,
};

pub const PRIMARY_URL: &str = "https://dir.example.com/openai/deployments/gpt-4.1";
pub const PRIMARY_KEY: &str = "sk-test-secret";

type Scripted = Result<TransportResponse, TransportError>;

/// Transport that plays back scripted results in order. Once the
/// script runs out, or while `hang_first` requests remain, it blocks
/// until the request is cancelled.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Scripted>>,
    hangs: Mutex<usize>,
    pub sent: Mutex<Vec<OutboundRequest>>,
}

impl MockTransport {
    pub fn new(replies: Vec<Scripted>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            hangs: Mutex::new(0),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Leave the next `count` requests hanging before the script starts
    pub fn hang_first(self, count: usize) -> Self {
        *self.hangs.lock().unwrap() = count;
        self
    }

    pub fn sent(&self) -> Vec<OutboundRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(
        &self,
        request: &OutboundRequest,
        mut cancel: CancelToken,
    ) -> Result<TransportResponse, TransportError> {
        self.sent.lock().unwrap().push(request.clone());
        let hang = {
            let mut hangs = self.hangs.lock().unwrap();
            let hang = *hangs > 0;
            *hangs = hangs.saturating_sub(1);
            hang
        };
        let next = if hang {
            None
        } else {
            self.replies.lock().unwrap().pop_front()
        };
        match next {
            Some(result) => result,
            None => {
                cancel.cancelled().await;
                Err(TransportError::Cancelled)
            }
        }
    }
}

/// A JSON response the way `ReqwestTransport` would report it
pub fn json_response(status: u16, body: Value, elapsed_ms: u64) -> Scripted {
    Ok(TransportResponse {
        status,
        status_text: String::from("OK"),
        headers: vec![
            (String::from("content-type"), String::from("application/json")),
            (String::from("apim-request-id"), String::from("req-123")),
        ],
        body: ResponseBody::Json(body),
        elapsed_ms,
    })
}

pub fn reply(content: &str, elapsed_ms: u64) -> Scripted {
    json_response(
        200,
        serde_json::json!({"choices": [{"message": {"role": "assistant", "content": content}}]}),
        elapsed_ms,
    )
}

/// Primary endpoint configured, secondary left blank
pub fn test_config() -> AppConfig {
    let mut api = ApiConfig::default();
    api.set_url(EndpointName::Primary, PRIMARY_URL);
    api.set_credential(EndpointName::Primary, PRIMARY_KEY);
    AppConfig {
        api,
        model: String::from("gpt-4.1"),
        greeting: String::from(DEFAULT_GREETING),
        request_timeout: None,
    }
}

pub fn test_app_with(config: AppConfig, transport: Arc<MockTransport>) -> Router {
    let app_state = AppState::new(&config, transport);
    app(Arc::new(RwLock::new(app_state)))
}

/// Creates a test application router whose transport answers the
/// first request with "Hi there" after 120ms.
///
/// Tests share no global state but are still marked `#[serial]` to
/// keep log output readable.
pub async fn test_app() -> Router {
    let transport = Arc::new(MockTransport::new(vec![reply("Hi there", 120)]));
    test_app_with(test_config(), transport)
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_to_json(body: Body) -> Value {
    serde_json::from_str(&body_to_string(body).await).unwrap()
}
