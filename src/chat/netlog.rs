//! The network log feed: one immutable record per completed or
//! failed request, newest first, with per entry expand/collapse state.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::models::display_time;
use crate::core::EndpointName;
use crate::net::{OutboundRequest, TransportResponse, header_block, redact, resource_path};

/// Entries at or above this are flagged as slow in the log summary
pub const SLOW_RESPONSE_MS: u64 = 2000;

const SYNTHETIC_STATUS: u16 = 500;
const SYNTHETIC_STATUS_TEXT: &str = "Internal Error";
const SYNTHETIC_RESPONSE_HEADERS: &str = "Content-Type: application/json";

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct NetworkLogEntry {
    pub id: u64,
    pub timestamp: String,
    pub method: String,
    pub url: String,
    pub resource_path: String,
    pub endpoint_label: String,
    pub response_time_ms: Option<u64>,
    pub status_code: u16,
    pub status_text: String,
    pub request_headers: String,
    pub request_body: String,
    pub response_headers: String,
    pub response_body: String,
}

impl NetworkLogEntry {
    fn base(request: &OutboundRequest, endpoint: EndpointName) -> Self {
        Self {
            id: 0,
            timestamp: display_time(),
            method: request.method.to_string(),
            url: request.url.clone(),
            resource_path: resource_path(&request.url),
            endpoint_label: endpoint.label().to_string(),
            response_time_ms: None,
            status_code: 0,
            status_text: String::new(),
            request_headers: redact(&header_block(&request.headers)),
            request_body: request.body.clone(),
            response_headers: String::new(),
            response_body: String::new(),
        }
    }

    /// Record of a request that got an HTTP response, whatever the
    /// status.
    pub fn from_response(
        request: &OutboundRequest,
        endpoint: EndpointName,
        response: &TransportResponse,
    ) -> Self {
        Self {
            response_time_ms: Some(response.elapsed_ms),
            status_code: response.status,
            status_text: response.status_text.clone(),
            response_headers: redact(&header_block(&response.headers)),
            response_body: response.body.log_text(),
            ..Self::base(request, endpoint)
        }
    }

    /// Stand-in record for a request that never got a response. The
    /// raw error only ever shows up here, never in the chat.
    pub fn from_failure(request: &OutboundRequest, endpoint: EndpointName, error: &str) -> Self {
        let body = serde_json::json!({ "error": error });
        Self {
            response_time_ms: Some(0),
            status_code: SYNTHETIC_STATUS,
            status_text: SYNTHETIC_STATUS_TEXT.to_string(),
            response_headers: SYNTHETIC_RESPONSE_HEADERS.to_string(),
            response_body: serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string()),
            ..Self::base(request, endpoint)
        }
    }

    pub fn request_line(&self) -> String {
        format!("{} {} HTTP/1.1", self.method, self.url)
    }

    pub fn status_line(&self) -> String {
        format!("HTTP/1.1 {} {}", self.status_code, self.status_text)
    }

    pub fn is_slow(&self) -> bool {
        self.response_time_ms
            .map(|ms| ms >= SLOW_RESPONSE_MS)
            .unwrap_or(false)
    }
}

/// Log entries kept newest first. Ids come from their own counter,
/// unrelated to chat message ids.
#[derive(Clone, Debug, Default)]
pub struct NetworkLogStore {
    entries: Vec<NetworkLogEntry>,
    expanded: BTreeSet<u64>,
}

impl NetworkLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns the next id, puts the entry at the top of the feed and
    /// expands it. Returns the assigned id.
    pub fn append(&mut self, mut entry: NetworkLogEntry) -> u64 {
        let id = self.entries.len() as u64 + 1;
        entry.id = id;
        self.entries.insert(0, entry);
        self.expanded.insert(id);
        id
    }

    /// Flip an entry between expanded and collapsed. Returns the new
    /// state or `None` if there is no such entry.
    pub fn toggle(&mut self, id: u64) -> Option<bool> {
        self.get(id)?;
        if self.expanded.remove(&id) {
            Some(false)
        } else {
            self.expanded.insert(id);
            Some(true)
        }
    }

    pub fn expand_all(&mut self) {
        self.expanded = self.entries.iter().map(|e| e.id).collect();
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.expanded.clear();
    }

    pub fn entries(&self) -> &[NetworkLogEntry] {
        &self.entries
    }

    pub fn get(&self, id: u64) -> Option<&NetworkLogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn expanded(&self) -> &BTreeSet<u64> {
        &self.expanded
    }

    pub fn is_expanded(&self, id: u64) -> bool {
        self.expanded.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
