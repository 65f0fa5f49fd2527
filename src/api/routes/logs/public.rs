//! Public types for the network log API
use serde::Serialize;

use crate::chat::NetworkLogEntry;

#[derive(Serialize)]
pub struct LogsResponse {
    // Newest first
    pub entries: Vec<NetworkLogEntry>,
    pub expanded: Vec<u64>,
}

#[derive(Serialize)]
pub struct ToggleResponse {
    pub id: u64,
    pub expanded: bool,
}
