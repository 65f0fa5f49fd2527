//! The chat transcript as the user sees it.
use chrono::Local;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Sender {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "bot")]
    Bot,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ChatMessage {
    pub id: u64,
    pub text: String,
    pub sender: Sender,
    pub timestamp: String,
    pub is_error: bool,
}

/// Wall clock time the way it's shown next to messages and log
/// entries, e.g. `3:04:05 PM`.
pub fn display_time() -> String {
    Local::now().format("%-I:%M:%S %p").to_string()
}

/// Ordered, append only list of chat messages. Always starts with
/// the greeting, which survives `reset`.
///
/// Ids are `len + 1` at the time of the append so they are dense and
/// start at 1 (the greeting). That is only sound while appends are
/// serialized, which `Session` guarantees.
#[derive(Clone, Debug)]
pub struct ConversationStore(Vec<ChatMessage>);

impl ConversationStore {
    pub fn new(greeting: &str) -> Self {
        let mut store = Self(Vec::new());
        store.append(greeting, Sender::Bot, false);
        store
    }

    pub fn append(&mut self, text: &str, sender: Sender, is_error: bool) -> &ChatMessage {
        let msg = ChatMessage {
            id: self.0.len() as u64 + 1,
            text: text.to_string(),
            sender,
            timestamp: display_time(),
            is_error,
        };
        self.0.push(msg);
        &self.0[self.0.len() - 1]
    }

    /// Back to just the greeting.
    pub fn reset(&mut self) {
        self.0.truncate(1);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.0
    }

    pub fn get(&self, id: u64) -> Option<&ChatMessage> {
        self.0.iter().find(|m| m.id == id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChatMessage> {
        self.0.iter()
    }
}
