use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Query string pinned by the Azure OpenAI compatible endpoints we talk to.
pub const API_VERSION: &str = "2024-06-01";

pub const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

pub const DEFAULT_MODEL: &str = "gpt-4.1";

/// Error code Azure returns in the response body when the content
/// safety filter rejects the prompt. The HTTP status is usually 200.
pub const CONTENT_BLOCKED_CODE: i64 = 900514;

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub enum Role {
    #[serde(rename = "system")]
    System,
    #[serde(rename = "assistant")]
    Assistant,
    #[serde(rename = "user")]
    User,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: &str) -> Self {
        Message {
            role,
            content: content.to_string(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
}

impl CompletionRequest {
    /// A single turn request. Prior turns are never resent, each
    /// message is answered on its own.
    pub fn single_turn(model: &str, content: &str) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![Message::new(Role::User, content)],
        }
    }
}

pub fn completion_url(base_url: &str) -> String {
    format!("{}{}?api-version={}", base_url, CHAT_COMPLETIONS_PATH, API_VERSION)
}

// Object {
//     "choices": Array [
//         Object {
//             "message": Object {
//                 "content": String("Hi there"),
//                 "role": String("assistant")
//             },
//             ...
//         }
//     ],
//     ...
// }
pub fn reply_content(body: &Value) -> Option<&str> {
    body["choices"][0]["message"]["content"].as_str()
}

pub fn is_content_blocked(body: &Value) -> bool {
    body["code"].as_i64() == Some(CONTENT_BLOCKED_CODE)
}
