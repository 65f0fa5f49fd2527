mod core;

pub use self::core::{
    API_VERSION, CHAT_COMPLETIONS_PATH, CONTENT_BLOCKED_CODE, CompletionRequest, DEFAULT_MODEL,
    Message, Role, completion_url, is_content_blocked, reply_content,
};
