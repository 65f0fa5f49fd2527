mod core;
pub mod models;
pub mod netlog;
pub mod outcome;

pub use self::core::{PendingSend, SendError, Session, SessionBuilder};
pub use models::{ChatMessage, ConversationStore, Sender};
pub use netlog::{NetworkLogEntry, NetworkLogStore, SLOW_RESPONSE_MS};
pub use outcome::{Outcome, classify};
