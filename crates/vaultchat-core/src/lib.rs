pub mod capabilities;
pub mod config;
pub mod conversation;
pub mod documents;
pub mod error;
pub mod tool_call;

pub use capabilities::{DocumentEntry, DocumentStore, Navigator, Notifier};
pub use config::RenderConfig;
pub use conversation::{ChatMessage, MessageId, MessageUpdate, Role};
pub use error::{Error, Result};
pub use tool_call::{ToolCall, ToolCallId, ToolCallUpdate, ToolOutput, ToolStatus};
