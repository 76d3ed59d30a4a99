pub mod annotator;
pub mod autocomplete;
pub mod chat_list_state;
pub mod formatters;
pub mod lines;
pub mod markdown;
pub mod message_list;
pub mod message_renderer;
pub mod popup;
pub mod tool_inspector;

pub use annotator::ContentAnnotator;
pub use autocomplete::{AutocompletePopup, SelectCallback, Suggestion, SuggestionKind};
pub use chat_list_state::{ChatListState, ScrollTarget};
pub use markdown::{MarkdownRenderer, PulldownMarkdown};
pub use message_list::MessageList;
pub use message_renderer::{ContentTicket, MessageRenderer};
pub use popup::SuggestionPopup;
pub use tool_inspector::ToolCallInspector;
