pub mod error;
pub mod tui;

pub use tui::context::RenderContext;
pub use tui::widgets::{AutocompletePopup, MessageList, MessageRenderer, ToolCallInspector};
