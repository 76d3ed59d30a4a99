use strum::{Display, EnumIter, IntoEnumIterator};

use crate::tui::widgets::autocomplete::{Suggestion, SuggestionKind};

/// Built-in slash commands offered by the autocomplete popup, in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum BuiltinCommand {
    Help,
    Clear,
    New,
    File,
    Search,
    Context,
}

impl BuiltinCommand {
    pub fn command_name(&self) -> String {
        self.to_string()
    }

    pub fn description(&self) -> &'static str {
        match self {
            BuiltinCommand::Help => "Show available commands",
            BuiltinCommand::Clear => "Clear conversation history",
            BuiltinCommand::New => "Start a new conversation",
            BuiltinCommand::File => "Read a file into context",
            BuiltinCommand::Search => "Search vault for text",
            BuiltinCommand::Context => "Show current context",
        }
    }

    pub fn usage(&self) -> String {
        match self {
            BuiltinCommand::File => format!("/{} [path]", self.command_name()),
            BuiltinCommand::Search => format!("/{} [query]", self.command_name()),
            BuiltinCommand::Help
            | BuiltinCommand::Clear
            | BuiltinCommand::New
            | BuiltinCommand::Context => format!("/{}", self.command_name()),
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            BuiltinCommand::Help => "help-circle",
            BuiltinCommand::Clear => "trash-2",
            BuiltinCommand::New => "plus",
            BuiltinCommand::File => "file-text",
            BuiltinCommand::Search => "search",
            BuiltinCommand::Context => "info",
        }
    }

    pub fn suggestion(&self) -> Suggestion {
        Suggestion {
            kind: SuggestionKind::Command,
            value: format!("/{}", self.command_name()),
            label: self.usage(),
            description: Some(self.description().to_string()),
            icon: Some(self.icon()),
        }
    }

    /// The whole catalog as suggestions.
    pub fn catalog() -> Vec<Suggestion> {
        Self::iter().map(|cmd| cmd.suggestion()).collect()
    }
}
