//! Host capabilities consumed by the renderers.
//!
//! The chat view never owns documents, navigation or notifications. The host
//! application hands implementations of these traits to the renderers, which
//! query them synchronously and never cache their answers across calls.

use serde::{Deserialize, Serialize};

/// An addressable item in the document store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentEntry {
    /// Full path relative to the store root, e.g. `pages/ark.md`
    pub path: String,
    /// File name without its extension, e.g. `ark`
    pub base_name: String,
    /// Containing folder path, empty at the store root
    pub parent_path: String,
}

impl DocumentEntry {
    /// Build an entry from a store-relative path, deriving base name and parent.
    pub fn from_path(path: impl Into<String>) -> Self {
        let path = path.into();
        let (parent_path, file_name) = match path.rsplit_once('/') {
            Some((parent, name)) => (parent.to_string(), name),
            None => (String::new(), path.as_str()),
        };
        let base_name = match file_name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem.to_string(),
            _ => file_name.to_string(),
        };
        Self {
            base_name,
            parent_path,
            path,
        }
    }
}

/// Read-only view of the live document index.
pub trait DocumentStore: Send + Sync {
    /// Every known document, in the store's own enumeration order.
    fn list_documents(&self) -> Vec<DocumentEntry>;

    /// Look up a document by its exact path.
    fn resolve(&self, path: &str) -> Option<DocumentEntry>;
}

/// Opens a document in the host.
pub trait Navigator: Send + Sync {
    fn open(&self, document: &DocumentEntry);
}

/// Shows a user-visible, non-fatal message.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_from_nested_path() {
        let entry = DocumentEntry::from_path("pages/notes/ark.md");
        assert_eq!(entry.path, "pages/notes/ark.md");
        assert_eq!(entry.base_name, "ark");
        assert_eq!(entry.parent_path, "pages/notes");
    }

    #[test]
    fn test_entry_at_root() {
        let entry = DocumentEntry::from_path("README.md");
        assert_eq!(entry.base_name, "README");
        assert_eq!(entry.parent_path, "");
    }

    #[test]
    fn test_entry_dotfile_keeps_name() {
        let entry = DocumentEntry::from_path(".obsidian");
        assert_eq!(entry.base_name, ".obsidian");
    }
}
