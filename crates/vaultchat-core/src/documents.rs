//! In-process implementations of the host capabilities.

use std::sync::{Mutex, PoisonError, RwLock};

use tracing::debug;

use crate::capabilities::{DocumentEntry, DocumentStore, Navigator, Notifier};

/// Ordered in-memory document index.
///
/// Interior mutability lets the host add or remove documents while renderers
/// hold a shared handle; every lookup sees the current contents.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<Vec<DocumentEntry>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let store = Self::new();
        for path in paths {
            store.insert(path);
        }
        store
    }

    /// Add a document, replacing an existing entry with the same path in place.
    pub fn insert(&self, path: impl Into<String>) {
        let entry = DocumentEntry::from_path(path);
        let mut documents = self
            .documents
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = documents.iter_mut().find(|d| d.path == entry.path) {
            *existing = entry;
        } else {
            documents.push(entry);
        }
    }

    /// Remove a document; returns whether it was present.
    pub fn remove(&self, path: &str) -> bool {
        let mut documents = self
            .documents
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = documents.len();
        documents.retain(|d| d.path != path);
        before != documents.len()
    }

    pub fn len(&self) -> usize {
        self.documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn list_documents(&self) -> Vec<DocumentEntry> {
        self.documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn resolve(&self, path: &str) -> Option<DocumentEntry> {
        self.documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|d| d.path == path)
            .cloned()
    }
}

/// Navigator that records every opened document.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    opened: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths opened so far, oldest first.
    pub fn opened(&self) -> Vec<String> {
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for RecordingNavigator {
    fn open(&self, document: &DocumentEntry) {
        debug!(target: "documents", "Opening document {}", document.path);
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(document.path.clone());
    }
}

/// Notifier that keeps the notices it was asked to show.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<String> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        debug!(target: "documents", "Notice: {}", message);
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}
