//! Shared handles to host capabilities and settings.

use regex::Regex;
use std::sync::Arc;

use vaultchat_core::documents::{InMemoryDocumentStore, RecordingNavigator, RecordingNotifier};
use vaultchat_core::{DocumentStore, Navigator, Notifier, RenderConfig};

use crate::tui::widgets::annotator::path_pattern;
use crate::tui::widgets::markdown::{MarkdownRenderer, PulldownMarkdown};

/// Everything a renderer needs from the host, cheap to clone.
#[derive(Clone)]
pub struct RenderContext {
    pub store: Arc<dyn DocumentStore>,
    pub navigator: Arc<dyn Navigator>,
    pub notifier: Arc<dyn Notifier>,
    pub markdown: Arc<dyn MarkdownRenderer>,
    pub(crate) config: Arc<RenderConfig>,
    /// Plain-text reference pattern compiled from `config`
    pub(crate) path_pattern: Regex,
}

impl RenderContext {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let config = RenderConfig::default();
        Self {
            store,
            navigator,
            notifier,
            markdown: Arc::new(PulldownMarkdown),
            path_pattern: path_pattern(&config),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn with_markdown(mut self, markdown: Arc<dyn MarkdownRenderer>) -> Self {
        self.markdown = markdown;
        self
    }

    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.path_pattern = path_pattern(&config);
        self.config = Arc::new(config);
        self
    }
}

/// In-memory context plus handles to its recorders, for tests and demos.
pub struct RecordingContext {
    pub context: RenderContext,
    pub store: Arc<InMemoryDocumentStore>,
    pub navigator: Arc<RecordingNavigator>,
    pub notifier: Arc<RecordingNotifier>,
}

impl RecordingContext {
    pub fn with_documents<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let store = Arc::new(InMemoryDocumentStore::with_paths(paths));
        let navigator = Arc::new(RecordingNavigator::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let context = RenderContext::new(store.clone(), navigator.clone(), notifier.clone());
        Self {
            context,
            store,
            navigator,
            notifier,
        }
    }
}
