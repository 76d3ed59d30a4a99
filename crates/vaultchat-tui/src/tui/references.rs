//! Resolution of document references against the live store.

use tracing::debug;
use vaultchat_core::DocumentEntry;

use crate::tui::context::RenderContext;

/// Answers whether a path names a document and opens it on request.
///
/// Every call queries the store directly; nothing is cached between calls.
pub struct ReferenceResolver<'a> {
    ctx: &'a RenderContext,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(ctx: &'a RenderContext) -> Self {
        Self { ctx }
    }

    /// Look up `path`, then `path` plus the default extension.
    pub fn resolve(&self, path: &str) -> Option<DocumentEntry> {
        if let Some(doc) = self.ctx.store.resolve(path) {
            return Some(doc);
        }
        let fallback = self.ctx.config.with_default_extension(path)?;
        self.ctx.store.resolve(&fallback)
    }

    pub fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_some()
    }

    /// Whether a path-like string (no URL scheme, contains a separator) resolves.
    pub fn is_resolvable_path(&self, text: &str) -> bool {
        looks_like_relative_path(text) && self.exists(text)
    }

    /// Open the document behind `path`, or tell the user it is missing.
    ///
    /// Returns whether a document was opened.
    pub fn open(&self, path: &str) -> bool {
        match self.resolve(path) {
            Some(doc) => {
                self.ctx.navigator.open(&doc);
                true
            }
            None => {
                debug!(target: "tui.annotate", "Reference did not resolve: {}", path);
                self.ctx.notifier.notify(&format!("File not found: {path}"));
                false
            }
        }
    }
}

/// Contains a path separator and no URL scheme.
pub fn looks_like_relative_path(text: &str) -> bool {
    text.contains('/') && !text.contains("://") && !text.starts_with("http")
}
