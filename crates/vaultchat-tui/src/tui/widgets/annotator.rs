//! Turns document paths in rendered content into activatable references.
//!
//! Three places are scanned: literal code elements, links that do not point
//! anywhere on their own, and plain text. Text below a link, a code element
//! or an existing reference is never rewritten, so a reference cannot be
//! wrapped twice.

use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::tui::context::RenderContext;
use crate::tui::references::{ReferenceResolver, looks_like_relative_path};
use crate::tui::view::{Action, Element, Tag, ViewNode, classes};
use vaultchat_core::RenderConfig;
use vaultchat_core::config::DEFAULT_REFERENCE_EXTENSIONS;

/// Path-like tokens with one of the default document extensions.
#[expect(clippy::expect_used)]
static DEFAULT_PATH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&path_pattern_source(DEFAULT_REFERENCE_EXTENSIONS.as_slice()))
        .expect("default path pattern is valid")
});

// Word boundaries are ASCII-only: a path glued to CJK or accented text still matches
fn path_pattern_source<S: AsRef<str>>(extensions: &[S]) -> String {
    let alternatives = extensions
        .iter()
        .map(|ext| regex::escape(ext.as_ref()))
        .collect::<Vec<_>>()
        .join("|");
    format!(r"(?-u:\b)([a-zA-Z0-9_\-./]+\.({alternatives}))(?-u:\b)")
}

/// Plain-text path pattern for the extensions in `config`.
///
/// Falls back to the default extensions when the configured set is empty
/// or does not compile.
pub fn path_pattern(config: &RenderConfig) -> Regex {
    if config.reference_extensions.is_empty() {
        return DEFAULT_PATH_PATTERN.clone();
    }
    match Regex::new(&path_pattern_source(config.reference_extensions.as_slice())) {
        Ok(pattern) => pattern,
        Err(e) => {
            warn!(
                target: "tui.annotate",
                "Reference extensions {:?} do not form a valid pattern: {}",
                config.reference_extensions,
                e
            );
            DEFAULT_PATH_PATTERN.clone()
        }
    }
}

pub struct ContentAnnotator<'a> {
    resolver: ReferenceResolver<'a>,
    config: &'a RenderConfig,
    pattern: &'a Regex,
}

impl<'a> ContentAnnotator<'a> {
    pub fn new(ctx: &'a RenderContext) -> Self {
        Self {
            resolver: ReferenceResolver::new(ctx),
            config: &ctx.config,
            pattern: &ctx.path_pattern,
        }
    }

    /// Annotate `root` in place, returning the number of references created.
    pub fn annotate(&self, root: &mut Element) -> usize {
        let count = self.visit(root);
        if count > 0 {
            debug!(target: "tui.annotate", "Annotated {} document references", count);
        }
        count
    }

    fn visit(&self, el: &mut Element) -> usize {
        if el.has_class(classes::REFERENCE) {
            return 0;
        }
        if el.tag == Tag::Code {
            let text = el.text_content();
            if self.is_code_reference(&text) {
                mark_reference(el, text);
                return 1;
            }
            return 0;
        }
        if let Tag::Link { href } = &el.tag {
            if href.starts_with("http") || href.starts_with('#') {
                return 0;
            }
            let target = if href.is_empty() {
                el.text_content()
            } else {
                href.clone()
            };
            if self.is_link_reference(&target) {
                mark_reference(el, target);
                return 1;
            }
            return 0;
        }

        let mut count = 0;
        let children = std::mem::take(&mut el.children);
        for child in children {
            match child {
                ViewNode::Element(mut child) => {
                    count += self.visit(&mut child);
                    el.children.push(ViewNode::Element(child));
                }
                ViewNode::Text(text) => {
                    count += self.split_text(&text, el);
                }
            }
        }
        count
    }

    /// Code spans become references only when the store can open them.
    fn is_code_reference(&self, text: &str) -> bool {
        (self.config.has_reference_extension(text) || looks_like_relative_path(text))
            && self.resolver.exists(text)
    }

    /// Links with a document extension are trusted as written; bare paths must resolve.
    fn is_link_reference(&self, target: &str) -> bool {
        self.config.has_reference_extension(target) || self.resolver.is_resolvable_path(target)
    }

    /// Append `text` to `parent`, wrapping every resolvable path match.
    fn split_text(&self, text: &str, parent: &mut Element) -> usize {
        let mut count = 0;
        let mut last = 0;
        for captures in self.pattern.captures_iter(text) {
            let Some(path) = captures.get(1) else {
                continue;
            };
            if !self.resolver.exists(path.as_str()) {
                continue;
            }
            parent.push_text(&text[last..path.start()]);
            parent.push(reference_span(path.as_str()));
            last = path.end();
            count += 1;
        }
        parent.push_text(&text[last..]);
        count
    }
}

fn mark_reference(el: &mut Element, path: String) {
    el.add_class(classes::REFERENCE);
    el.action = Some(Action::OpenReference { path });
}

fn reference_span(path: &str) -> Element {
    Element::inline(classes::REFERENCE)
        .with_text(path)
        .with_action(Action::OpenReference {
            path: path.to_string(),
        })
}
