//! View of a single chat message: role label, rendered body, tool calls and
//! streaming indicator.
//!
//! The body is markdown rendered through the context's [`MarkdownRenderer`]
//! and then annotated so document paths become references. Hosts whose
//! markdown arrives later take a [`ContentTicket`] before starting the work
//! and hand the result to [`MessageRenderer::settle_content`]; only the most
//! recent ticket is accepted.
//!
//! [`MarkdownRenderer`]: crate::tui::widgets::markdown::MarkdownRenderer

use indexmap::IndexMap;
use ratatui::text::Line;
use tracing::{debug, trace, warn};
use vaultchat_core::{ChatMessage, MessageUpdate, Role, ToolCallId, ToolCallUpdate};

use crate::error::{Error, Result};
use crate::tui::context::RenderContext;
use crate::tui::references::ReferenceResolver;
use crate::tui::theme::Theme;
use crate::tui::view::{Action, Element, Tag, classes};
use crate::tui::widgets::annotator::ContentAnnotator;
use crate::tui::widgets::lines::{Lowered, lower, to_lines};
use crate::tui::widgets::tool_inspector::ToolCallInspector;

const STREAMING_DOTS: usize = 3;

/// Generation stamp of a content render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentTicket(u64);

pub struct MessageRenderer {
    message: ChatMessage,
    ctx: RenderContext,
    inspectors: IndexMap<ToolCallId, ToolCallInspector>,
    content: Element,
    generation: u64,
    root: Element,
}

impl MessageRenderer {
    /// Create a renderer and perform the first full render.
    pub fn new(message: ChatMessage, ctx: RenderContext) -> Self {
        let mut renderer = Self {
            message,
            ctx,
            inspectors: IndexMap::new(),
            content: Element::block(classes::MESSAGE_CONTENT),
            generation: 0,
            root: Element::block(classes::MESSAGE),
        };
        renderer.render();
        renderer
    }

    pub fn message(&self) -> &ChatMessage {
        &self.message
    }

    /// The composed view tree of the message.
    pub fn element(&self) -> &Element {
        &self.root
    }

    pub fn inspector(&self, tool_call_id: &str) -> Option<&ToolCallInspector> {
        self.inspectors.get(tool_call_id)
    }

    pub fn inspectors(&self) -> impl Iterator<Item = &ToolCallInspector> {
        self.inspectors.values()
    }

    /// Rebuild everything. Inspectors are recreated, so all tool calls collapse.
    pub fn render(&mut self) {
        self.inspectors = self
            .message
            .tool_calls
            .iter()
            .map(|call| {
                let inspector = ToolCallInspector::new(call.clone(), self.ctx.config.clone());
                (call.id.clone(), inspector)
            })
            .collect();
        self.render_content();
        self.compose();
    }

    /// Merge the present fields of `update`, then render from scratch.
    pub fn update(&mut self, update: MessageUpdate) {
        self.message.apply(update);
        self.render();
    }

    /// Append streamed text and re-render only the body.
    pub fn append_content(&mut self, text: &str) {
        self.message.content.push_str(text);
        self.render_content();
        self.compose();
    }

    /// Forward `update` to one inspector, keeping its expand state.
    pub fn update_tool_call(&mut self, tool_call_id: &str, update: ToolCallUpdate) {
        let Some(inspector) = self.inspectors.get_mut(tool_call_id) else {
            warn!(
                target: "tui.tool",
                "Message {} has no tool call {}", self.message.id, tool_call_id
            );
            return;
        };
        if let Err(e) = inspector.update(update) {
            trace!(
                target: "tui.tool",
                "Partial update of tool call {} in message {}: {}", tool_call_id, self.message.id, e
            );
        }
        let updated = inspector.tool_call().clone();
        if let Some(call) = self.message.tool_call_mut(tool_call_id) {
            *call = updated;
        }
        self.compose();
    }

    /// Dispatch an action raised by an element of this message.
    ///
    /// Returns false when the action targets a tool call this message does
    /// not own. Reference misses are reported through the notifier.
    pub fn activate(&mut self, action: &Action) -> bool {
        match action {
            Action::OpenReference { path } => {
                ReferenceResolver::new(&self.ctx).open(path);
                true
            }
            Action::ToggleToolCall { id } => match self.inspectors.get_mut(id) {
                Some(inspector) => {
                    inspector.toggle();
                    self.compose();
                    true
                }
                None => {
                    trace!(target: "tui.tool", "Toggle for unknown tool call {}", id);
                    false
                }
            },
        }
    }

    /// Ticket of the most recent content render.
    pub fn content_ticket(&self) -> ContentTicket {
        ContentTicket(self.generation)
    }

    /// Start a content render whose markdown is produced elsewhere.
    ///
    /// The body shows the raw source until the matching
    /// [`MessageRenderer::settle_content`] call arrives.
    pub fn begin_content(&mut self) -> ContentTicket {
        self.generation += 1;
        self.content = plain_content(&self.message.content);
        self.compose();
        self.content_ticket()
    }

    /// Install markdown rendered for `ticket`, annotating it first.
    ///
    /// A ticket superseded by a later render is rejected.
    pub fn settle_content(&mut self, ticket: ContentTicket, mut rendered: Element) -> Result<()> {
        if ticket != self.content_ticket() {
            trace!(
                target: "tui.message",
                "Dropping stale content for message {} ({:?} != {:?})",
                self.message.id,
                ticket,
                self.content_ticket()
            );
            return Err(Error::InvalidState(format!(
                "content ticket {} superseded by {}",
                ticket.0, self.generation
            )));
        }
        rendered.add_class(classes::MESSAGE_CONTENT);
        self.annotate(&mut rendered);
        self.content = rendered;
        self.compose();
        Ok(())
    }

    /// Lower the message into terminal lines.
    pub fn lines(&self, theme: &Theme) -> Vec<Line<'static>> {
        to_lines(&self.root, theme)
    }

    /// Lines plus the columns that activate references and tool call headers.
    pub fn lowered(&self, theme: &Theme) -> Lowered {
        lower(&self.root, theme)
    }

    fn render_content(&mut self) {
        self.generation += 1;
        let mut content = Element::block(classes::MESSAGE_CONTENT);
        match self.ctx.markdown.render(&self.message.content, &mut content) {
            Ok(()) => {
                self.annotate(&mut content);
                self.content = content;
            }
            Err(e) => {
                warn!(
                    target: "tui.message",
                    "Markdown rendering failed for message {}: {}", self.message.id, e
                );
                self.content = plain_content(&self.message.content);
            }
        }
    }

    fn annotate(&self, content: &mut Element) {
        let annotator = ContentAnnotator::new(&self.ctx);
        let count = annotator.annotate(content);
        debug!(
            target: "tui.message",
            "Rendered message {} with {} references", self.message.id, count
        );
    }

    fn compose(&mut self) {
        let config = &self.ctx.config;
        let role = self.message.role;
        let label = match role {
            Role::User => config.user_label.as_str(),
            Role::Assistant => config.assistant_label.as_str(),
        };

        let mut root = Element::block(classes::MESSAGE)
            .with_class(&format!("{}-{}", classes::MESSAGE, role.as_str()))
            .with_child(
                Element::new(Tag::Label)
                    .with_class(classes::MESSAGE_ROLE)
                    .with_class(role.as_str())
                    .with_text(label),
            )
            .with_child(self.content.clone());

        if !self.inspectors.is_empty() {
            let mut calls = Element::block(classes::TOOL_CALLS);
            for inspector in self.inspectors.values() {
                calls.push(inspector.element().clone());
            }
            root.push(calls);
        }

        if self.message.is_streaming {
            let mut indicator = Element::block(classes::STREAMING);
            for _ in 0..STREAMING_DOTS {
                indicator.push(Element::inline(classes::STREAMING_DOT).with_text("•"));
            }
            indicator.push(Element::new(Tag::Label).with_text(config.streaming_label.clone()));
            root.push(indicator);
        }

        self.root = root;
    }
}

/// Raw source shown when no rendered markdown is available.
fn plain_content(source: &str) -> Element {
    Element::block(classes::MESSAGE_CONTENT)
        .with_child(Element::new(Tag::Paragraph).with_text(source))
}
