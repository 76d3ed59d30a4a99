//! Collapsible view of a single tool invocation.

use std::sync::Arc;

use tracing::{debug, warn};
use vaultchat_core::{RenderConfig, ToolCall, ToolCallUpdate};

use crate::error::Result;
use crate::tui::view::{Action, Element, Tag, classes};
use crate::tui::widgets::formatters::{self, helpers::pretty_json};

pub const ICON_COLLAPSED: &str = "chevron-right";
pub const ICON_EXPANDED: &str = "chevron-down";

/// Renders one [`ToolCall`] as a header line plus a detail pane.
///
/// Starts collapsed. The expand flag belongs to the inspector, so
/// [`ToolCallInspector::update`] keeps it while replacing the call data.
#[derive(Debug, Clone)]
pub struct ToolCallInspector {
    tool_call: ToolCall,
    config: Arc<RenderConfig>,
    expanded: bool,
    root: Element,
}

impl ToolCallInspector {
    pub fn new(tool_call: ToolCall, config: Arc<RenderConfig>) -> Self {
        let mut inspector = Self {
            tool_call,
            config,
            expanded: false,
            root: Element::block(classes::TOOL_CALL),
        };
        inspector.render();
        inspector
    }

    pub fn tool_call(&self) -> &ToolCall {
        &self.tool_call
    }

    pub fn element(&self) -> &Element {
        &self.root
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn toggle(&mut self) {
        self.expanded = !self.expanded;
        debug!(target: "tui.tool", "Tool call {} expanded={}", self.tool_call.id, self.expanded);
        self.render();
    }

    pub fn expand(&mut self) {
        if !self.expanded {
            self.toggle();
        }
    }

    pub fn collapse(&mut self) {
        if self.expanded {
            self.toggle();
        }
    }

    /// Merge `update` into the call and redraw, keeping the expand state.
    ///
    /// A backwards status change is rejected but the other fields still land.
    pub fn update(&mut self, update: ToolCallUpdate) -> Result<()> {
        let applied = self.tool_call.apply(update);
        if let Err(e) = &applied {
            warn!(target: "tui.tool", "Rejected tool call update: {}", e);
        }
        self.render();
        applied.map_err(Into::into)
    }

    /// Rebuild the element tree from the current call and expand state.
    pub fn render(&mut self) {
        let mut root = Element::block(classes::TOOL_CALL);
        root.set_class(classes::COLLAPSED, !self.expanded);
        root.push(self.header());
        root.push(self.details());
        self.root = root;
    }

    fn header(&self) -> Element {
        let call = &self.tool_call;
        let icon = if self.expanded {
            ICON_EXPANDED
        } else {
            ICON_COLLAPSED
        };
        Element::block(classes::TOOL_CALL_HEADER)
            .with_action(Action::ToggleToolCall {
                id: call.id.clone(),
            })
            .with_child(Element::new(Tag::Icon(icon.to_string())).with_class(classes::TOOL_CALL_ICON))
            .with_child(
                Element::inline(classes::TOOL_CALL_NAME)
                    .with_text(formatters::display_name(call, &self.config)),
            )
            .with_child(
                Element::inline(classes::TOOL_CALL_DESC)
                    .with_text(formatters::input_summary(call, &self.config)),
            )
            .with_child(
                Element::inline(classes::TOOL_CALL_STATUS)
                    .with_class(call.status.as_str())
                    .with_text(formatters::status_glyph(call.status)),
            )
    }

    fn details(&self) -> Element {
        let call = &self.tool_call;
        let mut content = Element::block(classes::TOOL_CALL_CONTENT);
        content.hidden = !self.expanded;

        content.push(section("Input:", pre(pretty_json(&call.input))));
        if let Some(output) = &call.output {
            content.push(section("Output:", pre(output.display_text())));
        }
        if let Some(error) = &call.error {
            content.push(
                section("Error:", Element::new(Tag::Inline).with_text(error.clone()))
                    .with_class(classes::TOOL_CALL_ERROR),
            );
        }
        if let Some(ms) = call.duration_ms() {
            content.push(
                Element::block(classes::TOOL_CALL_TIMING).with_text(format!("Duration: {ms}ms")),
            );
        }
        content
    }
}

fn section(title: &str, body: Element) -> Element {
    Element::new(Tag::Block)
        .with_child(Element::new(Tag::Strong).with_text(title))
        .with_child(body)
}

fn pre(text: String) -> Element {
    Element::new(Tag::Pre).with_text(text)
}
