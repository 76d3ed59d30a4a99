//! The transcript: ordered message renderers addressed by message id.

use indexmap::IndexMap;
use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use ratatui::text::Line;
use ratatui::widgets::{Paragraph, Widget};
use std::ops::Range;
use tracing::{debug, trace, warn};
use vaultchat_core::{ChatMessage, MessageId, MessageUpdate, ToolCallUpdate};

use crate::tui::context::RenderContext;
use crate::tui::theme::Theme;
use crate::tui::view::Action;
use crate::tui::widgets::chat_list_state::ChatListState;
use crate::tui::widgets::lines::{Row, wrap};
use crate::tui::widgets::message_renderer::MessageRenderer;

/// Owns one [`MessageRenderer`] per message and keeps the view pinned to the
/// newest message.
///
/// Targeted operations on ids that are not in the transcript do nothing.
/// When an id repeats, every copy is drawn and the last one is addressed.
pub struct MessageList {
    ctx: RenderContext,
    renderers: Vec<MessageRenderer>,
    index: IndexMap<MessageId, usize>,
    state: ChatListState,
    frame: DrawnFrame,
}

/// Where the last [`MessageList::draw`] put each row and activatable region.
#[derive(Debug, Default)]
struct DrawnFrame {
    area: Rect,
    offset: usize,
    rows: Vec<Row>,
    targets: Vec<Target>,
}

#[derive(Debug)]
struct Target {
    line: usize,
    columns: Range<usize>,
    message: usize,
    action: Action,
}

impl MessageList {
    pub fn new(ctx: RenderContext) -> Self {
        Self {
            ctx,
            renderers: Vec::new(),
            index: IndexMap::new(),
            state: ChatListState::new(),
            frame: DrawnFrame::default(),
        }
    }

    /// Replace the whole transcript and scroll to its end.
    pub fn render(&mut self, messages: &[ChatMessage]) {
        self.renderers = messages
            .iter()
            .map(|message| MessageRenderer::new(message.clone(), self.ctx.clone()))
            .collect();
        self.index = IndexMap::with_capacity(messages.len());
        for (position, message) in messages.iter().enumerate() {
            if let Some(previous) = self.index.insert(message.id.clone(), position) {
                warn!(
                    target: "tui.message",
                    "Message id {} repeats at positions {} and {}", message.id, previous, position
                );
            }
        }
        debug!(target: "tui.message", "Rendered transcript of {} messages", self.renderers.len());
        self.state.scroll_to_bottom();
    }

    pub fn update_message(&mut self, message_id: &str, update: MessageUpdate) {
        if let Some(renderer) = self.renderer_mut(message_id) {
            renderer.update(update);
        }
    }

    pub fn append_to_message(&mut self, message_id: &str, text: &str) {
        if let Some(renderer) = self.renderer_mut(message_id) {
            renderer.append_content(text);
        }
    }

    pub fn update_tool_call(&mut self, message_id: &str, tool_call_id: &str, update: ToolCallUpdate) {
        if let Some(renderer) = self.renderer_mut(message_id) {
            renderer.update_tool_call(tool_call_id, update);
        }
    }

    /// Dispatch an action raised inside `message_id`.
    pub fn activate(&mut self, message_id: &str, action: &Action) -> bool {
        self.renderer_mut(message_id)
            .is_some_and(|renderer| renderer.activate(action))
    }

    pub fn renderer(&self, message_id: &str) -> Option<&MessageRenderer> {
        self.index
            .get(message_id)
            .and_then(|&position| self.renderers.get(position))
    }

    pub fn renderers(&self) -> impl Iterator<Item = &MessageRenderer> {
        self.renderers.iter()
    }

    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }

    pub fn state(&self) -> &ChatListState {
        &self.state
    }

    pub fn scroll_up(&mut self, amount: usize) -> bool {
        self.state.scroll_up(amount)
    }

    pub fn scroll_down(&mut self, amount: usize) -> bool {
        self.state.scroll_down(amount)
    }

    pub fn scroll_to_bottom(&mut self) {
        self.state.scroll_to_bottom();
    }

    /// Lower the transcript for `viewport` and resolve the scroll offset.
    ///
    /// Messages are separated by a blank line.
    pub fn lines(&mut self, viewport: Rect, theme: &Theme) -> Vec<Line<'static>> {
        let (lines, _) = self.lower(theme);
        let (rows, _) = wrap(&lines, viewport.width);
        self.state.measure(rows.len(), viewport.height);
        lines
    }

    /// Draw the visible part of the transcript into `area`.
    ///
    /// The drawn layout is kept for [`MessageList::action_at`].
    pub fn draw(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let (lines, targets) = self.lower(theme);
        let (rows, map) = wrap(&lines, area.width);
        self.state.measure(rows.len(), area.height);
        let offset = self.state.offset;
        Paragraph::new(rows)
            .scroll((u16::try_from(offset).unwrap_or(u16::MAX), 0))
            .render(area, buf);
        self.frame = DrawnFrame {
            area,
            offset,
            rows: map,
            targets,
        };
    }

    /// The message and action under a screen cell of the last drawn frame.
    pub fn action_at(&self, column: u16, row: u16) -> Option<(&str, &Action)> {
        let target = self.target_at(column, row)?;
        let renderer = self.renderers.get(target.message)?;
        Some((renderer.message().id.as_str(), &target.action))
    }

    /// Activate whatever sits under a screen cell. Returns false on empty cells.
    pub fn click(&mut self, column: u16, row: u16) -> bool {
        let Some((message, action)) = self
            .target_at(column, row)
            .map(|target| (target.message, target.action.clone()))
        else {
            return false;
        };
        debug!(target: "tui.message", "Click on {:?} in message {}", action, message);
        self.renderers
            .get_mut(message)
            .is_some_and(|renderer| renderer.activate(&action))
    }

    fn target_at(&self, column: u16, row: u16) -> Option<&Target> {
        let frame = &self.frame;
        if !frame.area.contains(Position::new(column, row)) {
            return None;
        }
        let visual = frame.offset + usize::from(row - frame.area.y);
        let Row { line, start } = *frame.rows.get(visual)?;
        let column = start + usize::from(column - frame.area.x);
        frame
            .targets
            .iter()
            .find(|target| target.line == line && target.columns.contains(&column))
    }

    fn lower(&self, theme: &Theme) -> (Vec<Line<'static>>, Vec<Target>) {
        let mut lines = Vec::new();
        let mut targets = Vec::new();
        for (message, renderer) in self.renderers.iter().enumerate() {
            if message > 0 {
                lines.push(Line::default());
            }
            let lowered = renderer.lowered(theme);
            let base = lines.len();
            targets.extend(lowered.hotspots.into_iter().map(|spot| Target {
                line: base + spot.line,
                columns: spot.columns,
                message,
                action: spot.action,
            }));
            lines.extend(lowered.lines);
        }
        (lines, targets)
    }

    fn renderer_mut(&mut self, message_id: &str) -> Option<&mut MessageRenderer> {
        let renderer = self
            .index
            .get(message_id)
            .and_then(|&position| self.renderers.get_mut(position));
        if renderer.is_none() {
            trace!(target: "tui.message", "No rendered message with id {}", message_id);
        }
        renderer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::context::RecordingContext;
    use crate::tui::view::{Element, classes};
    use serde_json::json;
    use vaultchat_core::{ToolCall, ToolStatus};

    fn transcript() -> Vec<ChatMessage> {
        vec![
            ChatMessage::user("m1", "What is in pages/ark.md?"),
            ChatMessage::assistant("m2", "Reading it")
                .with_tool_calls(vec![ToolCall::from_json(
                    "t1",
                    "Read",
                    json!({"file_path": "pages/ark.md"}),
                )])
                .streaming(true),
        ]
    }

    fn content_of(list: &MessageList, id: &str) -> Option<String> {
        list.renderer(id)
            .and_then(|r| r.element().find_by_class(classes::MESSAGE_CONTENT))
            .map(Element::text_content)
    }

    #[test]
    fn test_render_keeps_order() {
        let fixture = RecordingContext::with_documents(["pages/ark.md"]);
        let mut list = MessageList::new(fixture.context.clone());
        list.render(&transcript());
        assert_eq!(list.len(), 2);
        let ids: Vec<_> = list.renderers().map(|r| r.message().id.clone()).collect();
        assert_eq!(ids, vec!["m1", "m2"]);

        list.render(&transcript()[..1]);
        assert_eq!(list.len(), 1);
        assert!(list.renderer("m2").is_none());
    }

    #[test]
    fn test_targeted_updates() {
        let fixture = RecordingContext::with_documents(Vec::<String>::new());
        let mut list = MessageList::new(fixture.context.clone());
        list.render(&transcript());

        list.append_to_message("m2", " now");
        assert_eq!(content_of(&list, "m2"), Some("Reading it now".into()));

        list.update_tool_call(
            "m2",
            "t1",
            ToolCallUpdate::status(ToolStatus::Running),
        );
        let status = list
            .renderer("m2")
            .map(|r| r.message().tool_calls[0].status);
        assert_eq!(status, Some(ToolStatus::Running));

        list.update_message("m2", MessageUpdate::streaming(false));
        assert!(
            list.renderer("m2")
                .is_some_and(|r| r.element().find_by_class(classes::STREAMING).is_none())
        );
    }

    #[test]
    fn test_unknown_ids_are_ignored() {
        let fixture = RecordingContext::with_documents(Vec::<String>::new());
        let mut list = MessageList::new(fixture.context.clone());
        list.render(&transcript());
        let before: Vec<_> = list.renderers().map(|r| r.element().clone()).collect();

        list.append_to_message("missing", "text");
        list.update_message("missing", MessageUpdate::content("x"));
        list.update_tool_call("missing", "t1", ToolCallUpdate::status(ToolStatus::Error));
        assert!(!list.activate("missing", &Action::ToggleToolCall { id: "t1".into() }));

        let after: Vec<_> = list.renderers().map(|r| r.element().clone()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_activate_toggles_inspector() {
        let fixture = RecordingContext::with_documents(Vec::<String>::new());
        let mut list = MessageList::new(fixture.context.clone());
        list.render(&transcript());
        assert!(list.activate("m2", &Action::ToggleToolCall { id: "t1".into() }));
        let expanded = list
            .renderer("m2")
            .and_then(|r| r.inspector("t1"))
            .map(|i| i.is_expanded());
        assert_eq!(expanded, Some(true));
    }

    #[test]
    fn test_lines_pin_to_bottom() {
        let fixture = RecordingContext::with_documents(Vec::<String>::new());
        let mut list = MessageList::new(fixture.context.clone());
        let messages: Vec<_> = (0..10)
            .map(|i| ChatMessage::user(format!("m{i}"), format!("message {i}")))
            .collect();
        list.render(&messages);

        let viewport = Rect::new(0, 0, 40, 5);
        let lines = list.lines(viewport, &Theme::default());
        // Role label and body per message, blank separators between them
        assert_eq!(lines.len(), 10 * 2 + 9);
        assert_eq!(list.state().offset, lines.len() - 5);
        assert!(list.state().is_at_bottom());

        let mut buf = Buffer::empty(viewport);
        list.draw(viewport, &mut buf, &Theme::default());
        let last_row: String = (0..viewport.width)
            .map(|x| buf[(x, 4)].symbol().to_string())
            .collect();
        assert!(last_row.starts_with("message 9"));
    }

    fn row_text(buf: &Buffer, area: Rect, y: u16) -> String {
        (area.x..area.right())
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    fn row_starting_with(buf: &Buffer, area: Rect, prefix: &str) -> Option<u16> {
        (area.y..area.bottom()).find(|&y| row_text(buf, area, y).starts_with(prefix))
    }

    #[test]
    fn test_duplicate_ids_are_all_drawn() {
        let fixture = RecordingContext::with_documents(Vec::<String>::new());
        let mut list = MessageList::new(fixture.context.clone());
        list.render(&[
            ChatMessage::user("m1", "first"),
            ChatMessage::user("m1", "second"),
        ]);
        assert_eq!(list.len(), 2);

        let lines: Vec<String> = list
            .lines(Rect::new(0, 0, 40, 10), &Theme::default())
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();
        assert!(lines.iter().any(|line| line == "first"));
        assert!(lines.iter().any(|line| line == "second"));

        // Targeted operations address the later copy
        list.append_to_message("m1", "!");
        let contents: Vec<_> = list.renderers().map(|r| r.message().content.clone()).collect();
        assert_eq!(contents, vec!["first", "second!"]);
    }

    #[test]
    fn test_cells_map_to_actions() {
        let fixture = RecordingContext::with_documents(["pages/ark.md"]);
        let mut list = MessageList::new(fixture.context.clone());
        list.render(&[
            ChatMessage::user("m1", "see pages/ark.md"),
            ChatMessage::assistant("m2", "").with_tool_calls(vec![ToolCall::from_json(
                "t1",
                "Read",
                json!({}),
            )]),
        ]);
        let area = Rect::new(2, 1, 40, 10);
        let mut buf = Buffer::empty(Rect::new(0, 0, 50, 12));
        list.draw(area, &mut buf, &Theme::default());

        let body = row_starting_with(&buf, area, "see").unwrap_or(0);
        let reference = Action::OpenReference {
            path: "pages/ark.md".into(),
        };
        assert_eq!(list.action_at(area.x + 4, body), Some(("m1", &reference)));
        assert_eq!(list.action_at(area.x + 1, body), None);
        assert_eq!(list.action_at(0, 0), None);

        assert!(list.click(area.x + 6, body));
        assert_eq!(fixture.navigator.opened(), vec!["pages/ark.md"]);

        let header = row_starting_with(&buf, area, "▸").unwrap_or(0);
        assert!(list.click(area.x, header));
        let expanded = list
            .renderer("m2")
            .and_then(|r| r.inspector("t1"))
            .map(|i| i.is_expanded());
        assert_eq!(expanded, Some(true));
        assert!(!list.click(area.right() - 1, area.bottom() - 1));
    }

    #[test]
    fn test_wrapped_reference_stays_clickable() {
        let fixture = RecordingContext::with_documents(["pages/ark.md"]);
        let mut list = MessageList::new(fixture.context.clone());
        list.render(&[ChatMessage::user("m1", "see pages/ark.md")]);
        let area = Rect::new(0, 0, 10, 6);
        let mut buf = Buffer::empty(area);
        list.draw(area, &mut buf, &Theme::default());

        assert_eq!(row_text(&buf, area, 1), "see pages/");
        assert_eq!(row_text(&buf, area, 2).trim_end(), "ark.md");
        let reference = Action::OpenReference {
            path: "pages/ark.md".into(),
        };
        assert_eq!(list.action_at(0, 2), Some(("m1", &reference)));
        assert_eq!(list.action_at(7, 2), None);
    }
}
