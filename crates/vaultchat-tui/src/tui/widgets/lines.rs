//! Lowering of the view tree into styled terminal lines.

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use std::ops::Range;
use unicode_width::UnicodeWidthChar;

use crate::tui::theme::{Component, Theme};
use crate::tui::view::{Action, Element, Tag, ViewNode, classes};

const RULE_WIDTH: usize = 40;

/// Terminal glyph for an icon name.
pub fn icon_glyph(name: &str) -> &'static str {
    match name {
        "chevron-right" => "▸",
        "chevron-down" => "▾",
        "file-text" => "≡",
        "search" => "⌕",
        "trash-2" => "✕",
        "plus" => "+",
        "help-circle" => "?",
        "info" => "i",
        _ => "•",
    }
}

/// Columns of one lowered line that activate `action`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hotspot {
    pub line: usize,
    pub columns: Range<usize>,
    pub action: Action,
}

/// Lowered lines plus the regions carrying an action.
#[derive(Debug, Default)]
pub struct Lowered {
    pub lines: Vec<Line<'static>>,
    pub hotspots: Vec<Hotspot>,
}

/// Lower `root` into lines. Hidden subtrees are skipped.
pub fn lower(root: &Element, theme: &Theme) -> Lowered {
    let mut lowering = Lowering::new(theme);
    lowering.element(root, Style::default(), "");
    lowering.flush();
    Lowered {
        lines: lowering.lines,
        hotspots: lowering.hotspots,
    }
}

pub fn to_lines(root: &Element, theme: &Theme) -> Vec<Line<'static>> {
    lower(root, theme).lines
}

/// A terminal row produced by [`wrap`]: its source line and first column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row {
    pub line: usize,
    pub start: usize,
}

/// Break `lines` into rows of at most `width` columns, at any character.
///
/// Returns the rows together with where each one starts in `lines`.
pub fn wrap(lines: &[Line<'static>], width: u16) -> (Vec<Line<'static>>, Vec<Row>) {
    let width = usize::from(width.max(1));
    let mut rows = Vec::with_capacity(lines.len());
    let mut map = Vec::with_capacity(lines.len());
    for (index, line) in lines.iter().enumerate() {
        if line.width() <= width {
            rows.push(line.clone());
            map.push(Row { line: index, start: 0 });
            continue;
        }

        let mut spans: Vec<Span<'static>> = Vec::new();
        let mut row_width = 0;
        let mut start = 0;
        let mut column = 0;
        for span in &line.spans {
            let mut text = String::new();
            for ch in span.content.chars() {
                let ch_width = ch.width().unwrap_or(0);
                if row_width > 0 && row_width + ch_width > width {
                    if !text.is_empty() {
                        spans.push(Span::styled(std::mem::take(&mut text), span.style));
                    }
                    rows.push(Line::from(std::mem::take(&mut spans)).style(line.style));
                    map.push(Row { line: index, start });
                    start = column;
                    row_width = 0;
                }
                text.push(ch);
                row_width += ch_width;
                column += ch_width;
            }
            if !text.is_empty() {
                spans.push(Span::styled(text, span.style));
            }
        }
        rows.push(Line::from(spans).style(line.style));
        map.push(Row { line: index, start });
    }
    (rows, map)
}

struct Lowering<'t> {
    theme: &'t Theme,
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    /// Prefix for every line started inside the current block (quote bars, list indent)
    indent: String,
    /// List marker waiting for the first line of its item
    marker: Option<String>,
    /// Action of the innermost activatable ancestor
    action: Option<Action>,
    hotspots: Vec<Hotspot>,
}

impl<'t> Lowering<'t> {
    fn new(theme: &'t Theme) -> Self {
        Self {
            theme,
            lines: Vec::new(),
            current: Vec::new(),
            indent: String::new(),
            marker: None,
            action: None,
            hotspots: Vec::new(),
        }
    }

    fn flush(&mut self) {
        if self.current.is_empty() {
            return;
        }
        let spans = std::mem::take(&mut self.current);
        self.lines.push(Line::from(spans));
    }

    fn span(&mut self, text: &str, style: Style) {
        if text.is_empty() {
            return;
        }
        if self.current.is_empty() {
            if let Some(marker) = self.marker.take() {
                let bullet = self.theme.style(Component::MarkdownListBullet);
                self.current.push(Span::styled(marker, bullet));
            } else if !self.indent.is_empty() {
                let indent = self.indent.clone();
                self.current.push(Span::styled(indent, self.theme.dim_text()));
            }
        }
        let start: usize = self.current.iter().map(Span::width).sum();
        let span = Span::styled(text.to_string(), style);
        if let Some(action) = self.action.clone() {
            self.mark(start..start + span.width(), action);
        }
        self.current.push(span);
    }

    fn mark(&mut self, columns: Range<usize>, action: Action) {
        let line = self.lines.len();
        if let Some(last) = self.hotspots.last_mut() {
            if last.line == line && last.columns.end == columns.start && last.action == action {
                last.columns.end = columns.end;
                return;
            }
        }
        self.hotspots.push(Hotspot {
            line,
            columns,
            action,
        });
    }

    fn text(&mut self, text: &str, style: Style) {
        let mut parts = text.split('\n').peekable();
        while let Some(part) = parts.next() {
            self.span(part, style);
            if parts.peek().is_some() {
                // An empty row inside preformatted text still counts
                if self.current.is_empty() {
                    self.lines.push(Line::from(self.indent.clone()));
                }
                self.flush();
            }
        }
    }

    fn element(&mut self, el: &Element, inherited: Style, bullet: &str) {
        if el.hidden {
            return;
        }
        let style = inherited.patch(self.style_for(el));
        let outer = el.action.clone().map(|action| self.action.replace(action));
        let block = el.tag.is_block();
        if block {
            self.flush();
        }

        match &el.tag {
            Tag::Rule => {
                self.span(&"─".repeat(RULE_WIDTH), self.theme.dim_text());
            }
            Tag::LineBreak => self.flush(),
            Tag::Icon(name) => self.span(icon_glyph(name), style),
            Tag::Heading(level) => {
                let marker = format!("{} ", "#".repeat(usize::from(*level)));
                self.span(&marker, style);
                self.children(el, style);
            }
            Tag::ListItem => {
                let saved = self.indent.clone();
                self.marker = Some(format!("{saved}{bullet}"));
                self.indent.push_str(&" ".repeat(bullet.chars().count()));
                self.children(el, style);
                self.flush();
                self.marker = None;
                self.indent = saved;
            }
            Tag::List { start } => {
                let mut number = *start;
                for child in el.child_elements() {
                    let marker = match number.as_mut() {
                        Some(n) => {
                            let marker = format!("{n}. ");
                            *n += 1;
                            marker
                        }
                        None => "• ".to_string(),
                    };
                    self.element(child, style, &marker);
                }
            }
            Tag::BlockQuote => {
                let saved = self.indent.clone();
                self.indent.push_str("│ ");
                self.children(el, style);
                self.flush();
                self.indent = saved;
            }
            _ => self.children(el, style),
        }

        if block {
            self.flush();
        }
        if let Some(previous) = outer {
            self.action = previous;
        }
    }

    fn children(&mut self, el: &Element, style: Style) {
        let spaced = el.has_class(classes::TOOL_CALL_HEADER) || el.has_class(classes::STREAMING);
        let mut first = true;
        for child in &el.children {
            match child {
                ViewNode::Text(text) => self.text(text, style),
                ViewNode::Element(child) => {
                    if child.hidden {
                        continue;
                    }
                    let visible = matches!(child.tag, Tag::Icon(_)) || !child.text_content().is_empty();
                    if spaced && !first && visible {
                        self.span(" ", style);
                    }
                    self.element(child, style, "");
                    first = false;
                }
            }
        }
    }

    fn style_for(&self, el: &Element) -> Style {
        let theme = self.theme;
        if el.has_class(classes::REFERENCE) {
            return theme.style(Component::Reference);
        }
        if el.has_class(classes::TOOL_CALL_STATUS) {
            let component = ["pending", "running", "success", "error"]
                .into_iter()
                .find(|status| el.has_class(status))
                .map_or(Component::StatusPending, |status| match status {
                    "running" => Component::StatusRunning,
                    "success" => Component::StatusSuccess,
                    "error" => Component::StatusError,
                    _ => Component::StatusPending,
                });
            return theme.style(component);
        }
        if el.has_class(classes::MESSAGE_ROLE) {
            return if el.has_class("user") {
                theme.style(Component::UserRole)
            } else {
                theme.style(Component::AssistantRole)
            };
        }
        let by_class = [
            (classes::TOOL_CALL_HEADER, Component::ToolCallHeader),
            (classes::TOOL_CALL_ICON, Component::ToolCallIcon),
            (classes::TOOL_CALL_DESC, Component::ToolCallSummary),
            (classes::TOOL_CALL_ERROR, Component::ErrorText),
            (classes::TOOL_CALL_TIMING, Component::DimText),
            (classes::STREAMING, Component::StreamingIndicator),
        ];
        if let Some((_, component)) = by_class.iter().find(|(class, _)| el.has_class(class)) {
            return theme.style(*component);
        }

        match &el.tag {
            Tag::Heading(_) => theme.style(Component::MarkdownHeading),
            Tag::Strong => Style::default().add_modifier(Modifier::BOLD),
            Tag::Emphasis => Style::default().add_modifier(Modifier::ITALIC),
            Tag::Strikethrough => Style::default().add_modifier(Modifier::CROSSED_OUT),
            Tag::Code => theme.style(Component::MarkdownCode),
            Tag::Pre => theme.style(Component::MarkdownCodeBlock),
            Tag::Link { .. } => theme.style(Component::MarkdownLink),
            Tag::BlockQuote => theme.style(Component::MarkdownBlockquote),
            _ => Style::default(),
        }
    }
}
