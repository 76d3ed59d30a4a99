//! Slash-command and document suggestions for the chat input.
//!
//! The popup is either hidden or visible with a non-empty list and a valid
//! selection. Showing with no matches hides it.

use ratatui::buffer::Buffer;
use ratatui::crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::widgets::{ListState, StatefulWidget};
use tracing::debug;

use crate::tui::commands::BuiltinCommand;
use crate::tui::context::RenderContext;
use crate::tui::theme::Theme;
use crate::tui::widgets::popup::{BORDER, SuggestionPopup};

/// Tallest the popup may grow, borders included
pub const MAX_POPUP_HEIGHT: u16 = 10;
pub const FILE_ICON: &str = "file-text";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuggestionKind {
    Command,
    File,
}

/// One candidate offered by the popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub kind: SuggestionKind,
    /// Text inserted on selection
    pub value: String,
    pub label: String,
    pub description: Option<String>,
    pub icon: Option<&'static str>,
}

/// Called with the chosen suggestion before the popup hides.
pub type SelectCallback = Box<dyn FnMut(&Suggestion)>;

#[derive(Debug, Clone, PartialEq)]
enum PopupState {
    Hidden,
    Visible {
        suggestions: Vec<Suggestion>,
        selected: usize,
        anchor: Rect,
    },
}

pub struct AutocompletePopup {
    ctx: RenderContext,
    on_select: SelectCallback,
    state: PopupState,
}

impl AutocompletePopup {
    pub fn new(ctx: RenderContext, on_select: SelectCallback) -> Self {
        Self {
            ctx,
            on_select,
            state: PopupState::Hidden,
        }
    }

    /// Compute suggestions for `query` and show them above `anchor`.
    pub fn show(&mut self, anchor: Rect, kind: SuggestionKind, query: &str) {
        let suggestions = self.suggestions_for(kind, query);
        if suggestions.is_empty() {
            debug!(target: "tui.autocomplete", "No {:?} suggestions for {:?}", kind, query);
            self.hide();
            return;
        }
        debug!(
            target: "tui.autocomplete",
            "Showing {} {:?} suggestions for {:?}", suggestions.len(), kind, query
        );
        self.state = PopupState::Visible {
            suggestions,
            selected: 0,
            anchor,
        };
    }

    pub fn hide(&mut self) {
        self.state = PopupState::Hidden;
    }

    pub fn is_visible(&self) -> bool {
        matches!(self.state, PopupState::Visible { .. })
    }

    /// Current candidates, empty while hidden.
    pub fn suggestions(&self) -> &[Suggestion] {
        match &self.state {
            PopupState::Visible { suggestions, .. } => suggestions,
            PopupState::Hidden => &[],
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        match &self.state {
            PopupState::Visible { selected, .. } => Some(*selected),
            PopupState::Hidden => None,
        }
    }

    pub fn selected(&self) -> Option<&Suggestion> {
        self.suggestions().get(self.selected_index()?)
    }

    /// Navigation keys while visible. Returns whether the key was consumed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let PopupState::Visible {
            suggestions,
            selected,
            ..
        } = &mut self.state
        else {
            return false;
        };
        let count = suggestions.len();
        match key.code {
            KeyCode::Down => {
                *selected = (*selected + 1) % count;
                true
            }
            KeyCode::Up => {
                *selected = (*selected + count - 1) % count;
                true
            }
            KeyCode::Enter | KeyCode::Tab => {
                self.commit();
                true
            }
            KeyCode::Esc => {
                self.hide();
                true
            }
            _ => false,
        }
    }

    /// Move the selection to `row`; out-of-range rows are ignored.
    pub fn hover(&mut self, row: usize) -> bool {
        match &mut self.state {
            PopupState::Visible {
                suggestions,
                selected,
                ..
            } if row < suggestions.len() => {
                *selected = row;
                true
            }
            _ => false,
        }
    }

    /// Select `row` and commit it.
    pub fn click(&mut self, row: usize) -> bool {
        if !self.hover(row) {
            return false;
        }
        self.commit();
        true
    }

    /// Hover on mouse moves and commit on left clicks inside the popup.
    pub fn handle_mouse(&mut self, event: MouseEvent, frame: Rect) -> bool {
        let Some(row) = self.row_at(frame, event.column, event.row) else {
            return false;
        };
        match event.kind {
            MouseEventKind::Moved => self.hover(row),
            MouseEventKind::Down(MouseButton::Left) => self.click(row),
            _ => false,
        }
    }

    /// Screen area of the popup inside `frame`, if visible.
    ///
    /// The popup sits one row above the anchor, left-aligned with it, and is
    /// clamped to the frame. Without room above it drops below the anchor.
    pub fn area(&self, frame: Rect) -> Option<Rect> {
        let PopupState::Visible {
            suggestions,
            anchor,
            ..
        } = &self.state
        else {
            return None;
        };
        let rows = u16::try_from(suggestions.len()).unwrap_or(u16::MAX);
        let wanted = rows.saturating_add(2 * BORDER).min(MAX_POPUP_HEIGHT);

        let bottom = anchor.y.saturating_sub(1).max(frame.y);
        let above = bottom - frame.y;
        let (y, height) = if above > 2 * BORDER {
            let height = wanted.min(above);
            (bottom - height, height)
        } else {
            let top = anchor.bottom().saturating_add(1).min(frame.bottom());
            (top, wanted.min(frame.bottom() - top))
        };

        let width = SuggestionPopup::content_width(suggestions).min(frame.width);
        let x = anchor
            .x
            .clamp(frame.x, frame.right().saturating_sub(width).max(frame.x));
        Some(Rect::new(x, y, width, height))
    }

    /// Suggestion index drawn at screen cell (`column`, `row`).
    pub fn row_at(&self, frame: Rect, column: u16, row: u16) -> Option<usize> {
        let area = self.area(frame)?;
        let inner = inner(area);
        let inside = column >= inner.x
            && column < inner.right()
            && row >= inner.y
            && row < inner.bottom();
        if !inside {
            return None;
        }
        let index = self.scroll_offset(inner.height) + usize::from(row - inner.y);
        (index < self.suggestions().len()).then_some(index)
    }

    /// Draw the popup over whatever is already in `buf`.
    pub fn draw(&self, frame: Rect, buf: &mut Buffer, theme: &Theme) {
        let Some(area) = self.area(frame) else {
            return;
        };
        let mut list_state = ListState::default()
            .with_offset(self.scroll_offset(inner(area).height))
            .with_selected(self.selected_index());
        SuggestionPopup::new(self.suggestions(), theme).render(area, buf, &mut list_state);
    }

    /// First visible row, keeping the selection on screen.
    fn scroll_offset(&self, visible: u16) -> usize {
        let visible = usize::from(visible.max(1));
        self.selected_index()
            .map_or(0, |selected| (selected + 1).saturating_sub(visible))
    }

    fn commit(&mut self) {
        if let Some(suggestion) = self.selected().cloned() {
            debug!(target: "tui.autocomplete", "Selected suggestion {}", suggestion.value);
            (self.on_select)(&suggestion);
        }
        self.hide();
    }

    fn suggestions_for(&self, kind: SuggestionKind, query: &str) -> Vec<Suggestion> {
        let query = query.to_lowercase();
        match kind {
            SuggestionKind::Command => BuiltinCommand::catalog()
                .into_iter()
                .filter(|cmd| {
                    cmd.value.to_lowercase().contains(&query)
                        || cmd
                            .description
                            .as_deref()
                            .is_some_and(|d| d.to_lowercase().contains(&query))
                })
                .collect(),
            SuggestionKind::File => self
                .ctx
                .store
                .list_documents()
                .into_iter()
                .filter(|doc| {
                    doc.path.to_lowercase().contains(&query)
                        || doc.base_name.to_lowercase().contains(&query)
                })
                .take(self.ctx.config.file_suggestion_limit)
                .map(|doc| Suggestion {
                    kind: SuggestionKind::File,
                    value: doc.path,
                    label: doc.base_name,
                    description: Some(doc.parent_path),
                    icon: Some(FILE_ICON),
                })
                .collect(),
        }
    }
}

fn inner(area: Rect) -> Rect {
    Rect::new(
        area.x.saturating_add(BORDER),
        area.y.saturating_add(BORDER),
        area.width.saturating_sub(2 * BORDER),
        area.height.saturating_sub(2 * BORDER),
    )
}
