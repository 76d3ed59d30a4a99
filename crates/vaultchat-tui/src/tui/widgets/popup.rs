//! Floating suggestion list drawn over the transcript.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, StatefulWidget, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::tui::theme::{Component, Theme};
use crate::tui::widgets::autocomplete::Suggestion;
use crate::tui::widgets::lines::icon_glyph;

/// Columns taken by the border on each side
pub const BORDER: u16 = 1;

/// A bordered list of suggestions with the selected row highlighted.
#[derive(Debug)]
pub struct SuggestionPopup<'a> {
    items: &'a [Suggestion],
    theme: &'a Theme,
}

impl<'a> SuggestionPopup<'a> {
    pub fn new(items: &'a [Suggestion], theme: &'a Theme) -> Self {
        Self { items, theme }
    }

    /// Width needed to show every row without truncation, borders included.
    pub fn content_width(items: &[Suggestion]) -> u16 {
        let widest = items
            .iter()
            .map(|item| row_text(item).iter().map(|part| part.width()).sum::<usize>())
            .max()
            .unwrap_or(0);
        u16::try_from(widest)
            .unwrap_or(u16::MAX)
            .saturating_add(2 * BORDER)
    }

    fn item(&self, suggestion: &Suggestion) -> ListItem<'static> {
        let [icon, label, description] = row_text(suggestion);
        let mut spans = Vec::with_capacity(3);
        if !icon.is_empty() {
            spans.push(Span::styled(icon, self.theme.style(Component::PopupIcon)));
        }
        spans.push(Span::raw(label));
        if !description.is_empty() {
            spans.push(Span::styled(
                description,
                self.theme.style(Component::PopupDescription),
            ));
        }
        ListItem::new(Line::from(spans))
    }
}

/// Icon, label and description columns of one row, with their separators.
fn row_text(suggestion: &Suggestion) -> [String; 3] {
    let icon = suggestion
        .icon
        .map(|name| format!("{} ", icon_glyph(name)))
        .unwrap_or_default();
    let description = match suggestion.description.as_deref() {
        Some(text) if !text.is_empty() => format!("  {text}"),
        _ => String::new(),
    };
    [icon, suggestion.label.clone(), description]
}

impl StatefulWidget for SuggestionPopup<'_> {
    type State = ListState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        Clear.render(area, buf);

        let items: Vec<ListItem> = self.items.iter().map(|item| self.item(item)).collect();
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .style(self.theme.style(Component::PopupBorder)),
            )
            .highlight_style(self.theme.style(Component::PopupSelection));

        StatefulWidget::render(list, area, buf, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::widgets::autocomplete::SuggestionKind;

    fn suggestion(label: &str, description: Option<&str>) -> Suggestion {
        Suggestion {
            kind: SuggestionKind::File,
            value: label.to_string(),
            label: label.to_string(),
            description: description.map(str::to_string),
            icon: Some("file-text"),
        }
    }

    #[test]
    fn test_content_width() {
        let items = vec![suggestion("ark", Some("pages")), suggestion("index", None)];
        // "≡ " + "ark" + "  pages" plus two border columns
        assert_eq!(SuggestionPopup::content_width(&items), 2 + 3 + 7 + 2);
        assert_eq!(SuggestionPopup::content_width(&[]), 2);
    }

    #[test]
    fn test_render_highlights_selection() {
        let items = vec![suggestion("ark", Some("pages")), suggestion("index", Some(""))];
        let theme = Theme::default();
        let area = Rect::new(0, 0, 20, 4);
        let mut buf = Buffer::empty(area);
        let mut state = ListState::default().with_selected(Some(1));
        SuggestionPopup::new(&items, &theme).render(area, &mut buf, &mut state);

        let row = |y: u16| -> String {
            (0..area.width)
                .map(|x| buf[(x, y)].symbol().to_string())
                .collect()
        };
        assert!(row(1).contains("≡ ark  pages"));
        assert!(row(2).contains("≡ index"));
        assert_eq!(buf[(1, 2)].style().bg, theme.style(Component::PopupSelection).bg);
    }
}
