//! Autocomplete trigger detection for the chat input.
//!
//! `/` opens command suggestions when it starts the input; `@` opens document
//! suggestions at the start of a word. The query is the text between the
//! trigger and the cursor, which must not contain whitespace.

use crate::tui::widgets::autocomplete::{Suggestion, SuggestionKind};

/// An active trigger in the input text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    pub kind: SuggestionKind,
    /// Byte offset of the trigger character
    pub position: usize,
    pub query: String,
}

/// Byte offset of a (row, column) cursor, where the column counts characters.
pub fn cursor_byte_offset(content: &str, cursor_row: usize, cursor_col: usize) -> usize {
    let mut offset = 0;
    for (i, line) in content.split('\n').enumerate() {
        match i.cmp(&cursor_row) {
            std::cmp::Ordering::Less => {
                offset += line.len() + 1;
            }
            std::cmp::Ordering::Equal => {
                offset += line
                    .chars()
                    .take(cursor_col)
                    .map(char::len_utf8)
                    .sum::<usize>();
                break;
            }
            std::cmp::Ordering::Greater => break,
        }
    }
    offset
}

/// Find the trigger the cursor is currently typing after, if any.
pub fn detect(content: &str, cursor_offset: usize) -> Option<Trigger> {
    let before = content.get(..cursor_offset)?;
    let word_start = before
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map_or(0, |(idx, c)| idx + c.len_utf8());
    let word = &before[word_start..];

    let kind = match word.chars().next()? {
        '/' if word_start == 0 => SuggestionKind::Command,
        '@' => SuggestionKind::File,
        _ => return None,
    };
    Some(Trigger {
        kind,
        position: word_start,
        query: word[1..].to_string(),
    })
}

/// Replace the trigger and its query with the chosen suggestion.
///
/// Returns the new content and the byte offset just after the insertion, or
/// `None` when the trigger or cursor no longer fit `content` (a stale trigger,
/// or an offset inside a multi-byte character).
pub fn complete(
    content: &str,
    trigger: &Trigger,
    cursor_offset: usize,
    suggestion: &Suggestion,
) -> Option<(String, usize)> {
    let head = content.get(..trigger.position)?;
    let end = cursor_offset.clamp(trigger.position, content.len());
    let tail = content.get(end..)?;
    let insert = match suggestion.kind {
        SuggestionKind::Command => format!("{} ", suggestion.value),
        SuggestionKind::File => format!("@{} ", suggestion.value),
    };
    let mut out = String::with_capacity(content.len() + insert.len());
    out.push_str(head);
    out.push_str(&insert);
    let cursor = out.len();
    out.push_str(tail);
    Some((out, cursor))
}
