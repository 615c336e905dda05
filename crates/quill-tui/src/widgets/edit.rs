//! Character-limited text buffer with a byte-index cursor, shared by the
//! single-line and multi-line inputs.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    style::{Modifier, Style},
    text::Span,
};

#[derive(Debug, Clone, Default)]
pub(crate) struct EditBuffer {
    text: String,
    /// Byte offset, always on a char boundary.
    cursor: usize,
    /// Maximum number of chars; 0 means unlimited.
    limit: usize,
    multiline: bool,
}

impl EditBuffer {
    pub(crate) fn new(limit: usize, multiline: bool) -> Self {
        Self { limit, multiline, ..Self::default() }
    }

    pub(crate) fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub(crate) fn limit(&self) -> usize {
        self.limit
    }

    pub(crate) fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub(crate) fn set(&mut self, text: &str) {
        self.clear();
        self.insert_str(text);
    }

    fn room(&self) -> usize {
        if self.limit == 0 {
            usize::MAX
        } else {
            self.limit.saturating_sub(self.char_count())
        }
    }

    /// Insert one char at the cursor.  Returns `false` when the limit is hit.
    pub(crate) fn insert_char(&mut self, c: char) -> bool {
        if self.room() == 0 || (c == '\n' && !self.multiline) {
            return false;
        }
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
        true
    }

    /// Insert as much of `s` as fits.  Newlines become spaces in a
    /// single-line buffer and `\r` is dropped.
    pub(crate) fn insert_str(&mut self, s: &str) {
        let mut room = self.room();
        for c in s.chars() {
            if room == 0 {
                break;
            }
            let c = match c {
                '\r' => continue,
                '\n' if !self.multiline => ' ',
                c => c,
            };
            self.text.insert(self.cursor, c);
            self.cursor += c.len_utf8();
            room -= 1;
        }
    }

    pub(crate) fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let prev = prev_char_boundary(&self.text, self.cursor);
        self.text.replace_range(prev..self.cursor, "");
        self.cursor = prev;
    }

    pub(crate) fn delete(&mut self) {
        if self.cursor >= self.text.len() {
            return;
        }
        let next = next_char_boundary(&self.text, self.cursor);
        self.text.replace_range(self.cursor..next, "");
    }

    pub(crate) fn left(&mut self) {
        self.cursor = prev_char_boundary(&self.text, self.cursor);
    }

    pub(crate) fn right(&mut self) {
        self.cursor = next_char_boundary(&self.text, self.cursor);
    }

    /// Start of the current line.
    pub(crate) fn home(&mut self) {
        self.cursor = self.text[..self.cursor].rfind('\n').map(|i| i + 1).unwrap_or(0);
    }

    /// End of the current line.
    pub(crate) fn end(&mut self) {
        self.cursor = self.text[self.cursor..]
            .find('\n')
            .map(|i| self.cursor + i)
            .unwrap_or(self.text.len());
    }

    /// Apply a plain editing key.  Returns `true` when the key was consumed.
    pub(crate) fn apply_key(&mut self, k: &KeyEvent) -> bool {
        let ctrl = k.modifiers.contains(KeyModifiers::CONTROL);
        let alt = k.modifiers.contains(KeyModifiers::ALT);
        match k.code {
            KeyCode::Char('u') if ctrl => {
                self.text.replace_range(..self.cursor, "");
                self.cursor = 0;
            }
            KeyCode::Char(c) if !ctrl && !alt => {
                self.insert_char(c);
            }
            KeyCode::Enter if self.multiline => {
                self.insert_char('\n');
            }
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.left(),
            KeyCode::Right => self.right(),
            KeyCode::Home => self.home(),
            KeyCode::End => self.end(),
            _ => return false,
        }
        true
    }
}

pub(crate) fn prev_char_boundary(s: &str, pos: usize) -> usize {
    if pos == 0 {
        return 0;
    }
    let mut p = pos - 1;
    while p > 0 && !s.is_char_boundary(p) {
        p -= 1;
    }
    p
}

pub(crate) fn next_char_boundary(s: &str, pos: usize) -> usize {
    if pos >= s.len() {
        return s.len();
    }
    let mut p = pos + 1;
    while p < s.len() && !s.is_char_boundary(p) {
        p += 1;
    }
    p
}

/// Split `line` around the cursor at byte `at`, rendering the char under the
/// cursor reversed (a space when the cursor is at the end).
pub(crate) fn cursor_spans(line: &str, at: usize) -> Vec<Span<'static>> {
    let at = at.min(line.len());
    let next = next_char_boundary(line, at);
    let under = if at < line.len() { &line[at..next] } else { " " };
    vec![
        Span::raw(line[..at].to_string()),
        Span::styled(under.to_string(), Style::default().add_modifier(Modifier::REVERSED)),
        Span::raw(line[next.max(at)..].to_string()),
    ]
}
