use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};

use super::edit::{cursor_spans, EditBuffer};
use super::Widget;
use crate::command::Command;
use crate::message::Msg;

/// Single-line chat input.  Starts blurred; ignores everything until focused.
pub struct LineInput {
    buf: EditBuffer,
    focused: bool,
}

impl LineInput {
    pub fn new(limit: usize) -> Self {
        Self { buf: EditBuffer::new(limit, false), focused: false }
    }

    pub fn value(&self) -> &str {
        self.buf.text()
    }

    pub fn set_value(&mut self, text: &str) {
        self.buf.set(text);
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }
}

impl Widget for LineInput {
    fn update(&mut self, msg: &Msg) -> Option<Command> {
        if !self.focused {
            return None;
        }
        match msg {
            Msg::Key(k) => {
                self.buf.apply_key(k);
            }
            Msg::Paste(text) => self.buf.insert_str(text),
            _ => {}
        }
        None
    }

    fn render(&self, ascii: bool) -> Vec<Line<'static>> {
        let prompt = if ascii { "> " } else { "❯ " };
        let mut spans = vec![Span::styled(prompt, Style::default().fg(Color::LightBlue))];
        if self.focused {
            spans.extend(cursor_spans(self.buf.text(), self.buf.cursor()));
        } else {
            spans.push(Span::raw(self.buf.text().to_string()));
        }
        vec![Line::from(spans)]
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

    use super::*;

    fn press(code: KeyCode) -> Msg {
        Msg::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn unfocused_input_ignores_keys() {
        let mut i = LineInput::new(200);
        i.update(&press(KeyCode::Char('x')));
        assert_eq!(i.value(), "");
    }

    #[test]
    fn focused_input_types_and_ignores_enter() {
        let mut i = LineInput::new(200);
        i.focus();
        for c in "ok".chars() {
            i.update(&press(KeyCode::Char(c)));
        }
        i.update(&press(KeyCode::Enter));
        assert_eq!(i.value(), "ok");
    }

    #[test]
    fn limit_applies_to_typing() {
        let mut i = LineInput::new(3);
        i.focus();
        for c in "abcdef".chars() {
            i.update(&press(KeyCode::Char(c)));
        }
        assert_eq!(i.value(), "abc");
    }

    #[test]
    fn set_value_then_clear() {
        let mut i = LineInput::new(200);
        i.set_value("Make it shorter");
        assert_eq!(i.value(), "Make it shorter");
        i.clear();
        assert_eq!(i.value(), "");
    }
}
