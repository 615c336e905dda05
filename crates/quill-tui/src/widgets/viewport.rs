// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::text::Line;

use super::wrap::wrap_text;
use super::Widget;
use crate::command::Command;
use crate::layout::viewport_size;
use crate::message::Msg;

/// Scrollable, soft-wrapped view of the conversation transcript.
pub struct Viewport {
    content: String,
    lines: Vec<String>,
    width: u16,
    height: u16,
    /// Upper bound on the wrap width; 0 follows the terminal.
    wrap_limit: u16,
    offset: usize,
}

impl Viewport {
    pub fn new(wrap_limit: u16) -> Self {
        let (width, height) = viewport_size(80, 24);
        Self { content: String::new(), lines: vec![String::new()], width, height, wrap_limit, offset: 0 }
    }

    /// Replace the transcript, keeping the scroll position where possible.
    pub fn set_content(&mut self, text: impl Into<String>) {
        self.content = text.into();
        self.rewrap();
    }

    pub fn goto_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    pub fn at_bottom(&self) -> bool {
        self.offset >= self.max_offset()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn wrap_width(&self) -> usize {
        match self.wrap_limit {
            0 => self.width as usize,
            limit => limit.min(self.width) as usize,
        }
    }

    fn max_offset(&self) -> usize {
        self.lines.len().saturating_sub(self.height as usize)
    }

    fn rewrap(&mut self) {
        self.lines = wrap_text(&self.content, self.wrap_width().max(1));
        self.offset = self.offset.min(self.max_offset());
    }

    fn scroll_by(&mut self, delta: isize) {
        let target = self.offset as isize + delta;
        self.offset = target.clamp(0, self.max_offset() as isize) as usize;
    }
}

impl Widget for Viewport {
    fn update(&mut self, msg: &Msg) -> Option<Command> {
        match msg {
            Msg::Key(k) if k.modifiers.difference(KeyModifiers::SHIFT).is_empty() => {
                let page = self.height.max(1) as isize;
                match k.code {
                    KeyCode::PageUp => self.scroll_by(-page),
                    KeyCode::PageDown => self.scroll_by(page),
                    KeyCode::Up => self.scroll_by(-1),
                    KeyCode::Down => self.scroll_by(1),
                    _ => {}
                }
            }
            Msg::Resize { width, height } => {
                let stick = self.at_bottom();
                (self.width, self.height) = viewport_size(*width, *height);
                self.rewrap();
                if stick {
                    self.goto_bottom();
                }
            }
            _ => {}
        }
        None
    }

    fn render(&self, _ascii: bool) -> Vec<Line<'static>> {
        self.lines
            .iter()
            .skip(self.offset)
            .take(self.height as usize)
            .map(|l| Line::raw(l.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEvent, KeyEventKind, KeyEventState};

    use super::*;

    fn press(code: KeyCode) -> Msg {
        Msg::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn numbered(n: usize) -> String {
        (0..n).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n")
    }

    #[test]
    fn short_content_is_at_bottom() {
        let mut v = Viewport::new(0);
        v.set_content("hello");
        assert!(v.at_bottom());
        assert_eq!(v.render(false).len(), 1);
    }

    #[test]
    fn goto_bottom_shows_last_lines() {
        let mut v = Viewport::new(0);
        v.set_content(numbered(200));
        assert!(!v.at_bottom());
        v.goto_bottom();
        assert!(v.at_bottom());
        let shown = v.render(false);
        assert_eq!(shown.last().unwrap().to_string(), "line 199");
    }

    #[test]
    fn scroll_keys_move_and_clamp() {
        let mut v = Viewport::new(0);
        v.set_content(numbered(200));
        v.update(&press(KeyCode::Up));
        assert_eq!(v.offset(), 0);
        v.update(&press(KeyCode::Down));
        assert_eq!(v.offset(), 1);
        v.update(&press(KeyCode::PageDown));
        assert!(v.offset() > 1);
        for _ in 0..100 {
            v.update(&press(KeyCode::PageDown));
        }
        assert!(v.at_bottom());
    }

    #[test]
    fn resize_rewraps_and_keeps_bottom() {
        let mut v = Viewport::new(0);
        v.set_content(numbered(200));
        v.goto_bottom();
        v.update(&Msg::Resize { width: 40, height: 60 });
        assert!(v.at_bottom());
    }

    #[test]
    fn wrap_limit_caps_line_width() {
        let mut v = Viewport::new(10);
        v.set_content("one two three four five");
        assert!(v.line_count() >= 3);
    }
}
