// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};

use super::edit::{cursor_spans, EditBuffer};
use super::Widget;
use crate::command::Command;
use crate::message::Msg;

/// Multi-line text box used to capture the job description.
pub struct TextArea {
    buf: EditBuffer,
    focused: bool,
    placeholder: String,
}

impl TextArea {
    /// A focused, empty text box holding at most `limit` chars.
    pub fn new(limit: usize) -> Self {
        Self {
            buf: EditBuffer::new(limit, true),
            focused: true,
            placeholder: "Paste the job description here".into(),
        }
    }

    pub fn value(&self) -> &str {
        self.buf.text()
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

impl Widget for TextArea {
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

    fn render(&self, _ascii: bool) -> Vec<Line<'static>> {
        let dim = Style::default().fg(Color::DarkGray);
        let mut lines = Vec::new();

        if self.buf.text().is_empty() {
            if self.focused {
                let mut spans = cursor_spans("", 0);
                spans.push(Span::styled(self.placeholder.clone(), dim));
                lines.push(Line::from(spans));
            } else {
                lines.push(Line::styled(self.placeholder.clone(), dim));
            }
        } else {
            let text = self.buf.text();
            let cursor = self.buf.cursor();
            let mut offset = 0usize;
            for raw in text.split('\n') {
                let end = offset + raw.len();
                if self.focused && (offset..=end).contains(&cursor) {
                    lines.push(Line::from(cursor_spans(raw, cursor - offset)));
                } else {
                    lines.push(Line::raw(raw.to_string()));
                }
                offset = end + 1;
            }
        }

        lines.push(Line::styled(
            format!("{}/{}", self.buf.char_count(), self.buf.limit()),
            dim,
        ));
        lines
    }
}
