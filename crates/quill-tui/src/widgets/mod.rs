// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Widget adapters owned by the session controller.
//!
//! Each widget keeps its own cursor, scroll and focus state.  The controller
//! decides which widgets see a message; a widget only ever reacts to the
//! message it is given and may answer with one command of its own.

mod edit;
mod file_browser;
mod line_input;
mod text_area;
mod viewport;
mod wrap;

pub use file_browser::FileBrowser;
pub use line_input::LineInput;
pub use text_area::TextArea;
pub use viewport::Viewport;

use ratatui::text::Line;

use crate::command::Command;
use crate::message::Msg;

pub trait Widget {
    /// React to one message.  Returns a command when the widget needs work
    /// done on its behalf (e.g. the file browser listing a directory).
    fn update(&mut self, msg: &Msg) -> Option<Command>;

    /// Current appearance as display lines.
    fn render(&self, ascii: bool) -> Vec<Line<'static>>;
}
