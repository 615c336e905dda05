// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::path::PathBuf;

use crossterm::event::{Event, KeyEvent, KeyEventKind};
use quill_model::Turn;

use crate::command::DirEntry;

/// Everything that can enter the session controller: terminal input and the
/// results of completed commands.
#[derive(Debug, Clone)]
pub enum Msg {
    Key(KeyEvent),
    Paste(String),
    /// Terminal size in cells.
    Resize { width: u16, height: u16 },
    /// Result of a directory listing for the file browser.
    DirListed { dir: PathBuf, result: Result<Vec<DirEntry>, String> },
    /// A reference file was chosen outside the browser.
    FileSelected(PathBuf),
    FileContentReady { path: PathBuf, content: String },
    FileReadFailed { path: PathBuf, error: String },
    AiReplyReady(Turn),
    AiFailed(String),
    /// Outcome of writing the final draft: the path written or the reason it
    /// could not be.
    DraftSaved(Result<PathBuf, String>),
}

impl Msg {
    /// Variant name for diagnostics; never includes user text.
    pub fn kind(&self) -> &'static str {
        match self {
            Msg::Key(_) => "key",
            Msg::Paste(_) => "paste",
            Msg::Resize { .. } => "resize",
            Msg::DirListed { .. } => "dir_listed",
            Msg::FileSelected(_) => "file_selected",
            Msg::FileContentReady { .. } => "file_content_ready",
            Msg::FileReadFailed { .. } => "file_read_failed",
            Msg::AiReplyReady(_) => "ai_reply_ready",
            Msg::AiFailed(_) => "ai_failed",
            Msg::DraftSaved(_) => "draft_saved",
        }
    }
}

/// Translate a terminal event into a message.  Key releases and events the
/// session has no use for (mouse, focus) are dropped.
pub fn msg_from_event(event: Event) -> Option<Msg> {
    match event {
        Event::Key(k) if matches!(k.kind, KeyEventKind::Press | KeyEventKind::Repeat) => {
            Some(Msg::Key(k))
        }
        Event::Paste(text) => Some(Msg::Paste(text)),
        Event::Resize(width, height) => Some(Msg::Resize { width, height }),
        _ => None,
    }
}
