// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Directory browser used to pick the reference document.
//!
//! Listings are loaded asynchronously: moving into a directory returns a
//! [`Command::ListDir`] and the entries arrive later as [`Msg::DirListed`].
//! Results for a directory the user has already left are dropped.

use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use tracing::debug;

use super::Widget;
use crate::command::{Command, DirEntry};
use crate::message::Msg;

const VISIBLE_ROWS: usize = 12;

pub struct FileBrowser {
    dir: PathBuf,
    entries: Vec<DirEntry>,
    cursor: usize,
    loading: bool,
    error: Option<String>,
    selected: Option<PathBuf>,
}

impl FileBrowser {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            entries: Vec::new(),
            cursor: 0,
            loading: true,
            error: None,
            selected: None,
        }
    }

    /// The listing command for the starting directory.
    pub fn init(&self) -> Command {
        Command::list_dir(&self.dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn entries(&self) -> &[DirEntry] {
        &self.entries
    }

    /// Take the file the user picked, if any.  Each pick is reported once.
    pub fn take_selection(&mut self) -> Option<PathBuf> {
        self.selected.take()
    }

    fn enter(&mut self, dir: PathBuf) -> Command {
        debug!(dir = %dir.display(), "browsing");
        self.dir = dir;
        self.entries.clear();
        self.cursor = 0;
        self.loading = true;
        self.error = None;
        Command::list_dir(&self.dir)
    }

    fn activate(&mut self) -> Option<Command> {
        let entry = self.entries.get(self.cursor)?.clone();
        if entry.is_dir {
            Some(self.enter(entry.path))
        } else {
            self.selected = Some(entry.path);
            None
        }
    }

    fn parent(&mut self) -> Option<Command> {
        // A bare relative path like "." has the empty path as its parent.
        let parent = self.dir.parent().filter(|p| !p.as_os_str().is_empty())?.to_path_buf();
        Some(self.enter(parent))
    }

    fn move_cursor(&mut self, delta: isize) {
        if self.entries.is_empty() {
            return;
        }
        let last = self.entries.len() as isize - 1;
        self.cursor = (self.cursor as isize + delta).clamp(0, last) as usize;
    }
}

impl Widget for FileBrowser {
    fn update(&mut self, msg: &Msg) -> Option<Command> {
        match msg {
            Msg::DirListed { dir, result } => {
                if *dir != self.dir {
                    debug!(dir = %dir.display(), "stale listing dropped");
                    return None;
                }
                self.loading = false;
                match result {
                    Ok(entries) => {
                        self.entries = entries.clone();
                        self.error = None;
                    }
                    Err(e) => {
                        self.entries.clear();
                        self.error = Some(e.clone());
                    }
                }
                self.cursor = 0;
                None
            }
            Msg::Key(k) if !k.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                match k.code {
                    KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
                    KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
                    KeyCode::PageUp => self.move_cursor(-(VISIBLE_ROWS as isize)),
                    KeyCode::PageDown => self.move_cursor(VISIBLE_ROWS as isize),
                    KeyCode::Home | KeyCode::Char('g') => self.cursor = 0,
                    KeyCode::End | KeyCode::Char('G') => {
                        self.cursor = self.entries.len().saturating_sub(1)
                    }
                    KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => return self.activate(),
                    KeyCode::Backspace | KeyCode::Left | KeyCode::Char('h') => return self.parent(),
                    _ => {}
                }
                None
            }
            _ => None,
        }
    }

    fn render(&self, ascii: bool) -> Vec<Line<'static>> {
        let mut lines = vec![Line::styled(
            self.dir.display().to_string(),
            Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
        )];

        if self.loading {
            lines.push(Line::styled("  loading…", Style::default().fg(Color::DarkGray)));
            return lines;
        }
        if let Some(e) = &self.error {
            lines.push(Line::styled(format!("  {e}"), Style::default().fg(Color::Red)));
            return lines;
        }
        if self.entries.is_empty() {
            lines.push(Line::styled("  (empty)", Style::default().fg(Color::DarkGray)));
            return lines;
        }

        let marker = if ascii { "> " } else { "▸ " };
        let start = self.cursor.saturating_sub(VISIBLE_ROWS - 1);
        for (i, entry) in self.entries.iter().enumerate().skip(start).take(VISIBLE_ROWS) {
            let name = if entry.is_dir { format!("{}/", entry.name) } else { entry.name.clone() };
            let (prefix, style) = if i == self.cursor {
                (marker, Style::default().fg(Color::LightBlue).add_modifier(Modifier::BOLD))
            } else if entry.is_dir {
                ("  ", Style::default().fg(Color::Cyan))
            } else {
                ("  ", Style::default())
            };
            lines.push(Line::from(vec![Span::raw(prefix), Span::styled(name, style)]));
        }
        lines
    }
}
