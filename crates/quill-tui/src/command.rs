// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Deferred side effects issued by the session controller.
//!
//! A [`Command`] carries everything it needs to run.  The [`Dispatcher`]
//! executes it on its own tokio task and feeds the single resulting [`Msg`]
//! back into the event loop over an mpsc channel.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use quill_model::{ModelProvider, Turn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::conversation::Snapshot;
use crate::message::Msg;

/// One conversation round trip: `history ++ [prompt]` goes out, one reply
/// comes back.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub prompt: Turn,
    pub history: Snapshot,
}

#[derive(Debug, Clone)]
pub enum Command {
    ReadFile(PathBuf),
    AiExchange(Exchange),
    ListDir(PathBuf),
    SaveDraft { path: PathBuf, text: String },
}

impl Command {
    pub fn read_file(path: impl Into<PathBuf>) -> Self {
        Command::ReadFile(path.into())
    }

    pub fn ai_exchange(prompt: Turn, history: impl Into<Snapshot>) -> Self {
        Command::AiExchange(Exchange { prompt, history: history.into() })
    }

    pub fn list_dir(path: impl Into<PathBuf>) -> Self {
        Command::ListDir(path.into())
    }

    pub fn save_draft(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Command::SaveDraft { path: path.into(), text: text.into() }
    }

    /// Perform the work and describe the outcome as a message.  Never fails:
    /// every error becomes the matching failure message.
    pub async fn execute(self, collab: &Collaborators) -> Msg {
        match self {
            Command::ReadFile(path) => match tokio::fs::read(&path).await {
                Ok(bytes) => Msg::FileContentReady {
                    content: String::from_utf8_lossy(&bytes).into_owned(),
                    path,
                },
                Err(e) => Msg::FileReadFailed { error: e.to_string(), path },
            },
            Command::AiExchange(exchange) => run_exchange(exchange, collab).await,
            Command::ListDir(dir) => {
                let result = list_dir(&dir, collab.show_hidden)
                    .await
                    .map_err(|e| e.to_string());
                Msg::DirListed { dir, result }
            }
            Command::SaveDraft { path, text } => {
                let result = match tokio::fs::write(&path, text.as_bytes()).await {
                    Ok(()) => Ok(path),
                    Err(e) => Err(format!("{}: {e}", path.display())),
                };
                Msg::DraftSaved(result)
            }
        }
    }
}

async fn run_exchange(exchange: Exchange, collab: &Collaborators) -> Msg {
    debug!(
        provider = collab.model.name(),
        history_len = exchange.history.len(),
        "starting exchange"
    );
    let call = collab.model.converse(&exchange.prompt, &exchange.history);
    let outcome = match collab.reply_timeout {
        Some(limit) => match tokio::time::timeout(limit, call).await {
            Ok(r) => r,
            Err(_) => {
                warn!(timeout = ?limit, "exchange timed out");
                return Msg::AiFailed(format!("no reply within {limit:?}"));
            }
        },
        None => call.await,
    };
    match outcome {
        Ok(turn) => Msg::AiReplyReady(turn),
        Err(e) => Msg::AiFailed(format!("{e:#}")),
    }
}

/// One row of the file browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

/// List `dir`: directories first, then files, each sorted by name.  Entries
/// starting with `.` are skipped unless `show_hidden` is set.
pub async fn list_dir(dir: &Path, show_hidden: bool) -> std::io::Result<Vec<DirEntry>> {
    let mut rd = tokio::fs::read_dir(dir).await?;
    let mut entries = Vec::new();
    while let Some(e) = rd.next_entry().await? {
        let name = e.file_name().to_string_lossy().into_owned();
        if !show_hidden && name.starts_with('.') {
            continue;
        }
        // Follow symlinks so a linked directory can be entered.
        let is_dir = tokio::fs::metadata(e.path())
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        entries.push(DirEntry { name, path: e.path(), is_dir });
    }
    entries.sort_by(|a, b| b.is_dir.cmp(&a.is_dir).then_with(|| a.name.cmp(&b.name)));
    Ok(entries)
}

/// Services commands may use while running.
pub struct Collaborators {
    pub model: Arc<dyn ModelProvider>,
    /// Deadline for one exchange; `None` waits forever.
    pub reply_timeout: Option<Duration>,
    pub show_hidden: bool,
}

/// Runs commands on background tasks and posts their results to the loop.
#[derive(Clone)]
pub struct Dispatcher {
    collab: Arc<Collaborators>,
    tx: mpsc::Sender<Msg>,
}

impl Dispatcher {
    pub fn new(collab: Collaborators, tx: mpsc::Sender<Msg>) -> Self {
        Self { collab: Arc::new(collab), tx }
    }

    pub fn dispatch(&self, cmd: Command) -> JoinHandle<()> {
        let collab = self.collab.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let msg = cmd.execute(&collab).await;
            if tx.send(msg).await.is_err() {
                debug!("event loop gone; dropping command result");
            }
        })
    }

    pub fn dispatch_all(&self, cmds: impl IntoIterator<Item = Command>) {
        for cmd in cmds {
            self.dispatch(cmd);
        }
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
