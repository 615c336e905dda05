// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Append-only record of the conversation with the assistant.

use std::sync::Arc;

use quill_model::{Role, Turn};

/// Immutable copy of the log handed to a background exchange.
pub type Snapshot = Arc<[Turn]>;

/// Ordered, append-only list of role-tagged turns.
///
/// The first entry is always the system turn passed to [`ConversationLog::new`];
/// it is never removed, reordered or rendered.
#[derive(Debug, Clone)]
pub struct ConversationLog {
    turns: Vec<Turn>,
}

impl ConversationLog {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self { turns: vec![Turn::system(system_prompt)] }
    }

    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Copy of the current turns.  Later appends do not affect it.
    pub fn snapshot_for_transmission(&self) -> Snapshot {
        Arc::from(self.turns.as_slice())
    }

    /// Transcript text for the viewport: every turn after the seed, prefixed
    /// with its speaker and separated by a blank line.
    pub fn render(&self) -> String {
        self.turns
            .iter()
            .skip(1)
            .map(|t| format!("{}{}", speaker_prefix(t.role), t.content))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// The most recent assistant reply, if any.
    pub fn last_assistant(&self) -> Option<&Turn> {
        self.turns.iter().rev().find(|t| t.is_assistant())
    }
}

fn speaker_prefix(role: Role) -> &'static str {
    match role {
        Role::User => "You: ",
        Role::Assistant => "Assistant: ",
        Role::System => "System: ",
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
