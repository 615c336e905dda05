// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::fmt;

/// Coarse wizard phase shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Setup,
    Chat,
    End,
}

/// Fine-grained position inside a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    AwaitingDescription,
    AwaitingFile,
    AwaitingTurn,
    AwaitingReply,
    Finished,
}

impl Stage {
    pub fn phase(self) -> Phase {
        match self {
            Stage::AwaitingDescription | Stage::AwaitingFile => Phase::Setup,
            Stage::AwaitingTurn | Stage::AwaitingReply => Phase::Chat,
            Stage::Finished => Phase::End,
        }
    }

    /// Short label for the status bar.
    pub fn label(self) -> &'static str {
        match self {
            Stage::AwaitingDescription => "job description",
            Stage::AwaitingFile => "experience file",
            Stage::AwaitingTurn => "chat",
            Stage::AwaitingReply => "waiting",
            Stage::Finished => "done",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Setup => "setup",
            Phase::Chat => "chat",
            Phase::End => "end",
        };
        f.write_str(s)
    }
}

/// Why the session stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exit {
    /// Ctrl+C.
    Interrupted,
    /// The user backed out before finishing.
    Cancelled,
    /// The user left the final screen.
    Completed,
    /// A collaborator failure the session cannot recover from.
    Fatal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_stage_maps_to_its_phase() {
        assert_eq!(Stage::AwaitingDescription.phase(), Phase::Setup);
        assert_eq!(Stage::AwaitingFile.phase(), Phase::Setup);
        assert_eq!(Stage::AwaitingTurn.phase(), Phase::Chat);
        assert_eq!(Stage::AwaitingReply.phase(), Phase::Chat);
        assert_eq!(Stage::Finished.phase(), Phase::End);
    }
}
