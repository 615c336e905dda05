// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Pure composition of the session's body text from its parts.

use std::path::Path;

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
};
use tracing::error;

use crate::session::{Phase, Stage};

/// Inputs to [`compose`], gathered by `Session::view_parts`.
#[derive(Debug, Clone)]
pub struct ViewParts<'a> {
    pub phase: Phase,
    pub stage: Stage,
    pub text_area: Vec<Line<'static>>,
    pub browser: Vec<Line<'static>>,
    pub viewport: Vec<Line<'static>>,
    pub line_input: Vec<Line<'static>>,
    pub job_description: Option<&'a str>,
    pub selected_file: Option<&'a Path>,
    pub queued: Option<&'a str>,
    pub notice: Option<&'a str>,
    pub ascii: bool,
}

fn heading(text: &str) -> Line<'static> {
    Line::styled(text.to_string(), Style::default().add_modifier(Modifier::BOLD))
}

fn hint(text: impl Into<String>) -> Line<'static> {
    Line::styled(text.into(), Style::default().fg(Color::DarkGray))
}

/// Body text for the current screen.
///
/// A stage that does not belong to the given phase is a controller bug: it
/// panics in debug builds and renders a diagnostic line otherwise.
pub fn compose(parts: &ViewParts<'_>) -> Text<'static> {
    let mut lines: Vec<Line<'static>> = Vec::new();
    match (parts.phase, parts.stage) {
        (Phase::Setup, Stage::AwaitingDescription) => {
            lines.push(heading("What job are you applying for?"));
            lines.push(hint("Paste or type the job description."));
            lines.push(Line::default());
            lines.extend(parts.text_area.iter().cloned());
            lines.push(Line::default());
            lines.push(hint("Press Esc when finished."));
        }
        (Phase::Setup, Stage::AwaitingFile) => {
            match parts.selected_file {
                Some(path) => {
                    lines.push(heading("Reading your experience…"));
                    lines.push(hint(format!("reading {}…", path.display())));
                }
                None => {
                    lines.push(heading("Pick a file describing your experience:"));
                    lines.push(Line::default());
                    lines.extend(parts.browser.iter().cloned());
                }
            }
            lines.push(Line::default());
            lines.push(hint("Job description:"));
            let quote = if parts.ascii { "> " } else { "▌ " };
            for l in parts.job_description.unwrap_or_default().lines() {
                lines.push(Line::from(vec![
                    Span::styled(quote, Style::default().fg(Color::DarkGray)),
                    Span::raw(l.to_string()),
                ]));
            }
        }
        (Phase::Chat, Stage::AwaitingTurn) | (Phase::Chat, Stage::AwaitingReply) => {
            lines.extend(parts.viewport.iter().cloned());
            lines.push(Line::default());
            if parts.stage == Stage::AwaitingReply {
                let mut status = vec![Span::styled(
                    "Waiting for the assistant…",
                    Style::default().fg(Color::Yellow),
                )];
                if let Some(q) = parts.queued {
                    status.push(Span::styled(
                        format!("  queued: {q}"),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
                lines.push(Line::from(status));
            } else {
                lines.push(hint("Enter to send, Ctrl+S to save the latest draft and finish."));
            }
            lines.extend(parts.line_input.iter().cloned());
        }
        (Phase::End, Stage::Finished) => {
            lines.push(heading("Good luck on the application!"));
            lines.push(Line::default());
            if let Some(n) = parts.notice {
                lines.push(Line::raw(n.to_string()));
            }
            lines.push(Line::default());
            lines.push(hint("Press Enter or Esc to exit."));
        }
        (phase, stage) => {
            let msg = format!("internal error: stage {stage:?} does not belong to phase {phase}");
            if cfg!(debug_assertions) {
                panic!("{msg}");
            }
            error!(?phase, ?stage, "inconsistent view state");
            lines.push(Line::styled(msg, Style::default().fg(Color::Red)));
        }
    }
    Text::from(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(phase: Phase, stage: Stage) -> ViewParts<'static> {
        ViewParts {
            phase,
            stage,
            text_area: vec![Line::raw("TEXTBOX")],
            browser: vec![Line::raw("BROWSER")],
            viewport: vec![Line::raw("TRANSCRIPT")],
            line_input: vec![Line::raw("INPUT")],
            job_description: Some("Senior Engineer role"),
            selected_file: None,
            queued: None,
            notice: None,
            ascii: true,
        }
    }

    fn render(p: &ViewParts<'_>) -> String {
        compose(p)
            .lines
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn description_screen_shows_text_box_only() {
        let out = render(&parts(Phase::Setup, Stage::AwaitingDescription));
        assert!(out.contains("TEXTBOX"));
        assert!(out.contains("Esc"));
        assert!(!out.contains("BROWSER"));
        assert!(!out.contains("INPUT"));
    }

    #[test]
    fn file_screen_shows_browser_and_quoted_description() {
        let out = render(&parts(Phase::Setup, Stage::AwaitingFile));
        assert!(out.contains("BROWSER"));
        assert!(out.contains("> Senior Engineer role"));
    }

    #[test]
    fn file_screen_reports_read_in_progress() {
        let mut p = parts(Phase::Setup, Stage::AwaitingFile);
        p.selected_file = Some(Path::new("/tmp/resume.txt"));
        let out = render(&p);
        assert!(out.contains("reading /tmp/resume.txt"));
        assert!(!out.contains("BROWSER"));
    }

    #[test]
    fn chat_screen_shows_transcript_and_input() {
        let out = render(&parts(Phase::Chat, Stage::AwaitingTurn));
        assert!(out.contains("TRANSCRIPT"));
        assert!(out.contains("INPUT"));
        assert!(!out.contains("Waiting"));
    }

    #[test]
    fn waiting_screen_shows_indicator_and_queue() {
        let mut p = parts(Phase::Chat, Stage::AwaitingReply);
        p.queued = Some("also mention Rust");
        let out = render(&p);
        assert!(out.contains("Waiting for the assistant"));
        assert!(out.contains("queued: also mention Rust"));
    }

    #[test]
    fn end_screen_shows_farewell_and_notice() {
        let mut p = parts(Phase::End, Stage::Finished);
        p.notice = Some("Draft saved to cover_letter.md");
        let out = render(&p);
        assert!(out.contains("Good luck on the application!"));
        assert!(out.contains("Draft saved to cover_letter.md"));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "does not belong to phase")]
    fn mismatched_phase_panics_in_debug() {
        compose(&parts(Phase::Chat, Stage::AwaitingDescription));
    }
}
