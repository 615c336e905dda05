// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::session::{Phase, Stage};

// ── Character sets ────────────────────────────────────────────────────────────

fn sep(ascii: bool) -> &'static str {
    if ascii { "|" } else { "│" }
}
fn busy_char(ascii: bool) -> &'static str {
    if ascii { "* " } else { "⠿ " }
}
fn border_type(ascii: bool) -> BorderType {
    if ascii { BorderType::Plain } else { BorderType::Rounded }
}

fn key_hints(stage: Stage) -> &'static str {
    match stage {
        Stage::AwaitingDescription => "  Esc:done  Enter:newline  ^c:quit",
        Stage::AwaitingFile => "  ↑↓:move  Enter:open  Backspace:up  Esc:quit",
        Stage::AwaitingTurn => "  Enter:send  PgUp/PgDn:scroll  ^s:save & finish  Esc:quit",
        Stage::AwaitingReply => "  Enter:queue  PgUp/PgDn:scroll  ^c:quit",
        Stage::Finished => "  Enter:exit",
    }
}

// ── Draw functions ────────────────────────────────────────────────────────────

/// Draw the status bar at the top.
pub fn draw_status(frame: &mut Frame, area: Rect, model_name: &str, stage: Stage, ascii: bool) {
    let busy = stage == Stage::AwaitingReply;
    let busy_indicator = if busy { busy_char(ascii) } else { "  " };
    let separator = sep(ascii);

    let line = Line::from(vec![
        Span::styled(
            format!(" {busy_indicator}"),
            Style::default().fg(if busy { Color::Yellow } else { Color::DarkGray }),
        ),
        Span::styled(format!(" {model_name} "), Style::default().fg(Color::LightCyan)),
        Span::styled(separator, Style::default().fg(Color::DarkGray)),
        Span::styled(format!(" {} ", stage.phase()), phase_style(stage.phase())),
        Span::styled(separator, Style::default().fg(Color::DarkGray)),
        Span::styled(format!(" {} ", stage.label()), Style::default().fg(Color::Gray)),
    ]);

    let para = Paragraph::new(line).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(para, area);
}

/// Draw the key hint line at the bottom.
pub fn draw_hints(frame: &mut Frame, area: Rect, stage: Stage) {
    let para = Paragraph::new(Line::styled(key_hints(stage), Style::default().fg(Color::DarkGray)));
    frame.render_widget(para, area);
}

/// Draw the composed screen inside a titled pane.
pub fn draw_body(frame: &mut Frame, area: Rect, body: Text<'static>, ascii: bool) {
    let block = Block::default()
        .title(Span::styled(
            " Cover letter ",
            Style::default().add_modifier(Modifier::BOLD).fg(Color::LightBlue),
        ))
        .borders(Borders::ALL)
        .border_type(border_type(ascii))
        .border_style(Style::default().fg(Color::LightBlue));
    frame.render_widget(Paragraph::new(body).block(block), area);
}

fn phase_style(phase: Phase) -> Style {
    match phase {
        Phase::Setup => Style::default().fg(Color::LightYellow),
        Phase::Chat => Style::default().fg(Color::LightGreen),
        Phase::End => Style::default().fg(Color::LightMagenta),
    }
}
