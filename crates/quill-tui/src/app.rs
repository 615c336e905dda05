// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Host loop: owns the terminal, feeds terminal events and command results
//! into the session one at a time, and redraws after each.

use anyhow::Context;
use crossterm::event::EventStream;
use futures::StreamExt;
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;
use tracing::debug;

use crate::{
    command::{Collaborators, Dispatcher},
    draw::{draw_body, draw_hints, draw_status},
    layout::AppLayout,
    message::{msg_from_event, Msg},
    session::{Exit, Session},
    view::compose,
};

/// Options passed when constructing the TUI app.
pub struct AppOptions {
    /// Shown in the status bar, e.g. `openai/gpt-4o-mini`.
    pub model_label: String,
    /// Plain ASCII glyphs instead of Unicode.
    pub ascii: bool,
}

pub struct App {
    session: Session,
    collab: Collaborators,
    options: AppOptions,
}

impl App {
    pub fn new(session: Session, collab: Collaborators, options: AppOptions) -> Self {
        Self { session, collab, options }
    }

    /// Run until the session exits and report why.
    pub async fn run(self, mut terminal: DefaultTerminal) -> anyhow::Result<Exit> {
        let App { mut session, collab, options } = self;
        let (tx, mut rx) = mpsc::channel::<Msg>(64);
        let dispatcher = Dispatcher::new(collab, tx);

        dispatcher.dispatch_all(session.init());
        if let Ok(size) = terminal.size() {
            dispatcher.dispatch_all(session.update(Msg::Resize {
                width: size.width,
                height: size.height,
            }));
        }

        let mut crossterm_events = EventStream::new();

        loop {
            if let Some(exit) = session.exit() {
                debug!(?exit, "session ended");
                return Ok(exit.clone());
            }

            let stage = session.stage();
            let body = compose(&session.view_parts(options.ascii));
            terminal.draw(|frame| {
                let layout = AppLayout::new(frame);
                draw_status(frame, layout.status_bar, &options.model_label, stage, options.ascii);
                draw_body(frame, layout.body, body, options.ascii);
                draw_hints(frame, layout.hint_bar, stage);
            })?;

            tokio::select! {
                Some(msg) = rx.recv() => {
                    dispatcher.dispatch_all(session.update(msg));
                }
                event = crossterm_events.next() => match event {
                    Some(Ok(ev)) => {
                        if let Some(msg) = msg_from_event(ev) {
                            dispatcher.dispatch_all(session.update(msg));
                        }
                    }
                    Some(Err(e)) => return Err(e).context("reading terminal events"),
                    None => {
                        debug!("terminal event stream closed");
                        return Ok(Exit::Interrupted);
                    }
                },
            }
        }
    }
}
