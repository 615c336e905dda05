// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! The session controller: a message-driven state machine walking the user
//! from job description through reference file to a chat with the assistant.
//!
//! The controller never performs I/O.  [`Session::update`] takes one message,
//! mutates the session and returns the commands the host loop must run; each
//! command later comes back as exactly one message.

mod context;
mod stage;

pub use context::SessionContext;
pub use stage::{Exit, Phase, Stage};

use std::path::{Path, PathBuf};

use quill_config::{expand_path, SessionConfig};
use quill_model::Turn;
use tracing::{debug, error, info, warn, Dispatch};

use crate::command::Command;
use crate::conversation::ConversationLog;
use crate::keys::{map_key, Action};
use crate::message::Msg;
use crate::view::ViewParts;
use crate::widgets::{FileBrowser, LineInput, TextArea, Viewport, Widget};

pub struct Session {
    settings: SessionConfig,
    output_path: PathBuf,
    stage: Stage,
    exit: Option<Exit>,
    context: SessionContext,
    log: ConversationLog,
    /// The instruction that produced the first draft.  It is not part of the
    /// visible log but is replayed to the model on every later exchange.
    opening: Option<Turn>,
    selected_file: Option<PathBuf>,
    /// A message accepted while a reply was still pending.
    queued: Option<String>,
    notice: Option<String>,
    /// A `SaveDraft` has been issued and its result is still outstanding.
    saving: bool,
    text_area: TextArea,
    line_input: LineInput,
    viewport: Viewport,
    browser: FileBrowser,
    trace: Dispatch,
}

impl Session {
    /// A fresh session in `AwaitingDescription`, browsing from `start_dir`.
    pub fn new(settings: SessionConfig, start_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_path: expand_path(&settings.output_path),
            stage: Stage::AwaitingDescription,
            exit: None,
            context: SessionContext::default(),
            log: ConversationLog::new(settings.system_prompt.clone()),
            opening: None,
            selected_file: None,
            queued: None,
            notice: None,
            saving: false,
            text_area: TextArea::new(settings.description_char_limit),
            line_input: LineInput::new(settings.message_char_limit),
            viewport: Viewport::new(0),
            browser: FileBrowser::new(start_dir),
            trace: Dispatch::none(),
            settings,
        }
    }

    /// Cap the transcript wrap width (0 follows the terminal).
    pub fn with_wrap_width(mut self, width: u16) -> Self {
        self.viewport = Viewport::new(width);
        self
    }

    /// Route this session's diagnostics to `dispatch` instead of discarding
    /// them.
    pub fn with_tracing(mut self, dispatch: Dispatch) -> Self {
        self.trace = dispatch;
        self
    }

    /// Commands to run before the first message.
    pub fn init(&self) -> Vec<Command> {
        vec![self.browser.init()]
    }

    /// Process one message and return the commands it produced.  Once the
    /// session has exited every message is ignored.
    pub fn update(&mut self, msg: Msg) -> Vec<Command> {
        if self.exit.is_some() {
            return Vec::new();
        }
        let trace = self.trace.clone();
        tracing::dispatcher::with_default(&trace, || self.handle(msg))
    }

    fn handle(&mut self, msg: Msg) -> Vec<Command> {
        debug!(stage = ?self.stage, msg = msg.kind(), "update");
        let mut cmds = Vec::new();

        cmds.extend(self.line_input.update(&msg));
        cmds.extend(self.viewport.update(&msg));

        match &msg {
            Msg::Key(k) => {
                if let Some(action) = map_key(k, self.text_area.is_focused()) {
                    if self.apply(action, &mut cmds) {
                        return cmds;
                    }
                }
            }
            Msg::DirListed { .. } => {
                cmds.extend(self.browser.update(&msg));
                return cmds;
            }
            Msg::FileSelected(path) => {
                self.select_file(path.clone(), &mut cmds);
                return cmds;
            }
            Msg::FileContentReady { path, content } => {
                self.begin_chat(path, content, &mut cmds);
                return cmds;
            }
            Msg::FileReadFailed { path, error } => {
                error!(path = %path.display(), %error, "reference file unreadable");
                self.exit = Some(Exit::Fatal(format!("could not read {}: {error}", path.display())));
                return cmds;
            }
            Msg::AiReplyReady(turn) => {
                self.on_reply(turn.clone(), &mut cmds);
                return cmds;
            }
            Msg::AiFailed(reason) => {
                self.on_failure(reason);
                return cmds;
            }
            Msg::DraftSaved(result) => {
                self.on_saved(result);
                return cmds;
            }
            Msg::Paste(_) | Msg::Resize { .. } => {}
        }

        // Phase-scoped widgets only see what no transition consumed.
        match self.stage {
            Stage::AwaitingDescription => cmds.extend(self.text_area.update(&msg)),
            Stage::AwaitingFile if self.selected_file.is_none() && matches!(msg, Msg::Key(_)) => {
                cmds.extend(self.browser.update(&msg));
                if let Some(path) = self.browser.take_selection() {
                    self.select_file(path, &mut cmds);
                }
            }
            _ => {}
        }
        cmds
    }

    /// Returns `true` when the action caused a transition.
    fn apply(&mut self, action: Action, cmds: &mut Vec<Command>) -> bool {
        match (action, self.stage) {
            (Action::Interrupt, _) => {
                info!(stage = ?self.stage, "interrupted");
                self.exit = Some(Exit::Interrupted);
                true
            }
            (Action::Cancel, Stage::Finished) | (Action::Accept, Stage::Finished) => {
                if self.saving {
                    debug!("draft save still in flight; staying on the final screen");
                } else {
                    self.exit = Some(Exit::Completed);
                }
                true
            }
            (Action::Cancel, _) => {
                info!(stage = ?self.stage, "cancelled");
                self.exit = Some(Exit::Cancelled);
                true
            }
            (Action::Accept, Stage::AwaitingDescription) => self.accept_description(),
            (Action::Accept, Stage::AwaitingTurn) => match self.take_input() {
                Some(text) => {
                    self.submit(text, cmds);
                    true
                }
                None => false,
            },
            (Action::Accept, Stage::AwaitingReply) => {
                if self.queued.is_some() {
                    debug!("a message is already queued");
                    return false;
                }
                match self.take_input() {
                    Some(text) => {
                        debug!("queueing message until the reply arrives");
                        self.queued = Some(text);
                        true
                    }
                    None => false,
                }
            }
            (Action::Accept, Stage::AwaitingFile) => false,
            (Action::Finish, Stage::AwaitingTurn) => self.finish(cmds),
            (Action::Finish, _) => false,
        }
    }

    fn accept_description(&mut self) -> bool {
        if self.text_area.value().trim().is_empty() {
            debug!("empty job description rejected");
            return false;
        }
        if !self.context.set_job_description(self.text_area.value()) {
            return false;
        }
        self.text_area.blur();
        self.stage = Stage::AwaitingFile;
        info!("job description captured");
        true
    }

    /// Trimmed line input, cleared; `None` if blank.
    fn take_input(&mut self) -> Option<String> {
        let text = self.line_input.value().trim().to_string();
        if text.is_empty() {
            return None;
        }
        self.line_input.clear();
        Some(text)
    }

    fn select_file(&mut self, path: PathBuf, cmds: &mut Vec<Command>) {
        if self.stage != Stage::AwaitingFile || self.selected_file.is_some() {
            debug!(path = %path.display(), "file selection ignored");
            return;
        }
        info!(path = %path.display(), "reference file selected");
        self.selected_file = Some(path.clone());
        cmds.push(Command::read_file(path));
    }

    fn begin_chat(&mut self, path: &Path, content: &str, cmds: &mut Vec<Command>) {
        if self.stage != Stage::AwaitingFile || !self.context.set_reference_document(content) {
            warn!(path = %path.display(), "unexpected file content ignored");
            return;
        }
        let prompt = self.settings.render_opening_prompt(
            self.context.job_description().unwrap_or_default(),
            content,
        );
        let opening = Turn::user(prompt);
        cmds.push(self.exchange(opening.clone()));
        self.opening = Some(opening);
        self.line_input.focus();
        self.stage = Stage::AwaitingReply;
        info!(bytes = content.len(), "reference loaded; requesting first draft");
    }

    /// Build an exchange for `prompt` against the conversation so far.
    fn exchange(&self, prompt: Turn) -> Command {
        let snapshot = self.log.snapshot_for_transmission();
        let mut history = snapshot.to_vec();
        if let Some(opening) = &self.opening {
            history.insert(1.min(history.len()), opening.clone());
        }
        Command::ai_exchange(prompt, history)
    }

    fn submit(&mut self, text: String, cmds: &mut Vec<Command>) {
        let turn = Turn::user(text);
        cmds.push(self.exchange(turn.clone()));
        self.log.append(turn);
        self.refresh_transcript();
        self.stage = Stage::AwaitingReply;
    }

    fn on_reply(&mut self, turn: Turn, cmds: &mut Vec<Command>) {
        if self.stage != Stage::AwaitingReply {
            warn!(stage = ?self.stage, "reply arrived with no exchange pending");
            return;
        }
        debug!(chars = turn.content.len(), role = ?turn.role, "reply received");
        // Whatever role the backend claims, a reply is the assistant's turn.
        self.log.append(Turn::assistant(turn.content));
        self.refresh_transcript();
        self.stage = Stage::AwaitingTurn;
        if let Some(text) = self.queued.take() {
            self.submit(text, cmds);
        }
    }

    fn on_failure(&mut self, reason: &str) {
        if self.stage != Stage::AwaitingReply {
            warn!(stage = ?self.stage, "failure arrived with no exchange pending");
            return;
        }
        warn!(%reason, "exchange failed");
        self.log.append(Turn::system(format!("The assistant could not reply: {reason}")));
        self.refresh_transcript();
        self.stage = Stage::AwaitingTurn;
        if let Some(text) = self.queued.take() {
            self.line_input.set_value(&text);
        }
    }

    fn finish(&mut self, cmds: &mut Vec<Command>) -> bool {
        let Some(draft) = self.log.last_assistant() else {
            debug!("nothing to save yet");
            return false;
        };
        cmds.push(Command::save_draft(&self.output_path, draft.content.clone()));
        self.notice = Some(format!("Saving draft to {}…", self.output_path.display()));
        self.saving = true;
        self.line_input.blur();
        self.stage = Stage::Finished;
        info!(path = %self.output_path.display(), "session finished");
        true
    }

    fn on_saved(&mut self, result: &Result<PathBuf, String>) {
        if !self.saving {
            warn!("save result arrived with no save pending");
            return;
        }
        self.saving = false;
        self.notice = Some(match result {
            Ok(path) => {
                info!(path = %path.display(), "draft saved");
                format!("Draft saved to {}", path.display())
            }
            Err(e) => {
                warn!(error = %e, "draft not saved");
                format!("Could not save the draft: {e}")
            }
        });
    }

    fn refresh_transcript(&mut self) {
        self.viewport.set_content(self.log.render());
        self.viewport.goto_bottom();
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn phase(&self) -> Phase {
        self.stage.phase()
    }

    pub fn exit(&self) -> Option<&Exit> {
        self.exit.as_ref()
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn selected_file(&self) -> Option<&Path> {
        self.selected_file.as_deref()
    }

    pub fn queued(&self) -> Option<&str> {
        self.queued.as_deref()
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn text_area(&self) -> &TextArea {
        &self.text_area
    }

    pub fn line_input(&self) -> &LineInput {
        &self.line_input
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn browser(&self) -> &FileBrowser {
        &self.browser
    }

    /// Everything the view composer needs for one frame.
    pub fn view_parts(&self, ascii: bool) -> ViewParts<'_> {
        ViewParts {
            phase: self.phase(),
            stage: self.stage,
            text_area: self.text_area.render(ascii),
            browser: self.browser.render(ascii),
            viewport: self.viewport.render(ascii),
            line_input: self.line_input.render(ascii),
            job_description: self.context.job_description(),
            selected_file: self.selected_file.as_deref(),
            queued: self.queued.as_deref(),
            notice: self.notice.as_deref(),
            ascii,
        }
    }
}
