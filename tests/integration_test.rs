/// End-to-end tests: the session controller driven through the real command
/// dispatcher, file system and a scripted model provider, with a hand-rolled
/// loop standing in for the terminal host.
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use quill_config::SessionConfig;
use quill_model::{MockReply, Role, ScriptedMockProvider};
use quill_tui::{Collaborators, Dispatcher, Exit, Msg, Session, Stage};
use tokio::sync::mpsc;

struct Harness {
    session: Session,
    dispatcher: Dispatcher,
    rx: mpsc::Receiver<Msg>,
    provider: Arc<ScriptedMockProvider>,
}

impl Harness {
    fn new(dir: &Path, provider: ScriptedMockProvider, timeout: Option<Duration>) -> Self {
        let settings = SessionConfig {
            output_path: dir.join("letter.md").display().to_string(),
            ..SessionConfig::default()
        };
        let provider = Arc::new(provider);
        let (tx, rx) = mpsc::channel(64);
        let dispatcher = Dispatcher::new(
            Collaborators { model: provider.clone(), reply_timeout: timeout, show_hidden: false },
            tx,
        );
        let session = Session::new(settings, dir);
        dispatcher.dispatch_all(session.init());
        Self { session, dispatcher, rx, provider }
    }

    fn send(&mut self, msg: Msg) {
        let cmds = self.session.update(msg);
        self.dispatcher.dispatch_all(cmds);
    }

    fn key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        self.send(Msg::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }));
    }

    fn type_line(&mut self, text: &str) {
        for c in text.chars() {
            self.key(KeyCode::Char(c), KeyModifiers::NONE);
        }
        self.key(KeyCode::Enter, KeyModifiers::NONE);
    }

    /// Feed command results back until `done` holds.
    async fn pump_until(&mut self, done: impl Fn(&Session) -> bool) {
        while !done(&self.session) {
            let msg = tokio::time::timeout(Duration::from_secs(5), self.rx.recv())
                .await
                .expect("no message within 5s")
                .expect("channel closed");
            self.send(msg);
        }
    }
}

fn workspace_with_resume() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("resume.txt"), "5 years Go").unwrap();
    dir
}

#[tokio::test]
async fn full_session_from_description_to_saved_letter() {
    let dir = workspace_with_resume();
    let provider = ScriptedMockProvider::texts(["Dear hiring manager, ...", "Shortened version..."]);
    let mut h = Harness::new(dir.path(), provider, None);

    h.pump_until(|s| !s.browser().entries().is_empty()).await;

    h.send(Msg::Paste("Senior Engineer role".into()));
    h.key(KeyCode::Esc, KeyModifiers::NONE);
    assert_eq!(h.session.stage(), Stage::AwaitingFile);

    // resume.txt is the only entry.
    h.key(KeyCode::Enter, KeyModifiers::NONE);
    h.pump_until(|s| s.stage() == Stage::AwaitingTurn).await;
    assert_eq!(h.session.context().reference_document(), Some("5 years Go"));
    assert_eq!(h.session.log().len(), 2);

    h.type_line("Make it shorter");
    h.pump_until(|s| s.stage() == Stage::AwaitingTurn).await;
    assert_eq!(
        h.session.log().last_assistant().map(|t| t.content.as_str()),
        Some("Shortened version...")
    );
    assert!(h.session.viewport().at_bottom());

    let (prompt, history) = h.provider.last_request.lock().unwrap().clone().unwrap();
    assert_eq!(prompt.content, "Make it shorter");
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].role, Role::System);
    assert!(history[1].content.contains("Senior Engineer role"));

    h.key(KeyCode::Char('s'), KeyModifiers::CONTROL);
    h.pump_until(|s| s.notice().is_some_and(|n| n.starts_with("Draft saved"))).await;
    let saved = std::fs::read_to_string(dir.path().join("letter.md")).unwrap();
    assert_eq!(saved, "Shortened version...");

    h.key(KeyCode::Enter, KeyModifiers::NONE);
    assert_eq!(h.session.exit(), Some(&Exit::Completed));
    assert_eq!(h.provider.call_count(), 2);
}

#[tokio::test]
async fn rapid_messages_never_overlap_exchanges() {
    let dir = workspace_with_resume();
    let slow = Duration::from_millis(50);
    let provider = ScriptedMockProvider::new(vec![
        MockReply::Delayed(slow, "draft".into()),
        MockReply::Delayed(slow, "reply one".into()),
        MockReply::Delayed(slow, "reply two".into()),
    ]);
    let mut h = Harness::new(dir.path(), provider, None);

    h.send(Msg::Paste("Rust developer".into()));
    h.key(KeyCode::Esc, KeyModifiers::NONE);
    h.send(Msg::FileSelected(dir.path().join("resume.txt")));
    h.pump_until(|s| s.stage() == Stage::AwaitingReply).await;

    // Both typed while the opening draft is still pending.
    h.type_line("one");
    h.type_line("two");
    assert_eq!(h.session.queued(), Some("one"));
    assert!(h.provider.call_count() <= 1);

    h.pump_until(|s| s.stage() == Stage::AwaitingTurn).await;
    assert_eq!(h.provider.call_count(), 2);
    assert_eq!(h.provider.max_concurrent_calls(), 1);
    // "two" was not queued and is still waiting in the input.
    assert_eq!(h.session.line_input().value(), "two");
}

#[tokio::test]
async fn slow_backend_times_out_into_a_notice() {
    let dir = workspace_with_resume();
    let provider = ScriptedMockProvider::new(vec![MockReply::Delayed(
        Duration::from_secs(30),
        "too late".into(),
    )]);
    let mut h = Harness::new(dir.path(), provider, Some(Duration::from_millis(50)));

    h.send(Msg::Paste("Rust developer".into()));
    h.key(KeyCode::Esc, KeyModifiers::NONE);
    h.send(Msg::FileSelected(dir.path().join("resume.txt")));
    h.pump_until(|s| s.stage() == Stage::AwaitingTurn).await;

    let last = h.session.log().turns().last().unwrap();
    assert_eq!(last.role, Role::System);
    assert!(last.content.contains("no reply within"));
    assert!(h.session.log().last_assistant().is_none());
}

#[tokio::test]
async fn missing_reference_file_ends_the_session() {
    let dir = tempfile::tempdir().unwrap();
    let mut h = Harness::new(dir.path(), ScriptedMockProvider::texts(["unused"]), None);

    h.send(Msg::Paste("Rust developer".into()));
    h.key(KeyCode::Esc, KeyModifiers::NONE);
    h.send(Msg::FileSelected(dir.path().join("nope.txt")));
    h.pump_until(|s| s.exit().is_some()).await;

    assert!(matches!(h.session.exit(), Some(Exit::Fatal(d)) if d.contains("nope.txt")));
    assert_eq!(h.provider.call_count(), 0);
}
