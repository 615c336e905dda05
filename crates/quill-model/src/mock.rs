// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::Turn;

/// Deterministic mock provider.  Echoes the prompt back as the assistant
/// response.
#[derive(Default)]
pub struct MockProvider;

#[async_trait]
impl crate::ModelProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }
    fn model_name(&self) -> &str {
        "mock-model"
    }

    async fn converse(&self, prompt: &Turn, _history: &[Turn]) -> anyhow::Result<Turn> {
        Ok(Turn::assistant(format!("MOCK: {}", prompt.content)))
    }
}

/// One scripted outcome of a [`ScriptedMockProvider`] call.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Reply immediately with this text.
    Text(String),
    /// Fail with this error message.
    Fail(String),
    /// Sleep, then reply with the text.
    Delayed(Duration, String),
}

/// A pre-scripted mock provider.  Each call to `converse` pops the next
/// reply from the front of the queue and records what was sent, so tests can
/// assert on call counts, concurrency, and request contents without network
/// access.
pub struct ScriptedMockProvider {
    scripts: Mutex<VecDeque<MockReply>>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    /// The last `(prompt, history)` pair seen by this provider.
    pub last_request: Arc<Mutex<Option<(Turn, Vec<Turn>)>>>,
}

impl ScriptedMockProvider {
    pub fn new(scripts: Vec<MockReply>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into()),
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    /// Convenience: provider that answers each call with the next text.
    pub fn texts<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(replies.into_iter().map(|r| MockReply::Text(r.into())).collect())
    }

    /// Number of `converse` calls started so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of calls that were running at the same time.
    pub fn max_concurrent_calls(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

struct InFlightGuard<'a>(&'a AtomicUsize);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl crate::ModelProvider for ScriptedMockProvider {
    fn name(&self) -> &str {
        "scripted-mock"
    }
    fn model_name(&self) -> &str {
        "scripted-mock-model"
    }

    async fn converse(&self, prompt: &Turn, history: &[Turn]) -> anyhow::Result<Turn> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlightGuard(&self.in_flight);

        *self.last_request.lock().unwrap() = Some((prompt.clone(), history.to_vec()));
        let next = self.scripts.lock().unwrap().pop_front();
        match next {
            Some(MockReply::Text(t)) => Ok(Turn::assistant(t)),
            Some(MockReply::Fail(e)) => Err(anyhow::anyhow!(e)),
            Some(MockReply::Delayed(d, t)) => {
                tokio::time::sleep(d).await;
                Ok(Turn::assistant(t))
            }
            // Default fallback when all scripts are consumed
            None => Ok(Turn::assistant("[no more scripts]")),
        }
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ModelProvider;

    #[tokio::test]
    async fn mock_echoes_prompt() {
        let reply = MockProvider.converse(&Turn::user("hi"), &[]).await.unwrap();
        assert_eq!(reply, Turn::assistant("MOCK: hi"));
    }

    #[tokio::test]
    async fn scripted_replies_in_order_and_counts_calls() {
        let p = ScriptedMockProvider::texts(["one", "two"]);
        let a = p.converse(&Turn::user("a"), &[]).await.unwrap();
        let b = p.converse(&Turn::user("b"), &[Turn::system("s")]).await.unwrap();
        assert_eq!(a.content, "one");
        assert_eq!(b.content, "two");
        assert_eq!(p.call_count(), 2);
        let (prompt, history) = p.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(prompt, Turn::user("b"));
        assert_eq!(history, vec![Turn::system("s")]);
    }

    #[tokio::test]
    async fn scripted_failure_is_an_error() {
        let p = ScriptedMockProvider::new(vec![MockReply::Fail("rate limited".into())]);
        let err = p.converse(&Turn::user("x"), &[]).await.unwrap_err();
        assert!(err.to_string().contains("rate limited"));
    }

    #[tokio::test]
    async fn scripted_fallback_when_scripts_exhausted() {
        let p = ScriptedMockProvider::new(vec![]);
        let reply = p.converse(&Turn::user("x"), &[]).await.unwrap();
        assert!(reply.content.contains("no more scripts"));
    }

    #[tokio::test]
    async fn sequential_calls_never_overlap() {
        let p = ScriptedMockProvider::texts(["a", "b", "c"]);
        for _ in 0..3 {
            p.converse(&Turn::user("x"), &[]).await.unwrap();
        }
        assert_eq!(p.max_concurrent_calls(), 1);
    }
}
