// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use async_trait::async_trait;

use crate::Turn;

#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Human-readable provider name for status display.
    fn name(&self) -> &str;

    /// Model identifier as reported to users.
    fn model_name(&self) -> &str;

    /// Send `history` followed by `prompt` and return the assistant's reply.
    ///
    /// The call completes once the whole reply is available; callers that
    /// must not block run it on a background task.
    async fn converse(&self, prompt: &Turn, history: &[Turn]) -> anyhow::Result<Turn>;
}
