// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Shared implementation for OpenAI-compatible chat completion APIs.
//!
//! The hosted OpenAI endpoint and local servers (Ollama, LM Studio, vLLM)
//! speak the same `/chat/completions` wire format; they differ only in the
//! base URL and whether a bearer token is attached.
//!
//! # Auth styles
//! - `Bearer` — `Authorization: Bearer <key>`
//! - `None` — no authentication (local servers)

use anyhow::Context;
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::{ModelError, Turn};

/// How to send the API key in HTTP requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStyle {
    /// `Authorization: Bearer <key>`.
    Bearer,
    /// No authentication header.
    None,
}

/// OpenAI-compatible chat completion provider.
pub struct OpenAICompatProvider {
    /// Provider id returned by `ModelProvider::name()`.
    driver_name: &'static str,
    /// Model id forwarded to the API.
    model: String,
    /// API key (pre-resolved from config or env).
    api_key: Option<String>,
    /// Full chat completions URL, e.g. `https://api.openai.com/v1/chat/completions`.
    chat_url: String,
    max_tokens: u32,
    temperature: f32,
    client: reqwest::Client,
    auth_style: AuthStyle,
}

impl OpenAICompatProvider {
    /// Construct a provider.
    ///
    /// `base_url` ends **before** `/chat/completions`, e.g.
    /// `https://api.openai.com/v1`.  `max_tokens` defaults to 1024 and
    /// `temperature` to 0.7.
    pub fn new(
        driver_name: &'static str,
        model: String,
        api_key: Option<String>,
        base_url: &str,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
        auth_style: AuthStyle,
    ) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            driver_name,
            model,
            api_key,
            chat_url: format!("{base}/chat/completions"),
            max_tokens: max_tokens.unwrap_or(1024),
            temperature: temperature.unwrap_or(0.7),
            client: reqwest::Client::new(),
            auth_style,
        }
    }

    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }
}

#[async_trait]
impl crate::ModelProvider for OpenAICompatProvider {
    fn name(&self) -> &str {
        self.driver_name
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn converse(&self, prompt: &Turn, history: &[Turn]) -> anyhow::Result<Turn> {
        let body = build_request_body(&self.model, self.max_tokens, self.temperature, prompt, history);

        debug!(
            driver = %self.driver_name,
            model = %self.model,
            message_count = history.len() + 1,
            "sending completion request"
        );
        tracing::trace!(request_body = ?body, "full completion request");

        let mut http_req = self.client.post(&self.chat_url).json(&body);
        http_req = match self.auth_style {
            AuthStyle::Bearer => {
                let key = self.api_key.as_deref()
                    .context("API key not set; provide api_key or api_key_env in config")?;
                http_req.bearer_auth(key)
            }
            AuthStyle::None => http_req,
        };

        let resp = http_req.send().await
            .with_context(|| format!("{} request failed", self.driver_name))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(ModelError::Http {
                provider: self.driver_name.to_string(),
                status: status.as_u16(),
                body: text,
            }
            .into());
        }

        let value: Value = resp.json().await
            .with_context(|| format!("decoding {} response", self.driver_name))?;
        parse_reply(self.driver_name, &value)
    }
}

/// Serialise a conversation into a chat-completions request body.
///
/// Messages are sent in the order `history ++ [prompt]`.
pub(crate) fn build_request_body(
    model: &str,
    max_tokens: u32,
    temperature: f32,
    prompt: &Turn,
    history: &[Turn],
) -> Value {
    let messages: Vec<Value> = history
        .iter()
        .chain(std::iter::once(prompt))
        .map(|t| json!({ "role": t.role.as_str(), "content": t.content }))
        .collect();
    json!({
        "model": model,
        "messages": messages,
        "stream": false,
        "max_tokens": max_tokens,
        "temperature": temperature,
    })
}

/// Extract the first choice's message from a chat-completions response.
pub(crate) fn parse_reply(driver: &str, v: &Value) -> anyhow::Result<Turn> {
    let message = &v["choices"][0]["message"];
    let content = message["content"]
        .as_str()
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ModelError::EmptyReply(driver.to_string()))?;
    // Some local servers omit or misreport the role; a reply is always the
    // assistant's.
    Ok(Turn::assistant(content))
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
