// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("no API key for provider '{provider}': set {env} or model.api_key")]
    MissingApiKey { provider: String, env: String },

    #[error("unknown model provider: {0}")]
    UnknownProvider(String),

    #[error("{provider} error {status}: {body}")]
    Http { provider: String, status: u16, body: String },

    #[error("{0} returned no reply content")]
    EmptyReply(String),
}
