// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
mod error;
mod mock;
mod openai_compat;
mod provider;
mod types;

pub use error::ModelError;
pub use mock::{MockProvider, MockReply, ScriptedMockProvider};
pub use openai_compat::{AuthStyle, OpenAICompatProvider};
pub use provider::ModelProvider;
pub use types::*;

use quill_config::ModelConfig;

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const LOCAL_BASE_URL: &str = "http://localhost:11434/v1";
const OPENAI_KEY_ENV: &str = "OPENAI_API_KEY";

/// Construct a boxed [`ModelProvider`] from configuration.
///
/// Provider selection:
/// - `"openai"` → [`OpenAICompatProvider`] with bearer auth; a missing key is
///   reported as [`ModelError::MissingApiKey`]
/// - `"local"` → [`OpenAICompatProvider`] without auth (Ollama, LM Studio)
/// - `"mock"` → [`MockProvider`] (echo-back)
pub fn from_config(cfg: &ModelConfig) -> anyhow::Result<Box<dyn ModelProvider>> {
    match cfg.provider.as_str() {
        "openai" => {
            let env = cfg.api_key_env.clone().unwrap_or_else(|| OPENAI_KEY_ENV.to_string());
            let key = resolve_api_key(cfg, &env).ok_or_else(|| ModelError::MissingApiKey {
                provider: cfg.provider.clone(),
                env,
            })?;
            Ok(Box::new(OpenAICompatProvider::new(
                "openai",
                cfg.name.clone(),
                Some(key),
                cfg.base_url.as_deref().unwrap_or(OPENAI_BASE_URL),
                cfg.max_tokens,
                cfg.temperature,
                AuthStyle::Bearer,
            )))
        }
        "local" => Ok(Box::new(OpenAICompatProvider::new(
            "local",
            cfg.name.clone(),
            None,
            cfg.base_url.as_deref().unwrap_or(LOCAL_BASE_URL),
            cfg.max_tokens,
            cfg.temperature,
            AuthStyle::None,
        ))),
        "mock" => Ok(Box::new(MockProvider)),
        other => Err(ModelError::UnknownProvider(other.to_string()).into()),
    }
}

fn resolve_api_key(cfg: &ModelConfig, env: &str) -> Option<String> {
    if let Some(k) = cfg.api_key.as_ref().filter(|k| !k.is_empty()) {
        return Some(k.clone());
    }
    std::env::var(env).ok().filter(|k| !k.is_empty())
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openai_without_key_is_missing_api_key() {
        let cfg = ModelConfig {
            api_key_env: Some("QUILL_TEST_KEY_THAT_IS_NEVER_SET".into()),
            ..ModelConfig::default()
        };
        let err = from_config(&cfg).err().expect("must fail without a key");
        match err.downcast_ref::<ModelError>() {
            Some(ModelError::MissingApiKey { env, .. }) => {
                assert_eq!(env, "QUILL_TEST_KEY_THAT_IS_NEVER_SET")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn openai_with_explicit_key_builds() {
        let cfg = ModelConfig { api_key: Some("sk-test".into()), ..ModelConfig::default() };
        let p = from_config(&cfg).unwrap();
        assert_eq!(p.name(), "openai");
        assert_eq!(p.model_name(), cfg.name);
    }

    #[test]
    fn key_is_read_from_named_env_var() {
        std::env::set_var("QUILL_TEST_KEY_FROM_ENV", "sk-env");
        let cfg = ModelConfig {
            api_key_env: Some("QUILL_TEST_KEY_FROM_ENV".into()),
            ..ModelConfig::default()
        };
        assert_eq!(resolve_api_key(&cfg, "QUILL_TEST_KEY_FROM_ENV").as_deref(), Some("sk-env"));
    }

    #[test]
    fn local_needs_no_key() {
        let cfg = ModelConfig { provider: "local".into(), name: "llama3".into(), ..ModelConfig::default() };
        assert_eq!(from_config(&cfg).unwrap().name(), "local");
    }

    #[test]
    fn mock_provider_is_available() {
        let cfg = ModelConfig { provider: "mock".into(), ..ModelConfig::default() };
        assert_eq!(from_config(&cfg).unwrap().name(), "mock");
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let cfg = ModelConfig { provider: "carrier-pigeon".into(), ..ModelConfig::default() };
        let err = from_config(&cfg).err().unwrap();
        assert!(matches!(err.downcast_ref::<ModelError>(), Some(ModelError::UnknownProvider(_))));
    }
}
