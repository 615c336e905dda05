// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use serde::{Deserialize, Serialize};

/// Placeholder replaced with the captured job description in
/// [`SessionConfig::opening_prompt`].
pub const JOB_DESCRIPTION_PLACEHOLDER: &str = "{job_description}";
/// Placeholder replaced with the loaded reference document in
/// [`SessionConfig::opening_prompt`].
pub const REFERENCE_DOCUMENT_PLACEHOLDER: &str = "{reference_document}";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub tui: TuiConfig,
}

impl Config {
    /// A copy safe to print: an explicit API key is masked.
    pub fn redacted(&self) -> Config {
        let mut c = self.clone();
        if c.model.api_key.is_some() {
            c.model.api_key = Some(REDACTED.into());
        }
        c
    }
}

/// Shown in place of secrets by [`Config::redacted`].
pub const REDACTED: &str = "<redacted>";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Provider identifier: "openai" | "local" | "mock"
    pub provider: String,
    /// Model name forwarded to the provider API
    pub name: String,
    /// Environment variable that holds the API key (read at runtime).
    /// When unset the provider's conventional variable is used
    /// (`OPENAI_API_KEY` for "openai").
    pub api_key_env: Option<String>,
    /// Explicit API key; prefer api_key_env in config files to avoid secrets
    /// in version-controlled files
    pub api_key: Option<String>,
    /// Base URL override, ending before `/chat/completions`.
    pub base_url: Option<String>,
    /// Maximum tokens to request in a single completion
    pub max_tokens: Option<u32>,
    /// Sampling temperature (0.0–2.0)
    pub temperature: Option<f32>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: "openai".into(),
            name: "gpt-3.5-turbo".into(),
            api_key_env: None,
            api_key: None,
            base_url: None,
            max_tokens: Some(1024),
            temperature: Some(0.7),
        }
    }
}

/// Behaviour of the drafting session itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// First turn of every conversation; describes the assistant's task.
    pub system_prompt: String,
    /// Instruction sent once the job description and reference document are
    /// known.  `{job_description}` and `{reference_document}` are substituted.
    pub opening_prompt: String,
    /// Maximum characters accepted by the job-description text box.
    pub description_char_limit: usize,
    /// Maximum characters accepted by the chat input line.
    pub message_char_limit: usize,
    /// Seconds to wait for a reply before giving up (0 = wait forever).
    pub reply_timeout_secs: u64,
    /// Where the final draft is written when the session is finished.
    pub output_path: String,
    /// Directory the file browser opens in; the working directory when unset.
    pub start_dir: Option<String>,
    /// Show dot-files in the file browser.
    pub show_hidden: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            system_prompt: "Your job is to help the user create a tailored cover letter based on \
                the job description, and the user's experience."
                .into(),
            opening_prompt: "Here is the user's information. Based on the job that they are \
                applying for, and the user's experience, generate the first draft of a cover \
                letter. Make the cover letter concise, and only write about the parts of the \
                user's experience that could be relevant to the job description. No more than \
                2 paragraphs. Then, ask the user if they would like to make any modifications.\n\n\
                Job Description: {job_description}\n\nUser Experience: {reference_document}"
                .into(),
            description_char_limit: 3200,
            message_char_limit: 200,
            reply_timeout_secs: 120,
            output_path: "cover_letter.md".into(),
            start_dir: None,
            show_hidden: false,
        }
    }
}

impl SessionConfig {
    /// Fill the opening prompt template with the captured session context.
    /// Substitution is a single pass over the template, so placeholder text
    /// inside the substituted values is left alone.
    pub fn render_opening_prompt(&self, job_description: &str, reference_document: &str) -> String {
        let fills = [
            (JOB_DESCRIPTION_PLACEHOLDER, job_description),
            (REFERENCE_DOCUMENT_PLACEHOLDER, reference_document),
        ];
        let mut out = String::with_capacity(
            self.opening_prompt.len() + job_description.len() + reference_document.len(),
        );
        let mut rest = self.opening_prompt.as_str();
        loop {
            let next = fills
                .iter()
                .filter_map(|(ph, value)| rest.find(ph).map(|at| (at, *ph, *value)))
                .min_by_key(|(at, _, _)| *at);
            match next {
                Some((at, ph, value)) => {
                    out.push_str(&rest[..at]);
                    out.push_str(value);
                    rest = &rest[at + ph.len()..];
                }
                None => {
                    out.push_str(rest);
                    return out;
                }
            }
        }
    }

    /// Reply deadline, `None` when disabled.
    pub fn reply_timeout(&self) -> Option<std::time::Duration> {
        (self.reply_timeout_secs > 0)
            .then(|| std::time::Duration::from_secs(self.reply_timeout_secs))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Use plain ASCII borders/indicators instead of Unicode glyphs.
    /// Can also be forced with the QUILL_ASCII=1 environment variable.
    pub ascii: bool,
    /// Width the conversation transcript is wrapped to (0 = terminal width).
    pub wrap_width: u16,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self { ascii: false, wrap_width: 0 }
    }
}

impl TuiConfig {
    pub fn ascii(&self) -> bool {
        self.ascii || std::env::var("QUILL_ASCII").map(|v| v == "1").unwrap_or(false)
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_model_provider_is_openai() {
        let c = Config::default();
        assert_eq!(c.model.provider, "openai");
    }

    #[test]
    fn config_default_api_key_env_is_none() {
        // The provider's conventional variable is resolved by the model crate.
        let c = Config::default();
        assert!(c.model.api_key_env.is_none());
        assert!(c.model.api_key.is_none());
    }

    #[test]
    fn redacted_masks_an_explicit_key_only() {
        let mut c = Config::default();
        assert!(c.redacted().model.api_key.is_none());

        c.model.api_key = Some("sk-live-123".into());
        c.model.api_key_env = Some("MY_KEY".into());
        let shown = toml::to_string_pretty(&c.redacted()).unwrap();
        assert!(!shown.contains("sk-live-123"));
        assert!(shown.contains(REDACTED));
        assert!(shown.contains("MY_KEY"));
        assert_eq!(c.model.api_key.as_deref(), Some("sk-live-123"));
    }

    #[test]
    fn session_defaults_match_widget_limits() {
        let s = SessionConfig::default();
        assert_eq!(s.description_char_limit, 3200);
        assert_eq!(s.message_char_limit, 200);
        assert_eq!(s.reply_timeout_secs, 120);
    }

    #[test]
    fn opening_prompt_substitutes_both_placeholders() {
        let s = SessionConfig {
            opening_prompt: "job={job_description} cv={reference_document}".into(),
            ..Default::default()
        };
        assert_eq!(s.render_opening_prompt("Engineer", "5 years Go"), "job=Engineer cv=5 years Go");
    }

    #[test]
    fn placeholder_text_inside_a_value_is_not_substituted() {
        let s = SessionConfig {
            opening_prompt: "job={job_description} cv={reference_document}".into(),
            ..Default::default()
        };
        let rendered = s.render_opening_prompt("mentions {reference_document} literally", "5 years Go");
        assert_eq!(rendered, "job=mentions {reference_document} literally cv=5 years Go");

        let rendered = s.render_opening_prompt("Engineer", "cv says {job_description}");
        assert_eq!(rendered, "job=Engineer cv=cv says {job_description}");
    }

    #[test]
    fn placeholders_may_repeat_or_be_absent() {
        let s = SessionConfig {
            opening_prompt: "{reference_document}/{job_description}/{reference_document}".into(),
            ..Default::default()
        };
        assert_eq!(s.render_opening_prompt("J", "R"), "R/J/R");
        let s = SessionConfig { opening_prompt: "plain".into(), ..Default::default() };
        assert_eq!(s.render_opening_prompt("J", "R"), "plain");
    }

    #[test]
    fn default_opening_prompt_mentions_both_inputs() {
        let rendered = SessionConfig::default().render_opening_prompt("JD-TEXT", "CV-TEXT");
        assert!(rendered.contains("JD-TEXT"));
        assert!(rendered.contains("CV-TEXT"));
        assert!(!rendered.contains(JOB_DESCRIPTION_PLACEHOLDER));
    }

    #[test]
    fn zero_timeout_disables_deadline() {
        let s = SessionConfig { reply_timeout_secs: 0, ..Default::default() };
        assert!(s.reply_timeout().is_none());
        let s = SessionConfig { reply_timeout_secs: 5, ..Default::default() };
        assert_eq!(s.reply_timeout(), Some(std::time::Duration::from_secs(5)));
    }

    #[test]
    fn partial_session_table_keeps_other_defaults() {
        let c: Config = toml::from_str("[session]\nmessage_char_limit = 500\n").unwrap();
        assert_eq!(c.session.message_char_limit, 500);
        assert_eq!(c.session.description_char_limit, 3200);
        assert_eq!(c.model.provider, "openai");
    }

    #[test]
    fn config_round_trips_through_toml() {
        let c = Config::default();
        let text = toml::to_string_pretty(&c).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.model.name, c.model.name);
        assert_eq!(back.session.output_path, c.session.output_path);
    }
}
