// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use quill_config::Config;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "quill",
    about = "Draft a tailored cover letter with an AI assistant, in your terminal",
    version,
    long_about = None,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config file (overrides auto-discovery)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Model to use, e.g. "gpt-4o-mini"
    #[arg(long, short = 'M', env = "QUILL_MODEL")]
    pub model: Option<String>,

    /// Model provider: openai | local | mock
    #[arg(long, short = 'p', env = "QUILL_PROVIDER")]
    pub provider: Option<String>,

    /// Where to write the final cover letter
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Directory the file picker starts in
    #[arg(long, value_name = "DIR")]
    pub start_dir: Option<PathBuf>,

    /// Write diagnostics to this file while the TUI is running
    #[arg(long, value_name = "PATH", env = "QUILL_DEBUG_LOG")]
    pub debug_log: Option<PathBuf>,

    /// Increase verbosity (-v = debug, -vv = trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Print the effective configuration and exit
    ShowConfig,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(m) = &self.model {
            config.model.name = m.clone();
        }
        if let Some(p) = &self.provider {
            config.model.provider = p.clone();
        }
        if let Some(o) = &self.output {
            config.session.output_path = o.display().to_string();
        }
        if let Some(d) = &self.start_dir {
            config.session.start_dir = Some(d.display().to_string());
        }
    }
}

pub fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "quill", &mut std::io::stdout());
}
