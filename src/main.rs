// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
mod cli;

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Context};
use clap::Parser;
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
};
use tracing::{info, Dispatch};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use quill_config::expand_path;
use quill_tui::{App, AppOptions, Collaborators, Exit, Session};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(cmd) = &cli.command {
        match cmd {
            Commands::Completions { shell } => {
                cli::print_completions(*shell);
                return Ok(());
            }
            Commands::ShowConfig => {
                init_logging(cli.verbose);
                let mut config = quill_config::load(cli.config.as_deref())?;
                cli.apply_overrides(&mut config);
                println!("{}", toml::to_string_pretty(&config.redacted()).context("serialising configuration")?);
                return Ok(());
            }
        }
    }

    // Everything that can fail at startup fails here, before the terminal is
    // taken over.
    let mut config = quill_config::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    let provider = quill_model::from_config(&config.model)?;

    let dispatch = match &cli.debug_log {
        Some(path) => {
            let d = file_dispatch(path, cli.verbose)?;
            tracing::dispatcher::set_global_default(d.clone())
                .context("installing diagnostics subscriber")?;
            d
        }
        None => Dispatch::none(),
    };

    let start_dir = resolve_start_dir(config.session.start_dir.as_deref())?;
    let model_label = format!("{}/{}", provider.name(), provider.model_name());
    info!(model = %model_label, start_dir = %start_dir.display(), "starting session");

    let session = Session::new(config.session.clone(), start_dir)
        .with_wrap_width(config.tui.wrap_width)
        .with_tracing(dispatch);
    let collab = Collaborators {
        model: Arc::from(provider),
        reply_timeout: config.session.reply_timeout(),
        show_hidden: config.session.show_hidden,
    };
    let opts = AppOptions { model_label, ascii: config.tui.ascii() };

    let terminal = ratatui::init();
    let _ = execute!(std::io::stdout(), EnableBracketedPaste);

    let result = App::new(session, collab, opts).run(terminal).await;

    let _ = execute!(std::io::stdout(), DisableBracketedPaste);
    ratatui::restore();

    match result? {
        Exit::Fatal(diagnostic) => bail!("{diagnostic}"),
        exit => {
            info!(?exit, "session closed");
            Ok(())
        }
    }
}

/// Absolute directory the file picker opens in, so that walking up to the
/// parent always has somewhere to go.
fn resolve_start_dir(configured: Option<&str>) -> anyhow::Result<PathBuf> {
    let dir = match configured {
        Some(dir) => expand_path(dir),
        None => std::env::current_dir().context("resolving working directory")?,
    };
    std::fs::canonicalize(&dir).with_context(|| format!("resolving start directory {}", dir.display()))
}

fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

/// Stderr logging for subcommands that do not start the TUI.
fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for(verbosity)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// File-backed diagnostics for the TUI session, where stderr is unusable.
/// Defaults to `debug`, since asking for the file means asking for detail.
fn file_dispatch(path: &Path, verbosity: u8) -> anyhow::Result<Dispatch> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening debug log {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for(verbosity.max(1))));

    let subscriber = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(filter);
    Ok(Dispatch::new(subscriber))
}
