// SPDX-License-Identifier: MIT OR Apache-2.0
//! Nodes Editor - headless preset tool
//!
//! Works on preset documents produced by the nodes editor:
//! - Inspect a preset and evaluate its outputs
//! - Normalize a preset, dropping records that no longer resolve
//! - Generate a sample preset
//! - List the registered node variants
//! - Write a settings file

mod commands;
mod settings;

use clap::{Parser, Subcommand};
use settings::Settings;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "nodes_editor")]
#[command(author, version, about = "Nodes editor preset tool", long_about = None)]
struct Cli {
    /// Settings file (defaults to `nodes_editor.ron` if present)
    #[arg(long, global = true, value_name = "FILE")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Describe the nodes and connections of a preset
    Inspect(commands::inspect::InspectArgs),

    /// Load a preset and save it back in canonical form
    Normalize(commands::normalize::NormalizeArgs),

    /// Write a sample preset
    Demo(commands::demo::DemoArgs),

    /// List available node variants
    Nodes,

    /// Write the effective settings to a file
    Config(commands::config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load_or_default(cli.settings.as_deref())?;
    init_tracing(&settings.log_filter);

    tracing::debug!("Starting nodes_editor v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Inspect(args) => commands::inspect::run(args, &settings),
        Commands::Normalize(args) => commands::normalize::run(args, &settings),
        Commands::Demo(args) => commands::demo::run(args, &settings),
        Commands::Nodes => commands::nodes::run(&settings),
        Commands::Config(args) => commands::config::run(args, &settings),
    }
}

/// Logs go to stderr so documents written to stdout stay clean
fn init_tracing(log_filter: &str) {
    let mut env_filter = tracing_subscriber::EnvFilter::from_default_env();
    for directive in log_filter.split(',').filter(|d| !d.trim().is_empty()) {
        match directive.trim().parse() {
            Ok(directive) => env_filter = env_filter.add_directive(directive),
            Err(e) => eprintln!("Ignoring log filter `{directive}`: {e}"),
        }
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
