// SPDX-License-Identifier: MIT OR Apache-2.0
//! Write the effective settings to a file.

use crate::settings::{Settings, SETTINGS_FILE_NAME};
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct ConfigArgs {
    /// Settings file to write
    #[arg(short, long, value_name = "OUT", default_value = SETTINGS_FILE_NAME)]
    output: PathBuf,

    /// Replace an existing file
    #[arg(long)]
    force: bool,
}

pub fn run(args: ConfigArgs, settings: &Settings) -> anyhow::Result<()> {
    if args.output.exists() && !args.force {
        anyhow::bail!(
            "{} already exists (use --force to replace it)",
            args.output.display()
        );
    }
    settings.save(&args.output)?;
    tracing::info!("Wrote settings to {}", args.output.display());
    Ok(())
}
