// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shared helpers used across commands.

use anyhow::Context;
use nodes_editor_graph::{GraphDocument, NodesPreset, NodesRegistry};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

/// Read a preset document from disk into a fresh preset
pub fn load_preset(path: &Path, registry: Arc<NodesRegistry>) -> anyhow::Result<NodesPreset> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let doc = GraphDocument::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    let mut preset = NodesPreset::new(registry);
    preset
        .load_from_json(&doc)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    tracing::info!(
        "Loaded {} node(s) from {}",
        preset.len(),
        path.display()
    );
    Ok(preset)
}

/// Save a preset to `output`, or to stdout when no path is given
pub fn write_preset(preset: &NodesPreset, output: Option<&Path>, pretty: bool) -> anyhow::Result<()> {
    let doc = preset.get_as_json().context("Failed to save preset")?;
    match output {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            doc.to_writer(&mut writer, pretty)?;
            writer.flush()?;
            tracing::info!("Wrote {} node(s) to {}", doc.nodes.len(), path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            doc.to_writer(&mut stdout, pretty)?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}

/// Format connector values compactly, e.g. `[1, 0.5]`
pub fn format_values(values: &[f64]) -> String {
    let parts: Vec<String> = values.iter().map(|v| format!("{v}")).collect();
    format!("[{}]", parts.join(", "))
}
