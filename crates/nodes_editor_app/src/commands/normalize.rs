// SPDX-License-Identifier: MIT OR Apache-2.0
//! Load a preset and save it back in canonical form.
//!
//! Unknown variants, dangling connection records and stale input values
//! are dropped on the way through.

use super::common::{load_preset, write_preset};
use crate::settings::Settings;
use clap::Args;
use nodes_editor_graph::builtin::builtin_registry;
use std::path::PathBuf;

#[derive(Args)]
pub struct NormalizeArgs {
    /// Preset document to read
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Output file (stdout if omitted)
    #[arg(short, long, value_name = "OUT")]
    output: Option<PathBuf>,

    /// Write compact JSON regardless of settings
    #[arg(long)]
    compact: bool,
}

pub fn run(args: NormalizeArgs, settings: &Settings) -> anyhow::Result<()> {
    let preset = load_preset(&args.file, builtin_registry())?;
    let pretty = settings.pretty_json && !args.compact;
    write_preset(&preset, args.output.as_deref(), pretty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodes_editor_graph::GraphDocument;

    #[test]
    fn test_normalize_drops_dangling_records() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.json");
        let output = dir.path().join("out.json");
        std::fs::write(
            &input,
            r#"{
                "nodes": [
                    { "id": "constant", "position": [1, 2], "inputs": { "value": [3], "stale": [9] } },
                    { "id": "unknown" },
                    { "id": "preview", "label": "Result" }
                ],
                "connections": [
                    { "fromNode": 0, "fromConnector": "out", "toNode": 2, "toConnector": "in" },
                    { "fromNode": 0, "fromConnector": "out", "toNode": 1, "toConnector": "in" }
                ]
            }"#,
        )
        .unwrap();

        run(
            NormalizeArgs {
                file: input,
                output: Some(output.clone()),
                compact: true,
            },
            &Settings::default(),
        )
        .unwrap();

        let doc = GraphDocument::from_json_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(doc.nodes.len(), 2);
        assert_eq!(doc.nodes[0].inputs.get("value"), Some(&vec![3.0]));
        assert!(!doc.nodes[0].inputs.contains_key("stale"));
        assert_eq!(doc.nodes[1].field::<String>("label").unwrap().as_deref(), Some("Result"));
        assert_eq!(doc.connections.len(), 1);
        assert_eq!(doc.connections[0].to_node, 1);
    }
}
