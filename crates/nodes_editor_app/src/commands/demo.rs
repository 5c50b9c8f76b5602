// SPDX-License-Identifier: MIT OR Apache-2.0
//! Sample preset generator.

use super::common::write_preset;
use crate::settings::Settings;
use clap::Args;
use nodes_editor_graph::builtin::{
    builtin_registry, AddNode, ConstantNode, MultiplyNode, PreviewNode, VectorNode,
};
use nodes_editor_graph::{NodeId, NodesPreset};
use std::path::PathBuf;

#[derive(Args)]
pub struct DemoArgs {
    /// Output file (stdout if omitted)
    #[arg(short, long, value_name = "OUT")]
    output: Option<PathBuf>,
}

pub fn run(args: DemoArgs, settings: &Settings) -> anyhow::Result<()> {
    let preset = demo_preset(settings.node_spacing);
    write_preset(&preset, args.output.as_deref(), settings.pretty_json)
}

/// `(2 + xyz) * 0.5` feeding a preview, laid out in columns
pub fn demo_preset(spacing: [f64; 2]) -> NodesPreset {
    let mut preset = NodesPreset::new(builtin_registry());
    preset.node_added.listen(|id: &NodeId| tracing::debug!("Demo node {:?} added", id));

    let at = |column: f64, row: f64| Some([column * spacing[0], row * spacing[1]]);
    let two = preset.add_node(Box::new(ConstantNode::with_value(2.0)), at(0.0, 0.0));
    let xyz = preset.add_node(Box::new(VectorNode::default()), at(0.0, 1.0));
    let half = preset.add_node(Box::new(ConstantNode::with_value(0.5)), at(1.0, 1.0));
    let add = preset.add_node(Box::new(AddNode::default()), at(1.0, 0.0));
    let mul = preset.add_node(Box::new(MultiplyNode::default()), at(2.0, 0.0));
    let preview = preset.add_node(Box::new(PreviewNode::with_label("Result")), at(3.0, 0.0));

    if let Some(slot) = preset.input(xyz, "xyz") {
        for (index, value) in [1.0, 2.0, 3.0].into_iter().enumerate() {
            preset.set_user_input(slot, index, value);
        }
    }

    let links = [
        (two, "out", add, "a"),
        (xyz, "out", add, "b"),
        (add, "sum", mul, "a"),
        (half, "out", mul, "b"),
        (mul, "product", preview, "in"),
    ];
    for (from_node, from, to_node, to) in links {
        if let (Some(from), Some(to)) = (preset.output(from_node, from), preset.input(to_node, to)) {
            preset.connect(from, to);
        }
    }
    preset
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodes_editor_graph::{Evaluator, GraphDocument};

    #[test]
    fn test_demo_evaluates() {
        let preset = demo_preset([100.0, 50.0]);
        assert_eq!(preset.len(), 6);
        assert_eq!(preset.connections().len(), 5);

        let preview = preset.find_node_ids::<PreviewNode>()[0];
        let input = preset.input(preview, "in").unwrap();
        let value = Evaluator::new(&preset).value_of(input).unwrap();
        assert_eq!(value, vec![1.5, 2.0, 3.0]);
    }

    #[test]
    fn test_demo_layout_uses_spacing() {
        let preset = demo_preset([100.0, 50.0]);
        let (_, mul) = preset.node_at(4).unwrap();
        assert_eq!(mul.editor_position(), [200.0, 0.0]);
    }

    #[test]
    fn test_demo_written_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demo.json");
        run(DemoArgs { output: Some(path.clone()) }, &Settings::default()).unwrap();

        let doc = GraphDocument::from_json_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(doc.nodes.len(), 6);
        assert_eq!(doc.connections.len(), 5);
        assert_eq!(doc.nodes[1].inputs.get("xyz"), Some(&vec![1.0, 2.0, 3.0]));
    }
}
