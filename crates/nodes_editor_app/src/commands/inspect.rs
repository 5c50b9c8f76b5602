// SPDX-License-Identifier: MIT OR Apache-2.0
//! Preset inspection command.

use super::common::{format_values, load_preset};
use crate::settings::Settings;
use clap::Args;
use nodes_editor_graph::builtin::builtin_registry;
use nodes_editor_graph::{ConnectorRef, Evaluator, NodesPreset};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Args)]
pub struct InspectArgs {
    /// Preset document to inspect
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Also evaluate every output
    #[arg(long)]
    eval: bool,
}

pub fn run(args: InspectArgs, _settings: &Settings) -> anyhow::Result<()> {
    let preset = load_preset(&args.file, builtin_registry())?;
    let mut stdout = io::stdout().lock();
    describe(&preset, args.eval, &mut stdout)?;
    Ok(())
}

/// Write a human readable listing of the preset
pub fn describe(preset: &NodesPreset, eval: bool, out: &mut impl Write) -> io::Result<()> {
    let registry = preset.registry();
    let mut evaluator = Evaluator::new(preset);

    writeln!(out, "{} node(s)", preset.len())?;
    for (index, (node_id, node)) in preset.nodes().enumerate() {
        let variant = registry.id_of(node).unwrap_or("<unregistered>");
        let [x, y] = node.editor_position();
        writeln!(out)?;
        writeln!(out, "[{index}] {} ({variant}) at ({x}, {y})", node.name())?;

        for input in node.inputs() {
            let source = if input.is_connected() {
                format!("<- {} link(s)", input.connected_from().len())
            } else {
                format_values(&input.user_input)
            };
            writeln!(out, "    in  {:12} {source}", input.connector_id())?;
        }
        for (slot, output) in node.outputs().iter().enumerate() {
            let value = if eval {
                match evaluator.value_of(ConnectorRef::output(node_id, slot)) {
                    Ok(value) => format!("= {}", format_values(&value)),
                    Err(err) => format!("! {err}"),
                }
            } else {
                String::new()
            };
            writeln!(out, "    out {:12} {value}", output.connector_id())?;
        }
    }

    let connections = preset.connections();
    writeln!(out)?;
    writeln!(out, "{} connection(s)", connections.len())?;
    for connection in connections {
        let label = |r: ConnectorRef| {
            let index = preset.index_of(r.node).map_or_else(|| "?".to_string(), |i| i.to_string());
            let id = preset.connector(r).map_or("?", |c| c.connector_id());
            format!("{index}.{id}")
        };
        writeln!(out, "    {} -> {}", label(connection.from), label(connection.to))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodes_editor_graph::builtin::{AddNode, ConstantNode};

    #[test]
    fn test_describe_lists_nodes_and_connections() {
        let mut preset = NodesPreset::new(builtin_registry());
        let a = preset.add(ConstantNode::with_value(2.0));
        let b = preset.add(ConstantNode::with_value(3.0));
        let add = preset.add(AddNode::default());
        preset.connect(preset.output(a, "out").unwrap(), preset.input(add, "a").unwrap());
        preset.connect(preset.output(b, "out").unwrap(), preset.input(add, "b").unwrap());

        let mut out = Vec::new();
        describe(&preset, true, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("3 node(s)"));
        assert!(text.contains("(add)"));
        assert!(text.contains("2 connection(s)"));
        assert!(text.contains("0.out -> 2.a"));
        assert!(text.contains("= [5]"));
    }
}
