// SPDX-License-Identifier: MIT OR Apache-2.0
//! Registered node variant listing.

#![allow(clippy::write_literal)] // Table headers

use crate::settings::Settings;
use nodes_editor_graph::builtin::builtin_registry;
use nodes_editor_graph::{InputType, NodesRegistry};
use std::io::{self, Write};

pub fn run(_settings: &Settings) -> anyhow::Result<()> {
    let registry = builtin_registry();
    let mut stdout = io::stdout().lock();
    list(&registry, &mut stdout)?;
    Ok(())
}

/// Write one block per variant in registration order
pub fn list(registry: &NodesRegistry, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "  {:12}  {:12}  {}", "Id", "Name", "Description")?;
    writeln!(out, "  {:12}  {:12}  {}", "--", "----", "-----------")?;

    for variant in registry.variants() {
        let node = variant.create();
        writeln!(
            out,
            "  {:12}  {:12}  {}",
            variant.id(),
            node.name(),
            node.description()
        )?;
        for input in node.inputs() {
            let kind = match input.input_type() {
                InputType::Sliders => "sliders",
                InputType::None => "plain",
            };
            writeln!(out, "      in  {:10} {kind}", input.connector_id())?;
        }
        for output in node.outputs() {
            writeln!(out, "      out {}", output.connector_id())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_covers_registry() {
        let registry = builtin_registry();
        let mut out = Vec::new();
        list(&registry, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        for id in registry.ids() {
            assert!(text.contains(id), "missing {id}");
        }
        assert!(text.contains("in  xyz"));
    }
}
