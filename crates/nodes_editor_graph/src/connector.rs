// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connector (port) definitions for node inputs/outputs.

use crate::collection::Collection;
use crate::emitter::Emitter;
use crate::node::NodeId;

/// Description used when a connector is built without one
pub const DEFAULT_DESCRIPTION: &str = "(no description given)";

/// Which connector list of a node a handle points into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectorSide {
    /// The node's `inputs`
    Input,
    /// The node's `outputs`
    Output,
}

/// Handle to a connector owned by a node inside a [`NodesPreset`](crate::NodesPreset)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectorRef {
    /// Owning node
    pub node: NodeId,
    /// Input or output list
    pub side: ConnectorSide,
    /// Position within that list
    pub index: usize,
}

impl ConnectorRef {
    /// Handle to the `index`-th input of `node`
    pub fn input(node: NodeId, index: usize) -> Self {
        Self {
            node,
            side: ConnectorSide::Input,
            index,
        }
    }

    /// Handle to the `index`-th output of `node`
    pub fn output(node: NodeId, index: usize) -> Self {
        Self {
            node,
            side: ConnectorSide::Output,
            index,
        }
    }
}

/// How unconnected user input is edited. Only relevant for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputType {
    /// No editing controls
    #[default]
    None,
    /// One numeric slider per user input slot
    Sliders,
}

/// A named port belonging to a node
#[derive(Debug)]
pub struct Connector {
    connector_id: String,
    /// Display name, visible on hover
    pub name: String,
    /// Description, visible on hover
    pub description: String,
    input_type: InputType,
    /// Values used when nothing is connected upstream
    pub user_input: Vec<f64>,
    output_connector: bool,
    pub(crate) connected_from: Collection<ConnectorRef>,
    pub(crate) connected_to: Collection<ConnectorRef>,
    /// Fired on this connector when another connector connects to it
    pub on_connect_from: Emitter<ConnectorRef>,
    /// Fired on this connector when another connector disconnects from it
    pub on_disconnect_from: Emitter<ConnectorRef>,
}

impl Connector {
    /// Create a new connector
    pub fn new(
        connector_id: impl Into<String>,
        input_type: InputType,
        user_input: Vec<f64>,
    ) -> Self {
        let connector_id = connector_id.into();
        Self {
            name: connector_id.clone(),
            connector_id,
            description: DEFAULT_DESCRIPTION.to_string(),
            input_type,
            user_input,
            output_connector: false,
            connected_from: Collection::new(),
            connected_to: Collection::new(),
            on_connect_from: Emitter::new(),
            on_disconnect_from: Emitter::new(),
        }
    }

    /// Connector without editing controls holding a single zero
    pub fn plain(connector_id: impl Into<String>) -> Self {
        Self::new(connector_id, InputType::None, vec![0.0])
    }

    /// Connector edited through one slider per value
    pub fn sliders(connector_id: impl Into<String>, defaults: impl Into<Vec<f64>>) -> Self {
        Self::new(connector_id, InputType::Sliders, defaults.into())
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Stable id, unique within the owning node
    pub fn connector_id(&self) -> &str {
        &self.connector_id
    }

    /// How the user input is edited
    pub fn input_type(&self) -> InputType {
        self.input_type
    }

    /// Whether this connector is a node output
    pub fn is_output(&self) -> bool {
        self.output_connector
    }

    pub(crate) fn mark_output(&mut self) {
        self.output_connector = true;
    }

    /// Upstream connectors feeding this one
    pub fn connected_from(&self) -> &Collection<ConnectorRef> {
        &self.connected_from
    }

    /// Downstream connectors fed by this one
    pub fn connected_to(&self) -> &Collection<ConnectorRef> {
        &self.connected_to
    }

    /// Whether any edge touches this connector
    pub fn is_connected(&self) -> bool {
        !self.connected_from.is_empty() || !self.connected_to.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = Connector::plain("in");
        assert_eq!(c.connector_id(), "in");
        assert_eq!(c.name, "in");
        assert_eq!(c.description, DEFAULT_DESCRIPTION);
        assert_eq!(c.input_type(), InputType::None);
        assert_eq!(c.user_input, vec![0.0]);
        assert!(!c.is_output());
        assert!(!c.is_connected());
    }

    #[test]
    fn test_builder() {
        let c = Connector::sliders("color", [1.0, 0.5, 0.25])
            .with_name("Color")
            .with_description("Base color");
        assert_eq!(c.connector_id(), "color");
        assert_eq!(c.name, "Color");
        assert_eq!(c.description, "Base color");
        assert_eq!(c.input_type(), InputType::Sliders);
        assert_eq!(c.user_input.len(), 3);
    }
}
