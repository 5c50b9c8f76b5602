// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connection (edge) between two connectors of a preset.

use crate::connector::ConnectorRef;
use crate::node::NodeId;

/// A directed edge, from a source connector to a sink connector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Connection {
    /// Source connector
    pub from: ConnectorRef,
    /// Sink connector
    pub to: ConnectorRef,
}

impl Connection {
    /// Create a new connection
    pub fn new(from: ConnectorRef, to: ConnectorRef) -> Self {
        Self { from, to }
    }

    /// Check if this connection involves a specific node
    pub fn involves_node(&self, node_id: NodeId) -> bool {
        self.from.node == node_id || self.to.node == node_id
    }

    /// Check if this connection involves a specific connector
    pub fn involves_connector(&self, connector: ConnectorRef) -> bool {
        self.from == connector || self.to == connector
    }
}
