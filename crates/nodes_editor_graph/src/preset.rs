// SPDX-License-Identifier: MIT OR Apache-2.0
//! The preset: graph aggregate owning every node and connector.

use crate::connection::Connection;
use crate::connector::{Connector, ConnectorRef, ConnectorSide};
use crate::document::{ConnectionRecord, GraphDocument, NodeDataError, NodeDocument};
use crate::emitter::Emitter;
use crate::node::{Node, NodeId};
use crate::registry::{NodeVariant, NodesRegistry};
use indexmap::IndexMap;
use std::sync::Arc;

/// A node graph.
///
/// Node order is the serialization index and is kept stable across removals.
/// Every [`ConnectorRef`] stored in a connector of this preset points at a
/// node of this same preset: nodes are disconnected before they leave.
#[derive(Debug)]
pub struct NodesPreset {
    registry: Arc<NodesRegistry>,
    nodes: IndexMap<NodeId, Box<dyn Node>>,
    /// Fired whenever topology or any user input changes
    pub network_changed: Emitter<()>,
    /// Fired after a node is added
    pub node_added: Emitter<NodeId>,
    /// Fired after a node is removed
    pub node_removed: Emitter<NodeId>,
}

impl NodesPreset {
    /// Create an empty preset resolving node ids through `registry`
    pub fn new(registry: Arc<NodesRegistry>) -> Self {
        Self {
            registry,
            nodes: IndexMap::new(),
            network_changed: Emitter::new(),
            node_added: Emitter::new(),
            node_removed: Emitter::new(),
        }
    }

    /// The registry used for serialization
    pub fn registry(&self) -> &Arc<NodesRegistry> {
        &self.registry
    }

    // ------------------------------------------------------------------
    // Nodes
    // ------------------------------------------------------------------

    /// Append a node, optionally moving it to `position`
    pub fn add_node(&mut self, mut node: Box<dyn Node>, position: Option<[f64; 2]>) -> NodeId {
        if let Some(position) = position {
            node.base_mut().editor_position = position;
        }
        let id = NodeId::new();
        tracing::debug!(node = ?id, name = node.name(), "Added node");
        self.nodes.insert(id, node);
        self.node_added.emit(&id);
        self.network_changed.emit(&());
        id
    }

    /// Append a node at its current position
    pub fn add<T: Node>(&mut self, node: T) -> NodeId {
        self.add_node(Box::new(node), None)
    }

    /// Remove a node, severing every edge to and from its connectors.
    ///
    /// Returns the node, or `None` if it is not part of this preset.
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Box<dyn Node>> {
        let node = self.nodes.get(&node_id)?;
        let (inputs, outputs) = (node.inputs().len(), node.outputs().len());
        for index in 0..inputs {
            self.disconnect_all(ConnectorRef::input(node_id, index));
        }
        for index in 0..outputs {
            self.disconnect_all(ConnectorRef::output(node_id, index));
        }

        let node = self.nodes.shift_remove(&node_id)?;
        tracing::debug!(node = ?node_id, name = node.name(), "Removed node");
        self.node_removed.emit(&node_id);
        self.network_changed.emit(&());
        Some(node)
    }

    /// Remove every node
    pub fn clear(&mut self) {
        let ids: Vec<NodeId> = self.nodes.keys().copied().collect();
        for id in ids {
            self.remove_node(id);
        }
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&dyn Node> {
        let node = self.nodes.get(&node_id)?;
        Some(node.as_ref())
    }

    /// Get a mutable node by ID
    pub fn node_mut(&mut self, node_id: NodeId) -> Option<&mut dyn Node> {
        let node = self.nodes.get_mut(&node_id)?;
        Some(node.as_mut())
    }

    /// Get a node by ID as its concrete variant
    pub fn node_as<T: Node>(&self, node_id: NodeId) -> Option<&T> {
        self.node(node_id)?.downcast_ref::<T>()
    }

    /// Node at a serialization index
    pub fn node_at(&self, index: usize) -> Option<(NodeId, &dyn Node)> {
        let (id, node) = self.nodes.get_index(index)?;
        Some((*id, node.as_ref()))
    }

    /// Serialization index of a node
    pub fn index_of(&self, node_id: NodeId) -> Option<usize> {
        self.nodes.get_index_of(&node_id)
    }

    /// All nodes in order
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &dyn Node)> + '_ {
        self.nodes.iter().map(|(id, node)| (*id, node.as_ref()))
    }

    /// All node IDs in order
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Get the number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the preset has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every node of variant `T`, in order
    pub fn find_nodes<T: Node>(&self) -> Vec<&T> {
        self.nodes
            .values()
            .filter_map(|node| node.downcast_ref::<T>())
            .collect()
    }

    /// IDs of every node of variant `T`, in order
    pub fn find_node_ids<T: Node>(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.is::<T>())
            .map(|(id, _)| *id)
            .collect()
    }

    // ------------------------------------------------------------------
    // Connectors
    // ------------------------------------------------------------------

    /// Resolve a connector handle
    pub fn connector(&self, connector: ConnectorRef) -> Option<&Connector> {
        self.nodes
            .get(&connector.node)?
            .base()
            .connectors(connector.side)
            .get(connector.index)
    }

    /// Resolve a connector handle mutably.
    ///
    /// Connection state stays read-only; use [`connect`](Self::connect) and
    /// [`disconnect`](Self::disconnect) to change it.
    pub fn connector_mut(&mut self, connector: ConnectorRef) -> Option<&mut Connector> {
        self.nodes
            .get_mut(&connector.node)?
            .base_mut()
            .connectors_mut(connector.side)
            .get_mut(connector.index)
    }

    /// Handle to a node's input by connector id
    pub fn input(&self, node_id: NodeId, connector_id: &str) -> Option<ConnectorRef> {
        let index = self.nodes.get(&node_id)?.base().input_index(connector_id)?;
        Some(ConnectorRef::input(node_id, index))
    }

    /// Handle to a node's output by connector id
    pub fn output(&self, node_id: NodeId, connector_id: &str) -> Option<ConnectorRef> {
        let index = self.nodes.get(&node_id)?.base().output_index(connector_id)?;
        Some(ConnectorRef::output(node_id, index))
    }

    /// Form the edge `from -> to`.
    ///
    /// Returns `false` without changing anything if the edge already exists
    /// or either handle does not resolve. Any connector may feed any other;
    /// compatibility is up to the node variants or the UI.
    pub fn connect(&mut self, from: ConnectorRef, to: ConnectorRef) -> bool {
        if self.connector(from).is_none() {
            return false;
        }
        let Some(target) = self.connector_mut(to) else {
            return false;
        };
        if !target.connected_from.push(from) {
            return false;
        }
        if let Some(source) = self.connector_mut(from) {
            source.connected_to.push(to);
        }

        tracing::debug!(?from, ?to, "Connected");
        if let Some(target) = self.connector_mut(to) {
            target.on_connect_from.emit(&from);
        }
        true
    }

    /// Remove the edge `from -> to`. Returns `false` if it does not exist.
    pub fn disconnect(&mut self, from: ConnectorRef, to: ConnectorRef) -> bool {
        let Some(source) = self.connector_mut(from) else {
            return false;
        };
        if !source.connected_to.remove(&to) {
            return false;
        }

        tracing::debug!(?from, ?to, "Disconnected");
        if let Some(target) = self.connector_mut(to) {
            target.connected_from.remove(&from);
            target.on_disconnect_from.emit(&from);
        }
        true
    }

    /// Sever every edge in which `connector` takes part, in both directions
    pub fn disconnect_all(&mut self, connector: ConnectorRef) {
        let Some(c) = self.connector(connector) else {
            return;
        };
        let downstream = c.connected_to().to_vec();
        let upstream = c.connected_from().to_vec();
        for peer in downstream {
            self.disconnect(connector, peer);
        }
        for peer in upstream {
            self.disconnect(peer, connector);
        }
    }

    /// Connect if the edge is absent, disconnect if present, then notify
    /// `network_changed`. Returns whether the edge exists afterwards.
    pub fn toggle_connection(&mut self, from: ConnectorRef, to: ConnectorRef) -> bool {
        let Some(source) = self.connector(from) else {
            return false;
        };
        let changed = if source.connected_to().contains(&to) {
            self.disconnect(from, to)
        } else {
            self.connect(from, to)
        };
        if changed {
            self.network_changed.emit(&());
        }
        self.is_connected(from, to)
    }

    /// Whether the edge `from -> to` exists
    pub fn is_connected(&self, from: ConnectorRef, to: ConnectorRef) -> bool {
        self.connector(from)
            .is_some_and(|c| c.connected_to().contains(&to))
    }

    /// Write one user input slot and notify `network_changed`.
    ///
    /// Returns `false` if the handle or slot does not resolve.
    pub fn set_user_input(&mut self, connector: ConnectorRef, slot: usize, value: f64) -> bool {
        let Some(target) = self
            .connector_mut(connector)
            .and_then(|c| c.user_input.get_mut(slot))
        else {
            return false;
        };
        *target = value;
        self.network_changed.emit(&());
        true
    }

    /// Every edge, grouped by source node in preset order
    pub fn connections(&self) -> Vec<Connection> {
        let mut out = Vec::new();
        for (node_id, node) in &self.nodes {
            for side in [ConnectorSide::Output, ConnectorSide::Input] {
                for (index, connector) in node.base().connectors(side).iter().enumerate() {
                    let from = ConnectorRef {
                        node: *node_id,
                        side,
                        index,
                    };
                    out.extend(connector.connected_to().iter().map(|to| Connection::new(from, *to)));
                }
            }
        }
        out
    }

    // ------------------------------------------------------------------
    // Serialization
    // ------------------------------------------------------------------

    /// Serialize the whole graph.
    ///
    /// Connections are read from each node's outputs. Only hook failures
    /// are reported.
    pub fn get_as_json(&self) -> Result<GraphDocument, NodeDataError> {
        let mut doc = GraphDocument::default();
        for (from_node, node) in self.nodes.values().enumerate() {
            doc.nodes.push(node.get_as_json(&self.registry)?);
            for output in node.outputs() {
                for target in output.connected_to() {
                    let Some((to_node, input)) = self.resolve_input(*target) else {
                        tracing::warn!(?target, "Skipping connection to a connector outside the preset");
                        continue;
                    };
                    doc.connections.push(ConnectionRecord {
                        from_node,
                        from_connector: output.connector_id().to_string(),
                        to_node,
                        to_connector: input.connector_id().to_string(),
                    });
                }
            }
        }
        Ok(doc)
    }

    /// Append the nodes and connections of a document, building each node
    /// through its registry variant. Nodes with unknown ids are skipped.
    pub fn load_from_json(&mut self, doc: &GraphDocument) -> Result<(), NodeDataError> {
        self.load_from_json_with(doc, |variant, _| variant.map(NodeVariant::create))
    }

    /// Append the nodes and connections of a document, building each node
    /// with `factory`.
    ///
    /// The factory is called for every node document with the registry
    /// variant its id resolves to, or `None` when the id is absent or not
    /// registered; it may still build a node from the document alone.
    /// Nodes the factory declines and connection records that do not
    /// resolve are skipped. Node indices in `doc` refer to the document,
    /// not to nodes already in the preset. A failing
    /// [`load_data_from`](Node::load_data_from) hook aborts the load and
    /// leaves the nodes added so far in place.
    pub fn load_from_json_with<F>(&mut self, doc: &GraphDocument, mut factory: F) -> Result<(), NodeDataError>
    where
        F: FnMut(Option<&NodeVariant>, &NodeDocument) -> Option<Box<dyn Node>>,
    {
        let registry = Arc::clone(&self.registry);
        let mut created: Vec<Option<NodeId>> = Vec::with_capacity(doc.nodes.len());

        for (index, node_doc) in doc.nodes.iter().enumerate() {
            let variant = node_doc.id.as_deref().and_then(|id| registry.get(id));
            let Some(mut node) = factory(variant, node_doc) else {
                tracing::warn!(index, id = ?node_doc.id, "Skipping node that could not be built");
                created.push(None);
                continue;
            };
            node.init_from_json(node_doc)?;
            created.push(Some(self.add_node(node, None)));
        }

        for record in &doc.connections {
            let node_at = |index: usize| created.get(index).copied().flatten();
            let from = node_at(record.from_node).and_then(|n| self.output(n, &record.from_connector));
            let to = node_at(record.to_node).and_then(|n| self.input(n, &record.to_connector));
            match (from, to) {
                (Some(from), Some(to)) => {
                    self.connect(from, to);
                }
                _ => tracing::warn!(?record, "Skipping unresolved connection"),
            }
        }

        self.network_changed.emit(&());
        Ok(())
    }

    fn resolve_input(&self, connector: ConnectorRef) -> Option<(usize, &Connector)> {
        if connector.side != ConnectorSide::Input {
            return None;
        }
        let (index, _, node) = self.nodes.get_full(&connector.node)?;
        Some((index, node.inputs().get(connector.index)?))
    }
}

impl Default for NodesPreset {
    fn default() -> Self {
        Self::new(Arc::new(NodesRegistry::new()))
    }
}
