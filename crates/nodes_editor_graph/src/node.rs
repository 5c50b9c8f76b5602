// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the graph framework.

use crate::connector::{Connector, ConnectorSide, DEFAULT_DESCRIPTION};
use crate::document::{NodeDataError, NodeDocument};
use crate::registry::NodesRegistry;
use indexmap::IndexMap;
use std::any::Any;
use uuid::Uuid;

/// Unique identifier for a node inside a preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Access to the concrete type behind a trait object
pub trait AsAny: Any {
    /// Borrow as `&dyn Any`
    fn as_any(&self) -> &dyn Any;
    /// Borrow as `&mut dyn Any`
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// State shared by every node variant
#[derive(Debug)]
pub struct NodeBase {
    inputs: Vec<Connector>,
    outputs: Vec<Connector>,
    /// Position in the editor canvas
    pub editor_position: [f64; 2],
}

impl NodeBase {
    /// Create the base from the variant's connectors.
    ///
    /// Every connector in `outputs` is marked as an output connector.
    pub fn new(inputs: Vec<Connector>, mut outputs: Vec<Connector>) -> Self {
        for output in &mut outputs {
            output.mark_output();
        }
        Self {
            inputs,
            outputs,
            editor_position: [0.0, 0.0],
        }
    }

    /// Input connectors
    pub fn inputs(&self) -> &[Connector] {
        &self.inputs
    }

    /// Output connectors
    pub fn outputs(&self) -> &[Connector] {
        &self.outputs
    }

    /// Mutable input connectors. The list itself cannot grow or shrink.
    pub fn inputs_mut(&mut self) -> &mut [Connector] {
        &mut self.inputs
    }

    /// Mutable output connectors. The list itself cannot grow or shrink.
    pub fn outputs_mut(&mut self) -> &mut [Connector] {
        &mut self.outputs
    }

    /// Connectors on one side
    pub fn connectors(&self, side: ConnectorSide) -> &[Connector] {
        match side {
            ConnectorSide::Input => &self.inputs,
            ConnectorSide::Output => &self.outputs,
        }
    }

    /// Mutable connectors on one side
    pub fn connectors_mut(&mut self, side: ConnectorSide) -> &mut [Connector] {
        match side {
            ConnectorSide::Input => &mut self.inputs,
            ConnectorSide::Output => &mut self.outputs,
        }
    }

    /// Index of the input with the given id
    pub fn input_index(&self, connector_id: &str) -> Option<usize> {
        self.inputs.iter().position(|c| c.connector_id() == connector_id)
    }

    /// Index of the output with the given id
    pub fn output_index(&self, connector_id: &str) -> Option<usize> {
        self.outputs.iter().position(|c| c.connector_id() == connector_id)
    }

    /// Input with the given id
    pub fn input(&self, connector_id: &str) -> Option<&Connector> {
        self.input_index(connector_id).map(|i| &self.inputs[i])
    }

    /// Output with the given id
    pub fn output(&self, connector_id: &str) -> Option<&Connector> {
        self.output_index(connector_id).map(|i| &self.outputs[i])
    }
}

/// A node variant.
///
/// The connectors returned by [`base`](Self::base) must stay the same (same
/// ids, same order) for the node's lifetime, since documents match input
/// values to connectors by id and connections by position in the preset.
pub trait Node: AsAny + Send + 'static {
    /// Display name
    fn name(&self) -> &str;

    /// Description
    fn description(&self) -> &str {
        DEFAULT_DESCRIPTION
    }

    /// Shared node state
    fn base(&self) -> &NodeBase;

    /// Mutable shared node state
    fn base_mut(&mut self) -> &mut NodeBase;

    /// Store custom fields into the node's document
    fn store_data_to(&self, _doc: &mut NodeDocument) -> Result<(), NodeDataError> {
        Ok(())
    }

    /// Restore custom fields from the node's document
    fn load_data_from(&mut self, _doc: &NodeDocument) -> Result<(), NodeDataError> {
        Ok(())
    }

    /// Value produced on the `output`-th output given the values of every
    /// input, in input order. `None` falls back to the output's user input.
    fn evaluate(&self, _output: usize, _inputs: &[Vec<f64>]) -> Option<Vec<f64>> {
        None
    }
}

impl dyn Node {
    /// Input connectors
    pub fn inputs(&self) -> &[Connector] {
        self.base().inputs()
    }

    /// Output connectors
    pub fn outputs(&self) -> &[Connector] {
        self.base().outputs()
    }

    /// Position in the editor canvas
    pub fn editor_position(&self) -> [f64; 2] {
        self.base().editor_position
    }

    /// Check the concrete variant
    pub fn is<T: Node>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Borrow as the concrete variant
    pub fn downcast_ref<T: Node>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Mutably borrow as the concrete variant
    pub fn downcast_mut<T: Node>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    /// Serialize this node.
    ///
    /// The id is looked up by concrete variant and left empty if the variant
    /// was never registered.
    pub fn get_as_json(&self, registry: &NodesRegistry) -> Result<NodeDocument, NodeDataError> {
        let base = self.base();
        let mut doc = NodeDocument {
            id: registry.id_of(self).map(str::to_owned),
            position: base.editor_position,
            inputs: IndexMap::with_capacity(base.inputs().len()),
            data: serde_json::Map::new(),
        };
        for input in base.inputs() {
            doc.inputs
                .insert(input.connector_id().to_string(), input.user_input.clone());
        }
        self.store_data_to(&mut doc)?;
        Ok(doc)
    }

    /// Restore this node from its document.
    ///
    /// Stored input values overwrite live user input slots in place; the
    /// live vectors are never resized. A stored `NaN` (written as `null`)
    /// keeps the live slot.
    pub fn init_from_json(&mut self, doc: &NodeDocument) -> Result<(), NodeDataError> {
        let base = self.base_mut();
        base.editor_position = doc.position;
        for input in base.inputs_mut() {
            let Some(stored) = doc.inputs.get(input.connector_id()) else {
                continue;
            };
            for (slot, value) in input.user_input.iter_mut().zip(stored) {
                if !value.is_nan() {
                    *slot = *value;
                }
            }
        }
        self.load_data_from(doc)
    }
}

impl std::fmt::Debug for dyn Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name())
            .field("base", self.base())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Sample {
        base: NodeBase,
        tag: String,
    }

    impl Default for Sample {
        fn default() -> Self {
            Self {
                base: NodeBase::new(
                    vec![
                        Connector::sliders("a", [1.0, 2.0]),
                        Connector::plain("b"),
                    ],
                    vec![Connector::plain("out")],
                ),
                tag: String::new(),
            }
        }
    }

    impl Node for Sample {
        fn name(&self) -> &str {
            "Sample"
        }

        fn base(&self) -> &NodeBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut NodeBase {
            &mut self.base
        }

        fn store_data_to(&self, doc: &mut NodeDocument) -> Result<(), NodeDataError> {
            doc.set_field("tag", &self.tag)
        }

        fn load_data_from(&mut self, doc: &NodeDocument) -> Result<(), NodeDataError> {
            self.tag = doc
                .field("tag")?
                .ok_or_else(|| NodeDataError::MissingField("tag".to_string()))?;
            Ok(())
        }
    }

    #[test]
    fn test_outputs_are_marked() {
        let node = Sample::default();
        assert!(node.base.outputs().iter().all(Connector::is_output));
        assert!(!node.base.inputs().iter().any(Connector::is_output));
        assert_eq!(node.base.input_index("b"), Some(1));
        assert_eq!(node.base.output_index("missing"), None);
    }

    #[test]
    fn test_get_as_json() {
        let mut registry = NodesRegistry::new();
        registry.register::<Sample>("sample").unwrap();

        let mut node = Sample::default();
        node.base.editor_position = [3.0, 4.0];
        node.tag = "hello".to_string();
        let node: &dyn Node = &node;

        let doc = node.get_as_json(&registry).unwrap();
        assert_eq!(doc.id.as_deref(), Some("sample"));
        assert_eq!(doc.position, [3.0, 4.0]);
        assert_eq!(doc.inputs.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(doc.inputs["a"], vec![1.0, 2.0]);
        assert_eq!(doc.field::<String>("tag").unwrap().as_deref(), Some("hello"));
    }

    #[test]
    fn test_unregistered_variant_has_no_id() {
        let registry = NodesRegistry::new();
        let node = Sample::default();
        let doc = (&node as &dyn Node).get_as_json(&registry).unwrap();
        assert_eq!(doc.id, None);
    }

    #[test]
    fn test_init_from_json_overwrites_in_place() {
        let mut doc = NodeDocument {
            position: [7.0, -1.0],
            ..Default::default()
        };
        // Longer than the live vector: the extra value is ignored
        doc.inputs.insert("a".to_string(), vec![9.0, 8.0, 7.0]);
        doc.inputs.insert("unknown".to_string(), vec![5.0]);
        doc.set_field("tag", "restored").unwrap();

        let mut boxed: Box<dyn Node> = Box::new(Sample::default());
        boxed.init_from_json(&doc).unwrap();

        assert_eq!(boxed.editor_position(), [7.0, -1.0]);
        assert_eq!(boxed.inputs()[0].user_input, vec![9.0, 8.0]);
        assert_eq!(boxed.inputs()[1].user_input, vec![0.0]);
        assert_eq!(boxed.downcast_ref::<Sample>().unwrap().tag, "restored");
    }

    #[test]
    fn test_init_from_json_shorter_array_keeps_tail() {
        let mut doc = NodeDocument::default();
        doc.inputs.insert("a".to_string(), vec![5.0]);
        doc.set_field("tag", "").unwrap();

        let mut boxed: Box<dyn Node> = Box::new(Sample::default());
        boxed.init_from_json(&doc).unwrap();
        assert_eq!(boxed.inputs()[0].user_input, vec![5.0, 2.0]);
    }

    #[test]
    fn test_init_from_json_skips_nan_slots() {
        let mut doc = NodeDocument::default();
        doc.inputs.insert("a".to_string(), vec![f64::NAN, 6.0]);
        doc.set_field("tag", "").unwrap();

        let mut boxed: Box<dyn Node> = Box::new(Sample::default());
        boxed.init_from_json(&doc).unwrap();
        assert_eq!(boxed.inputs()[0].user_input, vec![1.0, 6.0]);
    }

    #[test]
    fn test_load_hook_failure_propagates() {
        let mut boxed: Box<dyn Node> = Box::new(Sample::default());
        let err = boxed.init_from_json(&NodeDocument::default()).unwrap_err();
        assert!(matches!(err, NodeDataError::MissingField(field) if field == "tag"));
    }

    #[test]
    fn test_downcast() {
        let mut boxed: Box<dyn Node> = Box::new(Sample::default());
        assert!(boxed.is::<Sample>());
        boxed.downcast_mut::<Sample>().unwrap().tag = "x".to_string();
        assert_eq!(boxed.downcast_ref::<Sample>().unwrap().tag, "x");
    }
}
