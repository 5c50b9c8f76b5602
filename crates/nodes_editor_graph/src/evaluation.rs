// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph evaluation.
//!
//! A connector fed by upstream connectors takes the element-wise sum of
//! their values. An unfed input takes its own user input. An unfed output
//! asks its node through [`Node::evaluate`](crate::Node::evaluate), falling
//! back to the output's user input.

use crate::connector::{Connector, ConnectorRef, ConnectorSide};
use crate::node::NodeId;
use crate::preset::NodesPreset;
use std::collections::{HashMap, HashSet};

/// Memoizing evaluator over a preset
pub struct Evaluator<'a> {
    preset: &'a NodesPreset,
    cache: HashMap<ConnectorRef, Vec<f64>>,
    visiting: HashSet<ConnectorRef>,
}

impl<'a> Evaluator<'a> {
    /// Create a new evaluator
    pub fn new(preset: &'a NodesPreset) -> Self {
        Self {
            preset,
            cache: HashMap::new(),
            visiting: HashSet::new(),
        }
    }

    /// Value of a connector.
    ///
    /// Dependencies are walked with an explicit stack, so the depth of the
    /// graph is bounded by memory rather than by the call stack.
    pub fn value_of(&mut self, connector: ConnectorRef) -> Result<Vec<f64>, EvaluationError> {
        if let Some(value) = self.cache.get(&connector) {
            return Ok(value.clone());
        }
        let result = self.walk(connector);
        self.visiting.clear();
        result?;
        self.cached(connector).cloned()
    }

    /// Values of every output of a node, in output order
    pub fn node_outputs(&mut self, node_id: NodeId) -> Result<Vec<Vec<f64>>, EvaluationError> {
        let preset = self.preset;
        let node = preset
            .node(node_id)
            .ok_or(EvaluationError::NodeNotFound(node_id))?;
        (0..node.outputs().len())
            .map(|index| self.value_of(ConnectorRef::output(node_id, index)))
            .collect()
    }

    /// Post-order walk filling the cache for `root` and everything it
    /// depends on. A connector is in `visiting` while its `Exit` frame is
    /// on the stack, i.e. exactly while it is an ancestor of the frame
    /// being expanded.
    fn walk(&mut self, root: ConnectorRef) -> Result<(), EvaluationError> {
        let preset = self.preset;
        let mut stack = vec![Frame::Enter(root)];

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Enter(connector) => {
                    if self.cache.contains_key(&connector) {
                        continue;
                    }
                    let resolved = preset
                        .connector(connector)
                        .ok_or(EvaluationError::ConnectorNotFound(connector))?;
                    if !self.visiting.insert(connector) {
                        return Err(EvaluationError::CycleDetected(connector));
                    }
                    stack.push(Frame::Exit(connector));
                    for dependency in self.dependencies(connector, resolved)? {
                        if !self.cache.contains_key(&dependency) {
                            stack.push(Frame::Enter(dependency));
                        }
                    }
                }
                Frame::Exit(connector) => {
                    let resolved = preset
                        .connector(connector)
                        .ok_or(EvaluationError::ConnectorNotFound(connector))?;
                    let value = self.compute(connector, resolved)?;
                    self.visiting.remove(&connector);
                    self.cache.insert(connector, value);
                }
            }
        }
        Ok(())
    }

    /// Connectors whose values `connector` is computed from
    fn dependencies(&self, connector: ConnectorRef, resolved: &Connector) -> Result<Vec<ConnectorRef>, EvaluationError> {
        if !resolved.connected_from().is_empty() {
            return Ok(resolved.connected_from().to_vec());
        }
        match connector.side {
            ConnectorSide::Input => Ok(Vec::new()),
            ConnectorSide::Output => {
                let node = self
                    .preset
                    .node(connector.node)
                    .ok_or(EvaluationError::NodeNotFound(connector.node))?;
                Ok((0..node.inputs().len())
                    .map(|index| ConnectorRef::input(connector.node, index))
                    .collect())
            }
        }
    }

    /// Value of `connector` once every dependency is cached
    fn compute(&self, connector: ConnectorRef, resolved: &Connector) -> Result<Vec<f64>, EvaluationError> {
        if !resolved.connected_from().is_empty() {
            let mut sum = Vec::new();
            for upstream in resolved.connected_from() {
                accumulate(&mut sum, self.cached(*upstream)?);
            }
            return Ok(sum);
        }

        match connector.side {
            ConnectorSide::Input => Ok(resolved.user_input.clone()),
            ConnectorSide::Output => {
                let node = self
                    .preset
                    .node(connector.node)
                    .ok_or(EvaluationError::NodeNotFound(connector.node))?;
                let inputs = (0..node.inputs().len())
                    .map(|index| self.cached(ConnectorRef::input(connector.node, index)).cloned())
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(node
                    .evaluate(connector.index, &inputs)
                    .unwrap_or_else(|| resolved.user_input.clone()))
            }
        }
    }

    fn cached(&self, connector: ConnectorRef) -> Result<&Vec<f64>, EvaluationError> {
        self.cache
            .get(&connector)
            .ok_or(EvaluationError::ConnectorNotFound(connector))
    }
}

enum Frame {
    Enter(ConnectorRef),
    Exit(ConnectorRef),
}

/// Element-wise `sum += value`, growing `sum` to the longer length
fn accumulate(sum: &mut Vec<f64>, value: &[f64]) {
    if sum.len() < value.len() {
        sum.resize(value.len(), 0.0);
    }
    for (acc, v) in sum.iter_mut().zip(value) {
        *acc += v;
    }
}

/// Error during evaluation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvaluationError {
    /// The connector depends on itself
    #[error("Graph contains a cycle through {0:?}")]
    CycleDetected(ConnectorRef),

    /// Handle does not resolve in the preset
    #[error("Connector not found: {0:?}")]
    ConnectorNotFound(ConnectorRef),

    /// Node not found
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::{builtin_registry, AddNode, ConstantNode, MultiplyNode, PreviewNode};

    #[test]
    fn test_unconnected_values() {
        let mut preset = NodesPreset::new(builtin_registry());
        let c = preset.add(ConstantNode::with_value(4.0));
        let mut eval = Evaluator::new(&preset);

        assert_eq!(eval.value_of(preset.input(c, "value").unwrap()).unwrap(), vec![4.0]);
        assert_eq!(eval.value_of(preset.output(c, "out").unwrap()).unwrap(), vec![4.0]);
    }

    #[test]
    fn test_sum_of_upstream() {
        let mut preset = NodesPreset::new(builtin_registry());
        let a = preset.add(ConstantNode::with_value(1.5));
        let b = preset.add(ConstantNode::with_value(2.0));
        let p = preset.add(PreviewNode::default());
        let sink = preset.input(p, "in").unwrap();
        preset.connect(preset.output(a, "out").unwrap(), sink);
        preset.connect(preset.output(b, "out").unwrap(), sink);

        let mut eval = Evaluator::new(&preset);
        assert_eq!(eval.value_of(sink).unwrap(), vec![3.5]);
    }

    #[test]
    fn test_node_evaluation() {
        let mut preset = NodesPreset::new(builtin_registry());
        let a = preset.add(ConstantNode::with_value(3.0));
        let add = preset.add(AddNode::default());
        let mul = preset.add(MultiplyNode::default());
        preset.set_user_input(preset.input(add, "b").unwrap(), 0, 2.0);
        preset.set_user_input(preset.input(mul, "b").unwrap(), 0, 10.0);

        preset.connect(preset.output(a, "out").unwrap(), preset.input(add, "a").unwrap());
        preset.connect(preset.output(add, "sum").unwrap(), preset.input(mul, "a").unwrap());

        let mut eval = Evaluator::new(&preset);
        assert_eq!(eval.node_outputs(mul).unwrap(), vec![vec![50.0]]);
    }

    #[test]
    fn test_cycle_detected() {
        let mut preset = NodesPreset::new(builtin_registry());
        let add = preset.add(AddNode::default());
        preset.connect(preset.output(add, "sum").unwrap(), preset.input(add, "a").unwrap());

        let mut eval = Evaluator::new(&preset);
        assert!(matches!(
            eval.node_outputs(add),
            Err(EvaluationError::CycleDetected(_))
        ));
    }

    #[test]
    fn test_unknown_connector() {
        let preset = NodesPreset::new(builtin_registry());
        let mut eval = Evaluator::new(&preset);
        let bogus = ConnectorRef::input(NodeId::new(), 0);
        assert_eq!(eval.value_of(bogus), Err(EvaluationError::ConnectorNotFound(bogus)));
    }

    #[test]
    fn test_long_chain() {
        let mut preset = NodesPreset::new(builtin_registry());
        let first = preset.add(ConstantNode::with_value(7.0));
        let mut last = first;
        for _ in 0..10_000 {
            let next = preset.add(ConstantNode::default());
            preset.connect(preset.output(last, "out").unwrap(), preset.input(next, "value").unwrap());
            last = next;
        }

        let mut eval = Evaluator::new(&preset);
        assert_eq!(eval.value_of(preset.output(last, "out").unwrap()).unwrap(), vec![7.0]);
        assert_eq!(eval.node_outputs(first).unwrap(), vec![vec![7.0]]);
    }

    #[test]
    fn test_shared_upstream_is_not_a_cycle() {
        let mut preset = NodesPreset::new(builtin_registry());
        let c = preset.add(ConstantNode::with_value(2.0));
        let add = preset.add(AddNode::default());
        let out = preset.output(c, "out").unwrap();
        preset.connect(out, preset.input(add, "a").unwrap());
        preset.connect(out, preset.input(add, "b").unwrap());

        let mut eval = Evaluator::new(&preset);
        assert_eq!(eval.node_outputs(add).unwrap(), vec![vec![4.0]]);
    }

    #[test]
    fn test_cycle_then_reuse() {
        let mut preset = NodesPreset::new(builtin_registry());
        let add = preset.add(AddNode::default());
        let c = preset.add(ConstantNode::with_value(1.0));
        preset.connect(preset.output(add, "sum").unwrap(), preset.input(add, "a").unwrap());

        let mut eval = Evaluator::new(&preset);
        assert!(eval.node_outputs(add).is_err());
        assert_eq!(eval.node_outputs(c).unwrap(), vec![vec![1.0]]);
    }

    #[test]
    fn test_accumulate_grows() {
        let mut sum = vec![1.0];
        accumulate(&mut sum, &[1.0, 2.0, 3.0]);
        assert_eq!(sum, vec![2.0, 2.0, 3.0]);
    }
}
