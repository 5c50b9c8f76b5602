// SPDX-License-Identifier: MIT OR Apache-2.0
//! Numeric nodes.

use crate::connector::Connector;
use crate::node::{Node, NodeBase};

/// Element-wise combination over the longer of two vectors, `identity`
/// standing in for missing elements
fn combine(a: &[f64], b: &[f64], identity: f64, op: impl Fn(f64, f64) -> f64) -> Vec<f64> {
    (0..a.len().max(b.len()))
        .map(|i| {
            op(
                a.get(i).copied().unwrap_or(identity),
                b.get(i).copied().unwrap_or(identity),
            )
        })
        .collect()
}

/// Outputs its own slider value
#[derive(Debug)]
pub struct ConstantNode {
    base: NodeBase,
}

impl ConstantNode {
    /// Registry id
    pub const ID: &'static str = "constant";

    /// Constant with an initial value
    pub fn with_value(value: f64) -> Self {
        let mut node = Self::default();
        node.base.inputs_mut()[0].user_input[0] = value;
        node
    }
}

impl Default for ConstantNode {
    fn default() -> Self {
        Self {
            base: NodeBase::new(
                vec![Connector::sliders("value", [0.0]).with_name("Value")],
                vec![Connector::plain("out").with_name("Output")],
            ),
        }
    }
}

impl Node for ConstantNode {
    fn name(&self) -> &str {
        "Constant"
    }

    fn description(&self) -> &str {
        "Constant numeric value"
    }

    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    fn evaluate(&self, _output: usize, inputs: &[Vec<f64>]) -> Option<Vec<f64>> {
        inputs.first().cloned()
    }
}

/// `a + b`
#[derive(Debug)]
pub struct AddNode {
    base: NodeBase,
}

impl AddNode {
    /// Registry id
    pub const ID: &'static str = "add";
}

impl Default for AddNode {
    fn default() -> Self {
        Self {
            base: NodeBase::new(
                vec![Connector::sliders("a", [0.0]), Connector::sliders("b", [0.0])],
                vec![Connector::plain("sum").with_name("Sum")],
            ),
        }
    }
}

impl Node for AddNode {
    fn name(&self) -> &str {
        "Add"
    }

    fn description(&self) -> &str {
        "Element-wise sum of two values"
    }

    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    fn evaluate(&self, _output: usize, inputs: &[Vec<f64>]) -> Option<Vec<f64>> {
        let [a, b] = inputs else { return None };
        Some(combine(a, b, 0.0, |x, y| x + y))
    }
}

/// `a * b`
#[derive(Debug)]
pub struct MultiplyNode {
    base: NodeBase,
}

impl MultiplyNode {
    /// Registry id
    pub const ID: &'static str = "multiply";
}

impl Default for MultiplyNode {
    fn default() -> Self {
        Self {
            base: NodeBase::new(
                vec![Connector::sliders("a", [1.0]), Connector::sliders("b", [1.0])],
                vec![Connector::plain("product").with_name("Product")],
            ),
        }
    }
}

impl Node for MultiplyNode {
    fn name(&self) -> &str {
        "Multiply"
    }

    fn description(&self) -> &str {
        "Element-wise product of two values"
    }

    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    fn evaluate(&self, _output: usize, inputs: &[Vec<f64>]) -> Option<Vec<f64>> {
        let [a, b] = inputs else { return None };
        Some(combine(a, b, 1.0, |x, y| x * y))
    }
}

/// Three sliders forwarded as one vector
#[derive(Debug)]
pub struct VectorNode {
    base: NodeBase,
}

impl VectorNode {
    /// Registry id
    pub const ID: &'static str = "vector";
}

impl Default for VectorNode {
    fn default() -> Self {
        Self {
            base: NodeBase::new(
                vec![Connector::sliders("xyz", [0.0, 0.0, 0.0]).with_name("XYZ")],
                vec![Connector::plain("out").with_name("Vector")],
            ),
        }
    }
}

impl Node for VectorNode {
    fn name(&self) -> &str {
        "Vector"
    }

    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    fn evaluate(&self, _output: usize, inputs: &[Vec<f64>]) -> Option<Vec<f64>> {
        inputs.first().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine_pads_with_identity() {
        assert_eq!(combine(&[1.0, 2.0], &[3.0], 0.0, |x, y| x + y), vec![4.0, 2.0]);
        assert_eq!(combine(&[2.0], &[3.0, 4.0], 1.0, |x, y| x * y), vec![6.0, 4.0]);
    }

    #[test]
    fn test_add_evaluate() {
        let node = AddNode::default();
        assert_eq!(node.evaluate(0, &[vec![1.0], vec![2.0]]), Some(vec![3.0]));
        assert_eq!(node.evaluate(0, &[vec![1.0]]), None);
    }

    #[test]
    fn test_constant_with_value() {
        let node = ConstantNode::with_value(0.25);
        assert_eq!(node.base().inputs()[0].user_input, vec![0.25]);
        assert!(node.base().outputs()[0].is_output());
    }
}
