// SPDX-License-Identifier: MIT OR Apache-2.0
//! Stock node variants.

pub mod math;
pub mod preview;

pub use math::{AddNode, ConstantNode, MultiplyNode, VectorNode};
pub use preview::PreviewNode;

use crate::registry::{NodesRegistry, RegistryError};
use std::sync::Arc;

/// Register every stock variant
pub fn register_builtin(registry: &mut NodesRegistry) -> Result<(), RegistryError> {
    registry.register::<ConstantNode>(ConstantNode::ID)?;
    registry.register::<AddNode>(AddNode::ID)?;
    registry.register::<MultiplyNode>(MultiplyNode::ID)?;
    registry.register::<VectorNode>(VectorNode::ID)?;
    registry.register::<PreviewNode>(PreviewNode::ID)?;
    Ok(())
}

/// A frozen registry holding only the stock variants
pub fn builtin_registry() -> Arc<NodesRegistry> {
    let mut registry = NodesRegistry::new();
    // Ids are distinct constants on distinct types
    if let Err(err) = register_builtin(&mut registry) {
        tracing::error!("Failed to register builtin nodes: {err}");
    }
    Arc::new(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry() {
        let registry = builtin_registry();
        assert_eq!(
            registry.ids().collect::<Vec<_>>(),
            vec!["constant", "add", "multiply", "vector", "preview"]
        );
        for variant in registry.variants() {
            let node = variant.create();
            assert_eq!(registry.id_of(node.as_ref()), Some(variant.id()));
        }
    }

    #[test]
    fn test_register_twice_fails() {
        let mut registry = NodesRegistry::new();
        register_builtin(&mut registry).unwrap();
        assert!(register_builtin(&mut registry).is_err());
        assert_eq!(registry.len(), 5);
    }
}
