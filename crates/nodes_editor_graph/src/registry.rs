// SPDX-License-Identifier: MIT OR Apache-2.0
//! Registry of node variants by stable id.
//!
//! Documents store a node's variant as a string id. The registry maps that
//! id to a factory when loading, and maps a live node's concrete type back
//! to its id when saving. Build it once at startup, then share it behind an
//! [`Arc`] with every preset.

use crate::node::Node;
use indexmap::IndexMap;
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Constructor for a registered variant
pub type NodeFactory = Arc<dyn Fn() -> Box<dyn Node> + Send + Sync>;

/// A registered node variant
#[derive(Clone)]
pub struct NodeVariant {
    id: String,
    type_id: TypeId,
    type_name: &'static str,
    factory: NodeFactory,
}

impl NodeVariant {
    /// Registry id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Concrete Rust type
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Concrete Rust type name, for diagnostics
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Build a fresh instance
    pub fn create(&self) -> Box<dyn Node> {
        (self.factory)()
    }
}

impl fmt::Debug for NodeVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeVariant")
            .field("id", &self.id)
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// Bidirectional mapping between ids and node variants
#[derive(Default)]
pub struct NodesRegistry {
    variants: IndexMap<String, NodeVariant>,
    ids_by_type: HashMap<TypeId, String>,
}

impl NodesRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a variant constructed through [`Default`]
    pub fn register<T: Node + Default>(&mut self, id: impl Into<String>) -> Result<(), RegistryError> {
        self.register_with(id, T::default)
    }

    /// Register a variant with a custom constructor.
    ///
    /// Each id and each concrete type may be registered once; a second
    /// registration is rejected and leaves the registry unchanged.
    pub fn register_with<T, F>(&mut self, id: impl Into<String>, factory: F) -> Result<(), RegistryError>
    where
        T: Node,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let id = id.into();
        let type_id = TypeId::of::<T>();
        let type_name = std::any::type_name::<T>();

        if self.variants.contains_key(&id) {
            return Err(RegistryError::DuplicateId(id));
        }
        if let Some(existing) = self.ids_by_type.get(&type_id) {
            return Err(RegistryError::DuplicateVariant {
                type_name,
                existing: existing.clone(),
            });
        }

        tracing::debug!(%id, type_name, "Registered node variant");
        self.ids_by_type.insert(type_id, id.clone());
        self.variants.insert(
            id.clone(),
            NodeVariant {
                id,
                type_id,
                type_name,
                factory: Arc::new(move || Box::new(factory()) as Box<dyn Node>),
            },
        );
        Ok(())
    }

    /// Get a variant by id
    pub fn get(&self, id: &str) -> Option<&NodeVariant> {
        self.variants.get(id)
    }

    /// Build a node from its id
    pub fn create(&self, id: &str) -> Option<Box<dyn Node>> {
        self.get(id).map(NodeVariant::create)
    }

    /// Id of a live node's variant
    pub fn id_of(&self, node: &dyn Node) -> Option<&str> {
        self.ids_by_type
            .get(&node.as_any().type_id())
            .map(String::as_str)
    }

    /// Id of a variant by type
    pub fn id_of_type<T: Node>(&self) -> Option<&str> {
        self.ids_by_type.get(&TypeId::of::<T>()).map(String::as_str)
    }

    /// Whether an id is registered
    pub fn contains(&self, id: &str) -> bool {
        self.variants.contains_key(id)
    }

    /// All registered ids, in registration order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.variants.keys().map(String::as_str)
    }

    /// All registered variants, in registration order
    pub fn variants(&self) -> impl Iterator<Item = &NodeVariant> {
        self.variants.values()
    }

    /// Number of registered variants
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

impl fmt::Debug for NodesRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.variants.values()).finish()
    }
}

/// Error when registering a node variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Id already maps to a variant
    #[error("Node id already registered: {0}")]
    DuplicateId(String),

    /// Variant already registered under another id
    #[error("Node variant {type_name} already registered as {existing}")]
    DuplicateVariant {
        /// Rust type of the variant
        type_name: &'static str,
        /// Id it is registered under
        existing: String,
    },
}
