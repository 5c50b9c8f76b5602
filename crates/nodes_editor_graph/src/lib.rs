// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node graph model for the nodes editor.
//!
//! This crate is the headless core behind a visual node editor:
//! - Typed connectors with a symmetric connection protocol
//! - Nodes with fixed inputs/outputs and persisted custom data
//! - A registry mapping stable ids to node variants
//! - The [`NodesPreset`] aggregate with change notifications and
//!   document (JSON) serialization
//!
//! ## Architecture
//!
//! The preset is an arena: it owns every node, and every node owns its
//! connectors. Connectors never reference each other directly; an edge is a
//! pair of [`ConnectorRef`] handles stored on both ends and updated together
//! by [`NodesPreset::connect`] and [`NodesPreset::disconnect`].
//!
//! Rendering and input handling live outside this crate. A UI collaborator
//! subscribes to the preset's [`Emitter`]s and calls its operations.

pub mod builtin;
pub mod collection;
pub mod connection;
pub mod connector;
pub mod document;
pub mod emitter;
pub mod evaluation;
pub mod node;
pub mod preset;
pub mod registry;

pub use collection::Collection;
pub use connection::Connection;
pub use connector::{Connector, ConnectorRef, ConnectorSide, InputType};
pub use document::{ConnectionRecord, DocumentError, GraphDocument, NodeDataError, NodeDocument};
pub use emitter::{Emitter, ListenerId};
pub use evaluation::{EvaluationError, Evaluator};
pub use node::{AsAny, Node, NodeBase, NodeId};
pub use preset::NodesPreset;
pub use registry::{NodeFactory, NodeVariant, NodesRegistry, RegistryError};
