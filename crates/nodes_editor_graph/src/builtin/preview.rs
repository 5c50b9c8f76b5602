// SPDX-License-Identifier: MIT OR Apache-2.0
//! Terminal node showing whatever feeds it.

use crate::connector::Connector;
use crate::document::{NodeDataError, NodeDocument};
use crate::node::{Node, NodeBase};

/// Sink with a user-editable label persisted as a custom field
#[derive(Debug)]
pub struct PreviewNode {
    base: NodeBase,
    /// Caption shown in the editor
    pub label: String,
}

impl PreviewNode {
    /// Registry id
    pub const ID: &'static str = "preview";

    const LABEL_FIELD: &'static str = "label";

    /// Preview with a caption
    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }
}

impl Default for PreviewNode {
    fn default() -> Self {
        Self {
            base: NodeBase::new(vec![Connector::plain("in").with_name("Input")], vec![]),
            label: "Preview".to_string(),
        }
    }
}

impl Node for PreviewNode {
    fn name(&self) -> &str {
        "Preview"
    }

    fn description(&self) -> &str {
        "Shows the value connected to its input"
    }

    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    fn store_data_to(&self, doc: &mut NodeDocument) -> Result<(), NodeDataError> {
        doc.set_field(Self::LABEL_FIELD, &self.label)
    }

    fn load_data_from(&mut self, doc: &NodeDocument) -> Result<(), NodeDataError> {
        if let Some(label) = doc.field::<String>(Self::LABEL_FIELD)? {
            self.label = label;
        }
        Ok(())
    }
}
