// SPDX-License-Identifier: MIT OR Apache-2.0
//! Persisted document layout for nodes and whole presets.
//!
//! ```text
//! NodeDocument  := { id, position: [x, y], inputs: { connectorId: [values] }, ...custom }
//! GraphDocument := { nodes: [NodeDocument], connections: [ConnectionRecord] }
//! ```
//!
//! Node indices inside [`ConnectionRecord`] are positions in
//! [`GraphDocument::nodes`], so reordering nodes without remapping the
//! records corrupts the connections.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::io::{Read, Write};

/// Keys owned by the base record. Custom fields may not use them.
pub const RESERVED_FIELDS: [&str; 3] = ["id", "position", "inputs"];

/// Serialized form of a single node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeDocument {
    /// Registry id of the node variant. Absent if the variant was never registered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Editor position. Read from the first two elements of any array.
    #[serde(default, deserialize_with = "position_lenient")]
    pub position: [f64; 2],
    /// User input values by input connector id.
    ///
    /// Non-finite values are written as `null` and read back as `NaN`,
    /// which leaves the live slot untouched on restore.
    #[serde(default, deserialize_with = "inputs_lenient")]
    pub inputs: IndexMap<String, Vec<f64>>,
    /// Variant-defined custom fields, stored next to the base fields
    #[serde(flatten)]
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl NodeDocument {
    /// Store a custom field
    pub fn set_field<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        value: &T,
    ) -> Result<(), NodeDataError> {
        if RESERVED_FIELDS.contains(&key) {
            return Err(NodeDataError::ReservedField(key.to_string()));
        }
        let value = serde_json::to_value(value).map_err(|source| NodeDataError::InvalidField {
            field: key.to_string(),
            source,
        })?;
        self.data.insert(key.to_string(), value);
        Ok(())
    }

    /// Read a custom field. `Ok(None)` if it is absent.
    pub fn field<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, NodeDataError> {
        self.data
            .get(key)
            .map(|value| {
                T::deserialize(value).map_err(|source| NodeDataError::InvalidField {
                    field: key.to_string(),
                    source,
                })
            })
            .transpose()
    }
}

fn position_lenient<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[f64; 2], D::Error> {
    let values: Option<Vec<Option<f64>>> = Option::deserialize(deserializer)?;
    let mut position = [0.0; 2];
    for (slot, value) in position.iter_mut().zip(values.unwrap_or_default()) {
        if let Some(value) = value {
            *slot = value;
        }
    }
    Ok(position)
}

fn inputs_lenient<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<IndexMap<String, Vec<f64>>, D::Error> {
    let raw: Option<IndexMap<String, Option<Vec<Option<f64>>>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(id, values)| {
            let values = values
                .unwrap_or_default()
                .into_iter()
                .map(|value| value.unwrap_or(f64::NAN))
                .collect();
            (id, values)
        })
        .collect())
}

/// One edge, addressed by node index and connector id
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRecord {
    /// Source node index
    pub from_node: usize,
    /// Source output connector id
    pub from_connector: String,
    /// Target node index
    pub to_node: usize,
    /// Target input connector id
    pub to_connector: String,
}

/// Serialized form of a whole preset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    /// Nodes in preset order
    #[serde(default)]
    pub nodes: Vec<NodeDocument>,
    /// Edges between the nodes
    #[serde(default)]
    pub connections: Vec<ConnectionRecord>,
}

impl GraphDocument {
    /// Parse a document from JSON text
    pub fn from_json_str(s: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Render the document as JSON text
    pub fn to_json_string(&self, pretty: bool) -> Result<String, DocumentError> {
        let s = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(s)
    }

    /// Parse a document from a reader
    pub fn from_reader(reader: impl Read) -> Result<Self, DocumentError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Write the document to a writer
    pub fn to_writer(&self, mut writer: impl Write, pretty: bool) -> Result<(), DocumentError> {
        if pretty {
            serde_json::to_writer_pretty(&mut writer, self)?;
        } else {
            serde_json::to_writer(&mut writer, self)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Error raised by a node's store/load hooks
#[derive(Debug, thiserror::Error)]
pub enum NodeDataError {
    /// Custom field collides with a base field
    #[error("Field `{0}` is reserved")]
    ReservedField(String),

    /// Custom field could not be converted
    #[error("Invalid field `{field}`: {source}")]
    InvalidField {
        /// Field name
        field: String,
        /// Conversion error
        #[source]
        source: serde_json::Error,
    },

    /// Required custom field is absent
    #[error("Missing field `{0}`")]
    MissingField(String),

    /// Variant-specific failure
    #[error("{0}")]
    Custom(String),
}

/// Error reading or writing document text
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Malformed JSON or wrong shape
    #[error("Invalid document: {0}")]
    Json(#[from] serde_json::Error),

    /// Underlying reader/writer failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_custom_fields_are_flattened() {
        let mut doc = NodeDocument {
            id: Some("preview".to_string()),
            position: [10.0, 20.0],
            ..Default::default()
        };
        doc.inputs.insert("in".to_string(), vec![1.0]);
        doc.set_field("label", "Result").unwrap();

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "preview",
                "position": [10.0, 20.0],
                "inputs": { "in": [1.0] },
                "label": "Result"
            })
        );

        let back: NodeDocument = serde_json::from_value(value).unwrap();
        assert_eq!(back.field::<String>("label").unwrap().as_deref(), Some("Result"));
        assert_eq!(back, doc);
    }

    #[test]
    fn test_reserved_field_rejected() {
        let mut doc = NodeDocument::default();
        assert!(matches!(
            doc.set_field("position", &[0.0, 0.0]),
            Err(NodeDataError::ReservedField(key)) if key == "position"
        ));
        assert!(doc.data.is_empty());
    }

    #[test]
    fn test_field_type_mismatch() {
        let mut doc = NodeDocument::default();
        doc.set_field("count", &3).unwrap();
        assert!(doc.field::<String>("count").is_err());
        assert_eq!(doc.field::<u32>("missing").unwrap(), None);
    }

    #[test]
    fn test_unregistered_id_is_omitted() {
        let doc = NodeDocument::default();
        let value = serde_json::to_value(&doc).unwrap();
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_graph_document_wire_format() {
        let text = r#"{
            "nodes": [
                { "id": "a", "position": [0, 0], "inputs": {} },
                { "id": "b", "position": [1.5, -2], "inputs": { "in": [4] } }
            ],
            "connections": [
                { "fromNode": 0, "fromConnector": "out", "toNode": 1, "toConnector": "in" }
            ]
        }"#;
        let doc = GraphDocument::from_json_str(text).unwrap();
        assert_eq!(doc.nodes.len(), 2);
        assert_eq!(doc.nodes[1].position, [1.5, -2.0]);
        assert_eq!(doc.nodes[1].inputs["in"], vec![4.0]);
        assert_eq!(
            doc.connections,
            vec![ConnectionRecord {
                from_node: 0,
                from_connector: "out".to_string(),
                to_node: 1,
                to_connector: "in".to_string(),
            }]
        );

        let round = GraphDocument::from_json_str(&doc.to_json_string(true).unwrap()).unwrap();
        assert_eq!(round, doc);
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let doc = GraphDocument::from_json_str(r#"{ "nodes": [ { "id": "a" } ] }"#).unwrap();
        assert!(doc.connections.is_empty());
        assert_eq!(doc.nodes[0].position, [0.0, 0.0]);
        assert!(doc.nodes[0].inputs.is_empty());
    }

    #[test]
    fn test_lenient_position_and_null_slots() {
        let doc = GraphDocument::from_json_str(
            r#"{ "nodes": [
                { "id": "a", "position": [1, 2, 3], "inputs": { "in": [null, 2] } },
                { "id": "b", "position": [5] },
                { "id": "c", "position": null, "inputs": { "in": null } }
            ] }"#,
        )
        .unwrap();

        assert_eq!(doc.nodes[0].position, [1.0, 2.0]);
        let slots = &doc.nodes[0].inputs["in"];
        assert!(slots[0].is_nan());
        assert_eq!(slots[1], 2.0);
        assert_eq!(doc.nodes[1].position, [5.0, 0.0]);
        assert_eq!(doc.nodes[2].position, [0.0, 0.0]);
        assert!(doc.nodes[2].inputs["in"].is_empty());
    }

    #[test]
    fn test_non_finite_values_reload() {
        let mut doc = NodeDocument::default();
        doc.inputs
            .insert("in".to_string(), vec![f64::NAN, f64::INFINITY, 1.0]);
        let text = serde_json::to_string(&doc).unwrap();
        assert!(text.contains("[null,null,1.0]"));

        let back: NodeDocument = serde_json::from_str(&text).unwrap();
        let slots = &back.inputs["in"];
        assert!(slots[0].is_nan() && slots[1].is_nan());
        assert_eq!(slots[2], 1.0);
    }

    #[test]
    fn test_writer_round_trip() {
        let doc = GraphDocument::default();
        let mut buf = Vec::new();
        doc.to_writer(&mut buf, false).unwrap();
        assert_eq!(String::from_utf8(buf.clone()).unwrap(), r#"{"nodes":[],"connections":[]}"#);
        assert_eq!(GraphDocument::from_reader(buf.as_slice()).unwrap(), doc);
    }
}
