use std::sync::Arc;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use super::error::GraphViewError;

/// Type name used when a node carries none of the type fields.
pub const DEFAULT_TYPE: &str = "Default";

/// A node as decoded from node-link JSON.
///
/// `id` is optional at this level: a node without one is kept in the dataset
/// but never reaches the renderer.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphNode {
	/// Identifier, unique within a dataset.
	#[serde(default, deserialize_with = "scalar_string")]
	pub id: Option<String>,
	/// Display text; the id is used when absent.
	#[serde(default, deserialize_with = "scalar_string")]
	pub label: Option<String>,
	/// Category. See [`GraphNode::resolved_type`].
	#[serde(default, rename = "type", deserialize_with = "scalar_string")]
	pub node_type: Option<String>,
	/// Fallback category.
	#[serde(default, deserialize_with = "scalar_string")]
	pub source_type: Option<String>,
	/// Second fallback category.
	#[serde(default, deserialize_with = "scalar_string")]
	pub target_type: Option<String>,
	/// Every other field, kept as-is.
	#[serde(flatten)]
	pub attrs: Map<String, Value>,
}

impl GraphNode {
	/// A node with only an id.
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: Some(id.into()),
			..Self::default()
		}
	}

	/// Set the `type` field.
	pub fn with_type(mut self, node_type: impl Into<String>) -> Self {
		self.node_type = Some(node_type.into());
		self
	}

	/// Effective category: `type`, then `source_type`, then `target_type`,
	/// then [`DEFAULT_TYPE`]. Empty strings are skipped. No case or
	/// whitespace normalisation is applied.
	pub fn resolved_type(&self) -> &str {
		[&self.node_type, &self.source_type, &self.target_type]
			.into_iter()
			.find_map(|field| field.as_deref().filter(|t| !t.is_empty()))
			.unwrap_or(DEFAULT_TYPE)
	}

	/// Label if present and non-empty, otherwise the id.
	pub fn display_label(&self) -> Option<&str> {
		self.label
			.as_deref()
			.filter(|l| !l.is_empty())
			.or(self.id.as_deref())
	}
}

/// A directed edge, source to target.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphLink {
	/// Source node id. Also read from `from`.
	#[serde(default, alias = "from", deserialize_with = "scalar_string")]
	pub source: Option<String>,
	/// Target node id. Also read from `to`.
	#[serde(default, alias = "to", deserialize_with = "scalar_string")]
	pub target: Option<String>,
	/// Text drawn at the edge midpoint.
	#[serde(default, deserialize_with = "scalar_string")]
	pub label: Option<String>,
	/// Every other field, kept as-is.
	#[serde(flatten)]
	pub attrs: Map<String, Value>,
}

impl GraphLink {
	/// An edge from `source` to `target`.
	pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			source: Some(source.into()),
			target: Some(target.into()),
			..Self::default()
		}
	}
}

/// Node-link graph document.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphData {
	/// Nodes in document order.
	#[serde(default)]
	pub nodes: Vec<GraphNode>,
	/// Also read from `edges`.
	#[serde(default, alias = "edges")]
	pub links: Vec<GraphLink>,
}

impl GraphData {
	/// Decode a node-link JSON document.
	pub fn from_json(text: &str) -> Result<Self, GraphViewError> {
		Ok(serde_json::from_str(text)?)
	}
}

/// The currently selected graph: a name plus a shared payload.
///
/// Equality is identity: two handles are equal only if they share the same
/// payload allocation. Re-fetching the same file therefore counts as a new
/// dataset.
#[derive(Clone, Debug)]
pub struct Dataset {
	/// File name the graph was loaded from.
	pub name: String,
	/// Shared payload; its allocation is the dataset's identity.
	pub graph: Arc<GraphData>,
}

impl Dataset {
	/// Wrap `graph` in a fresh shared allocation.
	pub fn new(name: impl Into<String>, graph: GraphData) -> Self {
		Self {
			name: name.into(),
			graph: Arc::new(graph),
		}
	}
}

impl PartialEq for Dataset {
	fn eq(&self, other: &Self) -> bool {
		self.name == other.name && Arc::ptr_eq(&self.graph, &other.graph)
	}
}

impl Eq for Dataset {}

fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(match Value::deserialize(deserializer)? {
		Value::Null => None,
		Value::String(s) => Some(s),
		Value::Number(n) => Some(n.to_string()),
		Value::Bool(b) => Some(b.to_string()),
		other => Some(other.to_string()),
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn type_falls_back_to_source_type() {
		let node: GraphNode =
			serde_json::from_str(r#"{"id": "X", "source_type": "Location"}"#).unwrap();
		assert_eq!(node.resolved_type(), "Location");
	}

	#[test]
	fn type_precedence_is_type_then_source_then_target() {
		let node: GraphNode = serde_json::from_str(
			r#"{"id": "X", "type": "Person", "source_type": "Org", "target_type": "Event"}"#,
		)
		.unwrap();
		assert_eq!(node.resolved_type(), "Person");

		let node: GraphNode =
			serde_json::from_str(r#"{"id": "X", "target_type": "Event"}"#).unwrap();
		assert_eq!(node.resolved_type(), "Event");

		let node: GraphNode =
			serde_json::from_str(r#"{"id": "X", "type": "", "target_type": "Event"}"#).unwrap();
		assert_eq!(node.resolved_type(), "Event");
	}

	#[test]
	fn untyped_node_is_default() {
		assert_eq!(GraphNode::new("a").resolved_type(), DEFAULT_TYPE);
	}

	#[test]
	fn label_falls_back_to_id() {
		let mut node = GraphNode::new("n1");
		assert_eq!(node.display_label(), Some("n1"));
		node.label = Some(String::new());
		assert_eq!(node.display_label(), Some("n1"));
		node.label = Some("Alice".into());
		assert_eq!(node.display_label(), Some("Alice"));
	}

	#[test]
	fn decodes_numeric_ids_and_extra_attributes() {
		let data = GraphData::from_json(
			r#"{
				"nodes": [{"id": 1, "type": "Person", "age": 42}, {"label": "orphan"}],
				"edges": [{"from": 1, "to": 2, "weight": 0.5}]
			}"#,
		)
		.unwrap();

		assert_eq!(data.nodes[0].id.as_deref(), Some("1"));
		assert_eq!(data.nodes[0].attrs.get("age"), Some(&Value::from(42)));
		assert_eq!(data.nodes[1].id, None);
		assert_eq!(data.links[0].source.as_deref(), Some("1"));
		assert_eq!(data.links[0].target.as_deref(), Some("2"));
		assert!(data.links[0].attrs.contains_key("weight"));
	}

	#[test]
	fn malformed_json_is_a_decode_error() {
		let err = GraphData::from_json("{\"nodes\": 3}").unwrap_err();
		assert!(matches!(err, GraphViewError::Decode(_)));
	}

	#[test]
	fn dataset_equality_is_identity() {
		let a = Dataset::new("g.graphml", GraphData::default());
		let b = Dataset::new("g.graphml", GraphData::default());
		assert_eq!(a, a.clone());
		assert_ne!(a, b);
	}
}
