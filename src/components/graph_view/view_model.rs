use std::collections::HashSet;

use log::warn;
use serde_json::{Map, Value};

use super::colors::ColorMap;
use super::error::MalformedEntity;
use super::options::NetworkOptions;
use super::types::GraphData;

/// Fill and outline of one node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeColor {
	/// Type colour from the colour map.
	pub background: String,
	/// Outline colour.
	pub border: String,
	/// Fill while the node is hovered.
	pub highlight_background: String,
	/// Outline while the node is hovered.
	pub highlight_border: String,
}

/// A node as the renderer sees it.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewNode {
	/// Unique within one view graph.
	pub id: String,
	/// Display label; the id when the source has none.
	pub label: String,
	/// Resolved type the colour was picked for.
	pub node_type: String,
	/// Fill and outline.
	pub color: NodeColor,
	/// Extra fields from the source, passed through untouched.
	pub attrs: Map<String, Value>,
}

/// Stroke colours of one edge.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EdgeColor {
	/// Normal stroke.
	pub color: String,
	/// Stroke while an endpoint is hovered.
	pub highlight: String,
}

/// An edge between two visible nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewEdge {
	/// Source node id.
	pub from: String,
	/// Target node id.
	pub to: String,
	/// Label drawn at the midpoint; may be empty.
	pub label: String,
	/// Stroke colours.
	pub color: EdgeColor,
	/// Edges are directed; the arrow head sits at `to`.
	pub arrow_to: bool,
	/// Extra fields from the source, passed through untouched.
	pub attrs: Map<String, Value>,
}

/// Renderer-ready nodes and edges for one visible subgraph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewGraph {
	/// Nodes that carry an id, in source order.
	pub nodes: Vec<ViewNode>,
	/// Edges whose endpoints are both in `nodes`.
	pub edges: Vec<ViewEdge>,
	/// Entities left out, with the reason.
	pub skipped: Vec<MalformedEntity>,
}

impl ViewGraph {
	/// Colour and validate `visible`. Nodes without an id and edges without
	/// both endpoints among the kept nodes are recorded in `skipped`.
	pub fn build(visible: &GraphData, colors: &ColorMap, options: &NetworkOptions) -> Self {
		let mut skipped = Vec::new();
		let mut seen = HashSet::new();
		let mut nodes = Vec::with_capacity(visible.nodes.len());

		for (index, node) in visible.nodes.iter().enumerate() {
			let Some(id) = node.id.clone() else {
				skipped.push(MalformedEntity::NodeWithoutId { index });
				continue;
			};
			seen.insert(id.clone());
			let node_type = node.resolved_type().to_string();
			let fill = colors.color_for(&node_type).to_string();
			nodes.push(ViewNode {
				label: node.display_label().unwrap_or(&id).to_string(),
				color: NodeColor {
					border: options.nodes.border.clone(),
					highlight_background: options.nodes.highlight_background.clone(),
					highlight_border: fill.clone(),
					background: fill,
				},
				node_type,
				attrs: node.attrs.clone(),
				id,
			});
		}

		let mut edges = Vec::with_capacity(visible.links.len());
		for (index, link) in visible.links.iter().enumerate() {
			let (Some(from), Some(to)) = (link.source.clone(), link.target.clone()) else {
				skipped.push(MalformedEntity::EdgeWithoutEndpoint { index });
				continue;
			};
			if !seen.contains(&from) || !seen.contains(&to) {
				skipped.push(MalformedEntity::DanglingEdge {
					index,
					source: from,
					target: to,
				});
				continue;
			}
			edges.push(ViewEdge {
				from,
				to,
				label: link.label.clone().unwrap_or_default(),
				color: EdgeColor {
					color: options.edges.color.clone(),
					highlight: options.edges.highlight.clone(),
				},
				arrow_to: true,
				attrs: link.attrs.clone(),
			});
		}

		if !skipped.is_empty() {
			warn!("left {} malformed or dangling entities out of the view", skipped.len());
		}

		Self {
			nodes,
			edges,
			skipped,
		}
	}

	/// Ids of the nodes, in order.
	pub fn node_ids(&self) -> impl Iterator<Item = &str> {
		self.nodes.iter().map(|n| n.id.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph_view::colors::{DEFAULT_COLOR, PALETTE, assign_colors};
	use crate::components::graph_view::types::{GraphLink, GraphNode};

	fn build(data: &GraphData) -> ViewGraph {
		let colors = assign_colors(&data.nodes, PALETTE);
		ViewGraph::build(data, &colors, &NetworkOptions::default())
	}

	#[test]
	fn node_colours_follow_type() {
		let mut alice = GraphNode::new("alice").with_type("Person");
		alice.attrs.insert("age".into(), Value::from(30));
		let data = GraphData {
			nodes: vec![alice],
			links: vec![],
		};

		let view = build(&data);
		let node = &view.nodes[0];
		assert_eq!(node.label, "alice");
		assert_eq!(node.node_type, "Person");
		assert_eq!(node.color.background, PALETTE[0]);
		assert_eq!(node.color.border, "#222b45");
		assert_eq!(node.color.highlight_background, "#ffffff");
		assert_eq!(node.color.highlight_border, PALETTE[0]);
		assert_eq!(node.attrs.get("age"), Some(&Value::from(30)));
	}

	#[test]
	fn unmapped_type_uses_default_colour() {
		let data = GraphData {
			nodes: vec![GraphNode::new("x").with_type("Ghost")],
			links: vec![],
		};
		let view = ViewGraph::build(&data, &ColorMap::default(), &NetworkOptions::default());
		assert_eq!(view.nodes[0].color.background, DEFAULT_COLOR);
	}

	#[test]
	fn malformed_entities_are_skipped_not_fatal() {
		let mut labelled = GraphLink::new("a", "b");
		labelled.label = Some("knows".into());
		let data = GraphData {
			nodes: vec![GraphNode::new("a"), GraphNode::default(), GraphNode::new("b")],
			links: vec![
				labelled,
				GraphLink {
					source: Some("a".into()),
					..GraphLink::default()
				},
				GraphLink::new("a", "Z"),
				GraphLink::new("b", "a"),
			],
		};

		let view = build(&data);
		assert_eq!(view.node_ids().collect::<Vec<_>>(), ["a", "b"]);
		assert_eq!(view.edges.len(), 2);
		assert_eq!(view.edges[0].label, "knows");
		assert_eq!(view.edges[1].label, "");
		assert!(view.edges.iter().all(|e| e.arrow_to));
		assert_eq!(
			view.skipped,
			[
				MalformedEntity::NodeWithoutId { index: 1 },
				MalformedEntity::EdgeWithoutEndpoint { index: 1 },
				MalformedEntity::DanglingEdge {
					index: 2,
					source: "a".into(),
					target: "Z".into(),
				},
			]
		);
	}
}
