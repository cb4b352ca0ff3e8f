use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::options::NetworkOptions;
use super::view_model::{EdgeColor, NodeColor, ViewGraph};

const STEP: f32 = 0.016;

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: String,
	pub label: String,
	pub color: NodeColor,
}

#[derive(Clone, Debug)]
pub struct EdgeInfo {
	pub from: DefaultNodeIdx,
	pub to: DefaultNodeIdx,
	pub label: String,
	pub color: EdgeColor,
	pub arrow_to: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
}

/// Layout and viewport of one live graph.
pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub edges: Vec<EdgeInfo>,
	pub transform: ViewTransform,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	pub options: NetworkOptions,
}

impl ForceGraphState {
	pub fn new(view: &ViewGraph, width: f64, height: f64, options: &NetworkOptions) -> Self {
		let physics = &options.physics;
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: physics.force_charge,
			force_spring: physics.force_spring,
			force_max: physics.force_max,
			node_speed: physics.node_speed,
			damping_factor: physics.damping_factor,
		});
		let mut id_to_idx = HashMap::new();
		let mut edges = Vec::new();

		for (i, node) in view.nodes.iter().enumerate() {
			let angle = (i as f64) * 2.0 * PI / view.nodes.len() as f64;
			let (x, y) = (
				(width / 2.0 + 100.0 * angle.cos()) as f32,
				(height / 2.0 + 100.0 * angle.sin()) as f32,
			);

			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo {
					id: node.id.clone(),
					label: node.label.clone(),
					color: node.color.clone(),
				},
			});
			id_to_idx.insert(node.id.as_str(), idx);
		}

		for edge in &view.edges {
			if let (Some(&src), Some(&tgt)) =
				(id_to_idx.get(edge.from.as_str()), id_to_idx.get(edge.to.as_str()))
			{
				graph.add_edge(src, tgt, EdgeData::default());
				edges.push(EdgeInfo {
					from: src,
					to: tgt,
					label: edge.label.clone(),
					color: edge.color.clone(),
					arrow_to: edge.arrow_to,
				});
			}
		}

		Self {
			graph,
			edges,
			transform: ViewTransform {
				x: 0.0,
				y: 0.0,
				k: 1.0,
			},
			hover: HoverState::default(),
			width,
			height,
			animation_running: true,
			options: options.clone(),
		}
	}

	/// Run the simulation ahead of the first frame.
	pub fn stabilize(&mut self) {
		if !self.options.physics.stabilization {
			return;
		}
		for _ in 0..self.options.physics.stabilization_iterations {
			self.graph.update(STEP);
		}
	}

	#[cfg(test)]
	pub fn node_ids(&self) -> Vec<String> {
		let mut ids = Vec::new();
		self.graph
			.visit_nodes(|node| ids.push(node.data.user_data.id.clone()));
		ids
	}

	pub fn positions(&self) -> HashMap<DefaultNodeIdx, (f64, f64)> {
		let mut positions = HashMap::new();
		self.graph.visit_nodes(|node| {
			positions.insert(node.index(), (node.x() as f64, node.y() as f64));
		});
		positions
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let hit = self.options.nodes.radius + self.options.nodes.border_width;
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			if (dx * dx + dy * dy).sqrt() < hit {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if !self.options.hover || self.hover.node == node {
			return;
		}
		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			for edge in &self.edges {
				if edge.from == idx {
					self.hover.neighbors.insert(edge.to);
				} else if edge.to == idx {
					self.hover.neighbors.insert(edge.from);
				}
			}
		}
	}

	/// True for the node under the pointer.
	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx)
	}

	/// True for nodes sharing an edge with the hovered node.
	pub fn is_neighbor(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.neighbors.contains(&idx)
	}

	/// Edges touching the hovered node take their highlight colour.
	pub fn is_edge_highlighted(&self, edge: &EdgeInfo) -> bool {
		self.hover
			.node
			.is_some_and(|idx| edge.from == idx || edge.to == idx)
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Zoom and centre so every node is inside the viewport.
	pub fn fit(&mut self) {
		let mut bounds: Option<(f64, f64, f64, f64)> = None;
		self.graph.visit_nodes(|node| {
			let (x, y) = (node.x() as f64, node.y() as f64);
			bounds = Some(match bounds {
				None => (x, y, x, y),
				Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
			});
		});
		let Some((x0, y0, x1, y1)) = bounds else {
			self.transform = ViewTransform {
				x: self.width / 2.0,
				y: self.height / 2.0,
				k: 1.0,
			};
			return;
		};

		let margin = self.options.fit_padding + self.options.nodes.radius;
		let (avail_w, avail_h) = (
			(self.width - 2.0 * margin).max(1.0),
			(self.height - 2.0 * margin).max(1.0),
		);
		let (span_w, span_h) = ((x1 - x0).max(1.0), (y1 - y0).max(1.0));
		let k = (avail_w / span_w).min(avail_h / span_h).clamp(0.1, 1.5);
		let (cx, cy) = ((x0 + x1) / 2.0, (y0 + y1) / 2.0);

		self.transform = ViewTransform {
			x: self.width / 2.0 - cx * k,
			y: self.height / 2.0 - cy * k,
			k,
		};
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph_view::colors::{PALETTE, assign_colors};
	use crate::components::graph_view::types::{GraphData, GraphLink, GraphNode};

	fn state_for(data: &GraphData, width: f64, height: f64) -> ForceGraphState {
		let options = NetworkOptions::default();
		let colors = assign_colors(&data.nodes, PALETTE);
		let view = ViewGraph::build(data, &colors, &options);
		ForceGraphState::new(&view, width, height, &options)
	}

	fn triangle() -> GraphData {
		GraphData {
			nodes: vec![GraphNode::new("a"), GraphNode::new("b"), GraphNode::new("c")],
			links: vec![GraphLink::new("a", "b"), GraphLink::new("b", "c")],
		}
	}

	#[test]
	fn holds_exactly_the_view_nodes() {
		let state = state_for(&triangle(), 800.0, 600.0);
		let mut ids = state.node_ids();
		ids.sort();
		assert_eq!(ids, ["a", "b", "c"]);
		assert_eq!(state.edges.len(), 2);
	}

	#[test]
	fn fit_brings_nodes_into_view() {
		let mut state = state_for(&triangle(), 800.0, 600.0);
		state.stabilize();
		state.fit();

		for (x, y) in state.positions().into_values() {
			let sx = x * state.transform.k + state.transform.x;
			let sy = y * state.transform.k + state.transform.y;
			assert!((0.0..=800.0).contains(&sx), "x {sx} off screen");
			assert!((0.0..=600.0).contains(&sy), "y {sy} off screen");
		}
	}

	#[test]
	fn fit_on_empty_graph_centres_origin() {
		let mut state = state_for(&GraphData::default(), 400.0, 200.0);
		state.fit();
		assert_eq!(
			state.transform,
			ViewTransform {
				x: 200.0,
				y: 100.0,
				k: 1.0
			}
		);
	}

	#[test]
	fn hover_marks_neighbours_and_edges() {
		let mut state = state_for(&triangle(), 800.0, 600.0);
		let b = state
			.edges
			.first()
			.map(|e| e.to)
			.unwrap();
		state.set_hover(Some(b));

		assert!(state.is_hovered(b));
		assert_eq!(state.hover.neighbors.len(), 2);
		let others: Vec<_> = state.positions().into_keys().filter(|&i| i != b).collect();
		assert!(others.iter().all(|&i| state.is_neighbor(i)));
		assert!(!state.is_neighbor(b));
		assert!(state.edges.iter().all(|e| state.is_edge_highlighted(e)));

		state.set_hover(None);
		assert!(state.hover.neighbors.is_empty());
		assert!(others.iter().all(|&i| !state.is_neighbor(i)));
	}
}
