use std::time::Duration;

use serde::Deserialize;

use super::colors::{ColorMap, PALETTE, assign_colors};
use super::types::GraphNode;

/// Fixed configuration of every visualization instance a session builds.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct NetworkOptions {
	/// Colours for node types, taken in sorted type order and reused cyclically.
	pub palette: Vec<String>,
	pub physics: PhysicsOptions,
	pub nodes: NodeStyle,
	pub edges: EdgeStyle,
	/// Canvas fill behind the graph.
	pub background: String,
	/// Hover highlighting of nodes and their edges.
	pub hover: bool,
	/// Quiet period after the last resize before the view is refit.
	pub refit_debounce_ms: u64,
	/// Margin kept around content when fitting, in pixels.
	pub fit_padding: f64,
}

impl Default for NetworkOptions {
	fn default() -> Self {
		Self {
			palette: PALETTE.iter().map(|c| c.to_string()).collect(),
			physics: PhysicsOptions::default(),
			nodes: NodeStyle::default(),
			edges: EdgeStyle::default(),
			background: "#ffffff".into(),
			hover: true,
			refit_debounce_ms: 150,
			fit_padding: 40.0,
		}
	}
}

impl NetworkOptions {
	/// Decode options from JSON; missing fields keep their defaults.
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(text)
	}

	/// Colour map for `nodes` from this configuration's palette. The legend
	/// and the canvas both go through here so their colours agree.
	pub fn color_map(&self, nodes: &[GraphNode]) -> ColorMap {
		assign_colors(nodes, self.palette.as_slice())
	}

	/// Quiet period as a [`Duration`].
	pub fn refit_debounce(&self) -> Duration {
		Duration::from_millis(self.refit_debounce_ms)
	}
}

/// Force simulation tuning, passed through to the layout engine.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhysicsOptions {
	/// Run the layout before the first frame is shown.
	pub stabilization: bool,
	/// Simulation steps run by stabilization.
	pub stabilization_iterations: u32,
	/// Repulsion between every pair of nodes.
	pub force_charge: f32,
	/// Pull along each edge.
	pub force_spring: f32,
	/// Upper bound on the force applied to one node per step.
	pub force_max: f32,
	/// Velocity cap.
	pub node_speed: f32,
	/// Velocity kept per step, in `0..=1`.
	pub damping_factor: f32,
}

impl Default for PhysicsOptions {
	fn default() -> Self {
		Self {
			stabilization: true,
			stabilization_iterations: 200,
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		}
	}
}

/// Node drawing. Fill colours come from the colour map, not from here.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct NodeStyle {
	/// Circle radius in graph units.
	pub radius: f64,
	/// Outline width.
	pub border_width: f64,
	/// Outline colour.
	pub border: String,
	/// Fill of a hovered node.
	pub highlight_background: String,
	/// CSS font family for labels.
	pub font: String,
	/// Label size in pixels at zoom 1.
	pub font_size: f64,
	/// Label colour.
	pub font_color: String,
}

impl Default for NodeStyle {
	fn default() -> Self {
		Self {
			radius: 9.0,
			border_width: 2.0,
			border: "#222b45".into(),
			highlight_background: "#ffffff".into(),
			font: "Vazirmatn, Arial".into(),
			font_size: 16.0,
			font_color: "#222b45".into(),
		}
	}
}

/// Edge drawing.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EdgeStyle {
	/// Stroke colour.
	pub color: String,
	/// Stroke colour of edges touching the hovered node.
	pub highlight: String,
	/// Stroke width.
	pub width: f64,
	/// Length of the arrow head at the target end.
	pub arrow_size: f64,
	/// Label size in pixels at zoom 1.
	pub font_size: f64,
	/// Label colour.
	pub font_color: String,
}

impl Default for EdgeStyle {
	fn default() -> Self {
		Self {
			color: "#b2eaff".into(),
			highlight: "#4fcfff".into(),
			width: 1.5,
			arrow_size: 8.0,
			font_size: 14.0,
			font_color: "#888888".into(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_json_keeps_defaults() {
		let options = NetworkOptions::from_json(
			r#"{"refit_debounce_ms": 300, "physics": {"stabilization": false}}"#,
		)
		.unwrap();
		assert_eq!(options.refit_debounce(), Duration::from_millis(300));
		assert!(!options.physics.stabilization);
		assert_eq!(options.physics.stabilization_iterations, 200);
		assert_eq!(options.nodes, NodeStyle::default());
		assert_eq!(options.palette.len(), PALETTE.len());
	}

	#[test]
	fn colour_map_uses_configured_palette() {
		let options = NetworkOptions::from_json(r##"{"palette": ["#010101", "#020202"]}"##).unwrap();
		let nodes = [
			GraphNode::new("a").with_type("Org"),
			GraphNode::new("b").with_type("Person"),
			GraphNode::new("c").with_type("Place"),
		];
		let map = options.color_map(&nodes);
		assert_eq!(map.get("Org"), Some("#010101"));
		assert_eq!(map.get("Person"), Some("#020202"));
		assert_eq!(map.get("Place"), Some("#010101"));
	}
}
