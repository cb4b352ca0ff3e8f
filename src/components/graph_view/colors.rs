use std::collections::{BTreeMap, BTreeSet};

use super::types::{DEFAULT_TYPE, GraphNode};

/// Built-in palette. See [`assign_colors`] for how entries are handed out.
pub const PALETTE: &[&str] = &[
	"#4fcfff", "#ffb347", "#7ed957", "#ff6f91", "#a084e8", "#f9a602", "#e57373", "#64b5f6",
	"#81c784", "#ba68c8", "#ffd54f", "#90a4ae", "#f06292", "#9575cd", "#4db6ac", "#dce775",
	"#ffd740", "#bdbdbd", "#ff8a65", "#a1887f",
];

/// Colour given to `Default` when no node resolves to it.
pub const DEFAULT_COLOR: &str = "#b2eaff";

/// Type name to display colour. Always holds a `Default` entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorMap {
	colors: BTreeMap<String, String>,
}

impl Default for ColorMap {
	fn default() -> Self {
		let mut colors = BTreeMap::new();
		colors.insert(DEFAULT_TYPE.to_string(), DEFAULT_COLOR.to_string());
		Self { colors }
	}
}

impl ColorMap {
	/// Colour for `node_type`, falling back to the `Default` entry.
	pub fn color_for(&self, node_type: &str) -> &str {
		self.colors
			.get(node_type)
			.or_else(|| self.colors.get(DEFAULT_TYPE))
			.map(String::as_str)
			.unwrap_or(DEFAULT_COLOR)
	}

	/// Colour assigned to `node_type`, without fallback.
	pub fn get(&self, node_type: &str) -> Option<&str> {
		self.colors.get(node_type).map(String::as_str)
	}

	/// Number of entries, `Default` included.
	pub fn len(&self) -> usize {
		self.colors.len()
	}

	/// Never true for a map built by [`assign_colors`].
	pub fn is_empty(&self) -> bool {
		self.colors.is_empty()
	}

	/// Sorted `(type, colour)` pairs shown in the legend; `Default` is left out.
	pub fn legend_entries(&self) -> impl Iterator<Item = (&str, &str)> {
		self.colors
			.iter()
			.filter(|(t, _)| t.as_str() != DEFAULT_TYPE)
			.map(|(t, c)| (t.as_str(), c.as_str()))
	}
}

/// Build a colour map from the types observed in `nodes`.
///
/// Distinct resolved types are sorted and given `palette[i % len]`, so the
/// result depends only on the set of types, never on node order.
pub fn assign_colors<S: AsRef<str>>(nodes: &[GraphNode], palette: &[S]) -> ColorMap {
	let types: BTreeSet<&str> = nodes.iter().map(GraphNode::resolved_type).collect();
	let mut map = ColorMap::default();
	if palette.is_empty() {
		for t in types {
			map.colors.insert(t.to_string(), DEFAULT_COLOR.to_string());
		}
		return map;
	}
	for (i, t) in types.into_iter().enumerate() {
		let color = palette[i % palette.len()].as_ref();
		map.colors.insert(t.to_string(), color.to_string());
	}
	map
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;

	fn typed(id: &str, t: &str) -> GraphNode {
		GraphNode::new(id).with_type(t)
	}

	#[test]
	fn empty_dataset_has_only_default() {
		let map = assign_colors(&[], PALETTE);
		assert_eq!(map.len(), 1);
		assert_eq!(map.get(DEFAULT_TYPE), Some(DEFAULT_COLOR));
		assert_eq!(map.legend_entries().count(), 0);
	}

	#[test]
	fn sorted_types_take_palette_in_order() {
		let nodes = [typed("1", "Person"), typed("2", "Location"), typed("3", "Event")];
		let map = assign_colors(&nodes, PALETTE);
		assert_eq!(map.get("Event"), Some(PALETTE[0]));
		assert_eq!(map.get("Location"), Some(PALETTE[1]));
		assert_eq!(map.get("Person"), Some(PALETTE[2]));
		assert_eq!(map.get(DEFAULT_TYPE), Some(DEFAULT_COLOR));
	}

	#[test]
	fn default_type_takes_its_sorted_slot_when_observed() {
		let nodes = [GraphNode::new("1"), typed("2", "Zebra")];
		let map = assign_colors(&nodes, PALETTE);
		assert_eq!(map.get(DEFAULT_TYPE), Some(PALETTE[0]));
		assert_eq!(map.get("Zebra"), Some(PALETTE[1]));
	}

	#[test]
	fn palette_wraps_around() {
		let palette = ["#000", "#111", "#222"];
		let nodes = [typed("a", "A"), typed("b", "B"), typed("c", "C"), typed("d", "D")];
		let map = assign_colors(&nodes, &palette);
		assert_eq!(map.get("D"), map.get("A"));
		assert_eq!(map.get("D"), Some("#000"));
	}

	#[test]
	fn case_and_whitespace_are_distinct_types() {
		let nodes = [typed("1", "person"), typed("2", "Person"), typed("3", "Person ")];
		let map = assign_colors(&nodes, PALETTE);
		assert_eq!(map.legend_entries().count(), 3);
	}

	#[test]
	fn unknown_type_falls_back_to_default() {
		let map = assign_colors(&[typed("1", "Person")], PALETTE);
		assert_eq!(map.color_for("Org"), DEFAULT_COLOR);
	}

	#[test]
	fn empty_palette_uses_fallback_colour() {
		let palette: [&str; 0] = [];
		let map = assign_colors(&[typed("1", "Person")], &palette);
		assert_eq!(map.get("Person"), Some(DEFAULT_COLOR));
	}

	proptest! {
		#[test]
		fn colours_depend_only_on_type_set(
			types in prop::collection::vec("[A-Ca-c ]{0,3}", 0..24),
			seed in any::<u64>(),
		) {
			let nodes: Vec<GraphNode> = types
				.iter()
				.enumerate()
				.map(|(i, t)| typed(&i.to_string(), t))
				.collect();
			let mut shuffled = nodes.clone();
			let len = shuffled.len().max(1) as u64;
			shuffled.rotate_left((seed % len) as usize);
			shuffled.reverse();

			prop_assert_eq!(assign_colors(&nodes, PALETTE), assign_colors(&shuffled, PALETTE));
		}
	}
}
