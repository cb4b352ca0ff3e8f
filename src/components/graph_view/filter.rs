use std::borrow::Cow;
use std::collections::{BTreeSet, HashSet};

use super::types::GraphData;

/// The applied legend filter. An empty set means "show all".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterSet(BTreeSet<String>);

impl FilterSet {
	/// The empty filter, which shows every type.
	pub fn all() -> Self {
		Self::default()
	}

	/// True when no type is selected.
	pub fn shows_all(&self) -> bool {
		self.0.is_empty()
	}

	/// Whether `node_type` was selected.
	pub fn contains(&self, node_type: &str) -> bool {
		self.0.contains(node_type)
	}

	/// Selected types in sorted order.
	pub fn types(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(String::as_str)
	}
}

impl<S: Into<String>> FromIterator<S> for FilterSet {
	fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
		Self(iter.into_iter().map(Into::into).collect())
	}
}

impl From<Option<BTreeSet<String>>> for FilterSet {
	fn from(types: Option<BTreeSet<String>>) -> Self {
		Self(types.unwrap_or_default())
	}
}

/// Visible subgraph for `filter`.
///
/// With no active types the input is returned as is. Otherwise nodes whose
/// resolved type is active are kept, and an edge is kept only when both of
/// its endpoints are among the kept node ids. Input order is preserved.
pub fn filter_graph<'a>(data: &'a GraphData, filter: &FilterSet) -> Cow<'a, GraphData> {
	if filter.shows_all() {
		return Cow::Borrowed(data);
	}

	let nodes: Vec<_> = data
		.nodes
		.iter()
		.filter(|n| filter.contains(n.resolved_type()))
		.cloned()
		.collect();
	let ids: HashSet<&str> = nodes.iter().filter_map(|n| n.id.as_deref()).collect();
	let links = data
		.links
		.iter()
		.filter(|l| match (l.source.as_deref(), l.target.as_deref()) {
			(Some(s), Some(t)) => ids.contains(s) && ids.contains(t),
			_ => false,
		})
		.cloned()
		.collect();

	Cow::Owned(GraphData { nodes, links })
}

/// Legend state: what is ticked versus what the graph shows.
///
/// Ticking a type only stages it; the graph changes when [`apply`] is called.
///
/// [`apply`]: LegendSelection::apply
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LegendSelection {
	pending: BTreeSet<String>,
	applied: FilterSet,
}

impl LegendSelection {
	/// Stage `node_type` as ticked or unticked.
	pub fn toggle(&mut self, node_type: &str, checked: bool) {
		if checked {
			self.pending.insert(node_type.to_string());
		} else {
			self.pending.remove(node_type);
		}
	}

	/// Whether the checkbox for `node_type` is ticked.
	pub fn is_checked(&self, node_type: &str) -> bool {
		self.pending.contains(node_type)
	}

	/// Make the ticked types the applied filter.
	pub fn apply(&mut self) {
		self.applied = FilterSet(self.pending.clone());
	}

	/// Untick everything and show all types again.
	pub fn clear(&mut self) {
		self.pending.clear();
		self.applied = FilterSet::all();
	}

	/// Forget everything; used when another dataset is selected.
	pub fn reset(&mut self) {
		*self = Self::default();
	}

	/// The filter the graph is currently drawn with.
	pub fn applied(&self) -> &FilterSet {
		&self.applied
	}

	/// Whether the graph is restricted to some types.
	pub fn has_applied_filter(&self) -> bool {
		!self.applied.shows_all()
	}
}
