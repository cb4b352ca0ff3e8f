use thiserror::Error;

/// Failures surfaced by the graph view pipeline.
///
/// None of these are fatal: the render session stays unattached and the next
/// input change retries.
#[derive(Error, Debug)]
pub enum GraphViewError {
	/// The session has no usable canvas.
	#[error("no display surface is bound")]
	SurfaceUnavailable,

	/// The browser refused a canvas, observer or timer.
	#[error("visualization failed to initialise: {0}")]
	ConstructionFailure(String),

	/// The JSON document is not a node-link graph.
	#[error("graph data could not be decoded: {0}")]
	Decode(#[from] serde_json::Error),
}

/// An entity left out of the view model. Reported, never raised.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MalformedEntity {
	/// Node at this position in the visible node list has no id.
	NodeWithoutId {
		/// Position in the visible node list.
		index: usize,
	},
	/// Edge at this position has no source or no target.
	EdgeWithoutEndpoint {
		/// Position in the visible edge list.
		index: usize,
	},
	/// Edge refers to a node that is not visible.
	DanglingEdge {
		/// Position in the visible edge list.
		index: usize,
		/// Source id as given.
		source: String,
		/// Target id as given.
		target: String,
	},
}
