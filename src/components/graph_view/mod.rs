//! Typed graph view: colouring, legend filtering and the live canvas session.

mod colors;
mod component;
mod error;
mod filter;
mod host;
mod options;
mod render;
mod session;
mod state;
mod types;
mod view_model;

pub use colors::{ColorMap, DEFAULT_COLOR, PALETTE, assign_colors};
pub use component::GraphView;
pub use error::{GraphViewError, MalformedEntity};
pub use filter::{FilterSet, LegendSelection, filter_graph};
pub use host::{CanvasHost, CanvasNetwork};
pub use options::{EdgeStyle, NetworkOptions, NodeStyle, PhysicsOptions};
pub use session::{
	GraphRenderSession, Host, RefitTicket, RenderOutcome, SessionState, SessionStats,
	Subscription, Visualization,
};
pub use types::{DEFAULT_TYPE, Dataset, GraphData, GraphLink, GraphNode};
pub use view_model::{ViewEdge, ViewGraph, ViewNode};
