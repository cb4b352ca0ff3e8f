//! Lifecycle of the live visualization behind a graph view.
//!
//! A [`GraphRenderSession`] owns at most one visualization instance, bound to
//! one surface. It rebuilds the instance whenever the dataset, the applied
//! filter or the colour map change, and refits it (debounced) when the
//! surface is resized. The browser specifics live behind [`Host`].

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};

use super::colors::ColorMap;
use super::error::GraphViewError;
use super::filter::{FilterSet, filter_graph};
use super::options::NetworkOptions;
use super::types::Dataset;
use super::view_model::ViewGraph;

/// A live visualization instance.
pub trait Visualization {
	/// Recompute zoom and position so the content fits the surface.
	fn fit(&mut self);
	/// Release layout state, timers and drawing handles.
	fn destroy(&mut self);
}

/// A cancellable registration: a resize subscription or a pending timer.
pub trait Subscription {
	/// Stop further callbacks. Cancelling twice is harmless.
	fn cancel(&mut self);
}

/// A display surface the session can build instances on.
pub trait Host {
	/// What [`Host::create`] builds.
	type Instance: Visualization;
	/// Handle of a resize subscription.
	type Observer: Subscription;
	/// Handle of a scheduled refit.
	type Timer: Subscription;

	/// Build a visualization of `graph` on this surface.
	fn create(
		&mut self,
		graph: ViewGraph,
		options: &NetworkOptions,
	) -> Result<Self::Instance, GraphViewError>;

	/// Start reporting size changes of the surface through
	/// [`GraphRenderSession::handle_resize`].
	fn observe_resize(&mut self) -> Result<Self::Observer, GraphViewError>;

	/// Arrange for [`GraphRenderSession::fire_refit`] to be called with
	/// `ticket` after `delay`.
	fn schedule_refit(
		&mut self,
		ticket: RefitTicket,
		delay: Duration,
	) -> Result<Self::Timer, GraphViewError>;
}

/// Identifies one scheduled refit; only the latest ticket is honoured.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefitTicket(u64);

/// Whether a live instance exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
	/// Nothing is shown.
	Unattached,
	/// An instance is live on the bound surface.
	Attached,
}

/// What a call to [`GraphRenderSession::render`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderOutcome {
	/// A fresh instance now shows the inputs.
	Built,
	/// The live instance already shows these inputs.
	Unchanged,
	/// No surface is bound; the inputs are kept until one is.
	Deferred,
	/// No dataset is selected; nothing is shown.
	Cleared,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Lifetime counters, mostly for tests and debug logging.
pub struct SessionStats {
	/// Instances constructed.
	pub builds: u64,
	/// Instances destroyed.
	pub teardowns: u64,
	/// Debounced refits that ran.
	pub refits: u64,
}

#[derive(Clone, Debug, PartialEq)]
struct RenderKey {
	dataset: Dataset,
	filter: FilterSet,
	colors: Arc<ColorMap>,
}

struct Live<H: Host> {
	instance: H::Instance,
	observer: H::Observer,
	pending_refit: Option<(RefitTicket, H::Timer)>,
	key: RenderKey,
}

/// Owner of at most one live visualization on one bound surface.
pub struct GraphRenderSession<H: Host> {
	options: NetworkOptions,
	host: Option<H>,
	wanted: Option<RenderKey>,
	colors: Option<(Dataset, Arc<ColorMap>)>,
	live: Option<Live<H>>,
	next_ticket: u64,
	stats: SessionStats,
}

impl<H: Host> GraphRenderSession<H> {
	/// A session with no surface and no inputs.
	pub fn new(options: NetworkOptions) -> Self {
		Self {
			options,
			host: None,
			wanted: None,
			colors: None,
			live: None,
			next_ticket: 0,
			stats: SessionStats::default(),
		}
	}

	/// [`SessionState::Attached`] while an instance is live.
	pub fn state(&self) -> SessionState {
		if self.live.is_some() {
			SessionState::Attached
		} else {
			SessionState::Unattached
		}
	}

	/// Counters since the session was created.
	pub fn stats(&self) -> SessionStats {
		self.stats
	}

	/// Options every instance is built with.
	pub fn options(&self) -> &NetworkOptions {
		&self.options
	}

	/// Whether a surface is bound.
	pub fn has_surface(&self) -> bool {
		self.host.is_some()
	}

	/// Colour map of the most recent dataset, if any.
	pub fn color_map(&self) -> Option<&ColorMap> {
		self.colors.as_ref().map(|(_, colors)| colors.as_ref())
	}

	/// The live instance, if attached.
	pub fn instance(&self) -> Option<&H::Instance> {
		self.live.as_ref().map(|live| &live.instance)
	}

	/// Mutable access to the live instance, if attached.
	pub fn instance_mut(&mut self) -> Option<&mut H::Instance> {
		self.live.as_mut().map(|live| &mut live.instance)
	}

	/// Bind a surface, replacing any previous one. Pending inputs are built
	/// right away.
	pub fn bind_surface(&mut self, host: H) -> Result<RenderOutcome, GraphViewError> {
		self.detach();
		self.host = Some(host);
		debug!("surface bound");
		match self.wanted.clone() {
			Some(key) => self.attach(key),
			None => Ok(RenderOutcome::Deferred),
		}
	}

	/// Tear down and hand the surface back. The latest inputs are kept.
	pub fn unbind_surface(&mut self) -> Option<H> {
		self.detach();
		let host = self.host.take();
		if host.is_some() {
			debug!("surface unbound");
		}
		host
	}

	/// Show `dataset` filtered by `filter`.
	///
	/// Rebuilds only when the inputs differ from what the live instance
	/// shows. A failed build leaves the session unattached; calling again
	/// with the same inputs retries.
	pub fn render(
		&mut self,
		dataset: Option<&Dataset>,
		filter: &FilterSet,
	) -> Result<RenderOutcome, GraphViewError> {
		let Some(dataset) = dataset else {
			self.wanted = None;
			self.colors = None;
			self.detach();
			return Ok(RenderOutcome::Cleared);
		};

		let key = RenderKey {
			colors: self.colors_for(dataset),
			dataset: dataset.clone(),
			filter: filter.clone(),
		};
		self.wanted = Some(key.clone());

		if self.live.as_ref().is_some_and(|live| live.key == key) {
			return Ok(RenderOutcome::Unchanged);
		}

		self.detach();
		if self.host.is_none() {
			debug!("render of {} deferred until a surface is bound", dataset.name);
			return Ok(RenderOutcome::Deferred);
		}
		self.attach(key)
	}

	/// A size change was observed on the surface. Schedules a refit,
	/// replacing any refit still pending.
	pub fn handle_resize(&mut self) {
		let delay = self.options.refit_debounce();
		let (Some(host), Some(live)) = (self.host.as_mut(), self.live.as_mut()) else {
			return;
		};
		if let Some((_, mut timer)) = live.pending_refit.take() {
			timer.cancel();
		}

		self.next_ticket += 1;
		let ticket = RefitTicket(self.next_ticket);
		match host.schedule_refit(ticket, delay) {
			Ok(timer) => live.pending_refit = Some((ticket, timer)),
			Err(err) => warn!("could not schedule refit: {err}"),
		}
	}

	/// Run the refit for `ticket` if it is still the pending one.
	pub fn fire_refit(&mut self, ticket: RefitTicket) -> bool {
		let Some(live) = self.live.as_mut() else {
			return false;
		};
		if live.pending_refit.as_ref().map(|(t, _)| *t) != Some(ticket) {
			return false;
		}
		live.pending_refit = None;
		live.instance.fit();
		self.stats.refits += 1;
		true
	}

	/// Release the instance and the surface. Safe to call repeatedly.
	pub fn dispose(&mut self) {
		self.detach();
		self.wanted = None;
		self.colors = None;
		self.host = None;
	}

	fn colors_for(&mut self, dataset: &Dataset) -> Arc<ColorMap> {
		if let Some((seen, colors)) = &self.colors
			&& seen == dataset
		{
			return colors.clone();
		}
		let colors = Arc::new(self.options.color_map(&dataset.graph.nodes));
		self.colors = Some((dataset.clone(), colors.clone()));
		colors
	}

	fn attach(&mut self, key: RenderKey) -> Result<RenderOutcome, GraphViewError> {
		let Some(host) = self.host.as_mut() else {
			return Err(GraphViewError::SurfaceUnavailable);
		};

		let visible = filter_graph(&key.dataset.graph, &key.filter);
		let view = ViewGraph::build(&visible, &key.colors, &self.options);
		let (nodes, edges) = (view.nodes.len(), view.edges.len());

		let mut instance = host.create(view, &self.options)?;
		let observer = match host.observe_resize() {
			Ok(observer) => observer,
			Err(err) => {
				instance.destroy();
				return Err(err);
			}
		};

		info!(
			"showing {} ({nodes} nodes, {edges} edges)",
			key.dataset.name
		);
		self.stats.builds += 1;
		self.live = Some(Live {
			instance,
			observer,
			pending_refit: None,
			key,
		});
		Ok(RenderOutcome::Built)
	}

	fn detach(&mut self) {
		let Some(mut live) = self.live.take() else {
			return;
		};
		if let Some((_, mut timer)) = live.pending_refit.take() {
			timer.cancel();
		}
		live.observer.cancel();
		live.instance.destroy();
		self.stats.teardowns += 1;
		debug!("visualization torn down");
	}
}

impl<H: Host> Drop for GraphRenderSession<H> {
	fn drop(&mut self) {
		self.detach();
	}
}
