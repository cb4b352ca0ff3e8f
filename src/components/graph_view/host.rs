use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use js_sys::Function;
use log::debug;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement, ResizeObserver, Window};

use super::error::GraphViewError;
use super::options::NetworkOptions;
use super::render;
use super::session::{Host, RefitTicket, Subscription, Visualization};
use super::state::ForceGraphState;
use super::view_model::ViewGraph;

const FALLBACK_SIZE: (f64, f64) = (800.0, 600.0);

fn js_error(context: &str, err: JsValue) -> GraphViewError {
	GraphViewError::ConstructionFailure(format!("{context}: {err:?}"))
}

fn window() -> Result<Window, GraphViewError> {
	web_sys::window().ok_or(GraphViewError::SurfaceUnavailable)
}

/// `setTimeout` delay in milliseconds, saturating at `i32::MAX`.
fn timeout_ms(delay: Duration) -> i32 {
	i32::try_from(delay.as_millis()).unwrap_or(i32::MAX)
}

/// Size of the region the canvas should fill: its parent, or a fallback.
fn container_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|&(w, h)| w > 0.0 && h > 0.0)
		.unwrap_or(FALLBACK_SIZE)
}

/// A `<canvas>` element plus the callbacks that route browser events back
/// into the owning session.
pub struct CanvasHost {
	canvas: HtmlCanvasElement,
	on_resize: Rc<dyn Fn()>,
	on_refit: Rc<dyn Fn(RefitTicket)>,
}

impl CanvasHost {
	/// `on_resize` fires for every observed size change; `on_refit` fires
	/// when a scheduled refit timer elapses.
	pub fn new(
		canvas: HtmlCanvasElement,
		on_resize: impl Fn() + 'static,
		on_refit: impl Fn(RefitTicket) + 'static,
	) -> Self {
		Self {
			canvas,
			on_resize: Rc::new(on_resize),
			on_refit: Rc::new(on_refit),
		}
	}

	/// The bound canvas.
	pub fn canvas(&self) -> &HtmlCanvasElement {
		&self.canvas
	}
}

impl Host for CanvasHost {
	type Instance = CanvasNetwork;
	type Observer = ResizeSubscription;
	type Timer = RefitTimer;

	fn create(
		&mut self,
		graph: ViewGraph,
		options: &NetworkOptions,
	) -> Result<CanvasNetwork, GraphViewError> {
		if !self.canvas.is_connected() {
			return Err(GraphViewError::SurfaceUnavailable);
		}
		let window = window()?;
		let ctx: CanvasRenderingContext2d = self
			.canvas
			.get_context("2d")
			.map_err(|e| js_error("canvas context", e))?
			.ok_or_else(|| GraphViewError::ConstructionFailure("2d context unavailable".into()))?
			.dyn_into()
			.map_err(|e| js_error("canvas context", e.into()))?;

		let (w, h) = container_size(&self.canvas);
		self.canvas.set_width(w as u32);
		self.canvas.set_height(h as u32);

		let mut state = ForceGraphState::new(&graph, w, h, options);
		state.stabilize();
		state.fit();
		let state = Rc::new(RefCell::new(state));

		let frame = Rc::new(Cell::new(None));
		let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
		let (state_anim, animate_inner, frame_inner) = (state.clone(), animate.clone(), frame.clone());
		*animate.borrow_mut() = Some(Closure::new(move || {
			{
				let mut s = state_anim.borrow_mut();
				if s.animation_running {
					s.tick(0.016);
				}
				render::render(&s, &ctx);
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				frame_inner.set(win.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
			}
		}));
		if let Some(cb) = animate.borrow().as_ref() {
			let id = window
				.request_animation_frame(cb.as_ref().unchecked_ref())
				.map_err(|e| js_error("animation frame", e))?;
			frame.set(Some(id));
		}

		debug!("canvas network created at {w}x{h}");
		Ok(CanvasNetwork {
			canvas: self.canvas.clone(),
			state,
			frame,
			animate,
		})
	}

	fn observe_resize(&mut self) -> Result<ResizeSubscription, GraphViewError> {
		let target: Element = self
			.canvas
			.parent_element()
			.unwrap_or_else(|| self.canvas.clone().into());
		let on_resize = self.on_resize.clone();
		let callback = Closure::<dyn FnMut()>::new(move || on_resize());
		let observer = ResizeObserver::new(callback.as_ref().unchecked_ref())
			.map_err(|e| js_error("resize observer", e))?;
		observer.observe(&target);
		Ok(ResizeSubscription {
			observer,
			_callback: callback,
		})
	}

	fn schedule_refit(
		&mut self,
		ticket: RefitTicket,
		delay: Duration,
	) -> Result<RefitTimer, GraphViewError> {
		let on_refit = self.on_refit.clone();
		// Frees itself once called; the session ignores it if it went stale.
		let callback = Closure::once_into_js(move || on_refit(ticket));
		let handle = window()?
			.set_timeout_with_callback_and_timeout_and_arguments_0(
				callback.unchecked_ref::<Function>(),
				timeout_ms(delay),
			)
			.map_err(|e| js_error("refit timer", e))?;
		Ok(RefitTimer { handle })
	}
}

/// A force-directed network drawn on a canvas every animation frame.
pub struct CanvasNetwork {
	canvas: HtmlCanvasElement,
	state: Rc<RefCell<ForceGraphState>>,
	frame: Rc<Cell<Option<i32>>>,
	animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
}

impl CanvasNetwork {
	/// Update hover highlighting for a pointer at canvas coordinates.
	pub fn hover_at(&self, x: f64, y: f64) {
		let mut s = self.state.borrow_mut();
		let hovered = s.node_at_position(x, y);
		s.set_hover(hovered);
	}

	/// Drop hover highlighting, e.g. when the pointer leaves the canvas.
	pub fn clear_hover(&self) {
		self.state.borrow_mut().set_hover(None);
	}
}

impl Visualization for CanvasNetwork {
	fn fit(&mut self) {
		let (w, h) = container_size(&self.canvas);
		self.canvas.set_width(w as u32);
		self.canvas.set_height(h as u32);
		let mut s = self.state.borrow_mut();
		s.resize(w, h);
		s.fit();
	}

	fn destroy(&mut self) {
		if let (Some(id), Some(win)) = (self.frame.take(), web_sys::window()) {
			let _ = win.cancel_animation_frame(id);
		}
		self.animate.borrow_mut().take();
		self.state.borrow_mut().animation_running = false;
		if let Ok(Some(ctx)) = self.canvas.get_context("2d")
			&& let Ok(ctx) = ctx.dyn_into::<CanvasRenderingContext2d>()
		{
			ctx.clear_rect(
				0.0,
				0.0,
				self.canvas.width() as f64,
				self.canvas.height() as f64,
			);
		}
	}
}

/// A `ResizeObserver` on the canvas's container.
pub struct ResizeSubscription {
	observer: ResizeObserver,
	_callback: Closure<dyn FnMut()>,
}

impl Subscription for ResizeSubscription {
	fn cancel(&mut self) {
		self.observer.disconnect();
	}
}

/// A pending `setTimeout` for a refit.
pub struct RefitTimer {
	handle: i32,
}

impl Subscription for RefitTimer {
	fn cancel(&mut self) {
		if let Some(win) = web_sys::window() {
			win.clear_timeout_with_handle(self.handle);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn timeout_saturates_instead_of_wrapping() {
		assert_eq!(timeout_ms(Duration::from_millis(150)), 150);
		assert_eq!(timeout_ms(Duration::from_millis(i32::MAX as u64)), i32::MAX);
		assert_eq!(timeout_ms(Duration::from_millis(u64::MAX)), i32::MAX);
		assert_eq!(timeout_ms(Duration::from_millis(1 << 32)), i32::MAX);
	}
}
