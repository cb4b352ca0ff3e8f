use leptos::prelude::*;
use log::error;
use web_sys::{HtmlCanvasElement, MouseEvent};

use super::filter::FilterSet;
use super::host::CanvasHost;
use super::options::NetworkOptions;
use super::session::GraphRenderSession;
use super::types::Dataset;

/// Interactive node-link view of `dataset`, restricted to `filter`.
///
/// Rebuilds whenever either input changes and tears everything down when
/// the component is removed.
#[component]
pub fn GraphView(
	/// Graph to show; `None` clears the canvas.
	#[prop(into)]
	dataset: Signal<Option<Dataset>>,
	/// Applied legend filter.
	#[prop(into)]
	filter: Signal<FilterSet>,
	/// Styling and physics; defaults apply when omitted.
	#[prop(optional)]
	options: Option<NetworkOptions>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let session = StoredValue::new_local(GraphRenderSession::<CanvasHost>::new(
		options.unwrap_or_default(),
	));

	Effect::new(move |_| {
		let dataset = dataset.get();
		let filter = filter.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		session.update_value(|s| {
			if !s.has_surface() {
				let host = CanvasHost::new(
					canvas,
					move || session.update_value(|s| s.handle_resize()),
					move |ticket| {
						session.update_value(|s| {
							s.fire_refit(ticket);
						})
					},
				);
				if let Err(err) = s.bind_surface(host) {
					error!("graph view could not attach: {err}");
				}
			}
			if let Err(err) = s.render(dataset.as_ref(), &filter) {
				error!("graph view could not render: {err}");
			}
		});
	});

	on_cleanup(move || {
		session.try_update_value(|s| s.dispose());
	});

	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);
		session.update_value(|s| {
			if let Some(network) = s.instance_mut() {
				network.hover_at(x, y);
			}
		});
	};

	let on_mouseleave = move |_: MouseEvent| {
		session.update_value(|s| {
			if let Some(network) = s.instance_mut() {
				network.clear_hover();
			}
		});
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="graph-view-canvas"
			on:mousemove=on_mousemove
			on:mouseleave=on_mouseleave
			style="display: block; width: 100%; height: 100%;"
		/>
	}
}
