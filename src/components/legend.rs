//! Legend with per-type checkboxes and the Filter / Clear Filter buttons.

use leptos::prelude::*;

use crate::components::graph_view::{ColorMap, LegendSelection};

/// Checkbox per node type. Ticks are staged until "Filter" is pressed.
#[component]
pub fn Legend(
	/// Colours of the selected dataset, or `None` when nothing is selected.
	#[prop(into)]
	colors: Signal<Option<ColorMap>>,
	/// Staged and applied type selection, shared with the page.
	selection: RwSignal<LegendSelection>,
) -> impl IntoView {
	let entries = move || {
		colors
			.get()
			.map(|map| {
				map.legend_entries()
					.map(|(t, c)| (t.to_string(), c.to_string()))
					.collect::<Vec<_>>()
			})
			.unwrap_or_default()
	};

	view! {
		<div class="legend">
			<h3 class="legend-title">"Legend"</h3>
			<ul class="legend-entries">
				<For
					each=entries
					key=|(node_type, color)| (node_type.clone(), color.clone())
					children=move |(node_type, color)| {
						let id = format!("legend-check-{node_type}");
						let checked_type = node_type.clone();
						let toggled_type = node_type.clone();
						view! {
							<li class="legend-entry">
								<input
									type="checkbox"
									id=id.clone()
									style=format!("accent-color: {color};")
									prop:checked=move || {
										selection.with(|s| s.is_checked(&checked_type))
									}
									on:change=move |ev| {
										let checked = event_target_checked(&ev);
										selection.update(|s| s.toggle(&toggled_type, checked));
									}
								/>
								<label for=id>
									<span
										class="legend-swatch"
										style=format!("background: {color};")
									/>
									<span class="legend-type">{node_type}</span>
								</label>
							</li>
						}
					}
				/>
			</ul>
			<Show when=move || colors.with(Option::is_some)>
				<button class="legend-apply" on:click=move |_| selection.update(|s| s.apply())>
					"Filter"
				</button>
				<Show when=move || selection.with(LegendSelection::has_applied_filter)>
					<button
						class="legend-clear"
						on:click=move |_| selection.update(|s| s.clear())
					>
						"Clear Filter"
					</button>
				</Show>
			</Show>
		</div>
	}
}
