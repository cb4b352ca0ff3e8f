use leptos::prelude::*;
use log::{error, info};

use crate::components::graph_view::{
	Dataset, GraphData, GraphView, GraphViewError, LegendSelection, NetworkOptions,
};
use crate::components::legend::Legend;

/// Graphs bundled with the app, by file name.
const SAMPLES: &[(&str, &str)] = &[
	(
		"social_network.json",
		include_str!("../../assets/graphs/social_network.json"),
	),
	(
		"corporate_structure.json",
		include_str!("../../assets/graphs/corporate_structure.json"),
	),
];

fn load_sample(name: &str) -> Result<Option<Dataset>, GraphViewError> {
	let Some((_, text)) = SAMPLES.iter().find(|(n, _)| *n == name) else {
		return Ok(None);
	};
	Ok(Some(Dataset::new(name, GraphData::from_json(text)?)))
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	// One configuration for both the legend and the canvas so swatches and
	// node fills come from the same palette.
	let options = NetworkOptions::default();
	let dataset = RwSignal::new(None::<Dataset>);
	let selection = RwSignal::new(LegendSelection::default());

	let legend_options = options.clone();
	let colors = Memo::new(move |_| {
		dataset.with(|d| d.as_ref().map(|d| legend_options.color_map(&d.graph.nodes)))
	});
	let filter = Memo::new(move |_| selection.with(|s| s.applied().clone()));

	let select = move |name: &'static str| {
		selection.update(LegendSelection::reset);
		match load_sample(name) {
			Ok(loaded) => {
				info!("selected {name}");
				dataset.set(loaded);
			}
			Err(err) => {
				error!("could not load {name}: {err}");
				dataset.set(None);
			}
		}
	};

	let is_selected =
		move |name: &str| dataset.with(|d| d.as_ref().is_some_and(|d| d.name == name));

	view! {
		<div class="layout">
			<aside class="sidebar">
				<h2 class="files-title">
					"Graph Files " <span class="files-count">"(" {SAMPLES.len()} ")"</span>
				</h2>
				<button
					class="refresh"
					on:click=move |_| {
						selection.update(LegendSelection::reset);
						dataset.set(None);
					}
				>
					"Refresh"
				</button>
				<ul class="files">
					{SAMPLES
						.iter()
						.map(|&(name, _)| {
							view! {
								<li
									class="file"
									class:selected=move || is_selected(name)
									on:click=move |_| select(name)
								>
									{name}
								</li>
							}
						})
						.collect_view()}
				</ul>
				<Legend colors=colors selection=selection />
			</aside>
			<main class="main">
				<Show
					when=move || dataset.with(Option::is_some)
					fallback=|| {
						view! {
							<div class="placeholder">
								<h2>"Please select a graph file"</h2>
							</div>
						}
					}
				>
					<div class="graph-stats">
						{move || {
							dataset
								.with(|d| {
									d.as_ref()
										.map(|d| {
											format!(
												"Nodes: {} | Edges: {}",
												d.graph.nodes.len(),
												d.graph.links.len(),
											)
										})
								})
						}}
					</div>
					<div class="graph-container">
						<GraphView dataset=dataset filter=filter options=options.clone() />
					</div>
				</Show>
			</main>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph_view::{FilterSet, filter_graph};

	#[test]
	fn bundled_samples_decode() {
		for (name, _) in SAMPLES {
			let dataset = load_sample(name).unwrap().unwrap();
			assert!(!dataset.graph.nodes.is_empty(), "{name} has no nodes");
		}
	}

	#[test]
	fn unknown_sample_is_none() {
		assert!(load_sample("missing.json").unwrap().is_none());
	}

	#[test]
	fn social_sample_filters_to_people() {
		let dataset = load_sample("social_network.json").unwrap().unwrap();
		let people: FilterSet = ["Person"].into_iter().collect();
		let visible = filter_graph(&dataset.graph, &people);
		assert_eq!(visible.nodes.len(), 4);
		assert_eq!(visible.links.len(), 3);
	}
}
