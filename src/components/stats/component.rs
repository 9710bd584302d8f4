use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{error, info};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};

use super::aggregate::placeholder_stats;
use super::chart::{BarChart, render_bar_chart};
use crate::algorithm::Algorithm;
use crate::api::{ApiClient, BatchRequest};
use crate::config::VizConfig;

const CHART_FALLBACK: (f64, f64) = (400.0, 300.0);

fn draw_chart(node: NodeRef<leptos::html::Canvas>, chart: &BarChart) {
	let Some(canvas) = node.get() else {
		return;
	};
	let canvas: HtmlCanvasElement = canvas.into();
	let (w, h) = canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|&(w, h)| w > 0.0 && h > 0.0)
		.unwrap_or(CHART_FALLBACK);
	canvas.set_width(w as u32);
	canvas.set_height(h as u32);

	let ctx = match canvas.get_context("2d") {
		Ok(Some(obj)) => obj.dyn_into::<CanvasRenderingContext2d>().ok(),
		_ => None,
	};
	match ctx {
		Some(ctx) => render_bar_chart(&ctx, chart, w, h),
		None => error!("Chart canvas has no 2D context"),
	}
}

/// Batch comparison form, results table and charts.
#[component]
pub fn BatchComparison() -> impl IntoView {
	let config = use_context::<VizConfig>().unwrap_or_else(VizConfig::from_env);
	let client = ApiClient::new(config.api_base.clone());
	let defaults = BatchRequest::default();

	let num_graphs = RwSignal::new(defaults.num_graphs);
	let num_nodes = RwSignal::new(defaults.num_nodes);
	let density = RwSignal::new(defaults.density);
	let directed = RwSignal::new(defaults.directed);
	let selected = RwSignal::new(defaults.algorithms);
	let stats = RwSignal::new(placeholder_stats());
	let busy = RwSignal::new(false);
	let failure = RwSignal::new(None::<String>);

	let cost_ref = NodeRef::<leptos::html::Canvas>::new();
	let time_ref = NodeRef::<leptos::html::Canvas>::new();

	Effect::new(move |_| {
		let rows = stats.get();
		draw_chart(cost_ref, &BarChart::average_cost(&rows));
		draw_chart(time_ref, &BarChart::average_time_ms(&rows));
	});

	let on_run = move |_: MouseEvent| {
		if busy.get_untracked() {
			return;
		}
		let request = BatchRequest {
			num_graphs: num_graphs.get_untracked(),
			num_nodes: num_nodes.get_untracked(),
			density: density.get_untracked(),
			directed: directed.get_untracked(),
			algorithms: selected.get_untracked(),
		};
		busy.set(true);
		failure.set(None);
		info!(
			"Starting batch: {} graphs of {} nodes, {} algorithms",
			request.num_graphs,
			request.num_nodes,
			request.algorithms.len()
		);
		let client = client.clone();
		spawn_local(async move {
			match client.batch_run(&request).await {
				Ok(response) => stats.set(response.into_stats()),
				Err(e) => {
					error!("Batch run failed: {}", e);
					failure.set(Some(format!("Batch run failed: {}", e)));
				}
			}
			busy.set(false);
		});
	};

	view! {
		<div class="batch-comparison">
			<form class="batch-form">
				<label>"Graphs"</label>
				<input
					type="number"
					min="1"
					prop:value=move || num_graphs.get().to_string()
					on:input=move |ev| {
						if let Ok(n) = event_target_value(&ev).parse::<u32>() {
							num_graphs.set(n);
						}
					}
				/>
				<label>"Nodes"</label>
				<input
					type="number"
					min="1"
					prop:value=move || num_nodes.get().to_string()
					on:input=move |ev| {
						if let Ok(n) = event_target_value(&ev).parse::<u32>() {
							num_nodes.set(n);
						}
					}
				/>
				<label>"Density: " {move || format!("{:.2}", density.get())}</label>
				<input
					type="range"
					min="0"
					max="1"
					step="0.05"
					prop:value=move || density.get().to_string()
					on:input=move |ev| {
						if let Ok(d) = event_target_value(&ev).parse::<f64>() {
							density.set(d);
						}
					}
				/>
				<label>
					<input
						type="checkbox"
						prop:checked=move || directed.get()
						on:change=move |ev| directed.set(event_target_checked(&ev))
					/>
					" Directed"
				</label>
				<fieldset>
					<legend>"Algorithms"</legend>
					{Algorithm::ALL
						.into_iter()
						.map(|a| {
							view! {
								<label>
									<input
										type="checkbox"
										prop:checked=move || selected.get().contains(&a)
										on:change=move |ev| {
											let on = event_target_checked(&ev);
											selected
												.update(|list| {
													list.retain(|x| *x != a);
													if on {
														list.push(a);
														list.sort();
													}
												});
										}
									/>
									{a.as_str()}
								</label>
							}
						})
						.collect_view()}
				</fieldset>
				<button type="button" on:click=on_run prop:disabled=move || busy.get()>
					{move || if busy.get() { "Running..." } else { "Run Batch" }}
				</button>
			</form>

			{move || failure.get().map(|message| view! { <p class="error">{message}</p> })}

			<table class="stats-table">
				<thead>
					<tr>
						<th>"Algorithm"</th>
						<th>"Success Rate"</th>
						<th>"Avg Cost"</th>
						<th>"Avg Nodes"</th>
						<th>"Avg Time"</th>
					</tr>
				</thead>
				<tbody>
					{move || {
						stats
							.get()
							.iter()
							.map(|stat| {
								let [name, rate, cost, nodes, time] = stat.table_cells();
								view! {
									<tr>
										<td>{name}</td>
										<td>{rate}</td>
										<td>{cost}</td>
										<td>{nodes}</td>
										<td>{time}</td>
									</tr>
								}
							})
							.collect_view()
					}}
				</tbody>
			</table>

			<div class="charts">
				<div class="chart">
					<canvas node_ref=cost_ref />
				</div>
				<div class="chart">
					<canvas node_ref=time_ref />
				</div>
			</div>
		</div>
	}
}
