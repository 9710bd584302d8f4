use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, error, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Event, HtmlCanvasElement, MouseEvent};

use super::animator::{PlaybackHandle, PlaybackState, StepAnimator, TickScheduler};
use super::render::{Frame, StatusPanel};
use super::state::GraphViewState;
use super::summary::RunSummary;
use super::types::NodeId;
use crate::algorithm::Algorithm;
use crate::api::{ApiClient, GenerateRequest};
use crate::config::{SPEED_PRESETS, VizConfig};
use crate::error::VizError;

type TickCallback = Rc<RefCell<Option<Closure<dyn FnMut(JsValue)>>>>;

/// Drives animation ticks through `window.setTimeout`. The playback handle
/// travels as the timer argument so a late timer can be recognised.
struct WindowScheduler {
	callback: TickCallback,
	pending: Option<i32>,
}

impl TickScheduler for WindowScheduler {
	fn schedule(&mut self, handle: PlaybackHandle, delay_ms: u32) {
		self.cancel();
		let Some(window) = web_sys::window() else {
			return;
		};
		let callback = self.callback.borrow();
		let Some(cb) = callback.as_ref() else {
			return;
		};
		match window.set_timeout_with_callback_and_timeout_and_arguments_1(
			cb.as_ref().unchecked_ref(),
			delay_ms as i32,
			&JsValue::from_f64(handle.raw() as f64),
		) {
			Ok(id) => self.pending = Some(id),
			Err(e) => error!("Failed to schedule animation tick: {:?}", e),
		}
	}

	fn cancel(&mut self) {
		if let (Some(id), Some(window)) = (self.pending.take(), web_sys::window()) {
			window.clear_timeout_with_handle(id);
		}
	}
}

struct Viewer {
	state: GraphViewState,
	animator: StepAnimator<WindowScheduler>,
	ctx: Option<CanvasRenderingContext2d>,
}

impl Viewer {
	/// Repaints whatever the animator last showed, or the bare graph.
	fn redraw(&mut self) {
		let Some(ctx) = self.ctx.clone() else {
			return;
		};
		let frame = match (self.animator.state(), self.animator.current_step()) {
			(PlaybackState::Playing, Some(step)) => Frame::Running(step),
			(PlaybackState::Complete, Some(step)) => Frame::Final(step),
			_ => Frame::Base,
		};
		let (start, end) = match frame {
			Frame::Base => (self.state.start, self.state.end),
			_ => self.animator.endpoints(),
		};
		self.state.draw(&ctx, frame, start, end);
	}

	fn reset(&mut self) {
		let Viewer {
			state,
			animator,
			ctx,
		} = self;
		match ctx.as_ref() {
			Some(ctx) => animator.reset(state, ctx),
			None => state.reset_status(),
		}
	}
}

/// Signals mirroring the parts of [`Viewer`] the markup reads.
#[derive(Clone, Copy)]
struct Readouts {
	status: RwSignal<StatusPanel>,
	activity: RwSignal<Vec<String>>,
	node_ids: RwSignal<Vec<NodeId>>,
	start: RwSignal<Option<NodeId>>,
	end: RwSignal<Option<NodeId>>,
}

impl Readouts {
	fn new() -> Self {
		Self {
			status: RwSignal::new(StatusPanel::default()),
			activity: RwSignal::new(Vec::new()),
			node_ids: RwSignal::new(Vec::new()),
			start: RwSignal::new(None),
			end: RwSignal::new(None),
		}
	}

	fn sync(&self, viewer: &Viewer) {
		self.status.set(viewer.state.status.clone());
		self.activity.set(viewer.state.activity.lines().to_vec());
	}

	fn sync_graph(&self, viewer: &Viewer) {
		self.sync(viewer);
		self.node_ids.set(viewer.state.node_ids());
		self.start.set(viewer.state.start);
		self.end.set(viewer.state.end);
	}
}

fn canvas_size(canvas: &HtmlCanvasElement, fallback: (f64, f64)) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|&(w, h)| w > 0.0 && h > 0.0)
		.unwrap_or(fallback)
}

fn fmt_id(id: Option<NodeId>) -> String {
	id.map(|id| id.to_string()).unwrap_or_default()
}

/// Interactive single-graph simulator: generate a graph, pick endpoints and
/// an algorithm, then watch the service's recorded steps play back.
#[component]
pub fn PathSimulator() -> impl IntoView {
	let config = use_context::<VizConfig>().unwrap_or_else(VizConfig::from_env);
	let client = ApiClient::new(config.api_base.clone());
	let fallback = (config.fallback_width, config.fallback_height);
	let defaults = GenerateRequest::default();

	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let readouts = Readouts::new();
	let num_nodes = RwSignal::new(defaults.num_nodes);
	let density = RwSignal::new(defaults.density);
	let directed = RwSignal::new(defaults.directed);
	let algorithm = RwSignal::new(Algorithm::default());
	let summaries = RwSignal::new(Vec::<RunSummary>::new());
	let comparing = RwSignal::new(false);
	let source = RwSignal::new(None::<String>);

	let callback: TickCallback = Rc::new(RefCell::new(None));
	let viewer = Rc::new(RefCell::new(Viewer {
		state: GraphViewState::new(&config, fallback.0, fallback.1),
		animator: StepAnimator::new(
			WindowScheduler {
				callback: callback.clone(),
				pending: None,
			},
			config.step_delay_ms,
		),
		ctx: None,
	}));

	{
		let viewer = viewer.clone();
		*callback.borrow_mut() = Some(Closure::new(move |arg: JsValue| {
			let Some(raw) = arg.as_f64() else {
				return;
			};
			let mut v = viewer.borrow_mut();
			let Viewer {
				state,
				animator,
				ctx,
			} = &mut *v;
			let Some(ctx) = ctx.as_ref() else {
				return;
			};
			animator.tick(PlaybackHandle::from_raw(raw as u64), state, ctx);
			readouts.sync(&v);
		}));
	}

	let generate = {
		let (viewer, client) = (viewer.clone(), client.clone());
		move || {
			let request = GenerateRequest {
				num_nodes: num_nodes.get_untracked(),
				density: density.get_untracked(),
				directed: directed.get_untracked(),
				..GenerateRequest::default()
			};
			let ticket = {
				let mut v = viewer.borrow_mut();
				v.animator.invalidate();
				v.state.clear_graph();
				v.redraw();
				v.state
					.log_line(&format!("Generating graph... Nodes: {}", request.num_nodes));
				readouts.sync_graph(&v);
				v.state.requests.issue()
			};
			let (viewer, client) = (viewer.clone(), client.clone());
			spawn_local(async move {
				let result = client.generate_graph(&request).await;
				let mut v = viewer.borrow_mut();
				if !v.state.requests.is_current(ticket) {
					debug!("Dropping superseded graph response");
					return;
				}
				match result {
					Ok(graph) => {
						v.state.set_graph(graph);
						v.reset();
					}
					Err(e) => {
						error!("Graph generation failed: {}", e);
						v.state.log_line(&format!("Error: {}", e));
					}
				}
				readouts.sync_graph(&v);
			});
		}
	};

	let viewer_init = viewer.clone();
	let generate_init = generate.clone();
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		let (w, h) = canvas_size(&canvas, fallback);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx = match canvas.get_context("2d") {
			Ok(Some(obj)) => obj.dyn_into::<CanvasRenderingContext2d>().ok(),
			_ => None,
		};
		let Some(ctx) = ctx else {
			error!("Canvas 2D context unavailable");
			return;
		};
		{
			let mut v = viewer_init.borrow_mut();
			v.ctx = Some(ctx);
			v.state.resize(w, h);
			v.redraw();
		}

		generate_init();
	});

	let viewer_resize = viewer.clone();
	let resize_listener = window_event_listener(leptos::ev::resize, move |_| {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (nw, nh) = canvas_size(&canvas, fallback);
		canvas.set_width(nw as u32);
		canvas.set_height(nh as u32);
		let mut v = viewer_resize.borrow_mut();
		v.state.resize(nw, nh);
		v.redraw();
	});

	// The tick closure and the viewer hold each other; unmount breaks the cycle.
	let teardown = StoredValue::new_local((viewer.clone(), callback.clone()));
	on_cleanup(move || {
		resize_listener.remove();
		teardown.try_with_value(|(viewer, callback)| {
			if let Ok(mut v) = viewer.try_borrow_mut() {
				v.animator.invalidate();
				v.ctx = None;
			}
			callback.borrow_mut().take();
		});
		debug!("Simulator unmounted");
	});

	let run = {
		let (viewer, client) = (viewer.clone(), client.clone());
		move || {
			let algo = algorithm.get_untracked();
			let prepared = {
				let mut v = viewer.borrow_mut();
				v.animator.invalidate();
				let ready = match (&v.state.graph, v.state.start, v.state.end) {
					(Some(graph), Some(start), Some(end)) => Some((graph.clone(), start, end)),
					_ => None,
				};
				let Some((graph, start, end)) = ready else {
					v.state.log_line("No graph generated!");
					readouts.sync(&v);
					return;
				};
				v.state.log_line(&format!("Running {}...", algo));
				readouts.sync(&v);
				(graph, start, end, v.state.requests.issue())
			};
			let (viewer, client) = (viewer.clone(), client.clone());
			spawn_local(async move {
				let (graph, start, end, ticket) = prepared;
				let result = client.run_algorithm(algo, &graph, start, end).await;
				let mut v = viewer.borrow_mut();
				if !v.state.requests.is_current(ticket) {
					debug!("Dropping superseded {} response", algo);
					return;
				}
				match result {
					Ok(steps) => {
						v.animator.start(steps, Some(start), Some(end));
					}
					Err(VizError::EmptySteps) => {
						warn!("{} returned no steps", algo);
						v.state.log_line("No steps returned from algorithm.");
					}
					Err(e) => {
						error!("{} failed: {}", algo, e);
						v.state.log_line(&format!("Error: {}", e));
					}
				}
				readouts.sync(&v);
			});
		}
	};

	let on_reset = {
		let viewer = viewer.clone();
		move |_: MouseEvent| {
			let mut v = viewer.borrow_mut();
			v.reset();
			readouts.sync(&v);
		}
	};

	let on_speed = {
		let viewer = viewer.clone();
		move |ev: Event| {
			if let Ok(ms) = event_target_value(&ev).parse::<u32>() {
				viewer.borrow_mut().animator.set_delay(ms);
			}
		}
	};

	let pick_endpoint = {
		let viewer = viewer.clone();
		move |raw: String, is_start: bool| {
			let Ok(id) = raw.parse::<NodeId>() else {
				return;
			};
			let mut v = viewer.borrow_mut();
			let accepted = if is_start {
				v.state.set_start(id)
			} else {
				v.state.set_end(id)
			};
			if accepted && v.animator.state() != PlaybackState::Playing {
				v.reset();
			}
			readouts.sync_graph(&v);
		}
	};
	let pick_end = pick_endpoint.clone();

	let run_all = {
		let (viewer, client) = (viewer.clone(), client.clone());
		move |_: MouseEvent| {
			if comparing.get_untracked() {
				return;
			}
			let prepared = {
				let v = viewer.borrow();
				match (&v.state.graph, v.state.start, v.state.end) {
					(Some(graph), Some(start), Some(end)) => Some((graph.clone(), start, end)),
					_ => None,
				}
			};
			let Some((graph, start, end)) = prepared else {
				warn!("Run-all requested without a graph");
				return;
			};
			comparing.set(true);
			summaries.set(Vec::new());
			let client = client.clone();
			spawn_local(async move {
				for algo in Algorithm::ALL {
					let started = js_sys::Date::now();
					let summary = match client.run_algorithm(algo, &graph, start, end).await {
						Ok(steps) => RunSummary::from_steps(
							algo,
							&steps,
							end,
							js_sys::Date::now() - started,
						),
						Err(e) => {
							warn!("Comparison run of {} failed: {}", algo, e);
							RunSummary::failed(algo, &e)
						}
					};
					summaries.update(|s| s.push(summary));
				}
				comparing.set(false);
			});
		}
	};

	let view_code = {
		let client = client.clone();
		move |_: MouseEvent| {
			let algo = algorithm.get_untracked();
			source.set(Some("Loading source code...".to_string()));
			let client = client.clone();
			spawn_local(async move {
				let text = match client.algorithm_code(algo).await {
					Ok(listing) => listing.code,
					Err(e) => {
						warn!("Could not load {} source: {}", algo, e);
						format!("Failed to fetch code: {}", e)
					}
				};
				source.set(Some(text));
			});
		}
	};

	let default_delay = config.step_delay_ms;

	view! {
		<div class="simulator">
			<aside class="controls">
				<h2>"Graph"</h2>
				<label>"Nodes: " {move || num_nodes.get()}</label>
				<input
					type="range"
					min="3"
					max="60"
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
				<button on:click=move |_| generate()>"Generate Graph"</button>

				<h2>"Algorithm"</h2>
				<select on:change=move |ev| {
					if let Ok(a) = event_target_value(&ev).parse::<Algorithm>() {
						algorithm.set(a);
					}
				}>
					{Algorithm::ALL
						.into_iter()
						.map(|a| view! { <option value=a.as_str()>{a.as_str()}</option> })
						.collect_view()}
				</select>
				<label>"Start"</label>
				<select
					prop:value=move || fmt_id(readouts.start.get())
					on:change=move |ev| pick_endpoint(event_target_value(&ev), true)
				>
					{move || {
						readouts
							.node_ids
							.get()
							.into_iter()
							.map(|id| view! { <option value=id.to_string()>{id}</option> })
							.collect_view()
					}}
				</select>
				<label>"End"</label>
				<select
					prop:value=move || fmt_id(readouts.end.get())
					on:change=move |ev| pick_end(event_target_value(&ev), false)
				>
					{move || {
						readouts
							.node_ids
							.get()
							.into_iter()
							.map(|id| view! { <option value=id.to_string()>{id}</option> })
							.collect_view()
					}}
				</select>
				<label>"Speed"</label>
				<select on:change=on_speed>
					{SPEED_PRESETS
						.iter()
						.map(|&(name, ms)| {
							view! {
								<option value=ms.to_string() selected={ms == default_delay}>
									{name}
								</option>
							}
						})
						.collect_view()}
				</select>
				<button on:click=move |_| run()>"Run"</button>
				<button on:click=on_reset>"Reset"</button>
				<button on:click=run_all prop:disabled=move || comparing.get()>
					"Compare All"
				</button>
				<button on:click=view_code>"View Code"</button>
			</aside>

			<main class="canvas-area">
				<canvas node_ref=canvas_ref class="graph-canvas" style="display: block;" />
			</main>

			<section class="readouts">
				<p>"Status: " {move || readouts.status.get().status.to_string()}</p>
				<p>"Visited: " {move || readouts.status.get().visited_count}</p>
				<p>"Path cost: " {move || readouts.status.get().path_cost}</p>
				<p>"Nodes: " {move || readouts.status.get().node_count}</p>
			</section>

			<section class="activity-log">
				<ul>
					{move || {
						readouts
							.activity
							.get()
							.into_iter()
							.map(|line| view! { <li>{line}</li> })
							.collect_view()
					}}
				</ul>
			</section>

			{move || {
				let cards = summaries.get();
				(comparing.get() || !cards.is_empty())
					.then(|| {
						view! {
							<section class="comparison">
								{comparing.get().then(|| view! { <p>"Comparing algorithms..."</p> })}
								{cards
									.into_iter()
									.map(|card| {
										let body = match &card.outcome {
											Ok(figures) => {
												format!(
													"Cost: {} | Expanded: {} | Time: {:.1} ms",
													figures.cost_label(),
													figures.nodes_expanded,
													figures.elapsed_ms,
												)
											}
											Err(message) => message.clone(),
										};
										view! {
											<div class="result-card">
												<h3>{card.algorithm.as_str()}</h3>
												<p>{body}</p>
											</div>
										}
									})
									.collect_view()}
							</section>
						}
					})
			}}

			{move || {
				source
					.get()
					.map(|code| {
						view! {
							<section class="code-panel">
								<button on:click=move |_| source.set(None)>"Close"</button>
								<pre class="code">{code}</pre>
							</section>
						}
					})
			}}
		</div>
	}
}
