use leptos::prelude::*;

use crate::components::graph_view::PathSimulator;

/// Single-graph simulator page
#[component]
pub fn Simulator() -> impl IntoView {
	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>
			<div class="page simulator-page">
				<h1>"Shortest Path Visualizer"</h1>
				<PathSimulator />
			</div>
		</ErrorBoundary>
	}
}
