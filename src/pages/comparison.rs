use leptos::prelude::*;

use crate::components::stats::BatchComparison;

/// Batch comparison page
#[component]
pub fn Comparison() -> impl IntoView {
	view! {
		<div class="page comparison-page">
			<h1>"Algorithm Comparison"</h1>
			<p class="subtitle">
				"Runs every selected algorithm over a batch of random graphs and averages the results."
			</p>
			<BatchComparison />
		</div>
	}
}
