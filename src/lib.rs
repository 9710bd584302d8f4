//! Leptos client-side app that replays shortest-path runs on a canvas and
//! compares algorithms over batches of generated graphs.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Modules
pub mod algorithm;
pub mod api;
pub mod components;
pub mod config;
pub mod error;
mod pages;

// Top-Level pages
use crate::config::VizConfig;
use crate::pages::comparison::Comparison;
use crate::pages::not_found::NotFound;
use crate::pages::simulator::Simulator;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// An app router with the simulator, the batch comparison and a 404 page.
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();
	provide_context(VizConfig::from_env());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />

		<Title text="Shortest Path Visualizer" />

		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<nav class="top-nav">
				<A href="/">"Simulator"</A>
				<A href="/compare">"Comparison"</A>
			</nav>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Simulator />
				<Route path=path!("/compare") view=Comparison />
			</Routes>
		</Router>
	}
}
