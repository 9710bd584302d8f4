//! Runtime configuration for the visualizer.

use log::debug;

/// Fallback service address when neither the build nor the page provides one.
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";

/// Named animation delays offered in the speed selector.
pub const SPEED_PRESETS: &[(&str, u32)] = &[("Slow", 500), ("Normal", 100), ("Fast", 25)];

/// Visual and network settings shared by every view.
#[derive(Clone, Debug, PartialEq)]
pub struct VizConfig {
	/// Base URL of the compute service, without a trailing slash.
	pub api_base: String,
	/// Margin kept free on every side of the canvas.
	pub padding: f64,
	/// Radius of an ordinary node marker.
	pub node_radius: f64,
	/// Delay between animation frames, in milliseconds.
	pub step_delay_ms: u32,
	/// Lines kept in the in-page activity log.
	pub log_capacity: usize,
	pub fallback_width: f64,
	pub fallback_height: f64,
}

impl Default for VizConfig {
	fn default() -> Self {
		Self {
			api_base: DEFAULT_API_BASE.to_string(),
			padding: 50.0,
			node_radius: 15.0,
			step_delay_ms: 100,
			log_capacity: 200,
			fallback_width: 800.0,
			fallback_height: 600.0,
		}
	}
}

impl VizConfig {
	/// Resolves the service address: `PATHVIZ_API_BASE` at build time, then the
	/// page origin, then [`DEFAULT_API_BASE`].
	pub fn from_env() -> Self {
		let api_base = option_env!("PATHVIZ_API_BASE")
			.map(str::to_string)
			.or_else(page_origin)
			.unwrap_or_else(|| DEFAULT_API_BASE.to_string());
		debug!("Using compute service at {}", api_base);
		Self::default().with_api_base(api_base)
	}

	pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
		self.api_base = base.into().trim_end_matches('/').to_string();
		self
	}
}

fn page_origin() -> Option<String> {
	if !cfg!(target_arch = "wasm32") {
		return None;
	}
	web_sys::window()
		.and_then(|w| w.location().origin().ok())
		.filter(|origin| origin.starts_with("http"))
}
