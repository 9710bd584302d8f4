use crate::components::graph_view::Surface;

use super::aggregate::AlgorithmStat;

const BACKGROUND: &str = "#000000";
const AXIS: &str = "#FFFFFF";
const MARGIN: f64 = 30.0;
const LABEL_BAND: f64 = 24.0;

/// A single-series bar chart, one bar per algorithm.
#[derive(Clone, Debug, PartialEq)]
pub struct BarChart {
	pub title: String,
	pub color: &'static str,
	pub bars: Vec<(String, f64)>,
}

impl BarChart {
	pub fn average_cost(stats: &[AlgorithmStat]) -> Self {
		Self {
			title: "Avg Path Cost".to_string(),
			color: "#FFFF00",
			bars: stats.iter().map(|s| (s.name.clone(), s.average_cost)).collect(),
		}
	}

	pub fn average_time_ms(stats: &[AlgorithmStat]) -> Self {
		Self {
			title: "Avg Time (ms)".to_string(),
			color: "#1919A6",
			bars: stats
				.iter()
				.map(|s| (s.name.clone(), s.average_time_seconds * 1000.0))
				.collect(),
		}
	}

	fn max_value(&self) -> f64 {
		self.bars
			.iter()
			.map(|(_, v)| *v)
			.filter(|v| v.is_finite())
			.fold(0.0, f64::max)
	}
}

pub fn render_bar_chart<S: Surface + ?Sized>(surface: &S, chart: &BarChart, width: f64, height: f64) {
	surface.set_fill_style(BACKGROUND);
	surface.fill_rect(0.0, 0.0, width, height);

	surface.set_fill_style(AXIS);
	surface.set_font("12px Roboto Mono");
	surface.set_text_align("center");
	surface.set_text_baseline("middle");
	surface.fill_text(&chart.title, width / 2.0, MARGIN / 2.0);

	let baseline = height - MARGIN - LABEL_BAND;
	let plot_height = (baseline - MARGIN).max(0.0);
	surface.set_stroke_style(AXIS);
	surface.set_line_width(1.0);
	surface.begin_path();
	surface.move_to(MARGIN, baseline);
	surface.line_to(width - MARGIN, baseline);
	surface.stroke();

	if chart.bars.is_empty() {
		return;
	}
	let max = chart.max_value();
	let slot = (width - 2.0 * MARGIN) / chart.bars.len() as f64;
	let bar_width = slot * 0.6;

	for (i, (label, value)) in chart.bars.iter().enumerate() {
		let bar_height = if max > 0.0 && value.is_finite() {
			value / max * plot_height
		} else {
			0.0
		};
		let x = MARGIN + slot * i as f64 + (slot - bar_width) / 2.0;
		let center = x + bar_width / 2.0;

		surface.set_fill_style(chart.color);
		surface.fill_rect(x, baseline - bar_height, bar_width, bar_height);

		surface.set_fill_style(AXIS);
		surface.set_font("10px Roboto Mono");
		surface.fill_text(&format!("{:.2}", value), center, baseline - bar_height - 8.0);
		surface.fill_text(label, center, baseline + LABEL_BAND / 2.0);
	}
}
