mod aggregate;
mod chart;
mod component;

pub use aggregate::{
	AlgorithmStat, BatchAggregator, BatchResponse, BatchTrial, TrialResult, placeholder_stats,
	sort_canonical,
};
pub use chart::{BarChart, render_bar_chart};
pub use component::BatchComparison;
