//! Reduction of batch trials into per-algorithm averages.

use std::fmt;

use log::{debug, warn};
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

use crate::algorithm::Algorithm;
use crate::components::graph_view::Distance;
use crate::error::VizError;

/// One algorithm's result on one generated graph.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TrialResult {
	pub success: bool,
	#[serde(default = "unreachable_cost")]
	pub cost: Distance,
	#[serde(rename = "visited", default)]
	pub visited_count: u64,
	#[serde(rename = "time", default)]
	pub time_millis: f64,
	#[serde(default)]
	pub error: Option<String>,
}

fn unreachable_cost() -> Distance {
	Distance::Unreachable
}

/// All algorithms' results on one generated graph, in the order the service
/// listed them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchTrial {
	pub results: Vec<(String, TrialResult)>,
}

impl<'de> Deserialize<'de> for BatchTrial {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		deserializer.deserialize_map(TrialVisitor)
	}
}

struct TrialVisitor;

impl<'de> Visitor<'de> for TrialVisitor {
	type Value = BatchTrial;

	fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("a map from algorithm name to trial result")
	}

	fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<BatchTrial, A::Error> {
		let mut results = Vec::with_capacity(map.size_hint().unwrap_or(0));
		while let Some((name, result)) = map.next_entry::<String, TrialResult>()? {
			results.push((name, result));
		}
		Ok(BatchTrial { results })
	}
}

/// Summary row for one algorithm. Averages cover successful trials only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmStat {
	#[serde(rename = "algorithm")]
	pub name: String,
	pub success_rate: f64,
	#[serde(rename = "avg_cost")]
	pub average_cost: f64,
	#[serde(rename = "avg_nodes")]
	pub average_visited_count: f64,
	#[serde(rename = "avg_time")]
	pub average_time_seconds: f64,
}

impl AlgorithmStat {
	/// Cells for one comparison table row: name, success rate, average cost,
	/// average nodes visited, average time.
	pub fn table_cells(&self) -> [String; 5] {
		[
			self.name.clone(),
			format!("{:.0}%", self.success_rate * 100.0),
			format!("{:.2}", self.average_cost),
			format!("{:.2}", self.average_visited_count),
			format!("{:.2} ms", self.average_time_seconds * 1000.0),
		]
	}

	fn zeroed(name: &str) -> Self {
		Self {
			name: name.to_string(),
			success_rate: 0.0,
			average_cost: 0.0,
			average_visited_count: 0.0,
			average_time_seconds: 0.0,
		}
	}
}

/// Rows shown before any batch has run: every algorithm at zero.
pub fn placeholder_stats() -> Vec<AlgorithmStat> {
	Algorithm::ALL
		.iter()
		.map(|a| AlgorithmStat::zeroed(a.as_str()))
		.collect()
}

/// Stable sort into canonical algorithm order; unknown names go last in
/// their existing order.
pub fn sort_canonical(stats: &mut [AlgorithmStat]) {
	stats.sort_by_key(|s| Algorithm::canonical_rank(&s.name).unwrap_or(usize::MAX));
}

/// The two response shapes `/api/batch-run` is known to produce, told apart
/// once here.
#[derive(Clone, Debug, PartialEq)]
pub enum BatchResponse {
	/// Raw per-graph results that still need reducing.
	Trials(Vec<BatchTrial>),
	/// Statistics the service already reduced.
	Aggregated(Vec<AlgorithmStat>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBatch {
	Trials(Vec<BatchTrial>),
	Aggregated { stats: Vec<AlgorithmStat> },
}

impl BatchResponse {
	/// Decodes a batch body. Valid JSON of any other shape is
	/// [`VizError::UnsupportedShape`].
	pub fn from_json(body: &str) -> Result<Self, VizError> {
		match serde_json::from_str::<RawBatch>(body) {
			Ok(RawBatch::Trials(trials)) => Ok(BatchResponse::Trials(trials)),
			Ok(RawBatch::Aggregated { stats }) => Ok(BatchResponse::Aggregated(stats)),
			Err(e) if e.is_data() => {
				warn!("Unrecognised batch response: {}", e);
				Err(VizError::UnsupportedShape)
			}
			Err(e) => Err(VizError::Malformed(e)),
		}
	}

	/// Final rows in canonical order. Pre-aggregated stats are passed through
	/// untouched apart from ordering.
	pub fn into_stats(self) -> Vec<AlgorithmStat> {
		match self {
			BatchResponse::Trials(trials) => {
				let mut aggregator = BatchAggregator::new();
				trials.iter().for_each(|t| aggregator.push(t));
				aggregator.finish()
			}
			BatchResponse::Aggregated(mut stats) => {
				sort_canonical(&mut stats);
				stats
			}
		}
	}
}

#[derive(Clone, Debug, Default)]
struct Tally {
	name: String,
	attempts: u64,
	successes: u64,
	cost_sum: f64,
	visited_sum: f64,
	time_millis_sum: f64,
}

impl Tally {
	fn reduce(&self) -> AlgorithmStat {
		if self.successes == 0 {
			return AlgorithmStat::zeroed(&self.name);
		}
		let n = self.successes as f64;
		AlgorithmStat {
			name: self.name.clone(),
			success_rate: n / self.attempts as f64,
			average_cost: self.cost_sum / n,
			average_visited_count: self.visited_sum / n,
			average_time_seconds: self.time_millis_sum / n / 1000.0,
		}
	}
}

/// Streams batch trials into per-algorithm tallies.
#[derive(Clone, Debug, Default)]
pub struct BatchAggregator {
	tallies: Vec<Tally>,
	trials: usize,
}

impl BatchAggregator {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn trials(&self) -> usize {
		self.trials
	}

	/// Every algorithm listed in `trial` counts one attempt. A success whose
	/// cost is not finite is counted as a failure.
	pub fn push(&mut self, trial: &BatchTrial) {
		self.trials += 1;
		for (name, result) in &trial.results {
			let tally = match self.tallies.iter().position(|t| &t.name == name) {
				Some(i) => &mut self.tallies[i],
				None => {
					self.tallies.push(Tally {
						name: name.clone(),
						..Tally::default()
					});
					let last = self.tallies.len() - 1;
					&mut self.tallies[last]
				}
			};
			tally.attempts += 1;

			if let Some(error) = &result.error {
				debug!("{} failed in trial {}: {}", name, self.trials, error);
			}
			let cost = match (result.success, result.cost.finite()) {
				(true, Some(cost)) => cost,
				_ => continue,
			};
			tally.successes += 1;
			tally.cost_sum += cost;
			tally.visited_sum += result.visited_count as f64;
			tally.time_millis_sum += result.time_millis;
		}
	}

	/// Per-algorithm statistics, in canonical order.
	pub fn finish(&self) -> Vec<AlgorithmStat> {
		let mut stats: Vec<AlgorithmStat> = self.tallies.iter().map(Tally::reduce).collect();
		sort_canonical(&mut stats);
		stats
	}
}
