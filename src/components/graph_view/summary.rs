use crate::algorithm::Algorithm;
use crate::error::VizError;

use super::types::{Distance, NodeId, Step};

/// Result card for one algorithm in a run-all comparison.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
	pub algorithm: Algorithm,
	pub outcome: Result<RunFigures, String>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunFigures {
	pub cost: Distance,
	pub nodes_expanded: usize,
	pub elapsed_ms: f64,
}

impl RunFigures {
	pub fn cost_label(&self) -> String {
		match self.cost {
			Distance::Finite(c) => format!("{:.1}", c),
			Distance::Unreachable => "∞".to_string(),
		}
	}
}

impl RunSummary {
	/// Reads cost and expansion count off the last step of a run.
	pub fn from_steps(algorithm: Algorithm, steps: &[Step], end: NodeId, elapsed_ms: f64) -> Self {
		let outcome = match steps.last() {
			Some(last) => Ok(RunFigures {
				cost: last.distance(end).unwrap_or(Distance::Unreachable),
				nodes_expanded: last.visited.len(),
				elapsed_ms,
			}),
			None => Err(VizError::EmptySteps.to_string()),
		};
		Self { algorithm, outcome }
	}

	pub fn failed(algorithm: Algorithm, error: &VizError) -> Self {
		Self {
			algorithm,
			outcome: Err(format!("Error running {}: {}", algorithm, error)),
		}
	}
}

#[cfg(test)]
mod tests {
	use std::collections::BTreeMap;

	use super::*;

	#[test]
	fn figures_come_from_the_last_step() {
		let steps = vec![
			Step::default(),
			Step {
				visited: [0, 1, 3].into(),
				distances: BTreeMap::from([(3, Distance::Finite(12.34))]),
				..Step::default()
			},
		];
		let summary = RunSummary::from_steps(Algorithm::Dijkstra, &steps, 3, 41.0);
		let figures = summary.outcome.unwrap();
		assert_eq!(figures.nodes_expanded, 3);
		assert_eq!(figures.cost_label(), "12.3");
		assert_eq!(figures.elapsed_ms, 41.0);
	}

	#[test]
	fn missing_end_distance_reads_as_unreachable() {
		let summary = RunSummary::from_steps(Algorithm::AStar, &[Step::default()], 9, 1.0);
		assert_eq!(summary.outcome.unwrap().cost_label(), "∞");
	}

	#[test]
	fn failures_name_the_algorithm() {
		let summary = RunSummary::failed(Algorithm::BellmanFord, &VizError::EmptySteps);
		assert_eq!(
			summary.outcome.unwrap_err(),
			"Error running Bellman-Ford: no steps returned from algorithm"
		);
	}
}
