//! The closed set of shortest-path algorithms the compute service knows how to run.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VizError;

/// A shortest-path algorithm, in canonical display order.
#[derive(
	Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Algorithm {
	/// Dijkstra's algorithm.
	#[default]
	Dijkstra,
	/// Bellman-Ford.
	#[serde(rename = "Bellman-Ford")]
	BellmanFord,
	/// Floyd-Warshall.
	#[serde(rename = "Floyd-Warshall")]
	FloydWarshall,
	/// Uniform Cost Search.
	#[serde(rename = "Uniform Cost Search")]
	UniformCostSearch,
	/// A* search.
	#[serde(rename = "A*")]
	AStar,
}

impl Algorithm {
	/// Every algorithm, in canonical order.
	pub const ALL: [Algorithm; 5] = [
		Algorithm::Dijkstra,
		Algorithm::BellmanFord,
		Algorithm::FloydWarshall,
		Algorithm::UniformCostSearch,
		Algorithm::AStar,
	];

	/// Name used on the wire and in the UI.
	pub fn as_str(self) -> &'static str {
		match self {
			Algorithm::Dijkstra => "Dijkstra",
			Algorithm::BellmanFord => "Bellman-Ford",
			Algorithm::FloydWarshall => "Floyd-Warshall",
			Algorithm::UniformCostSearch => "Uniform Cost Search",
			Algorithm::AStar => "A*",
		}
	}

	/// Position in the canonical order, or `None` for names outside the closed set.
	pub fn canonical_rank(name: &str) -> Option<usize> {
		Self::ALL.iter().position(|a| a.as_str() == name)
	}
}

impl fmt::Display for Algorithm {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Algorithm {
	type Err = VizError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|a| a.as_str() == s)
			.ok_or_else(|| VizError::UnknownAlgorithm(s.to_string()))
	}
}
