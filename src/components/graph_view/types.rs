use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::VizError;

/// Node identifier as assigned by the compute service.
pub type NodeId = u32;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
	pub id: NodeId,
	pub x: f64,
	pub y: f64,
	/// Derived from `x` by the normalizer; never fed back into it.
	#[serde(skip)]
	pub canvas_x: f64,
	#[serde(skip)]
	pub canvas_y: f64,
}

impl GraphNode {
	pub fn new(id: NodeId, x: f64, y: f64) -> Self {
		Self {
			id,
			x,
			y,
			canvas_x: 0.0,
			canvas_y: 0.0,
		}
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
	pub source: NodeId,
	pub target: NodeId,
	pub weight: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<GraphEdge>,
	#[serde(default)]
	pub directed: bool,
}

impl Graph {
	pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
		self.nodes.iter().find(|n| n.id == id)
	}

	pub fn contains(&self, id: NodeId) -> bool {
		self.node(id).is_some()
	}

	/// Orders nodes by id so selectors and defaults are stable.
	pub fn sort_nodes(&mut self) {
		self.nodes.sort_by_key(|n| n.id);
	}

	/// Checks that ids are unique and every edge endpoint exists.
	pub fn validate(&self) -> Result<(), VizError> {
		let mut ids = BTreeSet::new();
		for node in &self.nodes {
			if !ids.insert(node.id) {
				return Err(VizError::invalid(format!("duplicate node id {}", node.id)));
			}
		}
		for edge in &self.edges {
			if !ids.contains(&edge.source) || !ids.contains(&edge.target) {
				return Err(VizError::invalid(format!(
					"edge {} -> {} references a missing node",
					edge.source, edge.target
				)));
			}
			if edge.weight.is_nan() || edge.weight < 0.0 {
				return Err(VizError::invalid(format!(
					"edge {} -> {} has negative weight {}",
					edge.source, edge.target, edge.weight
				)));
			}
		}
		Ok(())
	}
}

/// Tentative distance of a node at some step of a search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Distance {
	Finite(f64),
	Unreachable,
}

impl Distance {
	pub fn finite(self) -> Option<f64> {
		match self {
			Distance::Finite(d) => Some(d),
			Distance::Unreachable => None,
		}
	}

	pub fn is_unreachable(self) -> bool {
		matches!(self, Distance::Unreachable)
	}
}

impl From<f64> for Distance {
	fn from(value: f64) -> Self {
		if value.is_finite() {
			Distance::Finite(value)
		} else {
			Distance::Unreachable
		}
	}
}

impl fmt::Display for Distance {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Distance::Finite(d) => write!(f, "{:.0}", d.round()),
			Distance::Unreachable => f.write_str("∞"),
		}
	}
}

impl Serialize for Distance {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Distance::Finite(d) => serializer.serialize_f64(*d),
			Distance::Unreachable => serializer.serialize_str("Infinity"),
		}
	}
}

impl<'de> Deserialize<'de> for Distance {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		deserializer.deserialize_any(DistanceVisitor)
	}
}

struct DistanceVisitor;

impl<'de> Visitor<'de> for DistanceVisitor {
	type Value = Distance;

	fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("a number, \"Infinity\" or null")
	}

	fn visit_f64<E: de::Error>(self, v: f64) -> Result<Distance, E> {
		Ok(Distance::from(v))
	}

	fn visit_i64<E: de::Error>(self, v: i64) -> Result<Distance, E> {
		Ok(Distance::Finite(v as f64))
	}

	fn visit_u64<E: de::Error>(self, v: u64) -> Result<Distance, E> {
		Ok(Distance::Finite(v as f64))
	}

	fn visit_str<E: de::Error>(self, v: &str) -> Result<Distance, E> {
		match v.to_ascii_lowercase().as_str() {
			"infinity" | "inf" | "+inf" | "nan" => Ok(Distance::Unreachable),
			other => other
				.parse::<f64>()
				.map(Distance::from)
				.map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self)),
		}
	}

	fn visit_unit<E: de::Error>(self) -> Result<Distance, E> {
		Ok(Distance::Unreachable)
	}

	fn visit_none<E: de::Error>(self) -> Result<Distance, E> {
		Ok(Distance::Unreachable)
	}
}

/// One immutable snapshot of a search in progress.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Step {
	/// Position in the run; not sent by the service, assigned on receipt.
	#[serde(skip)]
	pub index: usize,
	#[serde(default)]
	pub current_node: Option<NodeId>,
	#[serde(default)]
	pub frontier: BTreeSet<NodeId>,
	#[serde(default)]
	pub visited: BTreeSet<NodeId>,
	#[serde(default)]
	pub distances: BTreeMap<NodeId, Distance>,
	#[serde(default)]
	pub parents: BTreeMap<NodeId, Option<NodeId>>,
	#[serde(default)]
	pub description: String,
}

impl Step {
	pub fn distance(&self, id: NodeId) -> Option<Distance> {
		self.distances.get(&id).copied()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn decodes_a_service_step() {
		let json = r#"{
			"visited": [0, 1],
			"frontier": [2],
			"current_node": 1,
			"distances": {"0": 0, "1": 3.5, "2": "Infinity"},
			"parents": {"0": null, "1": 0, "2": null},
			"description": "Processing node 1 (Distance: 3.5)"
		}"#;
		let step: Step = serde_json::from_str(json).unwrap();
		assert_eq!(step.current_node, Some(1));
		assert_eq!(step.distance(1), Some(Distance::Finite(3.5)));
		assert_eq!(step.distance(2), Some(Distance::Unreachable));
		assert_eq!(step.parents.get(&1), Some(&Some(0)));
		assert_eq!(step.parents.get(&0), Some(&None));
		assert!(step.frontier.contains(&2));
	}

	#[test]
	fn step_fields_default_when_missing() {
		let step: Step = serde_json::from_str(r#"{"description": "done"}"#).unwrap();
		assert!(step.current_node.is_none());
		assert!(step.visited.is_empty());
		assert!(step.parents.is_empty());
	}

	#[test]
	fn distance_display_rounds_to_integer() {
		assert_eq!(Distance::Finite(7.6).to_string(), "8");
		assert_eq!(Distance::Finite(2.5).to_string(), "3");
		assert_eq!(Distance::Finite(0.5).to_string(), "1");
		assert_eq!(Distance::Unreachable.to_string(), "∞");
		assert_eq!(serde_json::to_string(&Distance::Unreachable).unwrap(), r#""Infinity""#);
	}

	#[test]
	fn graph_decodes_without_canvas_fields() {
		let json = r#"{
			"nodes": [{"id": 0, "x": 0.1, "y": 0.9}, {"id": 1, "x": 0.5, "y": 0.2}],
			"edges": [{"source": 0, "target": 1, "weight": 4}],
			"directed": true
		}"#;
		let graph: Graph = serde_json::from_str(json).unwrap();
		assert!(graph.directed);
		assert_eq!(graph.nodes[1], GraphNode::new(1, 0.5, 0.2));
		assert!(graph.validate().is_ok());
	}

	#[test]
	fn validate_rejects_dangling_edges() {
		let graph = Graph {
			nodes: vec![GraphNode::new(0, 0.0, 0.0)],
			edges: vec![GraphEdge {
				source: 0,
				target: 7,
				weight: 1.0,
			}],
			directed: false,
		};
		assert!(matches!(graph.validate(), Err(VizError::InvalidRequest(_))));
	}
}
