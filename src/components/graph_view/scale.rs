//! Maps service coordinates into canvas pixel space.

use super::types::Graph;

/// Min/max of one axis; a zero-width extent is widened to 1.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Extent {
	min: f64,
	range: f64,
}

impl Extent {
	fn of(values: impl Iterator<Item = f64>) -> Option<Self> {
		let (min, max) = values.fold(None, |acc: Option<(f64, f64)>, v| match acc {
			None => Some((v, v)),
			Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
		})?;
		let range = max - min;
		Some(Self {
			min,
			range: if range > 0.0 { range } else { 1.0 },
		})
	}

	fn project(&self, value: f64, span: f64, padding: f64) -> f64 {
		(value - self.min) / self.range * span + padding
	}
}

/// Writes `canvas_x`/`canvas_y` for every node so that the coordinate bounds
/// land on `padding` and `size - padding`. Axes scale independently.
///
/// Only the original `x`/`y` are read, so calling this on every resize never
/// drifts.
pub fn normalize(graph: &mut Graph, width: f64, height: f64, padding: f64) {
	let (Some(ex), Some(ey)) = (
		Extent::of(graph.nodes.iter().map(|n| n.x)),
		Extent::of(graph.nodes.iter().map(|n| n.y)),
	) else {
		return;
	};
	let (span_x, span_y) = (width - 2.0 * padding, height - 2.0 * padding);

	for node in &mut graph.nodes {
		node.canvas_x = ex.project(node.x, span_x, padding);
		node.canvas_y = ey.project(node.y, span_y, padding);
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;
	use crate::components::graph_view::types::GraphNode;

	fn graph_of(points: &[(f64, f64)]) -> Graph {
		Graph {
			nodes: points
				.iter()
				.enumerate()
				.map(|(i, &(x, y))| GraphNode::new(i as u32, x, y))
				.collect(),
			..Graph::default()
		}
	}

	#[test]
	fn bounds_map_to_padding_edges() {
		let mut graph = graph_of(&[(0.0, 10.0), (5.0, 20.0), (10.0, 30.0)]);
		normalize(&mut graph, 500.0, 300.0, 50.0);

		assert_eq!(graph.nodes[0].canvas_x, 50.0);
		assert_eq!(graph.nodes[2].canvas_x, 450.0);
		assert_eq!(graph.nodes[1].canvas_x, 250.0);
		assert_eq!(graph.nodes[0].canvas_y, 50.0);
		assert_eq!(graph.nodes[2].canvas_y, 250.0);
	}

	#[test]
	fn single_column_collapses_to_padding() {
		let mut graph = graph_of(&[(3.0, 0.0), (3.0, 1.0), (3.0, 2.0)]);
		normalize(&mut graph, 400.0, 400.0, 50.0);

		for node in &graph.nodes {
			assert_eq!(node.canvas_x, 50.0);
			assert!(node.canvas_y.is_finite());
		}
	}

	#[test]
	fn empty_graph_is_a_no_op() {
		let mut graph = Graph::default();
		normalize(&mut graph, 400.0, 400.0, 50.0);
		assert!(graph.nodes.is_empty());
	}

	#[test]
	fn repeated_resizes_do_not_drift() {
		let mut graph = graph_of(&[(0.0, 0.0), (1.0, 4.0), (2.0, 2.0)]);
		normalize(&mut graph, 800.0, 600.0, 50.0);
		let first: Vec<_> = graph.nodes.iter().map(|n| (n.canvas_x, n.canvas_y)).collect();

		normalize(&mut graph, 200.0, 150.0, 50.0);
		normalize(&mut graph, 1920.0, 1080.0, 50.0);
		normalize(&mut graph, 800.0, 600.0, 50.0);
		let again: Vec<_> = graph.nodes.iter().map(|n| (n.canvas_x, n.canvas_y)).collect();

		assert_eq!(first, again);
	}

	proptest! {
		#[test]
		fn extremes_hit_the_padding_lines(
			xs in prop::collection::vec(-1.0e6f64..1.0e6, 2..40),
			width in 200.0f64..2000.0,
			height in 200.0f64..2000.0,
		) {
			let points: Vec<_> = xs.iter().map(|&x| (x, -x)).collect();
			let mut graph = graph_of(&points);
			normalize(&mut graph, width, height, 50.0);

			let min_x = xs.iter().copied().fold(f64::INFINITY, f64::min);
			let max_x = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
			for node in &graph.nodes {
				prop_assert!(node.canvas_x.is_finite());
				if node.x == min_x {
					prop_assert!((node.canvas_x - 50.0).abs() < 1e-6);
				}
				if node.x == max_x && max_x > min_x {
					prop_assert!((node.canvas_x - (width - 50.0)).abs() < 1e-6);
				}
			}
		}
	}
}
