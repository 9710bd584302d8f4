use std::collections::{BTreeMap, HashSet};

use super::types::{GraphEdge, NodeId};

/// Directed `(parent, child)` pairs on the path reconstructed for one step.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PathEdges {
	pairs: HashSet<(NodeId, NodeId)>,
}

impl PathEdges {
	pub fn is_empty(&self) -> bool {
		self.pairs.is_empty()
	}

	pub fn len(&self) -> usize {
		self.pairs.len()
	}

	pub fn contains_pair(&self, from: NodeId, to: NodeId) -> bool {
		self.pairs.contains(&(from, to))
	}

	/// Whether `edge` lies on the path. Undirected graphs also accept the
	/// edge stored in the opposite direction.
	pub fn covers(&self, edge: &GraphEdge, directed: bool) -> bool {
		self.contains_pair(edge.source, edge.target)
			|| (!directed && self.contains_pair(edge.target, edge.source))
	}
}

/// Walks the parent map from `end` back to `start`.
///
/// Yields nothing unless the walk actually reaches `start` within
/// `node_count` hops, so a step that has not found the goal yet, or a
/// corrupt cyclic parent map, highlights no path.
pub fn reconstruct(
	parents: &BTreeMap<NodeId, Option<NodeId>>,
	start: Option<NodeId>,
	end: Option<NodeId>,
	node_count: usize,
) -> PathEdges {
	let (Some(start), Some(end)) = (start, end) else {
		return PathEdges::default();
	};

	let mut pairs = HashSet::new();
	let mut current = end;
	for _ in 0..node_count {
		if current == start {
			return PathEdges { pairs };
		}
		let Some(&Some(parent)) = parents.get(&current) else {
			break;
		};
		if parent == current {
			break;
		}
		pairs.insert((parent, current));
		current = parent;
	}

	if current == start {
		PathEdges { pairs }
	} else {
		PathEdges::default()
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;

	fn parents(entries: &[(NodeId, Option<NodeId>)]) -> BTreeMap<NodeId, Option<NodeId>> {
		entries.iter().copied().collect()
	}

	#[test]
	fn follows_the_chain_back_to_start() {
		let map = parents(&[(0, None), (1, Some(0)), (2, Some(1)), (3, Some(2))]);
		let path = reconstruct(&map, Some(0), Some(3), 4);

		assert_eq!(path.len(), 3);
		assert!(path.contains_pair(0, 1));
		assert!(path.contains_pair(1, 2));
		assert!(path.contains_pair(2, 3));
	}

	#[test]
	fn empty_when_end_has_no_parent_yet() {
		let map = parents(&[(0, None), (1, Some(0)), (3, None)]);
		assert!(reconstruct(&map, Some(0), Some(3), 4).is_empty());

		let map = parents(&[(0, None)]);
		assert!(reconstruct(&map, Some(0), Some(3), 4).is_empty());
	}

	#[test]
	fn empty_when_start_or_end_unset() {
		let map = parents(&[(1, Some(0))]);
		assert!(reconstruct(&map, None, Some(1), 2).is_empty());
		assert!(reconstruct(&map, Some(0), None, 2).is_empty());
	}

	#[test]
	fn chain_that_stops_short_of_start_is_not_highlighted() {
		let map = parents(&[(2, Some(1)), (1, None)]);
		assert!(reconstruct(&map, Some(0), Some(2), 3).is_empty());
	}

	#[test]
	fn self_parent_stops_the_walk() {
		let map = parents(&[(2, Some(2))]);
		assert!(reconstruct(&map, Some(0), Some(2), 3).is_empty());
	}

	#[test]
	fn cyclic_map_terminates_empty() {
		let map = parents(&[(1, Some(2)), (2, Some(3)), (3, Some(1))]);
		assert!(reconstruct(&map, Some(0), Some(1), 4).is_empty());
	}

	#[test]
	fn start_equal_to_end_has_no_edges() {
		let map = parents(&[(0, None)]);
		assert!(reconstruct(&map, Some(0), Some(0), 1).is_empty());
	}

	#[test]
	fn undirected_edges_match_in_reverse() {
		let map = parents(&[(0, None), (1, Some(0))]);
		let path = reconstruct(&map, Some(0), Some(1), 2);
		let stored_backwards = GraphEdge {
			source: 1,
			target: 0,
			weight: 2.0,
		};

		assert!(path.covers(&stored_backwards, false));
		assert!(!path.covers(&stored_backwards, true));
	}

	proptest! {
		#[test]
		fn arbitrary_parent_maps_terminate(
			entries in prop::collection::btree_map(0u32..16, prop::option::of(0u32..16), 0..16),
			start in 0u32..16,
			end in 0u32..16,
		) {
			let path = reconstruct(&entries, Some(start), Some(end), 16);
			prop_assert!(path.len() <= 16);
			for &(from, to) in &path.pairs {
				prop_assert_eq!(entries.get(&to), Some(&Some(from)));
			}
		}
	}
}
