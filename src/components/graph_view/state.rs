use log::info;

use super::render::{self, Frame, Scene, StatusPanel};
use super::scale;
use super::surface::Surface;
use super::types::{Graph, NodeId};
use crate::config::VizConfig;

/// Bounded, newest-last list of lines shown under the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct ActivityLog {
	lines: Vec<String>,
	capacity: usize,
}

impl ActivityLog {
	pub fn new(capacity: usize) -> Self {
		Self {
			lines: Vec::new(),
			capacity: capacity.max(1),
		}
	}

	pub fn push(&mut self, line: impl Into<String>) {
		self.lines.push(line.into());
		if self.lines.len() > self.capacity {
			let excess = self.lines.len() - self.capacity;
			self.lines.drain(..excess);
		}
	}

	pub fn lines(&self) -> &[String] {
		&self.lines
	}
}

/// Ticket for one in-flight request; only the latest ticket may apply its
/// response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Clone, Copy, Debug, Default)]
pub struct RequestSeq {
	latest: u64,
}

impl RequestSeq {
	/// Issues a new ticket, invalidating every earlier one.
	pub fn issue(&mut self) -> Ticket {
		self.latest += 1;
		Ticket(self.latest)
	}

	pub fn is_current(&self, ticket: Ticket) -> bool {
		ticket.0 == self.latest
	}
}

/// The graph on screen plus everything needed to draw it.
pub struct GraphViewState {
	pub graph: Option<Graph>,
	pub start: Option<NodeId>,
	pub end: Option<NodeId>,
	pub width: f64,
	pub height: f64,
	pub padding: f64,
	pub node_radius: f64,
	pub status: StatusPanel,
	pub activity: ActivityLog,
	pub requests: RequestSeq,
}

impl GraphViewState {
	pub fn new(config: &VizConfig, width: f64, height: f64) -> Self {
		Self {
			graph: None,
			start: None,
			end: None,
			width,
			height,
			padding: config.padding,
			node_radius: config.node_radius,
			status: StatusPanel::default(),
			activity: ActivityLog::new(config.log_capacity),
			requests: RequestSeq::default(),
		}
	}

	/// Replaces the current graph wholesale. Start and end default to the
	/// lowest and highest node ids.
	pub fn set_graph(&mut self, mut graph: Graph) {
		graph.sort_nodes();
		scale::normalize(&mut graph, self.width, self.height, self.padding);
		self.start = graph.nodes.first().map(|n| n.id);
		self.end = graph.nodes.last().map(|n| n.id);
		self.status = StatusPanel {
			node_count: graph.nodes.len(),
			..StatusPanel::default()
		};
		if let (Some(start), Some(end)) = (self.start, self.end) {
			self.log_line(&format!("Graph generated. Start: {}, End: {}", start, end));
		}
		self.graph = Some(graph);
	}

	pub fn clear_graph(&mut self) {
		self.graph = None;
		self.start = None;
		self.end = None;
		self.status = StatusPanel::default();
	}

	pub fn node_ids(&self) -> Vec<NodeId> {
		self.graph
			.as_ref()
			.map(|g| g.nodes.iter().map(|n| n.id).collect())
			.unwrap_or_default()
	}

	/// Ignores ids that are not in the current graph.
	pub fn set_start(&mut self, id: NodeId) -> bool {
		let known = self.graph.as_ref().is_some_and(|g| g.contains(id));
		if known {
			self.start = Some(id);
		}
		known
	}

	pub fn set_end(&mut self, id: NodeId) -> bool {
		let known = self.graph.as_ref().is_some_and(|g| g.contains(id));
		if known {
			self.end = Some(id);
		}
		known
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		if let Some(graph) = self.graph.as_mut() {
			scale::normalize(graph, width, height, self.padding);
		}
	}

	pub fn reset_status(&mut self) {
		let node_count = self.status.node_count;
		self.status = StatusPanel {
			node_count,
			..StatusPanel::default()
		};
	}

	pub fn log_line(&mut self, line: &str) {
		info!("[SHORTEST-PATH]: {}", line);
		self.activity.push(line);
	}

	pub fn draw<S: Surface + ?Sized>(
		&mut self,
		surface: &S,
		frame: Frame<'_>,
		start: Option<NodeId>,
		end: Option<NodeId>,
	) {
		let Some(graph) = self.graph.as_ref() else {
			surface.set_fill_style(render::BACKGROUND);
			surface.fill_rect(0.0, 0.0, self.width, self.height);
			return;
		};
		let scene = Scene {
			graph,
			frame,
			start,
			end,
			width: self.width,
			height: self.height,
			node_radius: self.node_radius,
		};
		render::render(surface, &scene, &mut self.status);
	}

	pub fn draw_base<S: Surface + ?Sized>(&mut self, surface: &S) {
		let (start, end) = (self.start, self.end);
		self.draw(surface, Frame::Base, start, end);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph_view::types::GraphNode;

	fn graph() -> Graph {
		Graph {
			nodes: vec![
				GraphNode::new(4, 10.0, 10.0),
				GraphNode::new(0, 0.0, 0.0),
				GraphNode::new(2, 5.0, 20.0),
			],
			..Graph::default()
		}
	}

	#[test]
	fn set_graph_picks_extreme_ids_and_normalizes() {
		let mut state = GraphViewState::new(&VizConfig::default(), 500.0, 400.0);
		state.set_graph(graph());

		assert_eq!(state.start, Some(0));
		assert_eq!(state.end, Some(4));
		assert_eq!(state.node_ids(), vec![0, 2, 4]);
		let nodes = &state.graph.as_ref().unwrap().nodes;
		assert_eq!(nodes[0].canvas_x, 50.0);
		assert_eq!(nodes[2].canvas_x, 450.0);
		assert_eq!(state.status.node_count, 3);
	}

	#[test]
	fn resize_renormalizes_from_original_coordinates() {
		let mut state = GraphViewState::new(&VizConfig::default(), 500.0, 400.0);
		state.set_graph(graph());
		state.resize(1000.0, 400.0);

		let nodes = &state.graph.as_ref().unwrap().nodes;
		assert_eq!(nodes[2].canvas_x, 950.0);
		assert_eq!(nodes[1].canvas_x, 500.0);
	}

	#[test]
	fn unknown_endpoints_are_rejected() {
		let mut state = GraphViewState::new(&VizConfig::default(), 500.0, 400.0);
		assert!(!state.set_start(0));
		state.set_graph(graph());
		assert!(state.set_end(2));
		assert!(!state.set_start(9));
		assert_eq!(state.start, Some(0));
		assert_eq!(state.end, Some(2));
	}

	#[test]
	fn activity_log_keeps_newest_lines() {
		let mut log = ActivityLog::new(2);
		log.push("a");
		log.push("b");
		log.push("c");
		assert_eq!(log.lines(), ["b".to_string(), "c".to_string()]);
	}

	#[test]
	fn only_the_latest_ticket_is_current() {
		let mut seq = RequestSeq::default();
		let first = seq.issue();
		let second = seq.issue();
		assert!(!seq.is_current(first));
		assert!(seq.is_current(second));
	}
}
