use std::collections::HashMap;
use std::fmt;

use super::path::{self, PathEdges};
use super::surface::Surface;
use super::types::{Distance, Graph, GraphEdge, NodeId, Step};

pub const BACKGROUND: &str = "#000000";
pub const EDGE: &str = "#333333";
pub const PATH: &str = "#FFFF00";
pub const NODE_BORDER: &str = "#00FFFF";
pub const NODE_FILL: &str = "#000000";
pub const START_FILL: &str = "#FFFF00";
pub const END_FILL: &str = "#FFB8FF";
pub const CURRENT_FILL: &str = "#FFFF00";
pub const VISITED_FILL: &str = "#2121DE";
pub const HIGHLIGHT_BORDER: &str = "#FFFFFF";
pub const LABEL: &str = "#00FF00";

const EDGE_WIDTH: f64 = 1.0;
const PATH_WIDTH: f64 = 4.0;
const ENDPOINT_SCALE: f64 = 1.2;
const ARROW_SIZE: f64 = 10.0;
const WEIGHT_BOX: f64 = 12.0;

/// What a frame shows on top of the base graph.
#[derive(Clone, Copy, Debug)]
pub enum Frame<'a> {
	/// The bare graph, no search overlay.
	Base,
	/// A step in the middle of playback.
	Running(&'a Step),
	/// The last step, once playback has finished.
	Final(&'a Step),
}

impl<'a> Frame<'a> {
	pub fn step(&self) -> Option<&'a Step> {
		match *self {
			Frame::Base => None,
			Frame::Running(step) | Frame::Final(step) => Some(step),
		}
	}
}

/// Everything a single frame is drawn from.
#[derive(Clone, Copy, Debug)]
pub struct Scene<'a> {
	pub graph: &'a Graph,
	pub frame: Frame<'a>,
	pub start: Option<NodeId>,
	pub end: Option<NodeId>,
	pub width: f64,
	pub height: f64,
	pub node_radius: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunStatus {
	#[default]
	Ready,
	Running,
	Complete,
}

impl fmt::Display for RunStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			RunStatus::Ready => "READY",
			RunStatus::Running => "RUNNING",
			RunStatus::Complete => "COMPLETE",
		})
	}
}

/// Read-outs that sit next to the canvas and change with every frame.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusPanel {
	pub status: RunStatus,
	pub visited_count: usize,
	pub path_cost: String,
	pub node_count: usize,
}

impl Default for StatusPanel {
	fn default() -> Self {
		Self {
			status: RunStatus::Ready,
			visited_count: 0,
			path_cost: "0".to_string(),
			node_count: 0,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct NodeStyle {
	radius: f64,
	fill: &'static str,
	border: &'static str,
	text: &'static str,
}

/// Draws `scene` and updates `status` from its step, if any.
///
/// Edges go first so node markers always sit on top of them.
pub fn render<S: Surface + ?Sized>(surface: &S, scene: &Scene<'_>, status: &mut StatusPanel) {
	surface.set_fill_style(BACKGROUND);
	surface.fill_rect(0.0, 0.0, scene.width, scene.height);

	let path = match scene.frame.step() {
		Some(step) => path::reconstruct(
			&step.parents,
			scene.start,
			scene.end,
			scene.graph.nodes.len(),
		),
		None => PathEdges::default(),
	};

	draw_edges(surface, scene, &path);
	draw_nodes(surface, scene);
	update_status(scene, status);
}

fn draw_edges<S: Surface + ?Sized>(surface: &S, scene: &Scene<'_>, path: &PathEdges) {
	let positions: HashMap<NodeId, (f64, f64)> = scene
		.graph
		.nodes
		.iter()
		.map(|n| (n.id, (n.canvas_x, n.canvas_y)))
		.collect();
	let directed = scene.graph.directed;

	for edge in &scene.graph.edges {
		let (Some(&(x1, y1)), Some(&(x2, y2))) =
			(positions.get(&edge.source), positions.get(&edge.target))
		else {
			continue;
		};

		let on_path = path.covers(edge, directed);
		let (color, width) = if on_path {
			(PATH, PATH_WIDTH)
		} else {
			(EDGE, EDGE_WIDTH)
		};
		surface.set_stroke_style(color);
		surface.set_line_width(width);

		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		let target_gap = endpoint_radius(scene, edge.target);
		if directed && dist > target_gap + ARROW_SIZE {
			let (ux, uy) = (dx / dist, dy / dist);
			let (tip_x, tip_y) = (x2 - ux * target_gap, y2 - uy * target_gap);
			let (back_x, back_y) = (tip_x - ux * ARROW_SIZE, tip_y - uy * ARROW_SIZE);
			surface.begin_path();
			surface.move_to(x1, y1);
			surface.line_to(back_x, back_y);
			surface.stroke();

			let (px, py) = (-uy * ARROW_SIZE * 0.5, ux * ARROW_SIZE * 0.5);
			surface.set_fill_style(color);
			surface.begin_path();
			surface.move_to(tip_x, tip_y);
			surface.line_to(back_x + px, back_y + py);
			surface.line_to(back_x - px, back_y - py);
			surface.close_path();
			surface.fill();
		} else {
			surface.begin_path();
			surface.move_to(x1, y1);
			surface.line_to(x2, y2);
			surface.stroke();
		}

		draw_weight(surface, edge, (x1 + x2) / 2.0, (y1 + y2) / 2.0);
	}
}

fn draw_weight<S: Surface + ?Sized>(surface: &S, edge: &GraphEdge, mid_x: f64, mid_y: f64) {
	let half = WEIGHT_BOX / 2.0;
	surface.set_fill_style(BACKGROUND);
	surface.fill_rect(mid_x - half, mid_y - half, WEIGHT_BOX, WEIGHT_BOX);
	surface.set_stroke_style(EDGE);
	surface.stroke_rect(mid_x - half, mid_y - half, WEIGHT_BOX, WEIGHT_BOX);

	surface.set_fill_style(NODE_BORDER);
	surface.set_font("bold 10px Roboto Mono");
	surface.set_text_align("center");
	surface.set_text_baseline("middle");
	surface.fill_text(&format_weight(edge.weight), mid_x, mid_y);
}

fn draw_nodes<S: Surface + ?Sized>(surface: &S, scene: &Scene<'_>) {
	let step = scene.frame.step();

	for node in &scene.graph.nodes {
		let (x, y) = (node.canvas_x, node.canvas_y);
		let style = node_style(scene, node.id);

		surface.begin_path();
		surface.circle(x, y, style.radius);
		surface.set_fill_style(style.fill);
		surface.fill();
		surface.set_stroke_style(style.border);
		surface.set_line_width(EDGE_WIDTH);
		surface.stroke();

		surface.set_fill_style(style.text);
		surface.set_font("bold 12px Roboto Mono");
		surface.set_text_align("center");
		surface.set_text_baseline("middle");
		surface.fill_text(&node.id.to_string(), x, y);

		surface.set_fill_style(LABEL);
		surface.set_font("9px Roboto Mono");
		surface.fill_text(
			&distance_label(step, node.id, scene.start),
			x,
			y - style.radius - 4.0,
		);
	}
}

fn endpoint_radius(scene: &Scene<'_>, id: NodeId) -> f64 {
	if Some(id) == scene.start || Some(id) == scene.end {
		scene.node_radius * ENDPOINT_SCALE
	} else {
		scene.node_radius
	}
}

/// Start/end emphasis beats the expanding node, which beats frontier, which
/// beats visited.
fn node_style(scene: &Scene<'_>, id: NodeId) -> NodeStyle {
	if Some(id) == scene.start || Some(id) == scene.end {
		return NodeStyle {
			radius: scene.node_radius * ENDPOINT_SCALE,
			fill: if Some(id) == scene.start {
				START_FILL
			} else {
				END_FILL
			},
			border: HIGHLIGHT_BORDER,
			text: "#000000",
		};
	}

	let base = NodeStyle {
		radius: scene.node_radius,
		fill: NODE_FILL,
		border: NODE_BORDER,
		text: "#FFFFFF",
	};
	let Some(step) = scene.frame.step() else {
		return base;
	};

	if step.current_node == Some(id) {
		NodeStyle {
			fill: CURRENT_FILL,
			border: HIGHLIGHT_BORDER,
			text: "#000000",
			..base
		}
	} else if step.frontier.contains(&id) {
		NodeStyle {
			border: HIGHLIGHT_BORDER,
			..base
		}
	} else if step.visited.contains(&id) {
		NodeStyle {
			fill: VISITED_FILL,
			..base
		}
	} else {
		base
	}
}

pub fn distance_label(step: Option<&Step>, id: NodeId, start: Option<NodeId>) -> String {
	match step.and_then(|s| s.distance(id)) {
		Some(d) => format!("d={}", d),
		None if step.is_none() && Some(id) == start => "d=0".to_string(),
		None => "d=?".to_string(),
	}
}

pub fn format_weight(weight: f64) -> String {
	weight.to_string()
}

fn update_status(scene: &Scene<'_>, status: &mut StatusPanel) {
	status.node_count = scene.graph.nodes.len();
	let (step, is_final) = match scene.frame {
		Frame::Base => return,
		Frame::Running(step) => (step, false),
		Frame::Final(step) => (step, true),
	};

	status.visited_count = step.visited.len();
	let end_distance = scene.end.and_then(|end| step.distance(end));
	if is_final {
		status.status = RunStatus::Complete;
		status.path_cost = end_distance.unwrap_or(Distance::Unreachable).to_string();
	} else {
		status.status = RunStatus::Running;
		if let Some(d) = end_distance {
			status.path_cost = d.to_string();
		}
	}
}
