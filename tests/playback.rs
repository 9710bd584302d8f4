//! Decodes service-shaped graph and step payloads, then plays them back
//! against a recording surface.

use shortest_path_canvas::components::graph_view::render::{PATH, RunStatus};
use shortest_path_canvas::components::graph_view::{
	DrawOp, Graph, GraphViewState, ManualScheduler, Outcome, RecordingSurface, Step,
	StepAnimator, Tick,
};
use shortest_path_canvas::config::VizConfig;

const GRAPH: &str = r#"{
	"nodes": [
		{"id": 3, "x": 30.0, "y": 0.0},
		{"id": 0, "x": 0.0, "y": 0.0},
		{"id": 1, "x": 10.0, "y": 10.0},
		{"id": 2, "x": 20.0, "y": 0.0},
		{"id": 4, "x": 15.0, "y": 40.0}
	],
	"edges": [
		{"source": 0, "target": 1, "weight": 2},
		{"source": 1, "target": 2, "weight": 3},
		{"source": 0, "target": 2, "weight": 9},
		{"source": 2, "target": 3, "weight": 1}
	],
	"directed": false
}"#;

const TO_THREE: &str = r#"[
	{"current_node": 0, "frontier": [1, 2], "visited": [0],
	 "distances": {"0": 0, "1": 2, "2": 9, "3": "Infinity", "4": "Infinity"},
	 "parents": {"0": null, "1": 0, "2": 0}, "description": "Visit 0"},
	{"current_node": 1, "frontier": [2], "visited": [0, 1],
	 "distances": {"0": 0, "1": 2, "2": 5, "3": "Infinity", "4": "Infinity"},
	 "parents": {"0": null, "1": 0, "2": 1}, "description": "Visit 1"},
	{"current_node": 3, "frontier": [], "visited": [0, 1, 2, 3],
	 "distances": {"0": 0, "1": 2, "2": 5, "3": 6, "4": "Infinity"},
	 "parents": {"0": null, "1": 0, "2": 1, "3": 2}, "description": "Reached 3"}
]"#;

const TO_FOUR: &str = r#"[
	{"current_node": null, "frontier": [], "visited": [0, 1, 2, 3],
	 "distances": {"0": 0, "1": 2, "2": 5, "3": 6, "4": "Infinity"},
	 "parents": {"0": null, "1": 0, "2": 1, "3": 2, "4": null},
	 "description": "Frontier exhausted"}
]"#;

fn loaded_view() -> GraphViewState {
	let graph: Graph = serde_json::from_str(GRAPH).unwrap();
	graph.validate().unwrap();
	let mut view = GraphViewState::new(&VizConfig::default(), 800.0, 600.0);
	view.set_graph(graph);
	view
}

fn play(
	view: &mut GraphViewState,
	surface: &RecordingSurface,
	steps: Vec<Step>,
	end: u32,
) -> Vec<Tick> {
	let mut animator = StepAnimator::new(ManualScheduler::new(), 100);
	animator.start(steps, view.start, Some(end));
	let mut ticks = Vec::new();
	while let Some(handle) = animator.scheduler_mut().take_pending() {
		surface.clear();
		ticks.push(animator.tick(handle, view, surface));
	}
	ticks
}

fn path_segments(surface: &RecordingSurface) -> usize {
	surface
		.ops()
		.into_iter()
		.filter(|op| matches!(op, DrawOp::Line { stroke, width, .. } if stroke == PATH && *width == 4.0))
		.count()
}

#[test]
fn reachable_end_highlights_the_whole_path() {
	let (mut view, surface) = (loaded_view(), RecordingSurface::new());
	assert_eq!(view.start, Some(0));
	assert_eq!(view.end, Some(4));

	let steps: Vec<Step> = serde_json::from_str(TO_THREE).unwrap();
	let ticks = play(&mut view, &surface, steps, 3);

	assert_eq!(ticks.last(), Some(&Tick::Finished(Outcome::PathFound { cost: 6.0 })));
	assert_eq!(path_segments(&surface), 3);
	assert_eq!(view.status.status, RunStatus::Complete);
	assert_eq!(view.status.visited_count, 4);
	assert_eq!(view.status.path_cost, "6");

	let log = view.activity.lines();
	assert!(log.iter().any(|l| l == "Visit 1"));
	assert!(log.iter().any(|l| l == "Path found! Total cost: 6.00"));
	assert_eq!(log.last().map(String::as_str), Some("Finished."));
}

#[test]
fn disconnected_end_reports_no_path() {
	let (mut view, surface) = (loaded_view(), RecordingSurface::new());
	let steps: Vec<Step> = serde_json::from_str(TO_FOUR).unwrap();
	let ticks = play(&mut view, &surface, steps, 4);

	assert_eq!(ticks.last(), Some(&Tick::Finished(Outcome::NoPath)));
	assert_eq!(path_segments(&surface), 0);
	assert!(surface.texts().contains(&"d=∞".to_string()));
	assert_eq!(view.status.path_cost, "∞");
	assert!(view.activity.lines().iter().any(|l| l == "No path found!"));
}

#[test]
fn intermediate_frames_show_the_partial_tree() {
	let (mut view, surface) = (loaded_view(), RecordingSurface::new());
	let steps: Vec<Step> = serde_json::from_str(TO_THREE).unwrap();
	let mut animator = StepAnimator::new(ManualScheduler::new(), 100);
	animator.start(steps, Some(0), Some(3));

	let first = animator.scheduler_mut().take_pending().unwrap();
	animator.tick(first, &mut view, &surface);
	assert_eq!(view.status.status, RunStatus::Running);
	assert_eq!(view.status.path_cost, "∞");
	assert_eq!(path_segments(&surface), 0);
	assert!(surface.texts().contains(&"d=9".to_string()));
}
