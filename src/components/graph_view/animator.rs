//! Frame-by-frame playback of a step sequence.
//!
//! The animator never sleeps or spawns; it asks a [`TickScheduler`] to call
//! [`StepAnimator::tick`] back later with the handle of the playback that
//! requested it. Every `start` bumps the handle, so a tick scheduled by a
//! superseded playback is recognised and dropped even if the scheduler could
//! not cancel it in time.

use log::info;

use super::render::Frame;
use super::state::GraphViewState;
use super::surface::Surface;
use super::types::{NodeId, Step};

/// Identifies one playback. Stale handles are ignored by [`StepAnimator::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PlaybackHandle(u64);

impl PlaybackHandle {
	pub fn from_raw(raw: u64) -> Self {
		Self(raw)
	}

	pub fn raw(self) -> u64 {
		self.0
	}
}

/// Arranges for `tick(handle)` to be called after a delay.
pub trait TickScheduler {
	fn schedule(&mut self, handle: PlaybackHandle, delay_ms: u32);
	/// Drops the pending tick, if any. Must be safe to call repeatedly.
	fn cancel(&mut self);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
	#[default]
	Idle,
	Playing,
	Complete,
}

/// How a finished playback ended.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Outcome {
	PathFound { cost: f64 },
	NoPath,
}

impl Outcome {
	fn of(step: &Step, end: Option<NodeId>) -> Self {
		match end.and_then(|end| step.distance(end)).and_then(|d| d.finite()) {
			Some(cost) => Outcome::PathFound { cost },
			None => Outcome::NoPath,
		}
	}

	pub fn message(&self) -> String {
		match self {
			Outcome::PathFound { cost } => format!("Path found! Total cost: {:.2}", cost),
			Outcome::NoPath => "No path found!".to_string(),
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Tick {
	/// The handle was stale or playback is not running; nothing was drawn.
	Suppressed,
	/// Step `index` was drawn and the next tick scheduled.
	Rendered { index: usize },
	/// The sequence is exhausted; the last step was redrawn as final.
	Finished(Outcome),
}

pub struct StepAnimator<T: TickScheduler> {
	scheduler: T,
	steps: Vec<Step>,
	index: usize,
	state: PlaybackState,
	handle: PlaybackHandle,
	start: Option<NodeId>,
	end: Option<NodeId>,
	delay_ms: u32,
}

impl<T: TickScheduler> StepAnimator<T> {
	pub fn new(scheduler: T, delay_ms: u32) -> Self {
		Self {
			scheduler,
			steps: Vec::new(),
			index: 0,
			state: PlaybackState::Idle,
			handle: PlaybackHandle(0),
			start: None,
			end: None,
			delay_ms: delay_ms.max(1),
		}
	}

	pub fn state(&self) -> PlaybackState {
		self.state
	}

	pub fn handle(&self) -> PlaybackHandle {
		self.handle
	}

	pub fn index(&self) -> usize {
		self.index
	}

	/// Current step, if one is on screen.
	pub fn current_step(&self) -> Option<&Step> {
		match self.state {
			PlaybackState::Idle => None,
			PlaybackState::Playing => self.index.checked_sub(1).and_then(|i| self.steps.get(i)),
			PlaybackState::Complete => self.steps.last(),
		}
	}

	/// Start and end nodes the current playback was started with.
	pub fn endpoints(&self) -> (Option<NodeId>, Option<NodeId>) {
		(self.start, self.end)
	}

	pub fn delay_ms(&self) -> u32 {
		self.delay_ms
	}

	/// Takes effect from the next scheduled tick.
	pub fn set_delay(&mut self, delay_ms: u32) {
		self.delay_ms = delay_ms.max(1);
	}

	pub fn scheduler(&self) -> &T {
		&self.scheduler
	}

	pub fn scheduler_mut(&mut self) -> &mut T {
		&mut self.scheduler
	}

	/// Cancels whatever was playing and begins `steps` from index 0. The
	/// first tick is scheduled immediately.
	pub fn start(
		&mut self,
		mut steps: Vec<Step>,
		start: Option<NodeId>,
		end: Option<NodeId>,
	) -> PlaybackHandle {
		self.cancel(self.handle);
		for (i, step) in steps.iter_mut().enumerate() {
			step.index = i;
		}

		self.handle = PlaybackHandle(self.handle.0 + 1);
		self.steps = steps;
		self.index = 0;
		self.start = start;
		self.end = end;
		self.state = PlaybackState::Playing;
		self.scheduler.schedule(self.handle, 0);
		self.handle
	}

	/// Stops `handle` if it is still the active playback. Idempotent; stale
	/// handles are a no-op.
	pub fn cancel(&mut self, handle: PlaybackHandle) {
		if handle != self.handle {
			return;
		}
		self.scheduler.cancel();
		if self.state == PlaybackState::Playing {
			self.state = PlaybackState::Idle;
		}
	}

	/// Cancels the active playback, leaving the last frame on screen.
	pub fn invalidate(&mut self) {
		self.cancel(self.handle);
	}

	/// Returns to idle and redraws the bare graph.
	pub fn reset<S: Surface + ?Sized>(&mut self, view: &mut GraphViewState, surface: &S) {
		self.scheduler.cancel();
		self.state = PlaybackState::Idle;
		self.index = 0;
		view.reset_status();
		view.draw_base(surface);
	}

	/// Advances `handle`'s playback by one frame.
	pub fn tick<S: Surface + ?Sized>(
		&mut self,
		handle: PlaybackHandle,
		view: &mut GraphViewState,
		surface: &S,
	) -> Tick {
		if handle != self.handle || self.state != PlaybackState::Playing {
			return Tick::Suppressed;
		}

		if let Some(step) = self.steps.get(self.index) {
			view.draw(surface, Frame::Running(step), self.start, self.end);
			view.log_line(&step.description);
			let index = self.index;
			self.index += 1;
			self.scheduler.schedule(handle, self.delay_ms);
			return Tick::Rendered { index };
		}

		self.state = PlaybackState::Complete;
		let Some(last) = self.steps.last() else {
			view.log_line("Finished.");
			return Tick::Finished(Outcome::NoPath);
		};
		view.draw(surface, Frame::Final(last), self.start, self.end);
		let outcome = Outcome::of(last, self.end);
		info!("Playback {} finished after {} steps", handle.0, self.steps.len());
		view.log_line(&outcome.message());
		view.log_line("Finished.");
		Tick::Finished(outcome)
	}
}

/// A scheduler that only records requests; the caller pumps ticks by hand.
#[derive(Debug, Default)]
pub struct ManualScheduler {
	pending: Option<(PlaybackHandle, u32)>,
	scheduled: Vec<(PlaybackHandle, u32)>,
}

impl ManualScheduler {
	pub fn new() -> Self {
		Self::default()
	}

	/// The tick that would fire next, consumed.
	pub fn take_pending(&mut self) -> Option<PlaybackHandle> {
		self.pending.take().map(|(handle, _)| handle)
	}

	pub fn pending(&self) -> Option<(PlaybackHandle, u32)> {
		self.pending
	}

	/// Every request ever made, cancelled or not.
	pub fn history(&self) -> &[(PlaybackHandle, u32)] {
		&self.scheduled
	}
}

impl TickScheduler for ManualScheduler {
	fn schedule(&mut self, handle: PlaybackHandle, delay_ms: u32) {
		self.pending = Some((handle, delay_ms));
		self.scheduled.push((handle, delay_ms));
	}

	fn cancel(&mut self) {
		self.pending = None;
	}
}

#[cfg(test)]
mod tests {
	use std::collections::BTreeMap;

	use super::*;
	use crate::components::graph_view::render::RunStatus;
	use crate::components::graph_view::surface::RecordingSurface;
	use crate::components::graph_view::types::{Distance, Graph, GraphNode};
	use crate::config::VizConfig;

	fn view() -> GraphViewState {
		let mut view = GraphViewState::new(&VizConfig::default(), 400.0, 300.0);
		view.set_graph(Graph {
			nodes: vec![GraphNode::new(0, 0.0, 0.0), GraphNode::new(1, 1.0, 1.0)],
			..Graph::default()
		});
		view
	}

	fn steps(n: usize) -> Vec<Step> {
		(0..n)
			.map(|i| Step {
				description: format!("step {}", i),
				distances: BTreeMap::from([(1, Distance::Finite(i as f64))]),
				..Step::default()
			})
			.collect()
	}

	fn pump(
		animator: &mut StepAnimator<ManualScheduler>,
		view: &mut GraphViewState,
		surface: &RecordingSurface,
	) -> Vec<Tick> {
		let mut ticks = Vec::new();
		while let Some(handle) = animator.scheduler_mut().take_pending() {
			ticks.push(animator.tick(handle, view, surface));
		}
		ticks
	}

	#[test]
	fn plays_every_step_then_completes() {
		let (mut view, surface) = (view(), RecordingSurface::new());
		let mut animator = StepAnimator::new(ManualScheduler::new(), 100);
		animator.start(steps(3), Some(0), Some(1));
		assert_eq!(animator.state(), PlaybackState::Playing);

		let ticks = pump(&mut animator, &mut view, &surface);
		assert_eq!(
			ticks,
			vec![
				Tick::Rendered { index: 0 },
				Tick::Rendered { index: 1 },
				Tick::Rendered { index: 2 },
				Tick::Finished(Outcome::PathFound { cost: 2.0 }),
			]
		);
		assert_eq!(animator.state(), PlaybackState::Complete);
		assert_eq!(view.status.status, RunStatus::Complete);
		assert_eq!(view.activity.lines().last().map(String::as_str), Some("Finished."));
	}

	#[test]
	fn ticks_use_the_configured_delay() {
		let (mut view, surface) = (view(), RecordingSurface::new());
		let mut animator = StepAnimator::new(ManualScheduler::new(), 100);
		let handle = animator.start(steps(2), Some(0), Some(1));
		animator.set_delay(25);
		pump(&mut animator, &mut view, &surface);

		let delays: Vec<u32> = animator.scheduler().history().iter().map(|&(_, d)| d).collect();
		assert_eq!(delays, vec![0, 25, 25]);
		assert!(animator.scheduler().history().iter().all(|&(h, _)| h == handle));
	}

	#[test]
	fn restarting_suppresses_the_superseded_tick() {
		let (mut view, surface) = (view(), RecordingSurface::new());
		let mut animator = StepAnimator::new(ManualScheduler::new(), 100);
		let first = animator.start(steps(5), Some(0), Some(1));
		animator.tick(first, &mut view, &surface);

		let second = animator.start(steps(2), Some(0), Some(1));
		assert_ne!(first, second);
		assert_eq!(animator.tick(first, &mut view, &surface), Tick::Suppressed);
		assert_eq!(animator.index(), 0);

		let ticks = pump(&mut animator, &mut view, &surface);
		assert_eq!(ticks.len(), 3);
	}

	#[test]
	fn cancel_is_idempotent_and_ignores_stale_handles() {
		let mut animator = StepAnimator::new(ManualScheduler::new(), 100);
		let first = animator.start(steps(2), None, None);
		let second = animator.start(steps(2), None, None);

		animator.cancel(first);
		assert_eq!(animator.state(), PlaybackState::Playing);

		animator.cancel(second);
		animator.cancel(second);
		assert_eq!(animator.state(), PlaybackState::Idle);
		assert!(animator.scheduler().pending().is_none());
	}

	#[test]
	fn reset_returns_to_idle_and_redraws_base() {
		let (mut view, surface) = (view(), RecordingSurface::new());
		let mut animator = StepAnimator::new(ManualScheduler::new(), 100);
		let handle = animator.start(steps(3), Some(0), Some(1));
		animator.tick(handle, &mut view, &surface);
		surface.clear();

		animator.reset(&mut view, &surface);
		assert_eq!(animator.state(), PlaybackState::Idle);
		assert_eq!(animator.tick(handle, &mut view, &surface), Tick::Suppressed);
		assert!(animator.current_step().is_none());
		assert!(surface.texts().contains(&"d=0".to_string()));
		assert_eq!(view.status.status, RunStatus::Ready);
	}

	#[test]
	fn unreachable_end_finishes_without_path() {
		let (mut view, surface) = (view(), RecordingSurface::new());
		let mut animator = StepAnimator::new(ManualScheduler::new(), 100);
		let mut run = steps(1);
		run[0].distances.insert(1, Distance::Unreachable);
		animator.start(run, Some(0), Some(1));

		let ticks = pump(&mut animator, &mut view, &surface);
		assert_eq!(ticks.last(), Some(&Tick::Finished(Outcome::NoPath)));
		assert!(view.activity.lines().iter().any(|l| l == "No path found!"));
	}

	#[test]
	fn invalidate_drops_the_pending_tick() {
		let (mut view, surface) = (view(), RecordingSurface::new());
		let mut animator = StepAnimator::new(ManualScheduler::new(), 100);
		let handle = animator.start(steps(4), Some(0), Some(1));
		animator.tick(handle, &mut view, &surface);
		surface.clear();

		animator.invalidate();
		animator.invalidate();
		assert_eq!(animator.state(), PlaybackState::Idle);
		assert!(animator.scheduler().pending().is_none());
		assert_eq!(animator.tick(handle, &mut view, &surface), Tick::Suppressed);
		assert!(surface.ops().is_empty());
	}

	#[test]
	fn steps_are_numbered_on_start() {
		let mut animator = StepAnimator::new(ManualScheduler::new(), 100);
		animator.start(steps(3), None, None);
		let (mut view, surface) = (view(), RecordingSurface::new());
		pump(&mut animator, &mut view, &surface);
		assert_eq!(animator.current_step().map(|s| s.index), Some(2));
	}
}
