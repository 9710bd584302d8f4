pub mod animator;
mod component;
pub mod path;
pub mod render;
pub mod scale;
pub mod state;
pub mod summary;
pub mod surface;
mod types;

pub use animator::{
	ManualScheduler, Outcome, PlaybackHandle, PlaybackState, StepAnimator, Tick, TickScheduler,
};
pub use component::PathSimulator;
pub use render::{Frame, RunStatus, Scene, StatusPanel};
pub use state::GraphViewState;
pub use summary::{RunFigures, RunSummary};
pub use surface::{DrawOp, RecordingSurface, Surface};
pub use types::{Distance, Graph, GraphEdge, GraphNode, NodeId, Step};
