//! Canvas views: the step-by-step simulator and the batch comparison.

pub mod graph_view;
pub mod stats;
