//! Error type shared by the service client and the playback/aggregation core.

use thiserror::Error;

/// Everything that can go wrong between the browser and the compute service.
///
/// None of these are fatal: callers log the error, show it, and keep the
/// previously rendered state.
#[derive(Error, Debug)]
pub enum VizError {
	/// Network failure or a request that never produced a response.
	#[error("request failed: {0}")]
	Transport(#[from] reqwest::Error),

	/// The service answered with a non-success status.
	#[error("service returned {status}: {detail}")]
	Service { status: u16, detail: String },

	/// The response body was not the JSON we expected.
	#[error("malformed response: {0}")]
	Malformed(#[from] serde_json::Error),

	/// A batch response that is neither a trial list nor pre-aggregated stats.
	#[error("unsupported batch response shape")]
	UnsupportedShape,

	/// Algorithm name outside the closed set.
	#[error("unknown algorithm '{0}'")]
	UnknownAlgorithm(String),

	/// Request parameters rejected before dispatch.
	#[error("invalid request: {0}")]
	InvalidRequest(String),

	/// A run response without any steps to replay.
	#[error("no steps returned from algorithm")]
	EmptySteps,
}

impl VizError {
	/// Creates an invalid-request error.
	pub fn invalid(message: impl Into<String>) -> Self {
		VizError::InvalidRequest(message.into())
	}
}
