//! Client for the external compute service that generates graphs and runs the
//! algorithms.

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::algorithm::Algorithm;
use crate::components::graph_view::{Graph, NodeId, Step};
use crate::components::stats::BatchResponse;
use crate::error::VizError;

/// Parameters for `/api/generate-graph`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GenerateRequest {
	pub num_nodes: u32,
	pub density: f64,
	pub directed: bool,
	pub weight_min: u32,
	pub weight_max: u32,
	pub allow_disconnected: bool,
}

impl Default for GenerateRequest {
	fn default() -> Self {
		Self {
			num_nodes: 20,
			density: 0.2,
			directed: false,
			weight_min: 1,
			weight_max: 10,
			allow_disconnected: false,
		}
	}
}

impl GenerateRequest {
	pub fn validate(&self) -> Result<(), VizError> {
		if self.num_nodes == 0 {
			return Err(VizError::invalid("num_nodes must be positive"));
		}
		check_density(self.density)?;
		if self.weight_min > self.weight_max {
			return Err(VizError::invalid(format!(
				"weight range {}..{} is empty",
				self.weight_min, self.weight_max
			)));
		}
		Ok(())
	}
}

#[derive(Serialize)]
struct RunRequest<'a> {
	algorithm: Algorithm,
	start_node: NodeId,
	end_node: NodeId,
	graph: &'a Graph,
}

#[derive(Deserialize)]
struct RunResponse {
	#[serde(default)]
	steps: Option<Vec<Step>>,
}

/// Parameters for `/api/batch-run`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BatchRequest {
	pub num_graphs: u32,
	pub num_nodes: u32,
	pub density: f64,
	pub directed: bool,
	pub algorithms: Vec<Algorithm>,
}

impl Default for BatchRequest {
	fn default() -> Self {
		Self {
			num_graphs: 30,
			num_nodes: 30,
			density: 0.3,
			directed: false,
			algorithms: Algorithm::ALL.to_vec(),
		}
	}
}

impl BatchRequest {
	pub fn validate(&self) -> Result<(), VizError> {
		if self.num_graphs == 0 {
			return Err(VizError::invalid("num_graphs must be positive"));
		}
		if self.num_nodes == 0 {
			return Err(VizError::invalid("num_nodes must be positive"));
		}
		check_density(self.density)?;
		if self.algorithms.is_empty() {
			return Err(VizError::invalid("select at least one algorithm"));
		}
		Ok(())
	}
}

/// Source listing served for the "view code" panel.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AlgorithmSource {
	pub code: String,
	#[serde(default)]
	pub language: String,
}

#[derive(Deserialize)]
struct ErrorBody {
	detail: serde_json::Value,
}

fn check_density(density: f64) -> Result<(), VizError> {
	if (0.0..=1.0).contains(&density) {
		Ok(())
	} else {
		Err(VizError::invalid(format!("density {} is outside [0, 1]", density)))
	}
}

/// Pulls `detail` out of a FastAPI-style error body, falling back to the raw text.
fn service_detail(body: &str) -> String {
	match serde_json::from_str::<ErrorBody>(body) {
		Ok(ErrorBody {
			detail: serde_json::Value::String(s),
		}) => s,
		Ok(ErrorBody { detail }) => detail.to_string(),
		Err(_) => body.trim().to_string(),
	}
}

#[derive(Clone, Debug)]
pub struct ApiClient {
	http: reqwest::Client,
	base: String,
}

impl ApiClient {
	pub fn new(base: impl Into<String>) -> Self {
		Self {
			http: reqwest::Client::new(),
			base: base.into().trim_end_matches('/').to_string(),
		}
	}

	pub fn url(&self, path: &str) -> String {
		format!("{}/api/{}", self.base, path.trim_start_matches('/'))
	}

	async fn read_body(response: reqwest::Response) -> Result<String, VizError> {
		let status = response.status();
		let body = response.text().await?;
		if !status.is_success() {
			return Err(VizError::Service {
				status: status.as_u16(),
				detail: service_detail(&body),
			});
		}
		Ok(body)
	}

	async fn post_text<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<String, VizError> {
		let url = self.url(path);
		debug!("POST {}", url);
		let response = self.http.post(&url).json(body).send().await?;
		Self::read_body(response).await
	}

	async fn post<B: Serialize + ?Sized, R: DeserializeOwned>(
		&self,
		path: &str,
		body: &B,
	) -> Result<R, VizError> {
		let text = self.post_text(path, body).await?;
		Ok(serde_json::from_str(&text)?)
	}

	pub async fn generate_graph(&self, request: &GenerateRequest) -> Result<Graph, VizError> {
		request.validate()?;
		let graph: Graph = self.post("generate-graph", request).await?;
		graph.validate()?;
		Ok(graph)
	}

	/// Runs `algorithm` on `graph` and returns the recorded steps, numbered in
	/// order. An absent or empty step list is [`VizError::EmptySteps`].
	pub async fn run_algorithm(
		&self,
		algorithm: Algorithm,
		graph: &Graph,
		start: NodeId,
		end: NodeId,
	) -> Result<Vec<Step>, VizError> {
		for id in [start, end] {
			if !graph.contains(id) {
				return Err(VizError::invalid(format!("node {} is not in the graph", id)));
			}
		}
		let request = RunRequest {
			algorithm,
			start_node: start,
			end_node: end,
			graph,
		};
		let response: RunResponse = self.post("run-algorithm", &request).await?;
		number_steps(response.steps)
	}

	pub async fn batch_run(&self, request: &BatchRequest) -> Result<BatchResponse, VizError> {
		request.validate()?;
		let text = self.post_text("batch-run", request).await?;
		BatchResponse::from_json(&text)
	}

	/// Address of an algorithm's source listing; the display name is
	/// percent-encoded as a single path segment.
	pub fn algorithm_code_url(&self, algorithm: Algorithm) -> String {
		self.url(&format!("algorithm-code/{}", urlencoding::encode(algorithm.as_str())))
	}

	pub async fn algorithm_code(&self, algorithm: Algorithm) -> Result<AlgorithmSource, VizError> {
		let url = self.algorithm_code_url(algorithm);
		debug!("GET {}", url);
		let response = self.http.get(&url).send().await?;
		let text = Self::read_body(response).await?;
		Ok(serde_json::from_str(&text)?)
	}
}

fn number_steps(steps: Option<Vec<Step>>) -> Result<Vec<Step>, VizError> {
	let mut steps = steps.unwrap_or_default();
	if steps.is_empty() {
		warn!("Run response carried no steps");
		return Err(VizError::EmptySteps);
	}
	for (i, step) in steps.iter_mut().enumerate() {
		step.index = i;
	}
	Ok(steps)
}
