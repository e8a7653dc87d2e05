//! Execution backend client
//!
//! The program under inspection runs on an external service that records a
//! trace. This module owns the request/response schema, a blocking HTTP
//! implementation of [`ExecutionBackend`], and [`TraceFetcher`], which runs
//! requests off the UI thread.
//!
//! # Stale responses
//!
//! Each submission gets a fresh [`RunId`]. Only the outcome for the latest
//! id is ever handed back by [`TraceFetcher::poll`]; anything older is
//! logged and dropped, so a slow first run can never overwrite the result of
//! a later one.

use crate::error::{BackendError, BackendResult};
use crate::snapshot::{snapshots_from_steps, RawStep, Snapshot};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const SIMULATE_PATH: &str = "/api/simulate";

/// Body posted to the simulate endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulateRequest {
    pub code: String,
    pub language: String,
    pub testcases: Vec<String>,
}

impl SimulateRequest {
    /// An empty testcase list is sent as a single empty input
    pub fn new(code: impl Into<String>, language: impl Into<String>, testcases: Vec<String>) -> Self {
        let testcases = if testcases.is_empty() {
            vec![String::new()]
        } else {
            testcases
        };
        SimulateRequest {
            code: code.into(),
            language: language.into(),
            testcases,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestcaseResult {
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub trace: Vec<RawStep>,
}

/// Every response shape the service is known to produce
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulateResponse {
    #[serde(default)]
    pub results: Vec<TestcaseResult>,
    /// Older single-trace shape
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<Vec<RawStep>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Notice such as an unsupported-language message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Turn a decoded response into snapshots. The first testcase is
/// authoritative.
pub fn trace_from_response(response: SimulateResponse) -> BackendResult<Vec<Snapshot>> {
    if let Some(error) = response.error {
        return Err(BackendError::Execution(error));
    }
    let steps = response
        .results
        .into_iter()
        .next()
        .map(|r| r.trace)
        .or(response.trace);

    match steps {
        Some(steps) if !steps.is_empty() => Ok(snapshots_from_steps(steps)),
        Some(_) => Err(BackendError::EmptyTrace),
        None => match response.message {
            Some(message) => Err(BackendError::Execution(message)),
            None => Err(BackendError::EmptyTrace),
        },
    }
}

/// Text of an error body: the `detail` field when present, else the raw body
fn error_detail(body: &str) -> String {
    match serde_json::from_str::<Json>(body) {
        Ok(Json::Object(map)) => match map.get("detail") {
            Some(Json::String(detail)) => detail.clone(),
            Some(other) => other.to_string(),
            None => body.to_string(),
        },
        _ => body.to_string(),
    }
}

/// Decode a response body, whether it came over HTTP or from disk.
/// A bare list of step records is accepted as a trace.
pub fn decode_response(body: &str) -> BackendResult<Vec<Snapshot>> {
    let json: Json = serde_json::from_str(body)?;
    if json.is_array() {
        let steps: Vec<RawStep> = serde_json::from_value(json)?;
        if steps.is_empty() {
            return Err(BackendError::EmptyTrace);
        }
        return Ok(snapshots_from_steps(steps));
    }
    trace_from_response(serde_json::from_value(json)?)
}

/// Replay a previously saved response file
pub fn load_saved_response(path: &Path) -> BackendResult<Vec<Snapshot>> {
    let body = std::fs::read_to_string(path).map_err(|source| BackendError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let steps = decode_response(&body)?;
    info!(path = %path.display(), steps = steps.len(), "loaded saved response");
    Ok(steps)
}

/// Something that can run a program and return its trace
pub trait ExecutionBackend: Send + Sync {
    fn simulate(&self, request: &SimulateRequest) -> BackendResult<Vec<Snapshot>>;
}

/// Blocking HTTP client for the simulate endpoint
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> BackendResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(HttpBackend {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, SIMULATE_PATH)
    }
}

impl ExecutionBackend for HttpBackend {
    fn simulate(&self, request: &SimulateRequest) -> BackendResult<Vec<Snapshot>> {
        let url = self.endpoint();
        debug!(%url, language = %request.language, "posting program");
        let response = self.client.post(&url).json(request).send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(BackendError::Http {
                status: status.as_u16(),
                detail: error_detail(&body),
            });
        }
        decode_response(&body)
    }
}

/// Identifier of one submitted run; later runs have larger ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunId(u64);

impl RunId {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Result of a finished run
#[derive(Debug)]
pub struct FetchOutcome {
    pub run: RunId,
    pub result: BackendResult<Vec<Snapshot>>,
}

/// Runs backend requests on worker threads and hands back only the latest
/// outcome
pub struct TraceFetcher {
    backend: Arc<dyn ExecutionBackend>,
    tx: Sender<FetchOutcome>,
    rx: Receiver<FetchOutcome>,
    next_id: u64,
    latest: Option<RunId>,
    pending: bool,
}

impl TraceFetcher {
    pub fn new(backend: Arc<dyn ExecutionBackend>) -> Self {
        let (tx, rx) = mpsc::channel();
        TraceFetcher {
            backend,
            tx,
            rx,
            next_id: 0,
            latest: None,
            pending: false,
        }
    }

    /// Start a run. Any run still in flight becomes stale.
    pub fn submit(&mut self, request: SimulateRequest) -> RunId {
        self.next_id += 1;
        let run = RunId(self.next_id);
        self.latest = Some(run);
        self.pending = true;
        info!(run = run.get(), "submitting run");

        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = backend.simulate(&request);
            // The receiver is gone only when the fetcher was dropped
            let _ = tx.send(FetchOutcome { run, result });
        });
        run
    }

    /// Non-blocking check for the latest run's outcome
    pub fn poll(&mut self) -> Option<FetchOutcome> {
        let mut found = None;
        loop {
            match self.rx.try_recv() {
                Ok(outcome) if Some(outcome.run) == self.latest => {
                    debug!(run = outcome.run.get(), ok = outcome.result.is_ok(), "run finished");
                    self.pending = false;
                    found = Some(outcome);
                }
                Ok(outcome) => {
                    warn!(
                        run = outcome.run.get(),
                        latest = self.latest.map(RunId::get),
                        "discarding stale run"
                    );
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        found
    }

    /// Whether the latest run has not reported back yet
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn latest(&self) -> Option<RunId> {
        self.latest
    }
}
