//! Submission pipeline: sends the current document to the rendering service and saves
//! the returned PDF.
//!
//! Flow: Idle → HealthChecking → Submitting → ValidatingResponse → Delivering → Succeeded,
//! with any step able to end in Failed. Health probe, request and body read share one
//! deadline; delivery runs after it. There is no automatic retry. A submission dropped
//! before it finishes puts the state back to Idle.

pub mod delivery;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tokio::time::timeout;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::models::resume::ResumeDocument;
use crate::render_client::{read_pdf, RenderClient, RenderError};

pub use delivery::{DownloadSink, FileDownloadSink};

pub const DOWNLOAD_FILENAME: &str = "resume.pdf";
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(60);
/// Cap on the liveness probe so a hung health endpoint cannot eat the whole deadline.
const HEALTH_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("timed out waiting for the PDF service")]
    Timeout,

    #[error("PDF service unreachable")]
    NetworkUnreachable,

    #[error("PDF service error: {0}")]
    ServerError(String),

    #[error("PDF service returned '{0}' instead of a PDF")]
    InvalidResponseFormat(String),

    #[error("a submission is already in progress")]
    AlreadyInFlight,

    #[error("could not save the PDF: {0}")]
    SaveFailed(String),
}

impl SubmitError {
    pub fn code(&self) -> &'static str {
        match self {
            SubmitError::Timeout => "TIMEOUT",
            SubmitError::NetworkUnreachable => "NETWORK_UNREACHABLE",
            SubmitError::ServerError(_) => "SERVER_ERROR",
            SubmitError::InvalidResponseFormat(_) => "INVALID_RESPONSE_FORMAT",
            SubmitError::AlreadyInFlight => "ALREADY_IN_FLIGHT",
            SubmitError::SaveFailed(_) => "SAVE_FAILED",
        }
    }

    /// The message shown to the user. Each kind reads differently so "try again",
    /// "fix your input" and "service misconfigured" can be told apart.
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::Timeout => {
                "The PDF service took too long to respond. Please try again in a moment."
                    .to_string()
            }
            SubmitError::NetworkUnreachable => {
                "Could not reach the PDF service. Check your connection and try again."
                    .to_string()
            }
            SubmitError::ServerError(message) => {
                format!("The PDF service could not build your résumé: {message}. Please review your input.")
            }
            SubmitError::InvalidResponseFormat(declared) => format!(
                "The PDF service sent back '{declared}' instead of a PDF. The service may be misconfigured."
            ),
            SubmitError::AlreadyInFlight => {
                "A résumé is already being generated. Please wait for it to finish.".to_string()
            }
            SubmitError::SaveFailed(reason) => {
                format!("Your PDF was generated but could not be saved: {reason}")
            }
        }
    }
}

impl From<RenderError> for SubmitError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::Http(e) if e.is_timeout() => SubmitError::Timeout,
            RenderError::Http(_) => SubmitError::NetworkUnreachable,
            RenderError::Api { message, .. } => SubmitError::ServerError(message),
            RenderError::NotPdf(declared) => SubmitError::InvalidResponseFormat(declared),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    HealthChecking,
    Submitting,
    ValidatingResponse,
    Delivering,
    Succeeded,
    Failed(&'static str),
}

impl SubmissionState {
    /// Drives the busy indicator.
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            SubmissionState::HealthChecking
                | SubmissionState::Submitting
                | SubmissionState::ValidatingResponse
                | SubmissionState::Delivering
        )
    }
}

impl fmt::Display for SubmissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionState::Idle => f.write_str("idle"),
            SubmissionState::HealthChecking => f.write_str("checking PDF service"),
            SubmissionState::Submitting => f.write_str("generating PDF"),
            SubmissionState::ValidatingResponse => f.write_str("checking response"),
            SubmissionState::Delivering => f.write_str("saving PDF"),
            SubmissionState::Succeeded => f.write_str("done"),
            SubmissionState::Failed(code) => write!(f, "failed ({code})"),
        }
    }
}

/// At most one submission runs at a time; a concurrent call is rejected with
/// `AlreadyInFlight` without touching the running attempt.
pub struct SubmissionPipeline {
    client: RenderClient,
    sink: Arc<dyn DownloadSink>,
    deadline: Duration,
    in_flight: Mutex<()>,
    state: watch::Sender<SubmissionState>,
}

impl SubmissionPipeline {
    pub fn new(client: RenderClient, sink: Arc<dyn DownloadSink>, deadline: Duration) -> Self {
        let (state, _) = watch::channel(SubmissionState::Idle);
        Self {
            client,
            sink,
            deadline,
            in_flight: Mutex::new(()),
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> SubmissionState {
        self.state.borrow().clone()
    }

    pub fn is_busy(&self) -> bool {
        self.state.borrow().is_busy()
    }

    /// Runs one full attempt and returns where the PDF was saved.
    pub async fn submit(&self, doc: &ResumeDocument) -> Result<PathBuf, SubmitError> {
        let _guard = self.in_flight.try_lock().map_err(|_| {
            warn!("Submission rejected: another one is in flight");
            SubmitError::AlreadyInFlight
        })?;

        let mut reset = IdleOnDrop {
            state: &self.state,
            finished: false,
        };

        let attempt_id = Uuid::new_v4();
        let result = self
            .run(doc)
            .instrument(info_span!("submission", %attempt_id))
            .await;
        reset.finished = true;

        match &result {
            Ok(path) => {
                info!(%attempt_id, "Résumé saved to {}", path.display());
                self.set(SubmissionState::Succeeded);
            }
            Err(e) => {
                match e {
                    SubmitError::SaveFailed(_) => error!(%attempt_id, "Submission failed: {e}"),
                    _ => warn!(%attempt_id, "Submission failed: {e}"),
                }
                self.set(SubmissionState::Failed(e.code()));
            }
        }
        result
    }

    async fn run(&self, doc: &ResumeDocument) -> Result<PathBuf, SubmitError> {
        let payload = match timeout(self.deadline, self.fetch(doc)).await {
            Ok(fetched) => fetched?,
            Err(_) => {
                warn!("Deadline of {:?} elapsed, abandoning request", self.deadline);
                return Err(SubmitError::Timeout);
            }
        };

        self.set(SubmissionState::Delivering);
        self.sink
            .save(DOWNLOAD_FILENAME, payload)
            .await
            .map_err(|e| SubmitError::SaveFailed(format!("{e:#}")))
    }

    /// Everything inside the deadline: probe, request, classification, body.
    async fn fetch(&self, doc: &ResumeDocument) -> Result<Bytes, SubmitError> {
        self.set(SubmissionState::HealthChecking);
        match timeout(HEALTH_PROBE_TIMEOUT, self.client.health()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Health probe failed, submitting anyway: {e}"),
            Err(_) => warn!("Health probe timed out, submitting anyway"),
        }

        self.set(SubmissionState::Submitting);
        let response = self.client.generate(doc).await.map_err(classify)?;

        self.set(SubmissionState::ValidatingResponse);
        read_pdf(response).await.map_err(classify)
    }

    fn set(&self, next: SubmissionState) {
        self.state.send_replace(next);
    }
}

/// Clears the busy state when a submit future is dropped mid-flight.
struct IdleOnDrop<'a> {
    state: &'a watch::Sender<SubmissionState>,
    finished: bool,
}

impl Drop for IdleOnDrop<'_> {
    fn drop(&mut self) {
        if !self.finished {
            warn!("Submission cancelled before it finished");
            self.state.send_replace(SubmissionState::Idle);
        }
    }
}

fn classify(err: RenderError) -> SubmitError {
    warn!("Render service call failed: {err}");
    SubmitError::from(err)
}
