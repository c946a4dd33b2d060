use std::sync::Arc;

use crate::config::Config;
use crate::form::FormSession;
use crate::submission::SubmissionPipeline;

/// Everything the editor loop needs, shared behind `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<FormSession>,
    pub pipeline: Arc<SubmissionPipeline>,
    pub config: Config,
}
