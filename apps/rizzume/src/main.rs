mod config;
mod editor;
mod errors;
mod form;
mod models;
mod preview;
mod render_client;
mod state;
mod submission;

use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::form::FormSession;
use crate::render_client::RenderClient;
use crate::state::AppState;
use crate::submission::{FileDownloadSink, SubmissionPipeline};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Logs go to stderr; stdout belongs to the editor
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting Rizzume editor v{}", env!("CARGO_PKG_VERSION"));

    let client = RenderClient::from_config(&config)?;
    info!(
        "Render service at {} (deadline {:?})",
        config.render_service_url, config.submit_deadline
    );

    let sink = Arc::new(FileDownloadSink::new(config.output_dir.clone()));
    info!("PDFs will be saved under {}", config.output_dir.display());

    let state = AppState {
        session: Arc::new(FormSession::new()),
        pipeline: Arc::new(SubmissionPipeline::new(
            client,
            sink,
            config.submit_deadline,
        )),
        config,
    };

    editor::run(state).await
}
