//! Render client: the single point of contact with the external PDF rendering service.
//!
//! The service accepts the résumé document as JSON on its generate endpoint and answers
//! with `application/pdf` bytes, or a JSON `{"error": ..., "traceback": ...}` payload.
//! No request timeout is set here: the submission pipeline owns the deadline.

use bytes::Bytes;
use reqwest::{header::CONTENT_TYPE, Client, Response, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::models::resume::ResumeDocument;

pub const PDF_MEDIA_TYPE: &str = "application/pdf";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("expected application/pdf, got '{0}'")]
    NotPdf(String),
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    error: ErrorField,
    #[serde(default)]
    traceback: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorField {
    Message(String),
    Detailed { message: String },
}

#[derive(Clone)]
pub struct RenderClient {
    client: Client,
    generate_url: String,
    health_url: String,
}

impl RenderClient {
    pub fn new(base_url: &str, generate_path: &str, health_path: &str) -> Result<Self, RenderError> {
        let base = base_url.trim_end_matches('/');
        Ok(Self {
            client: Client::builder().build()?,
            generate_url: format!("{base}{generate_path}"),
            health_url: format!("{base}{health_path}"),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, RenderError> {
        Self::new(
            &config.render_service_url,
            &config.generate_path,
            &config.health_path,
        )
    }

    /// Liveness probe. Any non-2xx status counts as unhealthy.
    pub async fn health(&self) -> Result<(), RenderError> {
        let response = self.client.get(&self.health_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RenderError::Api {
                status: status.as_u16(),
                message: status_text(status),
            });
        }
        debug!("Render service healthy ({})", status);
        Ok(())
    }

    /// Posts the document and returns the raw response for `read_pdf` to classify.
    pub async fn generate(&self, doc: &ResumeDocument) -> Result<Response, RenderError> {
        let response = self
            .client
            .post(&self.generate_url)
            .json(doc)
            .send()
            .await?;
        debug!("Render service answered {}", response.status());
        Ok(response)
    }
}

/// Classifies a generate response and reads the PDF body.
pub async fn read_pdf(response: Response) -> Result<Bytes, RenderError> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(RenderError::Api {
            status: status.as_u16(),
            message: error_message(status, &body),
        });
    }

    let declared = response
        .headers()
        .get(CONTENT_TYPE)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());
    if !is_pdf(declared.as_deref()) {
        return Err(RenderError::NotPdf(declared.unwrap_or_else(|| "none".to_string())));
    }

    Ok(response.bytes().await?)
}

/// True when the media type (parameters stripped) is `application/pdf`.
pub fn is_pdf(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .map(|media| media.trim().eq_ignore_ascii_case(PDF_MEDIA_TYPE))
        .unwrap_or(false)
}

/// Human-readable message from an error body, falling back to the status text.
fn error_message(status: StatusCode, body: &str) -> String {
    let parsed = match serde_json::from_str::<ErrorPayload>(body) {
        Ok(payload) => payload,
        Err(_) => return status_text(status),
    };

    if let Some(traceback) = &parsed.traceback {
        debug!("Render service traceback: {}", traceback);
    }

    let message = match parsed.error {
        ErrorField::Message(m) | ErrorField::Detailed { message: m } => m,
    };
    if message.trim().is_empty() {
        status_text(status)
    } else {
        message
    }
}

fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}
