use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::submission::DEFAULT_DEADLINE;

/// Editor configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub render_service_url: String,
    pub generate_path: String,
    pub health_path: String,
    pub submit_deadline: Duration,
    pub output_dir: PathBuf,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let deadline_secs = match lookup("SUBMIT_DEADLINE_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .context("SUBMIT_DEADLINE_SECS must be a whole number of seconds")?,
            None => DEFAULT_DEADLINE.as_secs(),
        };
        if deadline_secs == 0 {
            bail!("SUBMIT_DEADLINE_SECS must be greater than zero");
        }

        Ok(Config {
            render_service_url: lookup("RENDER_SERVICE_URL").with_context(|| {
                "Required environment variable 'RENDER_SERVICE_URL' is not set"
            })?,
            generate_path: lookup("GENERATE_PATH").unwrap_or_else(|| "/generate-pdf".to_string()),
            health_path: lookup("HEALTH_PATH").unwrap_or_else(|| "/health".to_string()),
            submit_deadline: Duration::from_secs(deadline_secs),
            output_dir: lookup("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("RENDER_SERVICE_URL", "http://localhost:5000")]).unwrap();
        assert_eq!(config.generate_path, "/generate-pdf");
        assert_eq!(config.health_path, "/health");
        assert_eq!(config.submit_deadline, Duration::from_secs(60));
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_missing_service_url() {
        let err = load(&[]).unwrap_err();
        assert!(err.to_string().contains("RENDER_SERVICE_URL"));
    }

    #[test]
    fn test_deadline_must_be_positive_number() {
        let base = ("RENDER_SERVICE_URL", "http://localhost:5000");
        assert!(load(&[base, ("SUBMIT_DEADLINE_SECS", "0")]).is_err());
        assert!(load(&[base, ("SUBMIT_DEADLINE_SECS", "soon")]).is_err());
        let config = load(&[base, ("SUBMIT_DEADLINE_SECS", "15")]).unwrap();
        assert_eq!(config.submit_deadline, Duration::from_secs(15));
    }
}
