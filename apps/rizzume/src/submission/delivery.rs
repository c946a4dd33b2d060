use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use tempfile::NamedTempFile;
use tracing::info;

/// Where a generated PDF ends up once the service has produced it.
#[async_trait]
pub trait DownloadSink: Send + Sync {
    /// Saves `payload` under `filename` and returns the saved location.
    async fn save(&self, filename: &str, payload: Bytes) -> Result<PathBuf>;
}

/// Saves into a directory on the local filesystem.
///
/// The payload is first written to a temp file next to the target and then renamed
/// into place, so a half-written `resume.pdf` is never observed. The temp file is
/// removed on every failure path when it is dropped.
pub struct FileDownloadSink {
    dir: PathBuf,
}

impl FileDownloadSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl DownloadSink for FileDownloadSink {
    async fn save(&self, filename: &str, payload: Bytes) -> Result<PathBuf> {
        let dir = self.dir.clone();
        let target = dir.join(filename);
        tokio::task::spawn_blocking(move || write_via_temp(&dir, &target, &payload))
            .await
            .context("save task failed to complete")?
    }
}

fn write_via_temp(dir: &Path, target: &Path, payload: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("cannot create output directory {}", dir.display()))?;

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("cannot create temp file in {}", dir.display()))?;
    tmp.write_all(payload).context("cannot write PDF bytes")?;
    tmp.as_file().sync_all().context("cannot flush PDF bytes")?;
    // PersistError owns the temp file; keep only the io error so it is removed here
    tmp.persist(target)
        .map_err(|e| e.error)
        .with_context(|| format!("cannot move PDF into {}", target.display()))?;

    info!("Saved {} bytes to {}", payload.len(), target.display());
    Ok(target.to_path_buf())
}
