use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use anyhow::Context;
use itertools::Itertools;
use tokio::sync::Mutex;

use crate::ledger::Ledger;

/// Newline-delimited ledger file, one video id per line.
///
/// The file is read once on [`FileLedger::open`]. Every mark rewrites the whole
/// file from the in-memory list. A single writer per file is assumed.
#[derive(Debug)]
pub struct FileLedger {
    path: PathBuf,
    ids: Mutex<Vec<String>>,
}

impl FileLedger {
    pub const DEFAULT_FILE_NAME: &str = "processed_videos.txt";

    /// Loads the ledger at `path`, creating its parent directory if needed.
    /// A missing file is an empty ledger.
    pub async fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create ledger directory {}", parent.display())
            })?;
        }

        let ids = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => parse_ids(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                tracing::error!(error = ?e, path = ?path, "Failed to read ledger file");
                return Err(e).context("Failed to read ledger file");
            }
        };

        tracing::debug!(count = ids.len(), path = ?path, "Loaded processed ledger");

        Ok(FileLedger {
            path,
            ids: Mutex::new(ids),
        })
    }

    /// Opens `processed_videos.txt` inside `dir`.
    pub async fn open_in(dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        Self::open(dir.as_ref().join(Self::DEFAULT_FILE_NAME)).await
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Duplicate and blank lines are dropped; first-seen order is kept.
fn parse_ids(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .unique()
        .map(str::to_string)
        .collect()
}

impl Ledger for FileLedger {
    async fn get_processed_ids(&self, video_ids: &[&str]) -> anyhow::Result<HashSet<String>> {
        let ids = self.ids.lock().await;
        Ok(video_ids
            .iter()
            .filter(|id| ids.iter().any(|known| known.as_str() == **id))
            .map(|id| id.to_string())
            .collect())
    }

    async fn mark_processed(&self, video_id: &str) -> anyhow::Result<()> {
        let mut ids = self.ids.lock().await;
        if ids.iter().any(|known| known == video_id) {
            return Ok(());
        }

        // memory only changes once the file holds the new id
        let contents = ids
            .iter()
            .map(String::as_str)
            .chain([video_id])
            .map(|id| format!("{id}\n"))
            .collect::<String>();
        tokio::fs::write(&self.path, contents)
            .await
            .inspect_err(|e| {
                tracing::error!(error = ?e, video_id, "Failed to write ledger file");
            })
            .context("Failed to write ledger file")?;

        ids.push(video_id.to_string());
        Ok(())
    }

    async fn processed_ids(&self) -> Vec<String> {
        self.ids.lock().await.clone()
    }
}
