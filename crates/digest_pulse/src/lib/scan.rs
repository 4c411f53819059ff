//! Recurring playlist scans on a background task.

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use notes_ledger::Ledger;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{
    yt::{PlaylistResolver, TranscriptFetcher},
    Completion, Error, PlaylistProcessor,
};

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(600);

pub struct ScanDriver<L, C, T, P>
where
    L: Ledger + Send + Sync + 'static,
    C: Completion + Send + Sync + 'static,
    T: TranscriptFetcher + Send + Sync + 'static,
    P: PlaylistResolver + Send + Sync + 'static,
{
    processor: Arc<PlaylistProcessor<L, C, T, P>>,
    playlist_url: String,
    interval: Duration,
}

impl<L, C, T, P> ScanDriver<L, C, T, P>
where
    L: Ledger + Send + Sync + 'static,
    C: Completion + Send + Sync + 'static,
    T: TranscriptFetcher + Send + Sync + 'static,
    P: PlaylistResolver + Send + Sync + 'static,
{
    pub fn new(
        processor: Arc<PlaylistProcessor<L, C, T, P>>,
        playlist_url: impl Into<String>,
        interval: Duration,
    ) -> Self {
        Self {
            processor,
            playlist_url: playlist_url.into(),
            interval,
        }
    }

    /// Scans immediately, then once per `interval` until `token` is cancelled.
    ///
    /// Cancellation ends a pending sleep but never an in-flight pass.
    #[tracing::instrument(skip_all, fields(playlist_url = %self.playlist_url))]
    pub async fn run(self, token: CancellationToken) -> anyhow::Result<()> {
        if self.playlist_url.trim().is_empty() {
            return Err(Error::MissingPlaylistUrl.into());
        }

        let mut passes = 0usize;
        loop {
            passes += 1;
            match self.processor.scan_once(&self.playlist_url).await {
                Ok(report) => tracing::info!(pass = passes, new = report.new, "Scan complete"),
                // the next pass retries whatever this one could not finish
                Err(e) => tracing::error!(error = ?e, pass = passes, "Playlist pass failed"),
            }

            if token.is_cancelled() {
                break;
            }

            tokio::select! {
                _ = token.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        tracing::info!(passes, "Scan driver stopped");
        Ok(())
    }

    pub fn spawn(self, token: CancellationToken) -> ScanHandle {
        let task = tokio::spawn(self.run(token.clone()));
        ScanHandle { token, task }
    }
}

/// A running [`ScanDriver`].
#[derive(Debug)]
pub struct ScanHandle {
    token: CancellationToken,
    task: JoinHandle<anyhow::Result<()>>,
}

impl ScanHandle {
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Cancels the driver and waits for the current pass to finish.
    pub async fn stop(self) -> anyhow::Result<()> {
        self.token.cancel();
        self.task.await.context("Scan task panicked")?
    }
}
