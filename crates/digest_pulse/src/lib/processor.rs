pub mod builder;

use std::path::{Path, PathBuf};

use anyhow::Context;
use itertools::Itertools;
use notes_ledger::Ledger;

use crate::{
    chunker::{self, TranscriptChunk},
    notes::{self, SummaryDocument},
    prompt,
    yt::{PlaylistResolver, TranscriptFetcher},
    ChatMessage, Completion, Error,
};

const CHUNK_PROMPT: &str = include_str!("./prompts/chunk_0.txt");
const OVERALL_PROMPT: &str = include_str!("./prompts/overall_0.txt");

pub const CHUNK_SUMMARY_ERROR: &str = "Error while generating summary.";
pub const OVERALL_SUMMARY_ERROR: &str = "Error while generating overall summary.";

/// What happened to a single video.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceOutcome {
    Summarized { path: PathBuf, chunks: usize },
    /// No usable transcript. The video is still marked as processed.
    NoTranscript,
}

/// Counts for one pass over a playlist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub playlist_title: String,
    pub found: usize,
    pub new: usize,
    pub summarized: usize,
    pub no_transcript: usize,
    pub failed: usize,
}

// Turns playlist videos into Markdown summary notes
#[derive(Debug)]
pub struct PlaylistProcessor<L, C, T, P>
where
    L: Ledger + Send + Sync + 'static,
    C: Completion + Send + Sync + 'static,
    T: TranscriptFetcher + Send + Sync + 'static,
    P: PlaylistResolver + Send + Sync + 'static,
{
    output_dir: PathBuf,
    ledger: L,
    completion: C,
    transcripts: T,
    playlists: P,
    chunk_duration: f64,
}

impl<L, C, T, P> PlaylistProcessor<L, C, T, P>
where
    L: Ledger + Send + Sync + 'static,
    C: Completion + Send + Sync + 'static,
    T: TranscriptFetcher + Send + Sync + 'static,
    P: PlaylistResolver + Send + Sync + 'static,
{
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn chunk_duration(&self) -> f64 {
        self.chunk_duration
    }

    /// Summarizes one chunk. `index` is zero-based; prompts number parts from 1.
    #[tracing::instrument(skip(self, chunk), fields(start_offset = chunk.start_offset))]
    pub async fn summarize_chunk(
        &self,
        chunk: &TranscriptChunk,
        title: &str,
        index: usize,
    ) -> String {
        let part = (index + 1).to_string();
        let prompt = prompt::fill(
            CHUNK_PROMPT,
            &[
                ("title", title),
                ("part", part.as_str()),
                ("transcript", chunk.text.as_str()),
            ],
        );

        match self.completion.complete(&[ChatMessage::user(prompt)]).await {
            Ok(summary) => summary,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    model = self.completion.model(),
                    "Failed to summarize chunk"
                );
                CHUNK_SUMMARY_ERROR.to_string()
            }
        }
    }

    #[tracing::instrument(skip(self, summaries), fields(chunks = summaries.len()))]
    pub async fn summarize_overall(&self, title: &str, summaries: &[String]) -> String {
        let summaries = summaries.join("\n\n");
        let prompt = prompt::fill(
            OVERALL_PROMPT,
            &[("title", title), ("summaries", summaries.as_str())],
        );

        match self.completion.complete(&[ChatMessage::user(prompt)]).await {
            Ok(summary) => summary,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    model = self.completion.model(),
                    "Failed to summarize video"
                );
                OVERALL_SUMMARY_ERROR.to_string()
            }
        }
    }

    /// Summarizes `video_id` into a note and records it in the ledger.
    ///
    /// Transcript download errors are returned without touching the ledger, so the
    /// video is picked up again on the next pass.
    #[tracing::instrument(skip(self))]
    pub async fn run_for_source(&self, video_id: &str) -> anyhow::Result<SourceOutcome> {
        let transcript = self
            .transcripts
            .fetch_transcript(video_id)
            .await
            .inspect_err(|e| tracing::error!(error = ?e, "Failed to fetch transcript"))
            .context("Failed to fetch transcript")?;

        if transcript.entries.is_empty() {
            tracing::warn!("No transcript available");
            self.ledger
                .mark_processed(video_id)
                .await
                .context("Failed to update ledger")?;
            return Ok(SourceOutcome::NoTranscript);
        }

        let chunks = chunker::split(&transcript.entries, self.chunk_duration);
        tracing::info!(title = %transcript.title, chunks = chunks.len(), "Summarizing video");

        // one chunk at a time, in order
        let mut summaries = Vec::with_capacity(chunks.len());
        for (index, chunk) in chunks.iter().enumerate() {
            summaries.push(self.summarize_chunk(chunk, &transcript.title, index).await);
        }

        let overall = self.summarize_overall(&transcript.title, &summaries).await;

        let document = SummaryDocument::from_parts(
            video_id,
            transcript.title,
            chrono::Local::now().date_naive(),
            overall,
            &chunks,
            summaries,
        );
        let path = notes::persist(&self.output_dir, &document).await?;

        self.ledger
            .mark_processed(video_id)
            .await
            .inspect_err(|e| tracing::error!(error = ?e, "Failed to update ledger"))
            .context("Failed to update ledger")?;

        tracing::info!(path = ?path, "Saved summary");
        Ok(SourceOutcome::Summarized {
            path,
            chunks: chunks.len(),
        })
    }

    /// One pass over `playlist_url`: every video not yet in the ledger is processed
    /// in playlist order.
    #[tracing::instrument(skip(self))]
    pub async fn scan_once(&self, playlist_url: &str) -> anyhow::Result<ScanReport> {
        if playlist_url.trim().is_empty() {
            return Err(Error::MissingPlaylistUrl.into());
        }

        let playlist = match self.playlists.resolve_playlist(playlist_url).await {
            Ok(playlist) => playlist,
            Err(e) => {
                tracing::warn!(error = ?e, "Failed to resolve playlist");
                return Ok(ScanReport::default());
            }
        };

        let mut report = ScanReport {
            playlist_title: playlist.title,
            found: playlist.video_ids.len(),
            ..Default::default()
        };
        if playlist.video_ids.is_empty() {
            tracing::warn!(title = %report.playlist_title, "Playlist has no videos");
            return Ok(report);
        }

        let video_ids = playlist
            .video_ids
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>();
        let processed = self
            .ledger
            .get_processed_ids(&video_ids)
            .await
            .inspect_err(|e| tracing::error!(error = ?e, "Failed to read ledger"))
            .context("Failed to read ledger")?;

        let new_ids = video_ids
            .into_iter()
            .filter(|id| !processed.contains(*id))
            .unique()
            .collect::<Vec<_>>();
        report.new = new_ids.len();

        if new_ids.is_empty() {
            tracing::info!("No new videos to process at this time");
            return Ok(report);
        }
        tracing::info!(count = new_ids.len(), "Processing new videos");

        for video_id in new_ids {
            match self.run_for_source(video_id).await {
                Ok(SourceOutcome::Summarized { .. }) => report.summarized += 1,
                Ok(SourceOutcome::NoTranscript) => report.no_transcript += 1,
                Err(e) => {
                    tracing::error!(error = ?e, video_id, "Failed to process video");
                    report.failed += 1;
                }
            }
        }

        tracing::info!(
            summarized = report.summarized,
            no_transcript = report.no_transcript,
            failed = report.failed,
            "Playlist pass finished"
        );
        Ok(report)
    }
}
