//! Markdown summary notes, one file per video.

use std::{
    fmt::Write as _,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use anyhow::Context;
use chrono::NaiveDate;
use regex::Regex;

use crate::chunker::TranscriptChunk;

const WATCH_URL: &str = "https://www.youtube.com/watch";

static ILLEGAL_FILENAME_CHARS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\\/*?:"<>|]"#).unwrap());

#[derive(Debug, Clone, PartialEq)]
pub struct ChunkSummary {
    pub start_offset: f64,
    pub summary: String,
}

#[derive(Debug, Clone)]
pub struct SummaryDocument {
    pub video_id: String,
    pub title: String,
    pub generated_date: NaiveDate,
    pub overall_summary: String,
    pub chunk_summaries: Vec<ChunkSummary>,
}

impl SummaryDocument {
    /// Pairs each summary with the start offset of the chunk it came from.
    pub fn from_parts(
        video_id: impl Into<String>,
        title: impl Into<String>,
        generated_date: NaiveDate,
        overall_summary: impl Into<String>,
        chunks: &[TranscriptChunk],
        summaries: Vec<String>,
    ) -> Self {
        let chunk_summaries = chunks
            .iter()
            .zip(summaries)
            .map(|(chunk, summary)| ChunkSummary {
                start_offset: chunk.start_offset,
                summary,
            })
            .collect();

        Self {
            video_id: video_id.into(),
            title: title.into(),
            generated_date,
            overall_summary: overall_summary.into(),
            chunk_summaries,
        }
    }

    pub fn source_link(&self) -> String {
        format!("{WATCH_URL}?v={}", self.video_id)
    }

    /// `{sanitized title}_{YYYYMMDD}.md`, falling back to the video id when the
    /// title has no usable characters.
    pub fn file_name(&self) -> String {
        let safe_title = sanitize_title(&self.title);
        let stem = if safe_title.trim().is_empty() {
            self.video_id.as_str()
        } else {
            safe_title.as_str()
        };
        format!("{stem}_{}.md", self.generated_date.format("%Y%m%d"))
    }

    pub fn render(&self) -> String {
        let mut md = String::new();

        // writing to a String cannot fail
        let _ = write!(md, "# {}\n\n", self.title);
        let _ = writeln!(md, "Link: [YouTube]({})", self.source_link());
        let _ = write!(
            md,
            "Summary date: {}\n\n",
            self.generated_date.format("%Y-%m-%d")
        );

        md.push_str("## Overall summary\n\n");
        let _ = write!(md, "{}\n\n", self.overall_summary);

        md.push_str("## Summaries of individual chunks\n\n");
        for (i, chunk) in self.chunk_summaries.iter().enumerate() {
            let _ = write!(
                md,
                "### Chunk {} (from {})\n\n",
                i + 1,
                format_offset(chunk.start_offset)
            );
            let _ = write!(md, "{}\n\n", chunk.summary);
        }

        md
    }
}

/// Removes characters that are not allowed in file names.
pub fn sanitize_title(title: &str) -> String {
    ILLEGAL_FILENAME_CHARS_RE.replace_all(title, "").into_owned()
}

/// `HH:MM:SS`, floored to whole seconds. Hours keep counting past 24.
pub fn format_offset(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// Writes `document` into `output_dir`, overwriting a note with the same name.
#[tracing::instrument(skip(document), fields(video_id = %document.video_id))]
pub async fn persist(output_dir: &Path, document: &SummaryDocument) -> anyhow::Result<PathBuf> {
    tokio::fs::create_dir_all(output_dir)
        .await
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

    let path = output_dir.join(document.file_name());
    tokio::fs::write(&path, document.render())
        .await
        .inspect_err(|e| tracing::error!(error = ?e, path = ?path, "Failed to write summary"))
        .context("Failed to write summary")?;

    Ok(path)
}
