use anyhow::Context;

use crate::{
    parser::{select_caption_track, timed_text_entries},
    types::{PlayerResponse, TimedText, VideoTranscript},
    yt::{scraper::Scraper, TranscriptFetcher},
};

/// Fetches captions through the watch page's player response.
#[derive(Debug, Clone)]
pub struct CaptionFetcher {
    scraper: Scraper,
    languages: Vec<String>,
}

impl CaptionFetcher {
    pub fn new(scraper: Scraper) -> Self {
        Self {
            scraper,
            languages: vec!["pl".into(), "en".into()],
        }
    }

    /// Caption languages in order of preference.
    pub fn with_languages<S: Into<String>>(
        mut self,
        languages: impl IntoIterator<Item = S>,
    ) -> Self {
        self.languages = languages.into_iter().map(Into::into).collect();
        self
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }
}

impl TranscriptFetcher for CaptionFetcher {
    #[tracing::instrument(skip(self))]
    async fn fetch_transcript(&self, video_id: &str) -> anyhow::Result<VideoTranscript> {
        let watch_url = format!("{}/watch?v={video_id}", self.scraper.base_url());

        let doc = self
            .scraper
            .fetch_document(&watch_url)
            .await
            .context("Failed to download watch page")?;
        let player = doc.player_response::<PlayerResponse>()?;

        let title = player
            .video_details
            .map(|details| details.title)
            .unwrap_or_else(|| video_id.to_string());

        let tracks = player
            .captions
            .map(|captions| captions.tracklist.caption_tracks)
            .unwrap_or_default();

        let Some(track) = select_caption_track(&tracks, &self.languages) else {
            tracing::warn!(
                languages = ?self.languages,
                available = tracks.len(),
                "No caption track in a preferred language"
            );
            return Ok(VideoTranscript {
                video_id: video_id.to_string(),
                title,
                entries: Vec::new(),
            });
        };

        let timed_text = self
            .scraper
            .get(format!("{}&fmt=json3", track.base_url))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
            .context("Failed to download captions")?;

        // an empty body means the track has no cues
        let timed_text = if timed_text.trim().is_empty() {
            TimedText::default()
        } else {
            serde_json::from_str::<TimedText>(&timed_text).context("Failed to parse captions")?
        };

        let entries = timed_text_entries(timed_text);
        tracing::debug!(
            language = %track.language_code,
            entries = entries.len(),
            "Fetched transcript"
        );

        Ok(VideoTranscript {
            video_id: video_id.to_string(),
            title,
            entries,
        })
    }
}
