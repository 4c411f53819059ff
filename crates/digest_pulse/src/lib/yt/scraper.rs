use std::ops::Deref;

use anyhow::Context;

use crate::{
    parser::{parse_playlist, playlist_page_url, YtHtmlDocument},
    types::Playlist,
    yt::PlaylistResolver,
};

pub const YOUTUBE_BASE_URL: &str = "https://www.youtube.com";

#[derive(Debug, Clone)]
pub struct Scraper {
    client: reqwest::Client,
    base_url: String,
}

impl Default for Scraper {
    fn default() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: YOUTUBE_BASE_URL.into(),
        }
    }
}

impl Deref for Scraper {
    type Target = reqwest::Client;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

impl Scraper {
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Loads a youtube page as an html document
    pub(crate) async fn fetch_document(&self, url: &str) -> anyhow::Result<YtHtmlDocument> {
        let yt_html_document = self
            .get(url)
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(yt_html_document.into())
    }
}

impl PlaylistResolver for Scraper {
    #[tracing::instrument(skip(self))]
    async fn resolve_playlist(&self, playlist_url: &str) -> anyhow::Result<Playlist> {
        let page_url = playlist_page_url(&self.base_url, playlist_url)?;

        let doc = self
            .fetch_document(&page_url)
            .await
            .inspect_err(|e| tracing::error!(error = ?e, "Failed to download playlist page"))
            .context("Failed to download playlist page")?;

        let json = doc.to_json::<serde_json::Value>()?;
        let playlist = parse_playlist(&json)?;

        tracing::debug!(
            title = %playlist.title,
            count = playlist.video_ids.len(),
            "Resolved playlist"
        );
        Ok(playlist)
    }
}
