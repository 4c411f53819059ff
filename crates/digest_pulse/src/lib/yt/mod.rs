pub mod captions;
pub mod scraper;

use std::future::Future;

use crate::types::{Playlist, VideoTranscript};

pub trait PlaylistResolver {
    /// Resolves `playlist_url` to its title and member video ids, in order.
    fn resolve_playlist(
        &self,
        playlist_url: &str,
    ) -> impl Future<Output = anyhow::Result<Playlist>> + Send;
}

pub trait TranscriptFetcher {
    /// Fetches the title and transcript of `video_id`.
    ///
    /// A video without captions in any preferred language is `Ok` with no entries.
    fn fetch_transcript(
        &self,
        video_id: &str,
    ) -> impl Future<Output = anyhow::Result<VideoTranscript>> + Send;
}
