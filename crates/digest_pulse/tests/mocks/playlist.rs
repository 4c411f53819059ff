use std::sync::{Arc, Mutex};

use digest_pulse::{types::Playlist, yt::PlaylistResolver};

#[derive(Clone)]
pub struct MockPlaylistResolver {
    pub playlist: Playlist,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
}

impl MockPlaylistResolver {
    pub fn new(title: &str, video_ids: &[&str]) -> Self {
        Self {
            playlist: Playlist {
                title: title.to_string(),
                video_ids: video_ids.iter().map(|id| id.to_string()).collect(),
            },
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Self::new("", &[])
        }
    }
}

impl PlaylistResolver for MockPlaylistResolver {
    async fn resolve_playlist(&self, playlist_url: &str) -> anyhow::Result<Playlist> {
        self.calls.lock().unwrap().push(playlist_url.to_string());
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        Ok(self.playlist.clone())
    }
}
