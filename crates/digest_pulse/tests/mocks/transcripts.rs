use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
};

use digest_pulse::{
    types::{TranscriptEntry, VideoTranscript},
    yt::TranscriptFetcher,
};

/// Serves canned transcripts. Unknown ids have no captions.
#[derive(Clone, Default)]
pub struct MockTranscriptFetcher {
    pub transcripts: HashMap<String, VideoTranscript>,
    pub failing_ids: HashSet<String>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl MockTranscriptFetcher {
    pub fn with_transcript(
        mut self,
        video_id: &str,
        title: &str,
        entries: Vec<TranscriptEntry>,
    ) -> Self {
        self.transcripts.insert(
            video_id.to_string(),
            VideoTranscript {
                video_id: video_id.to_string(),
                title: title.to_string(),
                entries,
            },
        );
        self
    }

    pub fn failing_for(mut self, video_id: &str) -> Self {
        self.failing_ids.insert(video_id.to_string());
        self
    }
}

impl TranscriptFetcher for MockTranscriptFetcher {
    async fn fetch_transcript(&self, video_id: &str) -> anyhow::Result<VideoTranscript> {
        self.calls.lock().unwrap().push(video_id.to_string());
        if self.failing_ids.contains(video_id) {
            return Err(anyhow::anyhow!("watch page unavailable for {video_id}"));
        }
        Ok(self
            .transcripts
            .get(video_id)
            .cloned()
            .unwrap_or_else(|| VideoTranscript {
                video_id: video_id.to_string(),
                title: video_id.to_string(),
                entries: Vec::new(),
            }))
    }
}
