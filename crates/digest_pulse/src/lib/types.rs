use serde::Deserialize;

/// One timed utterance of a transcript, in seconds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TranscriptEntry {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

impl TranscriptEntry {
    pub fn new(text: impl Into<String>, start: f64, duration: f64) -> Self {
        Self {
            text: text.into(),
            start,
            duration,
        }
    }
}

/// A video's title plus its transcript in time order. `entries` is empty when the
/// video has no usable captions.
#[derive(Debug, Clone, Default)]
pub struct VideoTranscript {
    pub video_id: String,
    pub title: String,
    pub entries: Vec<TranscriptEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct Playlist {
    pub title: String,
    pub video_ids: Vec<String>,
}

// ytInitialPlayerResponse

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResponse {
    pub video_details: Option<VideoDetails>,
    pub captions: Option<Captions>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetails {
    pub video_id: String,
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct Captions {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    pub tracklist: CaptionTracklist,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionTracklist {
    #[serde(default)]
    pub caption_tracks: Vec<CaptionTrack>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionTrack {
    pub base_url: String,
    pub language_code: String,
    /// `"asr"` for auto-generated tracks
    #[serde(default)]
    pub kind: Option<String>,
}

impl CaptionTrack {
    pub fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

// timedtext `fmt=json3`

#[derive(Debug, Default, Deserialize)]
pub struct TimedText {
    #[serde(default)]
    pub events: Vec<TimedTextEvent>,
}

#[derive(Debug, Deserialize)]
pub struct TimedTextEvent {
    #[serde(rename = "tStartMs", default)]
    pub start_ms: f64,
    #[serde(rename = "dDurationMs", default)]
    pub duration_ms: f64,
    #[serde(default)]
    pub segs: Vec<TimedTextSeg>,
}

#[derive(Debug, Deserialize)]
pub struct TimedTextSeg {
    #[serde(default)]
    pub utf8: String,
}
