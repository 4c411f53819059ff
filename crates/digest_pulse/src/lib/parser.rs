//! # Yt Parser
//!
//! This module provides functionality to pull the embedded JSON documents out of
//! YouTube pages: `ytInitialData` on playlist pages and `ytInitialPlayerResponse`
//! on watch pages, and to turn them into playlists and transcripts.

use std::{ops::Deref, sync::LazyLock};

use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    error::Error,
    types::{CaptionTrack, Playlist, TimedText, TranscriptEntry},
};

static YT_INTIALDATA_RE: LazyLock<Regex> = LazyLock::new(|| {
    regex::Regex::new(r"(?s)<script[^>]*>\s*var\s+ytInitialData\s*=\s*(\{.*?\});\s*</script>")
        .unwrap()
});

static YT_PLAYER_RESPONSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    regex::Regex::new(
        r"(?s)var\s+ytInitialPlayerResponse\s*=\s*(\{.*?\});\s*(?:var\s+meta\b|</script>)",
    )
    .unwrap()
});

static PLAYLIST_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| regex::Regex::new(r"[?&]list=([A-Za-z0-9_-]+)").unwrap());

/// Canonical playlist page URL for any URL carrying a `list=` parameter.
pub fn playlist_page_url(base_url: &str, playlist_url: &str) -> Result<String, Error> {
    let list_id = PLAYLIST_ID_RE
        .captures(playlist_url)
        .and_then(|cap| cap.get(1))
        .ok_or_else(|| Error::InvalidPlaylistUrl(playlist_url.to_string()))?;

    Ok(format!(
        "{}/playlist?list={}",
        base_url.trim_end_matches('/'),
        list_id.as_str()
    ))
}

/// Parses the playlist title and its video ids, in playlist order, from a
/// playlist page's `ytInitialData`.
///
/// Entries flagged as unplayable (deleted or private videos) are skipped.
#[tracing::instrument(skip(json))]
pub fn parse_playlist(json: &Value) -> Result<Playlist, Error> {
    let tabs = json["contents"]["twoColumnBrowseResultsRenderer"]["tabs"]
        .as_array()
        .ok_or(Error::ParseError(
            "Failed to get playlist contents, structure might have changed",
        ))?;

    let video_ids = tabs
        .iter()
        .filter_map(|tab| {
            tab["tabRenderer"]["content"]["sectionListRenderer"]["contents"].as_array()
        })
        .flatten()
        .filter_map(|section| section["itemSectionRenderer"]["contents"].as_array())
        .flatten()
        .filter_map(|item| item["playlistVideoListRenderer"]["contents"].as_array())
        .flatten()
        .map(|entry| &entry["playlistVideoRenderer"])
        .filter(|renderer| renderer["isPlayable"].as_bool() != Some(false))
        .filter_map(|renderer| renderer["videoId"].as_str())
        .map(str::to_string)
        .collect::<Vec<_>>();

    let title = json["metadata"]["playlistMetadataRenderer"]["title"]
        .as_str()
        .or_else(|| json["header"]["playlistHeaderRenderer"]["title"]["simpleText"].as_str())
        .unwrap_or_default()
        .to_string();

    Ok(Playlist { title, video_ids })
}

/// Picks the caption track to fetch: languages are tried in preference order,
/// and within one language a manually created track wins over a generated one.
pub fn select_caption_track<'a, S: AsRef<str>>(
    tracks: &'a [CaptionTrack],
    languages: &[S],
) -> Option<&'a CaptionTrack> {
    languages.iter().find_map(|lang| {
        let lang = lang.as_ref();
        let mut generated = None;
        for track in tracks.iter().filter(|t| t.language_code == lang) {
            if !track.is_generated() {
                return Some(track);
            }
            if generated.is_none() {
                generated = Some(track);
            }
        }
        generated
    })
}

/// Maps `fmt=json3` timed text events to transcript entries. Events without text
/// (window and style markers, bare line breaks) are dropped.
pub fn timed_text_entries(timed_text: TimedText) -> Vec<TranscriptEntry> {
    timed_text
        .events
        .into_iter()
        .filter_map(|event| {
            let text = event
                .segs
                .iter()
                .map(|seg| seg.utf8.as_str())
                .collect::<String>()
                .replace('\n', " ");
            let text = text.trim();

            (!text.is_empty()).then(|| {
                TranscriptEntry::new(text, event.start_ms / 1000.0, event.duration_ms / 1000.0)
            })
        })
        .collect()
}

pub struct YtHtmlDocument(String);

impl Deref for YtHtmlDocument {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl YtHtmlDocument {
    pub fn new(doc: String) -> Self {
        YtHtmlDocument(doc)
    }

    /// Extracts the `ytInitialData` script payload.
    pub fn to_json<T>(&self) -> Result<T, crate::error::Error>
    where
        T: DeserializeOwned,
    {
        self.extract(
            &YT_INTIALDATA_RE,
            "Failed to extract ytInitialData from the page's script tag",
        )
    }

    /// Extracts the `ytInitialPlayerResponse` script payload of a watch page.
    pub fn player_response<T>(&self) -> Result<T, crate::error::Error>
    where
        T: DeserializeOwned,
    {
        self.extract(
            &YT_PLAYER_RESPONSE_RE,
            "Failed to extract ytInitialPlayerResponse from the watch page",
        )
    }

    fn extract<T>(&self, re: &Regex, reason: &'static str) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let payload = re
            .captures(self)
            .and_then(|cap| cap.get(1))
            .ok_or(Error::ParseError(reason))?;

        Ok(serde_json::from_str(payload.as_str())?)
    }
}

impl From<String> for YtHtmlDocument {
    fn from(value: String) -> Self {
        YtHtmlDocument(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PlayerResponse, TimedTextEvent, TimedTextSeg};
    use serde_json::json;

    fn track(lang: &str, kind: Option<&str>) -> CaptionTrack {
        CaptionTrack {
            base_url: format!("https://example.com/timedtext?lang={lang}"),
            language_code: lang.to_string(),
            kind: kind.map(str::to_string),
        }
    }

    #[test]
    fn test_successful_extraction() {
        let html = r#"
            <html>
                <head>
                    <script nonce="gZTn8MILMQFuWon1rDk2VA">
                        var ytInitialData = {"key": "value", "number": 42};
                    </script>
                </head>
                <body>
                    <p>Some content</p>
                </body>
            </html>
        "#;

        let doc = YtHtmlDocument::from(html.to_string());
        let result = doc.to_json::<Value>();
        assert!(result.is_ok(), "Failed to extract JSON: {:?}", result.err());
        assert_eq!(result.unwrap(), json!({"key": "value", "number": 42}));
    }

    #[test]
    fn test_extraction_with_multiple_occurrences() {
        let html = r#"
            <script nonce="gZTn8MILMQFuWon1rDk2VA">var ytInitialData = {"first": true};</script>
            <script nonce="gZTn8MILMQFuWon1rDk2VA">
                var ytInitialData = {"second": true};
            </script>
        "#;

        let doc = YtHtmlDocument::from(html.to_string());
        let json = doc
            .to_json::<Value>()
            .expect("Failed to extract first JSON");
        assert_eq!(json, json!({"first": true}));
    }

    #[test]
    fn test_extraction_with_no_data() {
        let doc = YtHtmlDocument::from("<html><body><p>Nothing here</p></body></html>".to_string());
        assert!(matches!(doc.to_json::<Value>(), Err(Error::ParseError(_))));
        assert!(matches!(
            doc.player_response::<Value>(),
            Err(Error::ParseError(_))
        ));
    }

    #[test]
    fn test_extraction_with_invalid_json() {
        let html = r#"
            <script nonce="gZTn8MILMQFuWon1rDk2VA">
                var ytInitialData = {invalid: json};
            </script>
        "#;

        let doc = YtHtmlDocument::from(html.to_string());
        let result = doc.to_json::<Value>();
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_player_response_extraction_stops_before_meta() {
        let html = concat!(
            r#"<script nonce="x">var ytInitialPlayerResponse = "#,
            r#"{"videoDetails": {"videoId": "abc123", "title": "Talk"}};"#,
            r#"var meta = document.createElement('meta');</script>"#,
        );

        let doc = YtHtmlDocument::from(html.to_string());
        let player = doc
            .player_response::<PlayerResponse>()
            .expect("Failed to extract player response");
        let details = player.video_details.unwrap();
        assert_eq!(details.video_id, "abc123");
        assert_eq!(details.title, "Talk");
        assert!(player.captions.is_none());
    }

    #[test]
    fn test_playlist_page_url() {
        assert_eq!(
            playlist_page_url(
                "https://www.youtube.com",
                "https://www.youtube.com/watch?v=abc&list=PLx_y-1&index=2"
            )
            .unwrap(),
            "https://www.youtube.com/playlist?list=PLx_y-1"
        );
        assert!(matches!(
            playlist_page_url("https://www.youtube.com", "https://www.youtube.com/watch?v=abc"),
            Err(Error::InvalidPlaylistUrl(_))
        ));
    }

    #[test]
    fn test_parse_playlist_collects_playable_ids_in_order() {
        let json = json!({
            "metadata": {"playlistMetadataRenderer": {"title": "AI talks"}},
            "contents": {"twoColumnBrowseResultsRenderer": {"tabs": [{
                "tabRenderer": {"content": {"sectionListRenderer": {"contents": [{
                    "itemSectionRenderer": {"contents": [{
                        "playlistVideoListRenderer": {"contents": [
                            {"playlistVideoRenderer": {"videoId": "v1", "isPlayable": true}},
                            {"playlistVideoRenderer": {"videoId": "v2", "isPlayable": false}},
                            {"playlistVideoRenderer": {"videoId": "v3"}},
                            {"continuationItemRenderer": {}}
                        ]}
                    }]}
                }]}}}
            }]}}
        });

        let playlist = parse_playlist(&json).expect("Failed to parse playlist");
        assert_eq!(playlist.title, "AI talks");
        assert_eq!(playlist.video_ids, ["v1", "v3"]);
    }

    #[test]
    fn test_parse_playlist_rejects_unexpected_structure() {
        assert!(matches!(
            parse_playlist(&json!({"contents": {}})),
            Err(Error::ParseError(_))
        ));
    }

    #[test]
    fn test_select_caption_track_follows_language_preference() {
        let tracks = vec![
            track("en", Some("asr")),
            track("de", None),
            track("en", None),
        ];

        let picked = select_caption_track(&tracks, &["pl", "en"]).unwrap();
        assert_eq!(picked.language_code, "en");
        assert!(!picked.is_generated(), "Manual track should win over asr");

        let picked = select_caption_track(&tracks[..1], &["pl", "en"]).unwrap();
        assert!(picked.is_generated());

        assert!(select_caption_track(&tracks, &["fr"]).is_none());
    }

    #[test]
    fn test_timed_text_entries_drop_empty_events() {
        let seg = |s: &str| TimedTextSeg { utf8: s.to_string() };
        let timed_text = TimedText {
            events: vec![
                TimedTextEvent { start_ms: 0.0, duration_ms: 0.0, segs: vec![] },
                TimedTextEvent {
                    start_ms: 1500.0,
                    duration_ms: 2000.0,
                    segs: vec![seg("hello"), seg(" world\n")],
                },
                TimedTextEvent { start_ms: 3500.0, duration_ms: 0.0, segs: vec![seg("\n")] },
                TimedTextEvent {
                    start_ms: 4000.0,
                    duration_ms: 1000.0,
                    segs: vec![seg("next\nline")],
                },
            ],
        };

        assert_eq!(
            timed_text_entries(timed_text),
            vec![
                TranscriptEntry::new("hello world", 1.5, 2.0),
                TranscriptEntry::new("next line", 4.0, 1.0),
            ]
        );
    }
}
