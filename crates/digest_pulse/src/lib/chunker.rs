//! Splits a time-coded transcript into bounded-duration chunks.

use crate::types::TranscriptEntry;

/// Default chunk ceiling: 15 minutes.
pub const MAX_CHUNK_DURATION_SECS: f64 = 15.0 * 60.0;

#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptChunk {
    pub text: String,
    pub start_offset: f64,
    pub duration: f64,
}

struct OpenChunk<'a> {
    texts: Vec<&'a str>,
    start_offset: f64,
    duration: f64,
}

impl<'a> OpenChunk<'a> {
    fn new(entry: &'a TranscriptEntry) -> Self {
        Self {
            texts: vec![entry.text.as_str()],
            start_offset: entry.start,
            duration: entry.duration,
        }
    }

    /// Duration of the chunk if it were extended through `entry`.
    fn duration_through(&self, entry: &TranscriptEntry) -> f64 {
        entry.start + entry.duration - self.start_offset
    }

    fn push(&mut self, entry: &'a TranscriptEntry) {
        self.duration = self.duration_through(entry);
        self.texts.push(entry.text.as_str());
    }

    fn seal(self) -> TranscriptChunk {
        TranscriptChunk {
            text: self.texts.join(" "),
            start_offset: self.start_offset,
            duration: self.duration,
        }
    }
}

/// Scans `entries` in order and groups them into chunks of at most
/// `max_chunk_duration` seconds.
///
/// A chunk is sealed as soon as its duration reaches the ceiling. An entry that
/// would carry the open chunk past the ceiling starts the next chunk instead, so
/// a chunk only exceeds the ceiling when it holds a single entry longer than the
/// ceiling. The trailing chunk may be shorter.
pub fn split(entries: &[TranscriptEntry], max_chunk_duration: f64) -> Vec<TranscriptChunk> {
    let mut chunks = Vec::new();
    let mut open: Option<OpenChunk> = None;

    for entry in entries {
        open = Some(match open.take() {
            Some(mut chunk) if chunk.duration_through(entry) <= max_chunk_duration => {
                chunk.push(entry);
                chunk
            }
            Some(chunk) => {
                chunks.push(chunk.seal());
                OpenChunk::new(entry)
            }
            None => OpenChunk::new(entry),
        });

        if open
            .as_ref()
            .is_some_and(|chunk| chunk.duration >= max_chunk_duration)
        {
            chunks.extend(open.take().map(OpenChunk::seal));
        }
    }

    chunks.extend(open.map(OpenChunk::seal));
    chunks
}
