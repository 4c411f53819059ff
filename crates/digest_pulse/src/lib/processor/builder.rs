use std::path::PathBuf;

use notes_ledger::Ledger;

use crate::{
    chunker::MAX_CHUNK_DURATION_SECS,
    yt::{PlaylistResolver, TranscriptFetcher},
    Completion, PlaylistProcessor,
};

pub struct PlaylistProcessorBuilder<L = (), C = (), T = (), P = ()> {
    output_dir: PathBuf,
    ledger: L,
    completion: C,
    transcripts: T,
    playlists: P,
    chunk_duration: f64,
}

impl PlaylistProcessorBuilder {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ledger: (),
            completion: (),
            transcripts: (),
            playlists: (),
            chunk_duration: MAX_CHUNK_DURATION_SECS,
        }
    }
}

impl<L, C, T, P> PlaylistProcessorBuilder<L, C, T, P> {
    pub fn ledger<L2: Ledger + Send + Sync + 'static>(
        self,
        ledger: L2,
    ) -> PlaylistProcessorBuilder<L2, C, T, P> {
        PlaylistProcessorBuilder {
            output_dir: self.output_dir,
            ledger,
            completion: self.completion,
            transcripts: self.transcripts,
            playlists: self.playlists,
            chunk_duration: self.chunk_duration,
        }
    }

    pub fn completion<C2: Completion + Send + Sync + 'static>(
        self,
        completion: C2,
    ) -> PlaylistProcessorBuilder<L, C2, T, P> {
        PlaylistProcessorBuilder {
            output_dir: self.output_dir,
            ledger: self.ledger,
            completion,
            transcripts: self.transcripts,
            playlists: self.playlists,
            chunk_duration: self.chunk_duration,
        }
    }

    pub fn transcripts<T2: TranscriptFetcher + Send + Sync + 'static>(
        self,
        transcripts: T2,
    ) -> PlaylistProcessorBuilder<L, C, T2, P> {
        PlaylistProcessorBuilder {
            output_dir: self.output_dir,
            ledger: self.ledger,
            completion: self.completion,
            transcripts,
            playlists: self.playlists,
            chunk_duration: self.chunk_duration,
        }
    }

    pub fn playlists<P2: PlaylistResolver + Send + Sync + 'static>(
        self,
        playlists: P2,
    ) -> PlaylistProcessorBuilder<L, C, T, P2> {
        PlaylistProcessorBuilder {
            output_dir: self.output_dir,
            ledger: self.ledger,
            completion: self.completion,
            transcripts: self.transcripts,
            playlists,
            chunk_duration: self.chunk_duration,
        }
    }

    /// Chunk ceiling in seconds. Defaults to 15 minutes.
    pub fn chunk_duration(mut self, seconds: f64) -> Self {
        self.chunk_duration = seconds;
        self
    }
}

impl<L, C, T, P> PlaylistProcessorBuilder<L, C, T, P>
where
    L: Ledger + Send + Sync + 'static,
    C: Completion + Send + Sync + 'static,
    T: TranscriptFetcher + Send + Sync + 'static,
    P: PlaylistResolver + Send + Sync + 'static,
{
    pub fn build(self) -> PlaylistProcessor<L, C, T, P> {
        PlaylistProcessor {
            output_dir: self.output_dir,
            ledger: self.ledger,
            completion: self.completion,
            transcripts: self.transcripts,
            playlists: self.playlists,
            chunk_duration: self.chunk_duration,
        }
    }
}
