use std::path::PathBuf;

use crate::chapters::{Chapter, ChapterTable};
use crate::player::PlaybackState;

/// Everything tied to the currently opened file.
///
/// A session is built up-front and swapped in wholesale on each open, so a
/// half-updated document can never be observed. `generation` is a monotonic
/// open counter: player events carry the generation they were subscribed
/// under, and events from a superseded document are dropped on arrival.
#[derive(Debug, Clone)]
pub struct DocumentSession {
    pub path: PathBuf,
    pub is_audiobook: bool,
    pub table: ChapterTable,
    /// 0-based index into `table`; `None` outside audiobook mode.
    pub current_chapter: Option<usize>,
    pub generation: u64,
}

impl DocumentSession {
    pub fn new(path: PathBuf, generation: u64) -> Self {
        Self {
            path,
            is_audiobook: false,
            table: ChapterTable::default(),
            current_chapter: None,
            generation,
        }
    }

    pub fn current(&self) -> Option<&Chapter> {
        self.table.get(self.current_chapter?)
    }
}

/// Most recent values reported by the player; refreshed on every event and
/// never persisted.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaybackSnapshot {
    /// Position in whole seconds.
    pub position: u64,
    /// Total stream duration in whole seconds, once known.
    pub duration: u64,
    pub volume: f64,
    pub state: PlaybackState,
}
