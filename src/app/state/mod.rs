mod session;

pub use session::{DocumentSession, PlaybackSnapshot};

use tracing::debug;

use crate::config::AppConfig;
use crate::controls::ControlSurface;
use crate::player::Player;

/// Title shown before any media metadata is known.
pub(super) const DEFAULT_TITLE: &str = "m4b Player";

/// The playback controller: owns the document session and the derived UI
/// state, and talks to the shell only through its two collaborator traits.
pub struct App<P: Player, C: ControlSurface> {
    pub(super) player: P,
    pub(super) controls: C,
    pub(super) config: AppConfig,
    pub(super) session: Option<DocumentSession>,
    pub(super) snapshot: PlaybackSnapshot,
}

impl<P: Player, C: ControlSurface> App<P, C> {
    pub fn new(player: P, controls: C, config: AppConfig) -> Self {
        Self {
            player,
            controls,
            config,
            session: None,
            snapshot: PlaybackSnapshot::default(),
        }
    }

    pub fn session(&self) -> Option<&DocumentSession> {
        self.session.as_ref()
    }

    pub fn snapshot(&self) -> &PlaybackSnapshot {
        &self.snapshot
    }

    pub(super) fn is_audiobook(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.is_audiobook)
    }

    pub(super) fn is_current_generation(&self, generation: u64) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.generation == generation)
    }

    pub(super) fn current_chapter_bounds(&self) -> Option<(u64, u64)> {
        let chapter = self.session.as_ref()?.current()?;
        Some((chapter.start, chapter.end))
    }

    /// Make `index` the current chapter and refresh everything derived from
    /// it: the one-row highlight, the counter label, and the seek range.
    /// Only the rows whose highlight actually changed are touched.
    pub(super) fn apply_chapter_change(&mut self, index: usize) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(chapter) = session.table.get(index) else {
            return;
        };
        let (number, start, end) = (chapter.number, chapter.start, chapter.end);
        let total = session.table.len();
        let previous = session.current_chapter.replace(index);

        if let Some(old) = previous.filter(|old| *old != index) {
            self.controls.set_row_highlight(old, false);
        }
        self.controls.set_row_highlight(index, true);
        self.controls.focus_row(index);
        self.controls
            .set_chapter_counter(Some(&format!("{number} / {total}")));
        self.controls.set_seek_range_silently(start, end);
        debug!(chapter = number, start, end, "Current chapter changed");
    }
}
