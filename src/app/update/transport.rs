//! Handlers for user-originated transport intents.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use super::super::state::{App, DEFAULT_TITLE, DocumentSession, PlaybackSnapshot};
use crate::chapters::ChapterTable;
use crate::container;
use crate::controls::{ChapterRow, ControlSurface};
use crate::player::{PlaybackState, Player};
use crate::time_utils::format_clock;

/// Seek range used between issuing the load and the first duration event.
const INITIAL_SEEK_RANGE_END: u64 = 10;

impl<P: Player, C: ControlSurface> App<P, C> {
    pub(super) fn handle_open(&mut self, path: PathBuf) {
        info!(path = %path.display(), "Opening media");

        // The previous document's chapter UI must be gone before the new
        // container is even sniffed.
        self.controls.clear_chapter_rows();
        self.controls.set_cover_image(None);
        self.controls.set_title_label(DEFAULT_TITLE);
        self.controls.set_chapter_counter(None);
        self.controls.set_progress_fraction(0.0);

        let generation = self
            .session
            .as_ref()
            .map_or(1, |session| session.generation + 1);
        let mut session = DocumentSession::new(path, generation);
        self.snapshot = PlaybackSnapshot::default();

        self.player.load(&session.path);
        self.controls
            .set_seek_range_silently(0, INITIAL_SEEK_RANGE_END);
        if self.config.autoplay {
            self.player.play();
        }

        if container::is_chaptered_container(&session.path) {
            match container::read_chapter_table(&session.path) {
                Ok(entries) if entries.is_empty() => {
                    debug!("Container declares no chapters");
                }
                Ok(entries) => {
                    session.table = ChapterTable::build(entries);
                    session.is_audiobook = true;
                }
                Err(err) => {
                    warn!(error = %err, "Chapter extraction failed, playing without chapters");
                }
            }
        }

        let audiobook = session.is_audiobook;
        let rows: Vec<ChapterRow> = session
            .table
            .iter()
            .map(|chapter| ChapterRow {
                number: chapter.number,
                title: chapter.title.clone(),
                length: format_clock(chapter.length()),
                start: chapter.start,
                end: chapter.end,
            })
            .collect();
        self.session = Some(session);

        if audiobook {
            self.controls.set_chapter_rows(&rows);
            self.apply_chapter_change(0);
            info!(chapters = rows.len(), "Chapter table ready");
        }
    }

    pub(super) fn handle_toggle_play_pause(&mut self) {
        if self.snapshot.state == PlaybackState::Playing {
            self.player.pause();
        } else {
            self.player.play();
        }
    }

    /// Nudge playback by `delta` seconds through the seek bar, not the
    /// player: the loud write clamps to the bar's range and its change
    /// notification comes back as a user seek.
    pub(super) fn handle_skip(&mut self, delta: i64) {
        let target = self.controls.seek_value().saturating_add_signed(delta);
        self.controls.set_seek_value(target);
        let value = self.controls.seek_value();
        self.handle_user_seek(value);
    }

    pub(super) fn handle_user_seek(&mut self, position: u64) {
        debug!(position, "Seek requested from the seek bar");
        self.player.seek(position);
    }

    pub(super) fn handle_user_volume(&mut self, volume: f64) {
        self.player.set_volume(volume);
    }

    pub(super) fn handle_navigate_chapter(&mut self, direction: isize) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        if !session.is_audiobook {
            return;
        }
        let Some(current) = session.current_chapter else {
            return;
        };
        match session.table.adjacent(current, direction) {
            Some(target) => {
                let Some(start) = session.table.get(target).map(|chapter| chapter.start) else {
                    return;
                };
                debug!(from = current, to = target, "Navigating chapters");
                // The position events that follow the seek move the
                // highlight; nothing else to do here.
                self.player.seek(start);
            }
            None => debug!(current, direction, "Chapter navigation at boundary"),
        }
    }

    pub(super) fn handle_row_activated(&mut self, row: usize) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        if !session.is_audiobook {
            return;
        }
        let Some(start) = session.table.get(row).map(|chapter| chapter.start) else {
            return;
        };
        self.player.seek(start);
        self.apply_chapter_change(row);
        self.player.play();
    }
}
