//! Handlers for notifications arriving from the player backend.
//!
//! This is the only code that writes player-derived values into the
//! interactive controls, and it does so exclusively through their silent
//! setters. A position report must never come back around as a seek.

use tracing::{debug, info, warn};

use super::super::state::{App, DEFAULT_TITLE};
use crate::controls::ControlSurface;
use crate::cover::decode_cover;
use crate::player::{AudioStreamInfo, MediaInfo, PlaybackState, Player};
use crate::time_utils::format_clock;

impl<P: Player, C: ControlSurface> App<P, C> {
    pub(super) fn handle_position(&mut self, position: u64) {
        self.snapshot.position = position;
        if self.is_audiobook() {
            self.position_in_audiobook(position);
        } else {
            self.controls.set_elapsed_label(&format_clock(position));
            self.controls.set_remaining_label(&format_clock(
                self.snapshot.duration.saturating_sub(position),
            ));
        }
        self.controls.set_seek_value_silently(position);
    }

    fn position_in_audiobook(&mut self, position: u64) {
        if self.snapshot.duration > 0 {
            self.controls
                .set_progress_fraction(position as f64 / self.snapshot.duration as f64);
        }
        self.controls.set_position_label(&format_clock(position));

        let (located, current) = {
            let Some(session) = self.session.as_ref() else {
                return;
            };
            let located = match session.table.locate(position) {
                Ok(index) => index,
                Err(err) => {
                    warn!(error = %err, "Chapter lookup failed, falling back to the first chapter");
                    0
                }
            };
            (located, session.current_chapter)
        };
        if current != Some(located) {
            self.apply_chapter_change(located);
        }

        let Some((start, end)) = self.current_chapter_bounds() else {
            return;
        };
        self.controls
            .set_elapsed_label(&format_clock(position.saturating_sub(start)));
        self.controls
            .set_remaining_label(&format_clock(end.saturating_sub(position)));
    }

    pub(super) fn handle_duration(&mut self, duration: u64) {
        self.snapshot.duration = duration;
        // In audiobook mode the seek range tracks the current chapter, not
        // the whole stream.
        if !self.is_audiobook() {
            self.controls.set_seek_range_silently(0, duration);
        }
    }

    pub(super) fn handle_state_changed(&mut self, state: PlaybackState) {
        self.snapshot.state = state;
        self.controls
            .set_playing_indicator(state == PlaybackState::Playing);
    }

    pub(super) fn handle_volume_changed(&mut self, volume: f64) {
        self.snapshot.volume = volume;
        // Skip writes within float jitter of what the control already shows.
        if (self.controls.volume_value() - volume).abs() > self.config.volume_epsilon {
            self.controls.set_volume_silently(volume);
        }
    }

    pub(super) fn handle_end_of_stream(&mut self) {
        self.player.seek(0);
        self.player.pause();
        self.snapshot.state = PlaybackState::Paused;
        self.controls.set_playing_indicator(false);
    }

    pub(super) fn handle_media_info(&mut self, info: MediaInfo) {
        let audiobook = self.is_audiobook();

        let title = match (info.title.as_deref(), info.artist.as_deref()) {
            (Some(title), Some(artist)) => format!("{title} - {artist}"),
            (Some(title), None) => title.to_string(),
            (None, _) => self
                .session
                .as_ref()
                .and_then(|session| session.path.file_name())
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        };
        self.controls.set_title_label(&title);

        self.controls.set_genre_label(info.genre.as_deref());
        let year = info.year.map(|year| year.to_string());
        self.controls.set_year_label(year.as_deref());
        let stream = info.audio.as_ref().map(stream_properties_text);
        self.controls.set_stream_properties_label(stream.as_deref());

        if let Some(sample) = info.cover.as_ref() {
            match decode_cover(sample, self.config.cover_edge) {
                Ok(cover) => self.controls.set_cover_image(Some(cover)),
                Err(err) => debug!(error = %err, "Skipping cover image"),
            }
        }

        if audiobook {
            let total = self.player.duration().unwrap_or(self.snapshot.duration);
            self.controls
                .set_total_duration_label(&format_clock(total));
        }
        self.controls.set_chapter_panel_visible(audiobook);
        self.controls
            .set_genre_panel_visible(info.genre.is_some() || info.year.is_some());
        info!(audiobook, title = %title, "Media info applied");
    }
}

fn stream_properties_text(audio: &AudioStreamInfo) -> String {
    let channels = match audio.channels {
        1 => "Mono".to_string(),
        2 => "Stereo".to_string(),
        other => format!("{other} channels"),
    };
    format!(
        "{} | {} Hz | {} kbps | {}",
        channels,
        audio.sample_rate,
        audio.bitrate / 1000,
        audio.codec.as_deref().unwrap_or("unknown codec"),
    )
}
