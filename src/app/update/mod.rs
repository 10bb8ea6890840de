mod bridge;
mod transport;

use tracing::debug;

use super::messages::Message;
use super::state::App;
use crate::controls::ControlSurface;
use crate::player::{Player, PlayerEvent};

impl<P: Player, C: ControlSurface> App<P, C> {
    /// Single entry point: every user gesture and every backend notification
    /// is dispatched from here, on the thread that owns the controls.
    pub fn reduce(&mut self, message: Message) {
        match message {
            Message::Open(path) => self.handle_open(path),
            Message::TogglePlayPause => self.handle_toggle_play_pause(),
            Message::SkipForward => {
                let step = i64::from(self.config.skip_seconds);
                self.handle_skip(step);
            }
            Message::SkipBackward => {
                let step = i64::from(self.config.skip_seconds);
                self.handle_skip(-step);
            }
            Message::NextChapter => self.handle_navigate_chapter(1),
            Message::PreviousChapter => self.handle_navigate_chapter(-1),
            Message::SeekBarChanged(value) => self.handle_user_seek(value),
            Message::VolumeControlChanged(volume) => self.handle_user_volume(volume),
            Message::ChapterRowActivated(row) => self.handle_row_activated(row),
            Message::Player { generation, event } => self.dispatch_player_event(generation, event),
        }
    }

    fn dispatch_player_event(&mut self, generation: u64, event: PlayerEvent) {
        if !self.is_current_generation(generation) {
            debug!(generation, "Dropping player event from a superseded document");
            return;
        }
        match event {
            PlayerEvent::PositionUpdated(position) => self.handle_position(position),
            PlayerEvent::DurationChanged(duration) => self.handle_duration(duration),
            PlayerEvent::StateChanged(state) => self.handle_state_changed(state),
            PlayerEvent::VolumeChanged(volume) => self.handle_volume_changed(volume),
            PlayerEvent::EndOfStream => self.handle_end_of_stream(),
            PlayerEvent::MediaInfoUpdated(info) => self.handle_media_info(info),
        }
    }
}
