use std::path::PathBuf;

use crate::player::PlayerEvent;

/// Inputs to the controller: user intents forwarded by the shell and tagged
/// notifications from the player backend.
#[derive(Debug, Clone)]
pub enum Message {
    /// Open a local media file, replacing whatever is currently loaded.
    Open(PathBuf),
    TogglePlayPause,
    SkipForward,
    SkipBackward,
    NextChapter,
    PreviousChapter,
    /// The seek bar fired its change notification from a genuine user
    /// gesture (or from a loud programmatic write, which is defined to
    /// behave the same way).
    SeekBarChanged(u64),
    /// The volume control fired its change notification from user input.
    VolumeControlChanged(f64),
    /// A chapter row was activated directly.
    ChapterRowActivated(usize),
    /// A backend notification, tagged with the session generation that was
    /// current when its document was loaded. Stale generations are dropped.
    Player { generation: u64, event: PlayerEvent },
}
