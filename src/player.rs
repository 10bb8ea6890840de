//! Player collaborator interface and the notifications it delivers.
//!
//! The audio backend is owned by the shell. The controller only issues the
//! commands below and consumes [`PlayerEvent`]s, which the shell wraps in
//! [`crate::app::Message::Player`] together with the session generation that
//! was current when the document was loaded.

use std::path::Path;

/// Playback states reported by the backend. `Stopped` only occurs between
/// opening a document and the first play.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Commands the controller issues to the audio backend.
pub trait Player {
    fn load(&mut self, path: &Path);
    fn play(&mut self);
    fn pause(&mut self);
    /// Seek to an absolute position in whole seconds.
    fn seek(&mut self, position: u64);
    fn set_volume(&mut self, volume: f64);
    fn volume(&self) -> f64;
    /// Total stream duration in seconds, once the backend knows it.
    fn duration(&self) -> Option<u64>;
}

/// Asynchronous notifications from the backend, delivered on the UI thread.
#[derive(Debug, Clone)]
pub enum PlayerEvent {
    /// Periodic position report in whole seconds.
    PositionUpdated(u64),
    DurationChanged(u64),
    StateChanged(PlaybackState),
    VolumeChanged(f64),
    EndOfStream,
    MediaInfoUpdated(MediaInfo),
}

/// Tag classification of an embedded image, as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverTagType {
    FrontCover,
    BackCover,
    Undefined,
    None,
    Other,
}

/// Raw embedded image bytes plus their tag classification.
#[derive(Debug, Clone)]
pub struct CoverSample {
    pub data: Vec<u8>,
    pub tag_type: CoverTagType,
}

/// Properties of the primary audio stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioStreamInfo {
    pub codec: Option<String>,
    pub sample_rate: u32,
    pub channels: u32,
    /// Bits per second.
    pub bitrate: u32,
}

/// Tag metadata delivered once the backend has inspected the media.
/// Every field is best-effort; absence is normal, not an error.
#[derive(Debug, Clone, Default)]
pub struct MediaInfo {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub audio: Option<AudioStreamInfo>,
    pub cover: Option<CoverSample>,
}
