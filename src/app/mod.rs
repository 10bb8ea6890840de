//! The chapter-aware playback controller.
//!
//! Everything that happens after a file is opened flows through
//! [`App::reduce`]: user gestures forwarded by the shell and notifications
//! delivered by the player backend. The controller keeps the document
//! session, the chapter highlight, and every label and range in sync, and it
//! never lets one of its own control writes masquerade as user input.

mod messages;
mod state;
#[cfg(test)]
mod tests;
mod update;

pub use messages::Message;
pub use state::{App, DocumentSession, PlaybackSnapshot};
