use std::path::Path;

use crate::error::PlaybackError;

use super::types::CompletionSignal;

/// A live decode/output handle for exactly one file.
pub trait OutputSession {
    fn play(&mut self);
    fn pause(&mut self);
    /// Stop for good. A stopped session must never fire its completion signal.
    fn stop(&mut self);
    fn is_playing(&self) -> bool;
}

/// Opens output sessions.
pub trait SessionFactory {
    type Session: OutputSession;

    /// Open `path` paused; `done` is fired once when the file plays to its end.
    fn open(&mut self, path: &Path, done: CompletionSignal) -> Result<Self::Session, PlaybackError>;
}
