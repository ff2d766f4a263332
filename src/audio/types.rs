//! Events and handles exchanged between output sessions, artwork workers
//! and the controller.

use std::sync::mpsc::Sender;

use crate::artwork::Artwork;
use crate::library::TrackId;

/// Identity of one output session. Never reused within a process.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(pub(crate) u64);

/// Messages delivered to the controller's owner thread.
#[derive(Debug)]
pub enum PlayerEvent {
    /// The session reached the end of its file on its own.
    Completed(SessionId),
    /// An artwork lookup for `track` finished.
    Artwork {
        track: TrackId,
        artwork: Option<Artwork>,
    },
}

/// One-shot completion target installed on a session when it is opened.
///
/// `fire` consumes the signal, so a session can report completion at most once.
#[derive(Debug)]
pub struct CompletionSignal {
    session: SessionId,
    tx: Sender<PlayerEvent>,
}

impl CompletionSignal {
    pub fn new(session: SessionId, tx: Sender<PlayerEvent>) -> Self {
        Self { session, tx }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Report natural completion. Silently dropped if the controller is gone.
    pub fn fire(self) {
        let _ = self.tx.send(PlayerEvent::Completed(self.session));
    }
}
