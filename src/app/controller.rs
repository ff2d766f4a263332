//! The playback controller: cursor movement, session lifecycle, completion
//! handling and artwork publication.
//!
//! All methods run on one owner thread. Background work (session watchers,
//! artwork workers) only talks back through the `PlayerEvent` channel, which
//! the owner drains with `pump_events`.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use tracing::{debug, info, warn};

use crate::artwork::{ArtworkSource, spawn_fetch};
use crate::audio::{CompletionSignal, OutputSession, PlayerEvent, SessionFactory, SessionId};
use crate::config::LibrarySettings;
use crate::error::{LibraryError, PlaybackError};
use crate::library::{Direction, Playlist, Track, scan};

/// The playback state of the application.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    /// Nothing loaded, nothing selected, or the last open failed.
    #[default]
    Idle,
    Playing,
    Paused,
}

/// What `handle_event` did with an event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EventOutcome {
    /// Natural completion of the live session; the controller moved on.
    Advanced,
    /// Completion from a session that is no longer live.
    StaleCompletion,
    ArtworkApplied,
    /// Artwork for a track that is no longer current.
    ArtworkDiscarded,
}

struct LiveSession<S> {
    id: SessionId,
    inner: S,
}

pub struct Controller<F: SessionFactory> {
    playlist: Playlist,
    factory: F,
    artwork: Arc<dyn ArtworkSource>,
    session: Option<LiveSession<F::Session>>,
    state: PlaybackState,
    track: Option<Track>,
    loop_enabled: bool,
    next_session: u64,
    events_tx: Sender<PlayerEvent>,
    events_rx: Receiver<PlayerEvent>,
    last_error: Option<String>,
}

impl<F: SessionFactory> Controller<F> {
    pub fn new(factory: F, artwork: Arc<dyn ArtworkSource>) -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        Self {
            playlist: Playlist::default(),
            factory,
            artwork,
            session: None,
            state: PlaybackState::Idle,
            track: None,
            loop_enabled: false,
            next_session: 0,
            events_tx,
            events_rx,
            last_error: None,
        }
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.track.as_ref()
    }

    pub fn loop_enabled(&self) -> bool {
        self.loop_enabled
    }

    pub fn set_loop(&mut self, enabled: bool) {
        self.loop_enabled = enabled;
    }

    /// Most recent user-facing failure, cleared by the next successful track change.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Whether the live session reports audible output.
    pub fn is_playing(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.inner.is_playing())
    }

    /// Replace the playlist with the contents of `dir`, then start its first
    /// track when `autoplay` is set.
    ///
    /// An unreadable folder changes nothing. A playback failure on the first
    /// track is recorded but does not fail the load.
    pub fn load_folder(
        &mut self,
        dir: &Path,
        settings: &LibrarySettings,
        autoplay: bool,
    ) -> Result<(), LibraryError> {
        let entries = match scan(dir, settings) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(error = %err, "folder load refused");
                self.last_error = Some(err.to_string());
                return Err(err);
            }
        };
        info!(dir = %dir.display(), tracks = entries.len(), "folder loaded");
        self.replace_playlist(entries, autoplay);
        Ok(())
    }

    /// Swap in a new playlist with the cursor at 0, dropping the current session.
    pub fn replace_playlist(&mut self, entries: Vec<PathBuf>, autoplay: bool) {
        self.stop_session();
        self.playlist.replace(entries);
        self.state = PlaybackState::Idle;
        self.track = None;
        self.last_error = None;

        if autoplay && !self.playlist.is_empty() {
            // Already logged and recorded.
            let _ = self.select_track(0);
        }
    }

    /// Make `index` the current track and start playing it.
    ///
    /// Out-of-range indices (including any index on an empty playlist) are a
    /// no-op. On failure nothing is audible, the controller is `Idle`, and the
    /// cursor and displayed track are those from before the call.
    pub fn select_track(&mut self, index: usize) -> Result<(), PlaybackError> {
        let Some(path) = self.playlist.get(index).map(Path::to_path_buf) else {
            debug!(index, len = self.playlist.len(), "select ignored");
            return Ok(());
        };

        // The previous session is silenced before anything else happens.
        self.stop_session();
        self.state = PlaybackState::Idle;

        let id = SessionId(self.next_session);
        self.next_session += 1;
        let done = CompletionSignal::new(id, self.events_tx.clone());

        let mut session = match self.factory.open(&path, done) {
            Ok(session) => session,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "playback failed");
                self.last_error = Some(err.to_string());
                return Err(err);
            }
        };

        self.playlist.set_cursor(index);
        let track = Track::from_path(&path);
        spawn_fetch(self.artwork.clone(), track.id, &path, self.events_tx.clone());
        info!(index, title = %track.title, "now playing");

        session.play();
        self.session = Some(LiveSession { id, inner: session });
        self.track = Some(track);
        self.state = PlaybackState::Playing;
        self.last_error = None;
        Ok(())
    }

    /// Pause when playing, resume when paused, nothing when idle.
    pub fn toggle_play_pause(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match self.state {
            PlaybackState::Playing => {
                session.inner.pause();
                self.state = PlaybackState::Paused;
            }
            PlaybackState::Paused => {
                session.inner.play();
                self.state = PlaybackState::Playing;
            }
            PlaybackState::Idle => {}
        }
    }

    pub fn next(&mut self) -> Result<(), PlaybackError> {
        if self.playlist.is_empty() {
            return Ok(());
        }
        self.select_track(self.playlist.advance(Direction::Forward))
    }

    pub fn previous(&mut self) -> Result<(), PlaybackError> {
        if self.playlist.is_empty() {
            return Ok(());
        }
        self.select_track(self.playlist.advance(Direction::Backward))
    }

    /// Only consulted when a track ends on its own.
    pub fn toggle_loop(&mut self) {
        self.loop_enabled = !self.loop_enabled;
        debug!(loop_enabled = self.loop_enabled, "loop toggled");
    }

    /// React to the live session reaching its end: replay the same file in a
    /// fresh session when looping, otherwise move to the next track.
    pub fn on_playback_completed(&mut self) -> Result<(), PlaybackError> {
        if self.loop_enabled {
            self.select_track(self.playlist.cursor())
        } else {
            self.next()
        }
    }

    /// Apply one event on the owner thread.
    pub fn handle_event(&mut self, event: PlayerEvent) -> EventOutcome {
        match event {
            PlayerEvent::Completed(id) => {
                if self.session.as_ref().map(|s| s.id) != Some(id) {
                    debug!(?id, "completion from a retired session ignored");
                    return EventOutcome::StaleCompletion;
                }
                // Already logged and recorded.
                let _ = self.on_playback_completed();
                EventOutcome::Advanced
            }
            PlayerEvent::Artwork { track, artwork } => match self.track.take() {
                Some(current) if current.id == track => {
                    debug!(
                        path = %current.path.display(),
                        found = artwork.is_some(),
                        "artwork resolved"
                    );
                    self.track = Some(current.with_artwork(artwork));
                    EventOutcome::ArtworkApplied
                }
                other => {
                    self.track = other;
                    debug!(?track, "stale artwork discarded");
                    EventOutcome::ArtworkDiscarded
                }
            },
        }
    }

    /// Apply every event that is already queued. Returns how many were handled.
    pub fn pump_events(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    /// Block up to `timeout` for one event and apply it.
    #[cfg(test)]
    pub fn wait_event(&mut self, timeout: std::time::Duration) -> Option<EventOutcome> {
        let event = self.events_rx.recv_timeout(timeout).ok()?;
        Some(self.handle_event(event))
    }

    /// Stop playback for good (used on shutdown).
    pub fn stop(&mut self) {
        self.stop_session();
        self.state = PlaybackState::Idle;
    }

    fn stop_session(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.inner.stop();
        }
    }
}
