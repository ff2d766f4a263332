//! `rodio`-backed output sessions.
//!
//! Each session owns one `Sink` holding one decoded file. A small watcher
//! thread polls the sink and fires the completion signal once it drains.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, warn};

use crate::error::PlaybackError;

use super::session::{OutputSession, SessionFactory};
use super::types::CompletionSignal;

pub(super) const WATCH_INTERVAL: Duration = Duration::from_millis(200);

/// Session factory bound to the default output device.
pub struct RodioOutput {
    stream: Option<OutputStream>,
}

impl RodioOutput {
    /// Open the default device. Without one, every `open` fails with
    /// `PlaybackError::Output` instead of aborting the program.
    pub fn open_default() -> Self {
        match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                // rodio logs to stderr when OutputStream is dropped, which
                // would scribble over the TUI.
                stream.log_on_drop(false);
                Self {
                    stream: Some(stream),
                }
            }
            Err(err) => {
                warn!(error = %err, "no audio output device");
                Self { stream: None }
            }
        }
    }
}

impl SessionFactory for RodioOutput {
    type Session = RodioSession;

    fn open(&mut self, path: &Path, done: CompletionSignal) -> Result<RodioSession, PlaybackError> {
        let stream = self
            .stream
            .as_ref()
            .ok_or_else(|| PlaybackError::Output("no audio output device".to_string()))?;

        let file = File::open(path).map_err(|source| PlaybackError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let source = Decoder::new(BufReader::new(file)).map_err(|err| PlaybackError::Decode {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;

        let sink = Sink::connect_new(stream.mixer());
        sink.append(source);
        sink.pause();

        Ok(RodioSession::start(sink, done))
    }
}

pub struct RodioSession {
    sink: Arc<Sink>,
    /// Set by `stop` or by the watcher, whichever comes first.
    finished: Arc<AtomicBool>,
}

impl RodioSession {
    /// Wrap a loaded sink and start watching it for the natural end.
    pub(super) fn start(sink: Sink, done: CompletionSignal) -> Self {
        let sink = Arc::new(sink);
        let finished = Arc::new(AtomicBool::new(false));
        spawn_watcher(sink.clone(), finished.clone(), done);
        Self { sink, finished }
    }
}

impl OutputSession for RodioSession {
    fn play(&mut self) {
        self.sink.play();
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn stop(&mut self) {
        // Flag first so the watcher cannot mistake the emptied sink for a natural end.
        self.finished.store(true, Ordering::SeqCst);
        self.sink.stop();
    }

    fn is_playing(&self) -> bool {
        !self.sink.is_paused() && !self.sink.empty()
    }
}

impl Drop for RodioSession {
    fn drop(&mut self) {
        self.stop();
    }
}

fn spawn_watcher(sink: Arc<Sink>, finished: Arc<AtomicBool>, done: CompletionSignal) {
    let session = done.session();
    let spawned = thread::Builder::new()
        .name("session-watch".to_string())
        .spawn(move || {
            loop {
                thread::sleep(WATCH_INTERVAL);
                if finished.load(Ordering::SeqCst) {
                    return;
                }
                if sink.empty() {
                    if !finished.swap(true, Ordering::SeqCst) {
                        debug!(?session, "session drained");
                        done.fire();
                    }
                    return;
                }
            }
        });

    if let Err(err) = spawned {
        warn!(
            error = %err,
            ?session,
            "could not start session watcher; auto-advance disabled"
        );
    }
}
