use super::*;
use crate::artwork::{Artwork, ArtworkSource};
use crate::audio::{CompletionSignal, OutputSession, SessionFactory};
use crate::config::LibrarySettings;
use crate::error::PlaybackError;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::{Arc, Mutex, mpsc};
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(5);

#[derive(Debug, Default)]
struct SessionLog {
    playing: bool,
    stopped: bool,
}

struct Opened {
    path: PathBuf,
    log: Rc<RefCell<SessionLog>>,
}

#[derive(Default)]
struct Shared {
    opened: Vec<Opened>,
    signals: Vec<CompletionSignal>,
    failing: HashSet<PathBuf>,
}

#[derive(Clone, Default)]
struct FakeOutput(Rc<RefCell<Shared>>);

struct FakeSession(Rc<RefCell<SessionLog>>);

impl OutputSession for FakeSession {
    fn play(&mut self) {
        self.0.borrow_mut().playing = true;
    }

    fn pause(&mut self) {
        self.0.borrow_mut().playing = false;
    }

    fn stop(&mut self) {
        let mut log = self.0.borrow_mut();
        log.playing = false;
        log.stopped = true;
    }

    fn is_playing(&self) -> bool {
        self.0.borrow().playing
    }
}

impl SessionFactory for FakeOutput {
    type Session = FakeSession;

    fn open(&mut self, path: &Path, done: CompletionSignal) -> Result<FakeSession, PlaybackError> {
        let mut shared = self.0.borrow_mut();
        if shared.failing.contains(path) {
            return Err(PlaybackError::Decode {
                path: path.to_path_buf(),
                reason: "unsupported".into(),
            });
        }
        let log = Rc::new(RefCell::new(SessionLog::default()));
        shared.opened.push(Opened {
            path: path.to_path_buf(),
            log: log.clone(),
        });
        shared.signals.push(done);
        Ok(FakeSession(log))
    }
}

impl FakeOutput {
    fn opened_paths(&self) -> Vec<PathBuf> {
        self.0.borrow().opened.iter().map(|o| o.path.clone()).collect()
    }

    fn live_sessions(&self) -> usize {
        self.0
            .borrow()
            .opened
            .iter()
            .filter(|o| !o.log.borrow().stopped)
            .count()
    }

    fn last_log(&self) -> Rc<RefCell<SessionLog>> {
        self.0.borrow().opened.last().unwrap().log.clone()
    }

    /// Fire the completion signal of the `n`th session ever opened.
    fn finish(&self, n: usize) {
        let signal = self.0.borrow_mut().signals.remove(n);
        signal.fire();
    }

    fn fail(&self, path: &str) {
        self.0.borrow_mut().failing.insert(PathBuf::from(path));
    }
}

struct NoArtwork;

impl ArtworkSource for NoArtwork {
    fn fetch(&self, _path: &Path) -> Option<Artwork> {
        None
    }
}

/// Returns a fixed picture per path; paths with a gate block until it opens.
struct GatedArtwork {
    art: HashMap<PathBuf, Artwork>,
    gates: Mutex<HashMap<PathBuf, mpsc::Receiver<()>>>,
}

impl ArtworkSource for GatedArtwork {
    fn fetch(&self, path: &Path) -> Option<Artwork> {
        let gate = self.gates.lock().unwrap().remove(path);
        if let Some(gate) = gate {
            let _ = gate.recv();
        }
        self.art.get(path).cloned()
    }
}

fn solid_artwork(color: [u8; 3]) -> Artwork {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, Rgb(color)));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png).unwrap();
    Artwork::from_bytes(buf, "image/png".into()).unwrap()
}

fn paths(names: &[&str]) -> Vec<PathBuf> {
    names.iter().map(PathBuf::from).collect()
}

/// Apply events until `wanted` shows up; artwork results may interleave.
fn wait_for(c: &mut Controller<FakeOutput>, wanted: EventOutcome) -> bool {
    for _ in 0..8 {
        match c.wait_event(WAIT) {
            Some(outcome) if outcome == wanted => return true,
            Some(_) => continue,
            None => return false,
        }
    }
    false
}

fn controller(names: &[&str]) -> (Controller<FakeOutput>, FakeOutput) {
    let output = FakeOutput::default();
    let mut c = Controller::new(output.clone(), Arc::new(NoArtwork));
    c.replace_playlist(paths(names), false);
    (c, output)
}

#[test]
fn starts_idle_with_nothing_selected() {
    let (c, output) = controller(&["A.mp3"]);
    assert_eq!(c.state(), PlaybackState::Idle);
    assert!(c.current_track().is_none());
    assert!(output.opened_paths().is_empty());
}

#[test]
fn select_track_plays_and_derives_title() {
    let (mut c, output) = controller(&["A.mp3", "B.mp3"]);
    c.select_track(1).unwrap();

    assert_eq!(c.state(), PlaybackState::Playing);
    assert_eq!(c.playlist().cursor(), 1);
    let track = c.current_track().unwrap();
    assert_eq!(track.title, "B");
    assert_eq!(track.artist, "Unknown");
    assert!(c.is_playing());
    assert_eq!(output.opened_paths(), paths(&["B.mp3"]));
}

#[test]
fn at_most_one_session_is_live() {
    let (mut c, output) = controller(&["A.mp3", "B.mp3", "C.mp3"]);
    c.select_track(0).unwrap();
    c.next().unwrap();
    c.previous().unwrap();
    c.select_track(2).unwrap();

    assert_eq!(output.opened_paths().len(), 4);
    assert_eq!(output.live_sessions(), 1);
}

#[test]
fn next_n_times_returns_to_start() {
    let (mut c, _output) = controller(&["A.mp3", "B.mp3", "C.mp3", "D.mp3"]);
    c.select_track(2).unwrap();
    for _ in 0..4 {
        c.next().unwrap();
    }
    assert_eq!(c.playlist().cursor(), 2);
}

#[test]
fn previous_then_next_restores_cursor() {
    let (mut c, _output) = controller(&["A.mp3", "B.mp3", "C.mp3"]);
    for start in 0..3 {
        c.select_track(start).unwrap();
        c.previous().unwrap();
        c.next().unwrap();
        assert_eq!(c.playlist().cursor(), start);

        c.next().unwrap();
        c.previous().unwrap();
        assert_eq!(c.playlist().cursor(), start);
    }
}

#[test]
fn empty_playlist_operations_are_no_ops() {
    let (mut c, output) = controller(&[]);
    assert!(c.next().is_ok());
    assert!(c.previous().is_ok());
    assert!(c.select_track(0).is_ok());
    assert!(c.on_playback_completed().is_ok());
    c.toggle_play_pause();

    assert_eq!(c.state(), PlaybackState::Idle);
    assert!(output.opened_paths().is_empty());
}

#[test]
fn select_out_of_range_is_ignored() {
    let (mut c, output) = controller(&["A.mp3"]);
    c.select_track(0).unwrap();
    c.select_track(5).unwrap();

    assert_eq!(c.state(), PlaybackState::Playing);
    assert_eq!(output.live_sessions(), 1);
}

#[test]
fn toggle_play_pause_twice_restores_state() {
    let (mut c, output) = controller(&["A.mp3"]);
    c.select_track(0).unwrap();

    c.toggle_play_pause();
    assert_eq!(c.state(), PlaybackState::Paused);
    assert!(!output.last_log().borrow().playing);

    c.toggle_play_pause();
    assert_eq!(c.state(), PlaybackState::Playing);
    assert!(output.last_log().borrow().playing);
}

#[test]
fn toggle_play_pause_without_session_does_nothing() {
    let (mut c, _output) = controller(&["A.mp3"]);
    c.toggle_play_pause();
    assert_eq!(c.state(), PlaybackState::Idle);
}

#[test]
fn completion_with_loop_reopens_same_file() {
    let (mut c, output) = controller(&["A.mp3", "B.mp3"]);
    c.select_track(1).unwrap();
    let first = c.current_track().unwrap().id;
    c.toggle_loop();

    c.on_playback_completed().unwrap();

    assert_eq!(c.playlist().cursor(), 1);
    assert_eq!(output.opened_paths(), paths(&["B.mp3", "B.mp3"]));
    assert_eq!(output.live_sessions(), 1);
    assert_ne!(c.current_track().unwrap().id, first);
}

#[test]
fn completion_without_loop_wraps_from_last_track() {
    let (mut c, _output) = controller(&["A.mp3", "B.mp3", "C.mp3"]);
    c.select_track(2).unwrap();
    c.on_playback_completed().unwrap();
    assert_eq!(c.playlist().cursor(), 0);
}

#[test]
fn repeated_completion_cycles_through_playlist() {
    let (mut c, _output) = controller(&["A.mp3", "B.mp3", "C.mp3"]);
    let mut seen = Vec::new();
    for _ in 0..3 {
        c.on_playback_completed().unwrap();
        seen.push(c.playlist().cursor());
    }
    assert_eq!(seen, vec![1, 2, 0]);
}

#[test]
fn toggle_loop_flips_flag() {
    let (mut c, _output) = controller(&["A.mp3"]);
    assert!(!c.loop_enabled());
    c.toggle_loop();
    assert!(c.loop_enabled());
    c.toggle_loop();
    assert!(!c.loop_enabled());
}

#[test]
fn natural_completion_event_advances() {
    let (mut c, output) = controller(&["A.mp3", "B.mp3"]);
    c.select_track(0).unwrap();

    output.finish(0);
    assert!(wait_for(&mut c, EventOutcome::Advanced));

    assert_eq!(c.playlist().cursor(), 1);
    assert_eq!(c.state(), PlaybackState::Playing);
}

#[test]
fn completion_from_replaced_session_is_ignored() {
    let (mut c, output) = controller(&["A.mp3", "B.mp3", "C.mp3"]);
    c.select_track(0).unwrap();
    c.next().unwrap();

    // The first session was torn down by the skip; its signal must not advance.
    output.finish(0);
    assert!(wait_for(&mut c, EventOutcome::StaleCompletion));
    assert_eq!(c.playlist().cursor(), 1);
    assert_eq!(output.opened_paths().len(), 2);
}

#[test]
fn failed_open_stays_idle_and_keeps_cursor() {
    let (mut c, output) = controller(&["A.mp3", "B.mp3", "C.mp3"]);
    output.fail("C.mp3");
    c.select_track(1).unwrap();

    let err = c.select_track(2).unwrap_err();

    assert!(matches!(err, PlaybackError::Decode { .. }));
    assert_eq!(c.state(), PlaybackState::Idle);
    assert_eq!(c.playlist().cursor(), 1);
    assert_eq!(c.playlist().len(), 3);
    assert_eq!(output.live_sessions(), 0);
    assert!(!c.is_playing());
    assert!(c.last_error().is_some());
    // Play/pause has nothing to act on.
    c.toggle_play_pause();
    assert_eq!(c.state(), PlaybackState::Idle);
}

#[test]
fn failed_open_does_not_auto_skip() {
    let (mut c, output) = controller(&["A.mp3", "B.mp3"]);
    output.fail("B.mp3");
    c.select_track(0).unwrap();
    assert!(c.next().is_err());

    assert_eq!(c.playlist().cursor(), 0);
    assert_eq!(output.opened_paths(), paths(&["A.mp3"]));
}

#[test]
fn successful_select_clears_last_error() {
    let (mut c, output) = controller(&["A.mp3", "B.mp3"]);
    output.fail("B.mp3");
    let _ = c.select_track(1);
    assert!(c.last_error().is_some());

    c.select_track(0).unwrap();
    assert!(c.last_error().is_none());
}

#[test]
fn artwork_is_applied_to_current_track() {
    let a = PathBuf::from("A.mp3");
    let art = solid_artwork([10, 20, 30]);
    let source = GatedArtwork {
        art: HashMap::from([(a.clone(), art.clone())]),
        gates: Mutex::new(HashMap::new()),
    };
    let output = FakeOutput::default();
    let mut c = Controller::new(output, Arc::new(source));
    c.replace_playlist(vec![a], true);

    assert_eq!(c.wait_event(WAIT), Some(EventOutcome::ArtworkApplied));
    assert_eq!(c.current_track().unwrap().artwork, Some(art));
    assert_eq!(c.current_track().unwrap().title, "A");
}

#[test]
fn late_artwork_for_previous_track_is_discarded() {
    let a = PathBuf::from("A.mp3");
    let b = PathBuf::from("B.mp3");
    let art_a = solid_artwork([255, 0, 0]);
    let art_b = solid_artwork([0, 0, 255]);
    let (release_a, gate_a) = mpsc::channel();
    let source = GatedArtwork {
        art: HashMap::from([(a.clone(), art_a), (b.clone(), art_b.clone())]),
        gates: Mutex::new(HashMap::from([(a.clone(), gate_a)])),
    };
    let output = FakeOutput::default();
    let mut c = Controller::new(output, Arc::new(source));
    c.replace_playlist(vec![a, b], false);

    c.select_track(0).unwrap();
    let first = c.current_track().unwrap().id;
    c.next().unwrap();
    let second = c.current_track().unwrap().id;
    assert_ne!(first, second);

    // B's lookup is ungated and lands first.
    assert_eq!(c.wait_event(WAIT), Some(EventOutcome::ArtworkApplied));

    release_a.send(()).unwrap();
    assert_eq!(c.wait_event(WAIT), Some(EventOutcome::ArtworkDiscarded));

    let track = c.current_track().unwrap();
    assert_eq!(track.id, second);
    assert_eq!(track.artwork, Some(art_b));
}

#[test]
fn load_folder_autoplays_first_track() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("only.mp3"), b"not real").unwrap();
    let output = FakeOutput::default();
    let mut c = Controller::new(output.clone(), Arc::new(NoArtwork));

    c.load_folder(dir.path(), &LibrarySettings::default(), true)
        .unwrap();

    assert_eq!(c.state(), PlaybackState::Playing);
    assert_eq!(c.current_track().unwrap().title, "only");
    assert_eq!(output.opened_paths(), vec![dir.path().join("only.mp3")]);
}

#[test]
fn failed_folder_load_keeps_everything() {
    let (mut c, output) = controller(&["A.mp3", "B.mp3"]);
    c.select_track(1).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let result = c.load_folder(&dir.path().join("missing"), &LibrarySettings::default(), true);

    assert!(result.is_err());
    assert_eq!(c.playlist().len(), 2);
    assert_eq!(c.playlist().cursor(), 1);
    assert_eq!(c.state(), PlaybackState::Playing);
    assert_eq!(output.live_sessions(), 1);
    assert!(c.last_error().is_some());
}

#[test]
fn pump_events_drains_queue_without_blocking() {
    let (mut c, output) = controller(&["A.mp3", "B.mp3"]);
    assert_eq!(c.pump_events(), 0);

    c.select_track(0).unwrap();
    c.next().unwrap();
    output.finish(0);
    assert!(c.pump_events() >= 1);
    assert_eq!(c.playlist().cursor(), 1);
}

#[test]
fn stop_silences_session() {
    let (mut c, output) = controller(&["A.mp3"]);
    c.select_track(0).unwrap();
    c.stop();
    assert_eq!(c.state(), PlaybackState::Idle);
    assert_eq!(output.live_sessions(), 0);
}
