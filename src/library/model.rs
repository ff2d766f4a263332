use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::artwork::Artwork;

/// Placeholder artist; the player does not parse artist tags.
pub const UNKNOWN_ARTIST: &str = "Unknown";

/// Process-unique identity of a track instance.
///
/// A fresh id is minted every time a file becomes current, so replaying the
/// same file yields a different id.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TrackId(u64);

impl TrackId {
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Display metadata of the current track.
#[derive(Debug, Clone)]
pub struct Track {
    pub id: TrackId,
    pub path: PathBuf,
    pub title: String,
    pub artist: String,
    pub artwork: Option<Artwork>,
}

impl Track {
    /// Build a track for `path`; the title is the file name without its extension.
    pub fn from_path(path: &Path) -> Self {
        let title = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "UNKNOWN".to_string());

        Self {
            id: TrackId::next(),
            path: path.to_path_buf(),
            title,
            artist: UNKNOWN_ARTIST.to_string(),
            artwork: None,
        }
    }

    /// Same track with its artwork replaced.
    pub fn with_artwork(self, artwork: Option<Artwork>) -> Self {
        Self { artwork, ..self }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Ordered audio files plus the cursor of the selected one.
///
/// The cursor is always a valid index while the playlist is non-empty.
#[derive(Debug, Default, Clone)]
pub struct Playlist {
    entries: Vec<PathBuf>,
    cursor: usize,
}

impl Playlist {
    pub fn new(entries: Vec<PathBuf>) -> Self {
        Self { entries, cursor: 0 }
    }

    pub fn replace(&mut self, entries: Vec<PathBuf>) {
        *self = Self::new(entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn get(&self, index: usize) -> Option<&Path> {
        self.entries.get(index).map(PathBuf::as_path)
    }

    pub fn current(&self) -> Option<&Path> {
        self.get(self.cursor)
    }

    /// Move the cursor to `index`. Returns `false` (and leaves the cursor) when out of range.
    pub fn set_cursor(&mut self, index: usize) -> bool {
        if index < self.entries.len() {
            self.cursor = index;
            true
        } else {
            false
        }
    }

    /// Index one step away from the cursor, wrapping at both ends.
    ///
    /// Does not move the cursor; an empty playlist yields the cursor unchanged.
    pub fn advance(&self, direction: Direction) -> usize {
        let n = self.entries.len();
        if n == 0 {
            return self.cursor;
        }
        match direction {
            Direction::Forward => (self.cursor + 1) % n,
            Direction::Backward => (self.cursor + n - 1) % n,
        }
    }
}
