//! Error types shared across the player.
//!
//! Every failure is terminal to the operation that raised it; callers log
//! and carry on.

use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading a playlist directory.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("cannot read directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures while opening an output session for a track.
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("audio output unavailable: {0}")]
    Output(String),
}

/// Failures while extracting embedded cover art. Never surfaced to the user.
#[derive(Debug, Error)]
pub enum ArtworkError {
    #[error("metadata read failed: {0}")]
    Read(#[from] lofty::error::LoftyError),

    #[error("image decode failed: {0}")]
    Decode(#[from] image::ImageError),

    #[error("no embedded artwork")]
    NoArtwork,
}

/// Failures while loading the background image of the skin.
#[derive(Debug, Error)]
pub enum SkinError {
    #[error("unsupported background image type: {0}")]
    UnsupportedExtension(PathBuf),

    #[error("cannot read background image {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode background image: {0}")]
    Decode(#[from] image::ImageError),
}
