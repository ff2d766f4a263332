use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;

use lofty::file::TaggedFileExt;
use lofty::picture::PictureType;
use tracing::{debug, warn};

use crate::audio::PlayerEvent;
use crate::error::ArtworkError;
use crate::library::TrackId;

use super::decode::check_decodes;
use super::types::Artwork;

/// Embedded pictures larger than this are ignored.
const MAX_ARTWORK_SIZE: usize = 5 * 1024 * 1024;

/// Something that can pull cover art out of an audio file.
///
/// Implementations run on worker threads and must treat every failure as
/// "no artwork".
pub trait ArtworkSource: Send + Sync + 'static {
    fn fetch(&self, path: &Path) -> Option<Artwork>;
}

/// Reads the embedded cover through lofty.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedArtwork;

impl ArtworkSource for EmbeddedArtwork {
    fn fetch(&self, path: &Path) -> Option<Artwork> {
        match extract(path) {
            Ok(artwork) => Some(artwork),
            Err(ArtworkError::NoArtwork) => {
                debug!(path = %path.display(), "no embedded artwork");
                None
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "artwork lookup failed");
                None
            }
        }
    }
}

/// Front cover if present, otherwise the first embedded picture.
fn extract(path: &Path) -> Result<Artwork, ArtworkError> {
    let tagged = lofty::read_from_path(path)?;
    let tag = tagged
        .primary_tag()
        .or_else(|| tagged.first_tag())
        .ok_or(ArtworkError::NoArtwork)?;

    let pictures = tag.pictures();
    let picture = pictures
        .iter()
        .find(|p| p.pic_type() == PictureType::CoverFront)
        .or_else(|| pictures.first())
        .ok_or(ArtworkError::NoArtwork)?;

    let data = picture.data();
    if data.len() > MAX_ARTWORK_SIZE {
        debug!(path = %path.display(), bytes = data.len(), "artwork too large, skipping");
        return Err(ArtworkError::NoArtwork);
    }

    let mime_type = picture
        .mime_type()
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "image/jpeg".to_string());

    Artwork::from_bytes(data.to_vec(), mime_type)
}

impl Artwork {
    /// Wrap raw picture bytes; fails when they are not a decodable image.
    pub fn from_bytes(data: Vec<u8>, mime_type: String) -> Result<Self, ArtworkError> {
        let (width, height, average_rgb) = check_decodes(&data)?;
        Ok(Self {
            data: Arc::from(data),
            mime_type,
            width,
            height,
            average_rgb,
        })
    }
}

/// Fetch artwork for `path` on a worker thread and report it as `track`'s.
///
/// Fire-and-forget: the receiver decides whether the result is still wanted.
pub fn spawn_fetch(
    source: Arc<dyn ArtworkSource>,
    track: TrackId,
    path: &Path,
    tx: Sender<PlayerEvent>,
) {
    let path = path.to_path_buf();
    let spawned = thread::Builder::new()
        .name("artwork".to_string())
        .spawn(move || {
            let artwork = source.fetch(&path);
            // The controller may be gone already; nothing to do then.
            let _ = tx.send(PlayerEvent::Artwork { track, artwork });
        });

    if let Err(err) = spawned {
        warn!(error = %err, "could not start artwork worker");
    }
}
