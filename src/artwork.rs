//! Best-effort cover art.
//!
//! Artwork is pulled from the file's embedded tags on a worker thread and
//! delivered back to the controller as a `PlayerEvent` tagged with the id of
//! the track it was requested for.

mod decode;
mod extract;
mod types;

pub use decode::{average_rgb, decode_image};
pub use extract::{ArtworkSource, EmbeddedArtwork, spawn_fetch};
pub use types::Artwork;
