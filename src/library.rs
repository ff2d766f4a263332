//! Playlist store: folder scanning, the track model and the cursor.

mod model;
mod scan;

pub use model::*;
pub use scan::scan;
