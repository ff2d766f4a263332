use std::fmt;
use std::sync::Arc;

/// Decoded-and-verified cover art.
#[derive(Clone, PartialEq, Eq)]
pub struct Artwork {
    /// Raw encoded bytes as stored in the file.
    pub data: Arc<[u8]>,
    pub mime_type: String,
    pub width: u32,
    pub height: u32,
    /// Mean colour, used as a swatch where pixels cannot be drawn.
    pub average_rgb: [u8; 3],
}

impl fmt::Debug for Artwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Artwork")
            .field("bytes", &self.data.len())
            .field("mime_type", &self.mime_type)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}
