//! The skin: panel geometry, background image and the window-like flags
//! (pinned on top, minimized) the panel honours.

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::artwork::{average_rgb, decode_image};
use crate::config::SkinSettings;
use crate::error::SkinError;

/// Accepted background image extensions (case-insensitive).
pub const BACKGROUND_EXTENSIONS: [&str; 4] = ["png", "jpeg", "tiff", "heic"];

/// Rows kept visible while minimized: just the framed title bar.
const MINIMIZED_ROWS: u16 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Background {
    pub width: u32,
    pub height: u32,
    pub average_rgb: [u8; 3],
}

pub fn is_background_image(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            BACKGROUND_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

pub fn load_background(path: &Path) -> Result<Background, SkinError> {
    if !is_background_image(path) {
        return Err(SkinError::UnsupportedExtension(path.to_path_buf()));
    }
    let data = fs::read(path).map_err(|source| SkinError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let image = decode_image(&data)?;
    Ok(Background {
        width: image.width(),
        height: image.height(),
        average_rgb: average_rgb(&image),
    })
}

#[derive(Debug, Clone)]
pub struct Skin {
    pub cols: u16,
    pub rows: u16,
    pub background: Option<Background>,
    pub pinned: bool,
    pub minimized: bool,
}

impl Skin {
    /// Build the skin; a bad background image is logged and left out.
    pub fn from_settings(settings: &SkinSettings) -> Self {
        let background = settings.background.as_deref().and_then(|path| {
            match load_background(path) {
                Ok(bg) => {
                    info!(
                        path = %path.display(),
                        width = bg.width,
                        height = bg.height,
                        "background loaded"
                    );
                    Some(bg)
                }
                Err(err) => {
                    warn!(error = %err, "background image ignored");
                    None
                }
            }
        });

        Self {
            cols: cells(settings.width_px, settings.cell_width_px),
            rows: cells(settings.height_px, settings.cell_height_px),
            background,
            pinned: settings.always_on_top,
            minimized: false,
        }
    }

    pub fn toggle_pinned(&mut self) {
        self.pinned = !self.pinned;
    }

    pub fn toggle_minimized(&mut self) {
        self.minimized = !self.minimized;
    }

    /// Current panel size in terminal cells.
    pub fn panel_size(&self) -> (u16, u16) {
        if self.minimized {
            (self.cols, MINIMIZED_ROWS.min(self.rows))
        } else {
            (self.cols, self.rows)
        }
    }
}

fn cells(px: u16, px_per_cell: u16) -> u16 {
    px.div_ceil(px_per_cell.max(1)).max(1)
}
