//! Image decoding helpers shared by cover art and the skin background.

use std::io::Cursor;

use image::{DynamicImage, ImageReader};

use crate::error::ArtworkError;

/// Decode raw image bytes, guessing the format from the content.
pub fn decode_image(data: &[u8]) -> Result<DynamicImage, image::ImageError> {
    ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(image::ImageError::IoError)?
        .decode()
}

/// Average colour of an image, computed on a small thumbnail.
pub fn average_rgb(image: &DynamicImage) -> [u8; 3] {
    let thumb = image.thumbnail(32, 32).to_rgb8();
    let mut sum = [0u64; 3];
    let mut count = 0u64;
    for pixel in thumb.pixels() {
        for (acc, channel) in sum.iter_mut().zip(pixel.0) {
            *acc += u64::from(channel);
        }
        count += 1;
    }
    if count == 0 {
        return [0, 0, 0];
    }
    sum.map(|c| (c / count) as u8)
}

pub(super) fn check_decodes(data: &[u8]) -> Result<(u32, u32, [u8; 3]), ArtworkError> {
    let image = decode_image(data)?;
    Ok((image.width(), image.height(), average_rgb(&image)))
}
