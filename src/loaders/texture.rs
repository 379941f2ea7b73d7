use anyhow::{bail, Context, Result};
use std::path::Path;

/// Decoded RGBA8 image, rows stored bottom-up
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl TextureImage {
    /// Wrap raw top-down RGBA8 rows, flipping them to bottom-up order
    pub fn from_rgba_top_down(width: u32, height: u32, mut pixels: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            bail!(
                "Invalid pixel buffer size for {}x{}: expected {} bytes, got {}",
                width,
                height,
                expected,
                pixels.len()
            );
        }
        flip_rows(&mut pixels, width as usize * 4);
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Bytes per row of pixels
    pub fn stride(&self) -> u32 {
        self.width * 4
    }
}

/// Decode a PNG (or any format the `image` crate recognises) into RGBA8
pub fn load_texture(path: impl AsRef<Path>) -> Result<TextureImage> {
    let path = path.as_ref();
    let image = image::open(path)
        .with_context(|| format!("Failed to decode texture: {}", path.display()))?
        .to_rgba8();

    let (width, height) = image.dimensions();
    log::debug!("Loaded texture {} ({}x{})", path.display(), width, height);
    TextureImage::from_rgba_top_down(width, height, image.into_raw())
}

/// Reverse row order in place; a trailing partial row is left untouched
pub fn flip_rows(pixels: &mut [u8], row_len: usize) {
    if row_len == 0 {
        return;
    }
    let rows = pixels.len() / row_len;
    for top in 0..rows / 2 {
        let bottom = rows - 1 - top;
        let (upper, lower) = pixels.split_at_mut(bottom * row_len);
        upper[top * row_len..(top + 1) * row_len].swap_with_slice(&mut lower[..row_len]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_even_rows() {
        let mut pixels = vec![1, 1, 2, 2, 3, 3, 4, 4];
        flip_rows(&mut pixels, 2);
        assert_eq!(pixels, vec![4, 4, 3, 3, 2, 2, 1, 1]);
    }

    #[test]
    fn flip_odd_rows_keeps_middle() {
        let mut pixels = vec![1, 2, 3];
        flip_rows(&mut pixels, 1);
        assert_eq!(pixels, vec![3, 2, 1]);
    }

    #[test]
    fn flip_ignores_trailing_partial_row() {
        let mut pixels = vec![1, 1, 2, 2, 9];
        flip_rows(&mut pixels, 2);
        assert_eq!(pixels, vec![2, 2, 1, 1, 9]);
    }

    #[test]
    fn flip_zero_row_len_is_noop() {
        let mut pixels = vec![5, 6];
        flip_rows(&mut pixels, 0);
        assert_eq!(pixels, vec![5, 6]);
    }

    #[test]
    fn from_rgba_flips_and_validates() {
        let top = [255u8, 0, 0, 255];
        let bottom = [0u8, 0, 255, 255];
        let pixels: Vec<u8> = top.iter().chain(bottom.iter()).copied().collect();

        let image = TextureImage::from_rgba_top_down(1, 2, pixels).unwrap();
        assert_eq!(&image.pixels[0..4], &bottom);
        assert_eq!(&image.pixels[4..8], &top);
        assert_eq!(image.stride(), 4);

        assert!(TextureImage::from_rgba_top_down(2, 2, vec![0; 15]).is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_texture("does/not/exist.png").unwrap_err();
        assert!(format!("{err:#}").contains("does/not/exist.png"));
    }
}
