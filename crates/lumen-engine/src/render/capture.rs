use std::path::Path;

use anyhow::{Context, Result};

/// Row alignment requested from the backend for captures.
pub const CAPTURE_ROW_ALIGNMENT: usize = 4;

/// Bytes per RGB row of a `width`-pixel capture, padded to [`CAPTURE_ROW_ALIGNMENT`].
pub fn row_stride(width: u32) -> usize {
    (width as usize * 3).next_multiple_of(CAPTURE_ROW_ALIGNMENT)
}

/// RGB8 pixels read back from the front buffer.
///
/// Rows are stored bottom row first with padded strides, exactly as the backend
/// returned them. Conversion to an image flips them to the usual top-down order.
#[derive(Debug, Clone)]
pub struct FrameReadback {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl FrameReadback {
    pub fn from_bottom_up(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = row_stride(width) * height as usize;
        anyhow::ensure!(
            pixels.len() == expected,
            "read-back for {width}x{height} has {} bytes, expected {expected}",
            pixels.len()
        );
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn stride(&self) -> usize {
        row_stride(self.width)
    }

    /// Pixel at `(x, y)` with `y = 0` the top row.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let row = (self.height - 1 - y) as usize;
        let at = row * self.stride() + x as usize * 3;
        Some([self.pixels[at], self.pixels[at + 1], self.pixels[at + 2]])
    }

    /// Tightly packed RGB rows, top row first.
    pub fn to_top_down(&self) -> Vec<u8> {
        let stride = self.stride();
        let row_bytes = self.width as usize * 3;

        self.pixels
            .chunks_exact(stride.max(1))
            .rev()
            .flat_map(|row| &row[..row_bytes])
            .copied()
            .collect()
    }

    pub fn to_image(&self) -> Result<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.to_top_down())
            .context("read-back does not fit the image dimensions")
    }

    /// Encodes the capture as PNG at `path`.
    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.to_image()?
            .save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("failed to write PNG to {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_is_padded_to_four_bytes() {
        assert_eq!(row_stride(1), 4);
        assert_eq!(row_stride(4), 12);
        assert_eq!(row_stride(5), 16);
        for w in 1..40 {
            assert_eq!(row_stride(w) % 4, 0);
        }
    }

    #[test]
    fn rows_are_flipped_and_unpadded() {
        // 1x2: bottom row red, top row green; each row padded to 4 bytes.
        let raw = vec![255, 0, 0, 0, 0, 255, 0, 0];
        let frame = FrameReadback::from_bottom_up(1, 2, raw).unwrap();
        assert_eq!(frame.to_top_down(), vec![0, 255, 0, 255, 0, 0]);
        assert_eq!(frame.pixel(0, 0), Some([0, 255, 0]));
        assert_eq!(frame.pixel(0, 2), None);
    }

    #[test]
    fn wrong_length_is_rejected() {
        assert!(FrameReadback::from_bottom_up(2, 2, vec![0; 12]).is_err());
        assert!(FrameReadback::from_bottom_up(2, 2, vec![0; 16]).is_ok());
    }
}
