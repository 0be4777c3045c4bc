use std::sync::Arc;

use image::{RgbaImage, imageops};

use crate::foundation::error::{PhotoboothError, PhotoboothResult};

pub use kurbo::{Point, Rect, Size};

/// Byte layout of one pixel in a [`Bitmap`]. Both layouts are straight (non-premultiplied) alpha.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PixelFormat {
    /// `r, g, b, a`.
    Rgba8,
    /// `b, g, r, a`, as delivered by camera sample buffers.
    Bgra8,
}

impl PixelFormat {
    pub const fn bytes_per_pixel(self) -> usize {
        4
    }
}

/// Display orientation tag carried from capture.
///
/// Matches the EXIF orientation set: `Up`=1, `UpMirrored`=2, `Down`=3, `DownMirrored`=4,
/// `LeftMirrored`=5, `Right`=6, `RightMirrored`=7, `Left`=8.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Orientation {
    #[default]
    Up,
    Down,
    Left,
    Right,
    UpMirrored,
    DownMirrored,
    LeftMirrored,
    RightMirrored,
}

impl Orientation {
    /// `true` when the displayed image is the stored image rotated by a quarter turn.
    pub fn swaps_axes(self) -> bool {
        matches!(
            self,
            Self::Left | Self::Right | Self::LeftMirrored | Self::RightMirrored
        )
    }

    /// Size of the image once displayed upright.
    pub fn oriented_size(self, width: u32, height: u32) -> (u32, u32) {
        if self.swaps_axes() {
            (height, width)
        } else {
            (width, height)
        }
    }

    /// Rotate/flip stored pixels into display orientation.
    pub fn apply(self, img: RgbaImage) -> RgbaImage {
        match self {
            Self::Up => img,
            Self::Down => imageops::rotate180(&img),
            Self::Left => imageops::rotate270(&img),
            Self::Right => imageops::rotate90(&img),
            Self::UpMirrored => imageops::flip_horizontal(&img),
            Self::DownMirrored => imageops::flip_vertical(&img),
            // transpose
            Self::LeftMirrored => imageops::flip_horizontal(&imageops::rotate90(&img)),
            // transverse
            Self::RightMirrored => imageops::flip_horizontal(&imageops::rotate270(&img)),
        }
    }
}

/// Immutable 8-bit RGBA-family pixel buffer plus the scale/orientation tags from capture.
///
/// Pixel bytes are shared, so clones are cheap and a bitmap can be handed to a worker thread.
/// Every transform in this crate returns a new bitmap.
#[derive(Clone, Debug, PartialEq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Arc<[u8]>,
    scale: f32,
    orientation: Orientation,
}

impl Bitmap {
    /// Wrap raw pixel bytes as delivered by a capture source.
    ///
    /// Nothing is validated here. A buffer whose length does not match `width * height * 4`, or
    /// an empty extent, is reported by [`Bitmap::is_decodable`] and treated as undecodable by
    /// consumers.
    pub fn from_raw_parts(
        width: u32,
        height: u32,
        format: PixelFormat,
        data: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            width,
            height,
            format,
            data: data.into(),
            scale: 1.0,
            orientation: Orientation::Up,
        }
    }

    pub fn from_rgba_image(img: RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self::from_raw_parts(width, height, PixelFormat::Rgba8, img.into_raw())
    }

    /// Solid-colour bitmap, mostly useful for tests and placeholders.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self::from_rgba_image(RgbaImage::from_pixel(width, height, image::Rgba(rgba)))
    }

    /// Decode an encoded image file (PNG, JPEG, ...) into an `Rgba8` bitmap.
    pub fn decode(bytes: &[u8]) -> PhotoboothResult<Self> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| PhotoboothError::decode(format!("failed to decode image: {e}")))?;
        Ok(Self::from_rgba_image(img.to_rgba8()))
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn expected_len(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(self.format.bytes_per_pixel())
    }

    /// `true` when the extent is non-empty and the byte length matches it.
    pub fn is_decodable(&self) -> bool {
        self.width > 0 && self.height > 0 && self.expected_len() == Some(self.data.len())
    }

    /// Pixel at `(x, y)` in stored orientation, as `[r, g, b, a]`.
    pub fn pixel_rgba(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if !self.is_decodable() || x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = &self.data[i..i + 4];
        Some(match self.format {
            PixelFormat::Rgba8 => [px[0], px[1], px[2], px[3]],
            PixelFormat::Bgra8 => [px[2], px[1], px[0], px[3]],
        })
    }

    /// Copy into an `Rgba8` image in stored orientation. `None` when undecodable.
    pub fn to_rgba_image(&self) -> Option<RgbaImage> {
        if !self.is_decodable() {
            return None;
        }
        let raw = match self.format {
            PixelFormat::Rgba8 => self.data.to_vec(),
            PixelFormat::Bgra8 => {
                let mut out = self.data.to_vec();
                for px in out.chunks_exact_mut(4) {
                    px.swap(0, 2);
                }
                out
            }
        };
        RgbaImage::from_raw(self.width, self.height, raw)
    }

    /// Copy into an `Rgba8` image rotated/flipped for display.
    pub fn to_display_rgba_image(&self) -> Option<RgbaImage> {
        self.to_rgba_image().map(|img| self.orientation.apply(img))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
