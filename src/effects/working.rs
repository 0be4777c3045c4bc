use crate::foundation::core::{Bitmap, PixelFormat};

/// Straight-alpha RGBA in `0..1`, the colour space every effect operator works in.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct WorkingImage {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) px: Vec<[f32; 4]>,
}

impl WorkingImage {
    /// `None` when the bitmap cannot be interpreted (empty extent or truncated buffer).
    pub(crate) fn decode(src: &Bitmap) -> Option<Self> {
        if !src.is_decodable() {
            return None;
        }
        let (r, b) = match src.format() {
            PixelFormat::Rgba8 => (0, 2),
            PixelFormat::Bgra8 => (2, 0),
        };
        let px = src
            .data()
            .chunks_exact(4)
            .map(|p| {
                [
                    f32::from(p[r]) / 255.0,
                    f32::from(p[1]) / 255.0,
                    f32::from(p[b]) / 255.0,
                    f32::from(p[3]) / 255.0,
                ]
            })
            .collect();
        Some(Self {
            width: src.width(),
            height: src.height(),
            px,
        })
    }

    /// Blank image with the same extent.
    pub(crate) fn blank_like(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            px: vec![[0.0; 4]; self.px.len()],
        }
    }

    pub(crate) fn same_extent(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.px.len() == other.px.len()
    }

    /// Apply `f` to every pixel; `f` receives `(x, y, rgba)`.
    pub(crate) fn map_pixels(&self, mut f: impl FnMut(u32, u32, [f32; 4]) -> [f32; 4]) -> Self {
        let w = self.width.max(1);
        let px = self
            .px
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                let x = (i as u32) % w;
                let y = (i as u32) / w;
                f(x, y, p)
            })
            .collect();
        Self {
            width: self.width,
            height: self.height,
            px,
        }
    }

    /// Clamp-to-edge read.
    pub(crate) fn sample_clamped(&self, x: i64, y: i64) -> [f32; 4] {
        let x = x.clamp(0, i64::from(self.width) - 1) as usize;
        let y = y.clamp(0, i64::from(self.height) - 1) as usize;
        self.px[y * self.width as usize + x]
    }

    /// Quantize back to an `Rgba8` bitmap carrying the scale/orientation tags of `like`.
    pub(crate) fn encode(&self, like: &Bitmap) -> Bitmap {
        fn to_u8(v: f32) -> u8 {
            (v.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        let mut raw = Vec::with_capacity(self.px.len() * 4);
        for p in &self.px {
            raw.extend_from_slice(&[to_u8(p[0]), to_u8(p[1]), to_u8(p[2]), to_u8(p[3])]);
        }
        Bitmap::from_raw_parts(self.width, self.height, PixelFormat::Rgba8, raw)
            .with_scale(like.scale())
            .with_orientation(like.orientation())
    }
}
