use serde::{Deserialize, Serialize};

use crate::foundation::core::Bitmap;
use crate::foundation::error::{PhotoboothError, PhotoboothResult};

/// File format named in configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExportFormat {
    Png,
    #[default]
    Jpeg,
}

/// Encoder choice for a strip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EncodeFormat {
    Png,
    /// Quality in `1..=100`. Transparent areas are flattened onto white.
    Jpeg { quality: u8 },
}

impl Default for EncodeFormat {
    fn default() -> Self {
        Self::Jpeg { quality: 90 }
    }
}

impl EncodeFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg { .. } => "jpg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg { .. } => "image/jpeg",
        }
    }
}

/// Encode a bitmap (display orientation applied) into file bytes.
pub fn encode_bitmap(bitmap: &Bitmap, format: EncodeFormat) -> PhotoboothResult<Vec<u8>> {
    let img = bitmap
        .to_display_rgba_image()
        .ok_or_else(|| PhotoboothError::decode("cannot encode an undecodable bitmap"))?;
    let mut buffer = Vec::new();
    match format {
        EncodeFormat::Png => {
            img.write_to(
                &mut std::io::Cursor::new(&mut buffer),
                image::ImageFormat::Png,
            )
            .map_err(|e| PhotoboothError::render(format!("PNG encoding failed: {e}")))?;
        }
        EncodeFormat::Jpeg { quality } => {
            if !(1..=100).contains(&quality) {
                return Err(PhotoboothError::validation(
                    "jpeg quality must be in 1..=100",
                ));
            }
            let rgb = flatten_onto_white(&img);
            let mut cursor = std::io::Cursor::new(&mut buffer);
            let mut encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, quality);
            encoder
                .encode(
                    rgb.as_raw(),
                    rgb.width(),
                    rgb.height(),
                    image::ExtendedColorType::Rgb8,
                )
                .map_err(|e| PhotoboothError::render(format!("JPEG encoding failed: {e}")))?;
        }
    }
    Ok(buffer)
}

fn flatten_onto_white(img: &image::RgbaImage) -> image::RgbImage {
    image::RgbImage::from_fn(img.width(), img.height(), |x, y| {
        let [r, g, b, a] = img.get_pixel(x, y).0;
        let a = u16::from(a);
        let over = |c: u8| ((u16::from(c) * a + 255 * (255 - a) + 127) / 255) as u8;
        image::Rgb([over(r), over(g), over(b)])
    })
}
