use std::sync::Arc;

use kurbo::Shape as _;

use crate::foundation::core::{Bitmap, PixelFormat, Rect};
use crate::foundation::error::{PhotoboothError, PhotoboothResult};

pub(crate) fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> PhotoboothResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| PhotoboothError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| PhotoboothError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(PhotoboothError::render("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[..3].fill(0);
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * a + 127) / 255) as u8;
        }
    }
}

pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 {
            px[..3].fill(0);
            continue;
        }
        if a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

/// Straight RGBA image as an image paint anchored at the user-space origin.
pub(crate) fn image_paint(img: &image::RgbaImage) -> PhotoboothResult<vello_cpu::Image> {
    let (w, h) = img.dimensions();
    let mut bytes = img.as_raw().clone();
    premultiply_rgba8_in_place(&mut bytes);
    let pixmap = pixmap_from_premul_bytes(&bytes, w, h)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

/// Read a rendered pixmap back as a straight-alpha `Rgba8` bitmap.
pub(crate) fn pixmap_to_bitmap(pixmap: &vello_cpu::Pixmap) -> Bitmap {
    let mut bytes = pixmap.data_as_u8_slice().to_vec();
    unpremultiply_rgba8_in_place(&mut bytes);
    Bitmap::from_raw_parts(
        u32::from(pixmap.width()),
        u32::from(pixmap.height()),
        PixelFormat::Rgba8,
        bytes,
    )
}

pub(crate) fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

pub(crate) fn rounded_rect_path(r: Rect, radius: f64) -> vello_cpu::kurbo::BezPath {
    let rr = kurbo::RoundedRect::from_rect(r, radius);
    let mut p = vello_cpu::kurbo::BezPath::new();
    for el in rr.path_elements(0.1) {
        p.push(el);
    }
    p
}
