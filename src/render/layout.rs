use serde::{Deserialize, Serialize};

use crate::foundation::core::Rect;
use crate::foundation::error::{PhotoboothError, PhotoboothResult};

/// Geometry of a strip, in output pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StripLayout {
    pub canvas_width: u32,
    pub photo_width: u32,
    pub photo_height: u32,
    pub spacing: u32,
    pub top_padding: u32,
    pub bottom_padding: u32,
    /// Reserved below the last photo whether or not a caption is drawn.
    pub caption_height: u32,
    pub card_corner_radius: f64,
    pub photo_corner_radius: f64,
    /// Distance from the top of the caption band to the top of the caption text.
    pub caption_inset: f64,
    pub caption_font_size: f32,
}

impl Default for StripLayout {
    fn default() -> Self {
        Self {
            canvas_width: 260,
            photo_width: 220,
            photo_height: 220,
            spacing: 16,
            top_padding: 20,
            bottom_padding: 40,
            caption_height: 24,
            card_corner_radius: 0.0,
            photo_corner_radius: 3.0,
            caption_inset: 10.0,
            caption_font_size: 20.0,
        }
    }
}

impl StripLayout {
    pub fn validate(&self) -> PhotoboothResult<()> {
        if self.canvas_width == 0 || self.photo_width == 0 || self.photo_height == 0 {
            return Err(PhotoboothError::validation(
                "layout canvas_width and photo size must be > 0",
            ));
        }
        if self.photo_width > self.canvas_width {
            return Err(PhotoboothError::validation(format!(
                "photo_width {} exceeds canvas_width {}",
                self.photo_width, self.canvas_width
            )));
        }
        for (name, v) in [
            ("card_corner_radius", self.card_corner_radius),
            ("photo_corner_radius", self.photo_corner_radius),
            ("caption_inset", self.caption_inset),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(PhotoboothError::validation(format!(
                    "layout {name} must be finite and >= 0"
                )));
            }
        }
        if !self.caption_font_size.is_finite() || self.caption_font_size <= 0.0 {
            return Err(PhotoboothError::validation(
                "layout caption_font_size must be finite and > 0",
            ));
        }
        Ok(())
    }

    /// `top + photo_h * n + spacing * (n - 1) + caption_h + bottom`.
    ///
    /// Saturates instead of overflowing, so absurd inputs surface as an unavailable raster.
    pub fn canvas_height(&self, count: usize) -> u32 {
        let n = u32::try_from(count).unwrap_or(u32::MAX);
        self.top_padding
            .saturating_add(self.photo_height.saturating_mul(n))
            .saturating_add(self.spacing.saturating_mul(n.saturating_sub(1)))
            .saturating_add(self.caption_height)
            .saturating_add(self.bottom_padding)
    }

    pub fn canvas_size(&self, count: usize) -> (u32, u32) {
        (self.canvas_width, self.canvas_height(count))
    }

    /// Slot of photo `index`, centred horizontally.
    pub fn slot_rect(&self, index: usize) -> Rect {
        let x = (f64::from(self.canvas_width) - f64::from(self.photo_width)) / 2.0;
        let y = f64::from(self.top_padding)
            + index as f64 * (f64::from(self.photo_height) + f64::from(self.spacing));
        Rect::new(
            x,
            y,
            x + f64::from(self.photo_width),
            y + f64::from(self.photo_height),
        )
    }

    /// The band reserved for the caption, directly below the last photo slot.
    pub fn caption_band(&self, count: usize) -> Rect {
        let top = f64::from(self.canvas_height(count))
            - f64::from(self.bottom_padding)
            - f64::from(self.caption_height);
        Rect::new(
            0.0,
            top,
            f64::from(self.canvas_width),
            top + f64::from(self.caption_height),
        )
    }
}

/// How a source image is cropped and scaled to fill a slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AspectFill {
    pub scale: f64,
    /// Region of the source, in source pixels, that lands in the slot.
    pub src_x: u32,
    pub src_y: u32,
    pub src_width: u32,
    pub src_height: u32,
}

/// `scale = max(slot_w / w, slot_h / h)`, centre-cropped in source space.
///
/// Only the cropped region needs scaling, so the work is bounded by the slot size whatever the
/// source aspect ratio.
pub fn aspect_fill(src_w: u32, src_h: u32, slot_w: u32, slot_h: u32) -> Option<AspectFill> {
    if src_w == 0 || src_h == 0 || slot_w == 0 || slot_h == 0 {
        return None;
    }
    let scale = (f64::from(slot_w) / f64::from(src_w)).max(f64::from(slot_h) / f64::from(src_h));
    let visible = |slot: u32, src: u32| ((f64::from(slot) / scale).round() as u32).clamp(1, src);
    let src_width = visible(slot_w, src_w);
    let src_height = visible(slot_h, src_h);
    Some(AspectFill {
        scale,
        src_x: (src_w - src_width) / 2,
        src_y: (src_h - src_height) / 2,
        src_width,
        src_height,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/layout.rs"]
mod tests;
