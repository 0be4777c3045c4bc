use std::fmt::Write as _;

use chrono::NaiveDate;
use image::imageops::{self, FilterType};
use serde::{Deserialize, Serialize};

use crate::assets::color::FrameColor;
use crate::assets::text::{CaptionFont, TextBrushRgba8};
use crate::foundation::core::{Bitmap, Rect};
use crate::foundation::error::{PhotoboothError, PhotoboothResult};
use crate::render::context::RenderContext;
use crate::render::layout::{StripLayout, aspect_fill};
use crate::render::pixmap::{image_paint, pixmap_to_bitmap, rect_to_cpu, rounded_rect_path};
use crate::session::capture::FrameSequence;

/// Long date, e.g. `October 18, 2026`.
pub const DEFAULT_DATE_FORMAT: &str = "%B %-d, %Y";

/// Per-build choices the user can toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StripStyle {
    pub frame_color: FrameColor,
    pub show_date: bool,
}

impl Default for StripStyle {
    fn default() -> Self {
        Self {
            frame_color: FrameColor::WHITE,
            show_date: true,
        }
    }
}

/// Reject `chrono` patterns that cannot be rendered.
pub fn validate_date_format(pattern: &str) -> PhotoboothResult<()> {
    let bad = chrono::format::StrftimeItems::new(pattern)
        .any(|item| matches!(item, chrono::format::Item::Error));
    if bad || pattern.trim().is_empty() {
        return Err(PhotoboothError::validation(format!(
            "invalid date format '{pattern}'"
        )));
    }
    Ok(())
}

/// Lays frames out top to bottom on a bordered card and captions it with a date.
#[derive(Clone, Debug)]
pub struct StripCompositor {
    layout: StripLayout,
    font: CaptionFont,
    date_format: String,
}

impl Default for StripCompositor {
    fn default() -> Self {
        Self {
            layout: StripLayout::default(),
            font: CaptionFont::bundled(),
            date_format: DEFAULT_DATE_FORMAT.to_owned(),
        }
    }
}

impl StripCompositor {
    pub fn new(
        layout: StripLayout,
        font: CaptionFont,
        date_format: impl Into<String>,
    ) -> PhotoboothResult<Self> {
        layout.validate()?;
        let date_format = date_format.into();
        validate_date_format(&date_format)?;
        Ok(Self {
            layout,
            font,
            date_format,
        })
    }

    pub fn layout(&self) -> &StripLayout {
        &self.layout
    }

    pub fn caption_text(&self, date: NaiveDate) -> PhotoboothResult<String> {
        let mut out = String::new();
        write!(out, "{}", date.format(&self.date_format)).map_err(|_| {
            PhotoboothError::validation(format!("invalid date format '{}'", self.date_format))
        })?;
        Ok(out)
    }

    /// Composite `frames` into one strip.
    ///
    /// Returns `None` only when no raster surface of the required size can be had. Frames that
    /// cannot be decoded leave their slot in the frame colour.
    #[tracing::instrument(level = "debug", skip_all, fields(frames = frames.len(), show_date = style.show_date))]
    pub fn render(
        &self,
        ctx: &mut RenderContext,
        frames: &FrameSequence,
        style: &StripStyle,
        date: NaiveDate,
    ) -> Option<Bitmap> {
        let (width, height) = self.layout.canvas_size(frames.len());
        let (w, h) = match ctx.surface_size(width, height) {
            Ok(size) => size,
            Err(e) => {
                tracing::warn!(width, height, error = %e, "strip raster unavailable");
                return None;
            }
        };
        let caption = if style.show_date {
            match self.caption_text(date) {
                Ok(text) => Some(text),
                Err(e) => {
                    tracing::warn!(error = %e, "caption skipped");
                    None
                }
            }
        } else {
            None
        };

        let drawn = ctx.with_raster(w, h, |ctx, raster| {
            self.draw_card(raster, style.frame_color, width, height);
            for (i, frame) in frames.iter().enumerate() {
                if let Err(e) = self.draw_photo(raster, frame, self.layout.slot_rect(i)) {
                    tracing::warn!(index = i, error = %e, "frame skipped");
                }
            }
            if let Some(text) = caption.as_deref() {
                let band = self.layout.caption_band(frames.len());
                if let Err(e) = self.draw_caption(ctx, raster, text, style.frame_color, width, band)
                {
                    tracing::warn!(error = %e, "caption skipped");
                }
            }

            raster.flush();
            let mut pixmap = vello_cpu::Pixmap::new(w, h);
            raster.render_to_pixmap(&mut pixmap);
            Ok(pixmap_to_bitmap(&pixmap))
        });
        match drawn {
            Ok(strip) => Some(strip),
            Err(e) => {
                tracing::warn!(error = %e, "strip raster unavailable");
                None
            }
        }
    }

    fn draw_card(
        &self,
        raster: &mut vello_cpu::RenderContext,
        color: FrameColor,
        width: u32,
        height: u32,
    ) {
        let card = Rect::new(0.0, 0.0, f64::from(width), f64::from(height));
        raster.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        raster.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        raster.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, 255,
        ));
        if self.layout.card_corner_radius > 0.0 {
            raster.fill_path(&rounded_rect_path(card, self.layout.card_corner_radius));
        } else {
            raster.fill_rect(&rect_to_cpu(card));
        }
    }

    fn draw_photo(
        &self,
        raster: &mut vello_cpu::RenderContext,
        frame: &Bitmap,
        slot: Rect,
    ) -> PhotoboothResult<()> {
        let img = frame
            .to_display_rgba_image()
            .ok_or_else(|| PhotoboothError::decode("frame is undecodable"))?;
        let (slot_w, slot_h) = (self.layout.photo_width, self.layout.photo_height);
        let fill = aspect_fill(img.width(), img.height(), slot_w, slot_h)
            .ok_or_else(|| PhotoboothError::decode("frame has an empty extent"))?;

        let region = imageops::crop_imm(&img, fill.src_x, fill.src_y, fill.src_width, fill.src_height)
            .to_image();
        let cropped = if region.dimensions() == (slot_w, slot_h) {
            region
        } else {
            imageops::resize(&region, slot_w, slot_h, FilterType::Triangle)
        };
        let paint = image_paint(&cropped)?;

        let local = Rect::new(0.0, 0.0, f64::from(slot_w), f64::from(slot_h));
        raster.set_transform(vello_cpu::kurbo::Affine::translate((slot.x0, slot.y0)));
        raster.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        raster.set_paint(paint);
        if self.layout.photo_corner_radius > 0.0 {
            raster.fill_path(&rounded_rect_path(local, self.layout.photo_corner_radius));
        } else {
            raster.fill_rect(&rect_to_cpu(local));
        }
        Ok(())
    }

    fn draw_caption(
        &self,
        ctx: &mut RenderContext,
        raster: &mut vello_cpu::RenderContext,
        text: &str,
        frame_color: FrameColor,
        canvas_width: u32,
        band: Rect,
    ) -> PhotoboothResult<()> {
        let c = frame_color.caption_color();
        let brush = TextBrushRgba8 {
            r: c.r,
            g: c.g,
            b: c.b,
            a: 255,
        };
        let layout =
            ctx.text
                .layout_line(text, self.font.bytes(), self.layout.caption_font_size, brush)?;
        let font = ctx.font_data(self.font.bytes());
        tracing::debug!(
            family = ctx.text.last_family_name().unwrap_or("?"),
            width = layout.width(),
            "caption shaped"
        );

        let x = ((f64::from(canvas_width) - f64::from(layout.width())) / 2.0).max(0.0);
        let y = band.y0 + self.layout.caption_inset;
        raster.set_transform(vello_cpu::kurbo::Affine::translate((x, y)));
        raster.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                raster.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                raster
                    .glyph_run(&font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/strip.rs"]
mod tests;
