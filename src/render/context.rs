use crate::assets::text::{TextLayoutEngine, font_key};
use crate::effects::blur::BlurScratch;
use crate::foundation::error::{PhotoboothError, PhotoboothResult};

/// Default cap on raster surface area, in pixels.
pub const DEFAULT_MAX_SURFACE_PIXELS: u64 = 64 * 1024 * 1024;

/// Reusable rendering resources: the CPU rasterizer, text shaping state and blur scratch.
///
/// Acquire one per pipeline and lend it mutably to each call. Nothing observable carries over
/// between calls; everything is released when the context is dropped.
pub struct RenderContext {
    pub(crate) blur: BlurScratch,
    pub(crate) text: TextLayoutEngine,
    raster: Option<vello_cpu::RenderContext>,
    font: Option<(u64, vello_cpu::peniko::FontData)>,
    max_surface_pixels: u64,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("raster", &self.raster.as_ref().map(|c| (c.width(), c.height())))
            .field("max_surface_pixels", &self.max_surface_pixels)
            .finish_non_exhaustive()
    }
}

impl RenderContext {
    pub fn new() -> Self {
        Self {
            blur: BlurScratch::default(),
            text: TextLayoutEngine::new(),
            raster: None,
            font: None,
            max_surface_pixels: DEFAULT_MAX_SURFACE_PIXELS,
        }
    }

    /// Limit the raster surface area. Requests above it are treated as exhaustion.
    pub fn with_max_surface_pixels(mut self, max: u64) -> Self {
        self.max_surface_pixels = max;
        self
    }

    pub fn max_surface_pixels(&self) -> u64 {
        self.max_surface_pixels
    }

    /// Validate a surface request against `u16` extents and the pixel budget.
    pub(crate) fn surface_size(&self, width: u32, height: u32) -> PhotoboothResult<(u16, u16)> {
        if width == 0 || height == 0 {
            return Err(PhotoboothError::render("raster surface has empty extent"));
        }
        let w: u16 = width
            .try_into()
            .map_err(|_| PhotoboothError::render("raster surface width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| PhotoboothError::render("raster surface height exceeds u16"))?;
        if u64::from(width) * u64::from(height) > self.max_surface_pixels {
            return Err(PhotoboothError::render(format!(
                "raster surface {width}x{height} exceeds budget of {} pixels",
                self.max_surface_pixels
            )));
        }
        Ok((w, h))
    }

    /// Run `f` with a reset rasterizer of exactly `width` x `height`.
    pub(crate) fn with_raster<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut Self, &mut vello_cpu::RenderContext) -> PhotoboothResult<R>,
    ) -> PhotoboothResult<R> {
        let mut ctx = match self.raster.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(self, &mut ctx);
        self.raster = Some(ctx);
        out
    }

    /// Rasterizer font handle for `bytes`, reused while the same font is requested.
    pub(crate) fn font_data(&mut self, bytes: &[u8]) -> vello_cpu::peniko::FontData {
        let key = font_key(bytes);
        if let Some((k, font)) = &self.font
            && *k == key
        {
            return font.clone();
        }
        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(bytes.to_vec()),
            0,
        );
        self.font = Some((key, font.clone()));
        font
    }
}
