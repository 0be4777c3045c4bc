use chrono::NaiveDate;

use crate::config::PhotoboothConfig;
use crate::effects::kind::EffectKind;
use crate::effects::processor::apply_effect;
use crate::foundation::core::Bitmap;
use crate::foundation::error::{PhotoboothError, PhotoboothResult};
use crate::render::context::RenderContext;
use crate::render::strip::{StripCompositor, StripStyle};
use crate::session::capture::FrameSequence;

/// Effect processor and strip compositor sharing one render context.
///
/// Every frame of a build is processed, in capture order, before compositing starts.
#[derive(Debug)]
pub struct Pipeline {
    ctx: RenderContext,
    compositor: StripCompositor,
    total_shots: usize,
}

impl Pipeline {
    pub fn new(config: &PhotoboothConfig) -> PhotoboothResult<Self> {
        config.validate()?;
        Ok(Self {
            ctx: RenderContext::new(),
            compositor: config.compositor()?,
            total_shots: config.total_shots,
        })
    }

    /// Build from parts, e.g. to use a context with a custom surface budget.
    pub fn with_parts(ctx: RenderContext, compositor: StripCompositor, total_shots: usize) -> Self {
        Self {
            ctx,
            compositor,
            total_shots,
        }
    }

    pub fn total_shots(&self) -> usize {
        self.total_shots
    }

    pub fn compositor(&self) -> &StripCompositor {
        &self.compositor
    }

    pub fn apply_effect(&mut self, source: &Bitmap, kind: EffectKind) -> Bitmap {
        apply_effect(&mut self.ctx, source, kind)
    }

    /// Apply `kind` to every frame in capture order.
    ///
    /// Fails if the sequence does not hold exactly [`Pipeline::total_shots`] frames.
    #[tracing::instrument(level = "debug", skip(self, frames), fields(frames = frames.len()))]
    pub fn apply_effect_all(
        &mut self,
        frames: &FrameSequence,
        kind: EffectKind,
    ) -> PhotoboothResult<FrameSequence> {
        if frames.len() != self.total_shots {
            return Err(PhotoboothError::validation(format!(
                "pipeline expects {} frames, got {}",
                self.total_shots,
                frames.len()
            )));
        }
        frames.map(|f| apply_effect(&mut self.ctx, f, kind))
    }

    /// Apply `kind` to every frame, then composite.
    ///
    /// `None` means the strip is unavailable; callers keep whatever they showed before.
    #[tracing::instrument(level = "info", skip(self, frames, style), fields(frames = frames.len()))]
    pub fn render_strip(
        &mut self,
        frames: &FrameSequence,
        kind: EffectKind,
        style: &StripStyle,
        date: NaiveDate,
    ) -> Option<Bitmap> {
        let processed = match self.apply_effect_all(frames, kind) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(error = %e, "frames cannot be processed for this strip");
                return None;
            }
        };
        let strip = self
            .compositor
            .render(&mut self.ctx, &processed, style, date);
        if let Some(s) = &strip {
            tracing::debug!(width = s.width(), height = s.height(), "strip rendered");
        }
        strip
    }

    /// [`Pipeline::render_strip`] captioned with today's local date.
    pub fn render_strip_today(
        &mut self,
        frames: &FrameSequence,
        kind: EffectKind,
        style: &StripStyle,
    ) -> Option<Bitmap> {
        let today = chrono::Local::now().date_naive();
        self.render_strip(frames, kind, style, today)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/pipeline.rs"]
mod tests;
