use crate::effects::blur::BlurScratch;
use crate::effects::kind::EffectKind;
use crate::effects::ops::Operator;
use crate::effects::working::WorkingImage;
use crate::foundation::core::Bitmap;
use crate::foundation::error::{PhotoboothError, PhotoboothResult};
use crate::render::context::RenderContext;

/// Apply `kind` to `source`.
///
/// Never fails: an undecodable source, an operator error, or an operator that changes the extent
/// all yield `source` unchanged. The result has the source's pixel size, scale and orientation.
#[tracing::instrument(level = "debug", skip(ctx, source), fields(w = source.width(), h = source.height()))]
pub fn apply_effect(ctx: &mut RenderContext, source: &Bitmap, kind: EffectKind) -> Bitmap {
    if kind == EffectKind::Original {
        return source.clone();
    }
    apply_operators(ctx, source, kind.chain())
}

/// Run `chain` over `source`, falling back to `source` on any failure.
pub(crate) fn apply_operators(
    ctx: &mut RenderContext,
    source: &Bitmap,
    chain: &[Operator],
) -> Bitmap {
    match try_apply(ctx, source, chain) {
        Ok(out) => out,
        Err(e) => {
            tracing::warn!(error = %e, "effect failed, returning source unchanged");
            source.clone()
        }
    }
}

fn try_apply(
    ctx: &mut RenderContext,
    source: &Bitmap,
    chain: &[Operator],
) -> PhotoboothResult<Bitmap> {
    let working = WorkingImage::decode(source)
        .ok_or_else(|| PhotoboothError::decode("source is undecodable"))?;
    let out = run_chain(chain, working, &mut ctx.blur)?;
    Ok(out.encode(source))
}

pub(crate) fn run_chain(
    chain: &[Operator],
    mut image: WorkingImage,
    scratch: &mut BlurScratch,
) -> PhotoboothResult<WorkingImage> {
    for op in chain {
        let out = op.apply(&image, scratch)?;
        if !out.same_extent(&image) {
            return Err(PhotoboothError::render(format!(
                "operator {} changed extent from {}x{} to {}x{}",
                op.name(),
                image.width,
                image.height,
                out.width,
                out.height
            )));
        }
        image = out;
    }
    Ok(image)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/processor.rs"]
mod tests;
