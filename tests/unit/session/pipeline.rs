use super::*;
use crate::render::layout::StripLayout;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

fn frames() -> FrameSequence {
    let shots = (0..3u8)
        .map(|i| {
            let img = image::RgbaImage::from_fn(64, 48, |x, y| {
                image::Rgba([(x * 4) as u8, (y * 5) as u8, 60 * i, 255])
            });
            Bitmap::from_rgba_image(img)
        })
        .collect();
    FrameSequence::new(shots, 3).unwrap()
}

#[test]
fn new_rejects_invalid_config() {
    let cfg = PhotoboothConfig {
        total_shots: 0,
        ..PhotoboothConfig::default()
    };
    assert!(Pipeline::new(&cfg).is_err());
    assert_eq!(
        Pipeline::new(&PhotoboothConfig::default())
            .unwrap()
            .total_shots(),
        3
    );
}

#[test]
fn apply_effect_all_keeps_order_and_matches_single_calls() {
    let mut p = Pipeline::new(&PhotoboothConfig::default()).unwrap();
    let seq = frames();
    let out = p.apply_effect_all(&seq, EffectKind::Vintage).unwrap();
    assert_eq!(out.len(), 3);
    for (i, f) in seq.iter().enumerate() {
        assert_eq!(out.frames()[i], p.apply_effect(f, EffectKind::Vintage));
    }
}

#[test]
fn render_strip_has_layout_size() {
    let mut p = Pipeline::new(&PhotoboothConfig::default()).unwrap();
    let strip = p
        .render_strip(&frames(), EffectKind::Sepia, &StripStyle::default(), date())
        .unwrap();
    assert_eq!(strip.dimensions(), StripLayout::default().canvas_size(3));
}

#[test]
fn rerendering_with_same_inputs_is_identical() {
    let mut p = Pipeline::new(&PhotoboothConfig::default()).unwrap();
    let style = StripStyle::default();
    let a = p
        .render_strip(&frames(), EffectKind::SoftGlow, &style, date())
        .unwrap();
    // Switch away and back, as a user flipping through effects would.
    p.render_strip(&frames(), EffectKind::Noir, &style, date())
        .unwrap();
    let b = p
        .render_strip(&frames(), EffectKind::SoftGlow, &style, date())
        .unwrap();
    assert_eq!(a, b);
}

#[test]
fn exhausted_context_reports_no_strip() {
    let ctx = RenderContext::new().with_max_surface_pixels(10);
    let mut p = Pipeline::with_parts(ctx, StripCompositor::default(), 3);
    assert!(
        p.render_strip(&frames(), EffectKind::Sepia, &StripStyle::default(), date())
            .is_none()
    );
    // Effects do not need a raster surface.
    let binding = frames();
    let f = &binding.frames()[0];
    assert_eq!(p.apply_effect(f, EffectKind::Sepia).dimensions(), (64, 48));
}

#[test]
fn today_variant_renders() {
    let mut p = Pipeline::new(&PhotoboothConfig::default()).unwrap();
    let strip = p.render_strip_today(&frames(), EffectKind::Original, &StripStyle::default());
    assert_eq!(strip.map(|s| s.dimensions()), Some((260, 776)));
}

#[test]
fn sequence_of_the_wrong_length_is_rejected() {
    let mut p = Pipeline::new(&PhotoboothConfig::default()).unwrap();
    let short = FrameSequence::new(vec![Bitmap::solid(64, 48, [90, 90, 90, 255])], 1).unwrap();
    let err = p.apply_effect_all(&short, EffectKind::Sepia).unwrap_err();
    assert!(err.to_string().contains("expects 3 frames"), "{err}");
    assert!(
        p.render_strip(&short, EffectKind::Sepia, &StripStyle::default(), date())
            .is_none()
    );
}
