use super::*;
use crate::foundation::core::{Orientation, PixelFormat};

const GREY: [u8; 4] = [128, 128, 128, 255];

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

fn grey_frames(n: usize) -> FrameSequence {
    FrameSequence::new(vec![Bitmap::solid(220, 220, GREY); n], n).unwrap()
}

fn close(a: [u8; 4], b: [u8; 4]) -> bool {
    a.iter().zip(b).all(|(x, y)| x.abs_diff(y) <= 2)
}

fn render(frames: &FrameSequence, style: StripStyle) -> Bitmap {
    let mut ctx = RenderContext::new();
    StripCompositor::default()
        .render(&mut ctx, frames, &style, date())
        .unwrap()
}

fn dark_pixels(strip: &Bitmap, y0: u32, y1: u32) -> usize {
    let mut n = 0;
    for y in y0..y1 {
        for x in 0..strip.width() {
            let p = strip.pixel_rgba(x, y).unwrap();
            if p[0] < 100 {
                n += 1;
            }
        }
    }
    n
}

#[test]
fn three_grey_frames_make_a_260_by_776_strip() {
    let strip = render(&grey_frames(3), StripStyle::default());
    assert_eq!(strip.dimensions(), (260, 776));
    assert_eq!(strip.format(), PixelFormat::Rgba8);
    assert_eq!(strip.orientation(), Orientation::Up);
    assert_eq!(strip.pixel_rgba(0, 0), Some([255, 255, 255, 255]));
    assert_eq!(strip.pixel_rgba(5, 300), Some([255, 255, 255, 255]));
    for i in 0..3 {
        let slot = StripLayout::default().slot_rect(i);
        let p = strip
            .pixel_rgba(130, (slot.y0 + 110.0) as u32)
            .unwrap();
        assert!(close(p, GREY), "slot {i}: {p:?}");
    }
}

#[test]
fn caption_is_dark_on_white_and_centred() {
    let strip = render(&grey_frames(3), StripStyle::default());
    assert!(dark_pixels(&strip, 712, 776) > 20);

    let (mut min_x, mut max_x) = (u32::MAX, 0);
    for y in 712..776 {
        for x in 0..260 {
            if strip.pixel_rgba(x, y).unwrap()[0] < 100 {
                min_x = min_x.min(x);
                max_x = max_x.max(x);
            }
        }
    }
    let left = min_x as i64;
    let right = 259 - max_x as i64;
    assert!((left - right).abs() <= 6, "left {left} right {right}");
}

#[test]
fn date_toggle_changes_only_the_caption_area() {
    let on = render(&grey_frames(3), StripStyle::default());
    let off = render(
        &grey_frames(3),
        StripStyle {
            show_date: false,
            ..StripStyle::default()
        },
    );
    assert_eq!(on.dimensions(), off.dimensions());
    assert_eq!(dark_pixels(&off, 712, 776), 0);
    let row = 260 * 4;
    assert_eq!(on.data()[..712 * row], off.data()[..712 * row]);
}

#[test]
fn dark_frame_changes_border_and_caption_only() {
    let light = render(&grey_frames(3), StripStyle::default());
    let dark = render(
        &grey_frames(3),
        StripStyle {
            frame_color: FrameColor::BLACK,
            show_date: true,
        },
    );
    assert_eq!(dark.pixel_rgba(0, 0), Some([0, 0, 0, 255]));
    // Photo interiors are untouched.
    let slot = StripLayout::default().slot_rect(1);
    for (x, y) in [(30, slot.y0 + 10.0), (130, slot.y0 + 110.0), (230, slot.y1 - 10.0)] {
        let y = y as u32;
        assert_eq!(light.pixel_rgba(x, y), dark.pixel_rgba(x, y));
    }
    // Light caption glyphs on the dark band.
    let mut bright = 0;
    for y in 712..776 {
        for x in 0..260 {
            if dark.pixel_rgba(x, y).unwrap()[0] > 150 {
                bright += 1;
            }
        }
    }
    assert!(bright > 20);
}

#[test]
fn undecodable_frame_leaves_slot_in_frame_colour() {
    let broken = Bitmap::from_raw_parts(220, 220, PixelFormat::Bgra8, vec![0u8; 16]);
    let frames = FrameSequence::new(
        vec![Bitmap::solid(220, 220, GREY), broken, Bitmap::solid(220, 220, GREY)],
        3,
    )
    .unwrap();
    let strip = render(&frames, StripStyle::default());
    assert_eq!(strip.dimensions(), (260, 776));
    let slot = StripLayout::default().slot_rect(1);
    assert_eq!(
        strip.pixel_rgba(130, (slot.y0 + 110.0) as u32),
        Some([255, 255, 255, 255])
    );
}

#[test]
fn tall_frames_are_centre_cropped() {
    let img = image::RgbaImage::from_fn(220, 440, |_, y| {
        if y < 220 {
            image::Rgba([255, 0, 0, 255])
        } else {
            image::Rgba([0, 0, 255, 255])
        }
    });
    let frame = Bitmap::from_rgba_image(img);
    let frames = FrameSequence::new(vec![frame], 1).unwrap();
    let strip = render(&frames, StripStyle::default());
    let slot = StripLayout::default().slot_rect(0);
    let top = strip.pixel_rgba(130, (slot.y0 + 50.0) as u32).unwrap();
    let bottom = strip.pixel_rgba(130, (slot.y0 + 170.0) as u32).unwrap();
    assert!(close(top, [255, 0, 0, 255]), "{top:?}");
    assert!(close(bottom, [0, 0, 255, 255]), "{bottom:?}");
}

#[test]
fn sliver_frames_fill_their_slots() {
    for (w, h) in [(1, 4000), (1, 60_000), (50_000, 2)] {
        let frames = FrameSequence::new(vec![Bitmap::solid(w, h, GREY); 3], 3).unwrap();
        let strip = render(&frames, StripStyle::default());
        assert_eq!(strip.dimensions(), (260, 776), "{w}x{h}");
        for i in 0..3 {
            let slot = StripLayout::default().slot_rect(i);
            let mid = strip
                .pixel_rgba(130, ((slot.y0 + slot.y1) / 2.0) as u32)
                .unwrap();
            assert!(close(mid, GREY), "{w}x{h} slot {i}: {mid:?}");
        }
    }
}

#[test]
fn orientation_is_applied_before_layout() {
    // Stored landscape, displayed portrait: the left half becomes the top half.
    let img = image::RgbaImage::from_fn(440, 220, |x, _| {
        if x < 220 {
            image::Rgba([255, 0, 0, 255])
        } else {
            image::Rgba([0, 0, 255, 255])
        }
    });
    let frame = Bitmap::from_rgba_image(img).with_orientation(Orientation::Left);
    let frames = FrameSequence::new(vec![frame], 1).unwrap();
    let strip = render(&frames, StripStyle::default());
    let slot = StripLayout::default().slot_rect(0);
    // Rotating 270 degrees clockwise moves the right (blue) half to the top.
    let top = strip.pixel_rgba(130, (slot.y0 + 50.0) as u32).unwrap();
    let bottom = strip.pixel_rgba(130, (slot.y0 + 170.0) as u32).unwrap();
    assert!(close(top, [0, 0, 255, 255]), "{top:?}");
    assert!(close(bottom, [255, 0, 0, 255]), "{bottom:?}");
}

#[test]
fn photo_corners_are_rounded() {
    let strip = render(&grey_frames(1), StripStyle::default());
    let corner = strip.pixel_rgba(20, 20).unwrap();
    assert!(corner[0] > 140, "{corner:?}");
    assert!(close(strip.pixel_rgba(25, 25).unwrap(), GREY));
}

#[test]
fn rendering_is_deterministic() {
    let mut ctx = RenderContext::new();
    let c = StripCompositor::default();
    let style = StripStyle::default();
    let a = c.render(&mut ctx, &grey_frames(3), &style, date()).unwrap();
    let b = c.render(&mut ctx, &grey_frames(3), &style, date()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn exhausted_surface_budget_yields_none() {
    let mut ctx = RenderContext::new().with_max_surface_pixels(1000);
    let out = StripCompositor::default().render(
        &mut ctx,
        &grey_frames(3),
        &StripStyle::default(),
        date(),
    );
    assert!(out.is_none());
}

#[test]
fn caption_uses_configured_pattern() {
    let c = StripCompositor::default();
    assert_eq!(c.caption_text(date()).unwrap(), "October 18, 2026");
    let iso = StripCompositor::new(StripLayout::default(), CaptionFont::bundled(), "%Y-%m-%d")
        .unwrap();
    assert_eq!(iso.caption_text(date()).unwrap(), "2026-10-18");
    assert!(
        StripCompositor::new(StripLayout::default(), CaptionFont::bundled(), "%Q").is_err()
    );
}
