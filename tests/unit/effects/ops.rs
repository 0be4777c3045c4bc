use super::*;

fn image(width: u32, height: u32, f: impl Fn(u32, u32) -> [f32; 4]) -> WorkingImage {
    let mut px = Vec::new();
    for y in 0..height {
        for x in 0..width {
            px.push(f(x, y));
        }
    }
    WorkingImage { width, height, px }
}

fn gradient() -> WorkingImage {
    image(8, 6, |x, y| {
        [x as f32 / 7.0, y as f32 / 5.0, 1.0 - x as f32 / 7.0, 1.0]
    })
}

fn run(op: Operator, src: &WorkingImage) -> WorkingImage {
    op.apply(src, &mut BlurScratch::default()).unwrap()
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

#[test]
fn monochrome_equalizes_channels_and_keeps_alpha() {
    let src = image(2, 1, |x, _| [0.9, 0.2 * x as f32, 0.4, 0.5]);
    let out = run(Operator::Monochrome, &src);
    for p in &out.px {
        assert!(approx(p[0], p[1]) && approx(p[1], p[2]));
        assert_eq!(p[3], 0.5);
    }
}

#[test]
fn sepia_zero_intensity_is_identity() {
    let src = gradient();
    assert_eq!(run(Operator::SepiaTone { intensity: 0.0 }, &src), src);
}

#[test]
fn sepia_warms_grey() {
    let src = image(1, 1, |_, _| [0.5, 0.5, 0.5, 1.0]);
    let p = run(Operator::SepiaTone { intensity: 1.0 }, &src).px[0];
    assert!(p[0] > p[1] && p[1] > p[2]);
}

#[test]
fn tone_curve_interpolates_between_points() {
    let pts = [(0.0, 0.1), (0.25, 0.3), (0.5, 0.5), (0.75, 0.75), (1.0, 1.0)];
    assert!(approx(tone_curve(&pts, 0.0), 0.1));
    assert!(approx(tone_curve(&pts, 0.125), 0.2));
    assert!(approx(tone_curve(&pts, 0.5), 0.5));
    assert!(approx(tone_curve(&pts, 1.0), 1.0));
    assert!(approx(tone_curve(&pts, 2.0), 1.0));
}

#[test]
fn tone_curve_rejects_unordered_points() {
    let op = Operator::ToneCurve {
        points: [(0.0, 0.0), (0.5, 0.2), (0.4, 0.5), (0.75, 0.8), (1.0, 1.0)],
    };
    assert!(op.validate().is_err());
}

#[test]
fn bloom_never_darkens() {
    let src = gradient();
    let out = run(
        Operator::Bloom {
            radius: 2.0,
            intensity: 0.5,
        },
        &src,
    );
    for (a, b) in src.px.iter().zip(&out.px) {
        for c in 0..3 {
            assert!(b[c] + 1e-6 >= a[c]);
        }
    }
}

#[test]
fn unsharp_mask_leaves_flat_regions_alone() {
    let src = image(6, 6, |_, _| [0.3, 0.4, 0.5, 1.0]);
    let out = run(
        Operator::UnsharpMask {
            radius: 1.2,
            intensity: 0.8,
        },
        &src,
    );
    for p in &out.px {
        assert!(approx(p[0], 0.3) && approx(p[1], 0.4) && approx(p[2], 0.5));
    }
}

#[test]
fn vignette_darkens_corners_not_centre() {
    let src = image(21, 21, |_, _| [1.0, 1.0, 1.0, 1.0]);
    let out = run(
        Operator::Vignette {
            radius: 0.3,
            intensity: 0.8,
        },
        &src,
    );
    let centre = out.px[10 * 21 + 10];
    let corner = out.px[0];
    assert_eq!(centre[0], 1.0);
    assert!(corner[0] < 0.5);
    assert_eq!(corner[3], 1.0);
}

#[test]
fn vignette_starting_beyond_the_corner_leaves_pixels_alone() {
    let src = gradient();
    for radius in [1.0, 10.0] {
        let out = run(
            Operator::Vignette {
                radius,
                intensity: 0.5,
            },
            &src,
        );
        assert_eq!(out, src, "radius {radius}");
    }
}

#[test]
fn neutral_color_controls_are_identity() {
    let src = gradient();
    let out = run(
        Operator::ColorControls {
            brightness: 0.0,
            saturation: 1.0,
            contrast: 1.0,
        },
        &src,
    );
    for (a, b) in src.px.iter().zip(&out.px) {
        for c in 0..4 {
            assert!(approx(a[c], b[c]));
        }
    }
}

#[test]
fn zero_saturation_is_grey() {
    let src = gradient();
    let out = run(
        Operator::ColorControls {
            brightness: 0.0,
            saturation: 0.0,
            contrast: 1.0,
        },
        &src,
    );
    for p in &out.px {
        assert!(approx(p[0], p[1]) && approx(p[1], p[2]));
    }
}

#[test]
fn equal_temperatures_are_identity() {
    let src = gradient();
    let op = Operator::TemperatureShift {
        from_kelvin: 7500.0,
        to_kelvin: 7500.0,
    };
    assert_eq!(run(op, &src), src);
}

#[test]
fn lower_target_temperature_warms() {
    let src = image(1, 1, |_, _| [0.5, 0.5, 0.5, 1.0]);
    let p = run(
        Operator::TemperatureShift {
            from_kelvin: 6500.0,
            to_kelvin: 4000.0,
        },
        &src,
    )
    .px[0];
    assert!(p[0] > p[2]);
}

#[test]
fn temperature_outside_range_is_rejected() {
    let op = Operator::TemperatureShift {
        from_kelvin: 500.0,
        to_kelvin: 6500.0,
    };
    assert!(op.validate().is_err());
}

#[test]
fn exposure_scales_by_powers_of_two() {
    let src = image(1, 1, |_, _| [0.2, 0.4, 0.8, 1.0]);
    let p = run(Operator::Exposure { ev: -1.0 }, &src).px[0];
    assert!(approx(p[0], 0.1) && approx(p[1], 0.2) && approx(p[2], 0.4));
    let p = run(Operator::Exposure { ev: 1.0 }, &src).px[0];
    assert!(approx(p[2], 1.0));
}

#[test]
fn horizontal_motion_blur_keeps_columns_apart_from_rows() {
    // Vertical stripes blur sideways; a horizontal-only pattern must stay intact.
    let rows = image(6, 6, |_, y| {
        let v = if y % 2 == 0 { 1.0 } else { 0.0 };
        [v, v, v, 1.0]
    });
    let out = run(
        Operator::MotionBlur {
            radius: 2.0,
            angle_deg: 0.0,
        },
        &rows,
    );
    assert_eq!(out, rows);

    let cols = image(6, 6, |x, _| {
        let v = if x % 2 == 0 { 1.0 } else { 0.0 };
        [v, v, v, 1.0]
    });
    let out = run(
        Operator::MotionBlur {
            radius: 2.0,
            angle_deg: 0.0,
        },
        &cols,
    );
    assert!(out.px[2][0] > 0.0 && out.px[2][0] < 1.0);
}

#[test]
fn every_operator_preserves_extent() {
    let src = gradient();
    let ops = [
        Operator::Monochrome,
        Operator::SepiaTone { intensity: 0.6 },
        Operator::Bloom {
            radius: 3.0,
            intensity: 0.3,
        },
        Operator::MotionBlur {
            radius: 3.0,
            angle_deg: 45.0,
        },
        Operator::ColorMonochrome {
            color: [0.3, 0.4, 0.7],
            intensity: 0.3,
        },
    ];
    for op in ops {
        let out = run(op, &src);
        assert!(out.same_extent(&src), "{}", op.name());
    }
}

#[test]
fn invalid_parameters_are_errors_not_panics() {
    let src = gradient();
    let mut scratch = BlurScratch::default();
    let bad = [
        Operator::SepiaTone { intensity: 2.0 },
        Operator::Bloom {
            radius: 1000.0,
            intensity: 0.3,
        },
        Operator::Vignette {
            radius: -0.1,
            intensity: 0.5,
        },
        Operator::Exposure { ev: f32::INFINITY },
        Operator::MotionBlur {
            radius: -1.0,
            angle_deg: 0.0,
        },
    ];
    for op in bad {
        assert!(op.apply(&src, &mut scratch).is_err(), "{}", op.name());
    }
}

#[test]
fn smoothstep_edges() {
    assert_eq!(smoothstep(0.2, 0.8, 0.1), 0.0);
    assert_eq!(smoothstep(0.2, 0.8, 0.9), 1.0);
    assert!(approx(smoothstep(0.0, 1.0, 0.5), 0.5));
}

#[test]
fn kelvin_white_points_are_ordered() {
    let warm = kelvin_to_rgb(3000.0);
    let cool = kelvin_to_rgb(10000.0);
    assert!(warm[2] < cool[2]);
    assert!(warm[0] >= cool[0]);
}
