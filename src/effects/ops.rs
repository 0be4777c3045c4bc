use crate::effects::blur::{BlurScratch, MAX_BLUR_RADIUS_PX};
use crate::effects::working::WorkingImage;
use crate::foundation::error::{PhotoboothError, PhotoboothResult};

/// Rec.601 luma weights.
const LUMA: [f32; 3] = [0.299, 0.587, 0.114];

/// Row-major 3x4 colour matrix over straight RGB (last column is the offset).
type ColorMatrix = [f32; 12];

const MONOCHROME_MATRIX: ColorMatrix = [
    LUMA[0], LUMA[1], LUMA[2], 0.0, //
    LUMA[0], LUMA[1], LUMA[2], 0.0, //
    LUMA[0], LUMA[1], LUMA[2], 0.0, //
];

const SEPIA_MATRIX: ColorMatrix = [
    0.393, 0.769, 0.189, 0.0, //
    0.349, 0.686, 0.168, 0.0, //
    0.272, 0.534, 0.131, 0.0, //
];

/// One parameterized image operator. Effects are fixed sequences of these.
///
/// Radii are in source pixels. Blur-style radii are gaussian sigmas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Operator {
    Monochrome,
    SepiaTone {
        intensity: f32,
    },
    /// Piecewise-linear curve through five control points, applied to each colour channel.
    ToneCurve {
        points: [(f32, f32); 5],
    },
    /// Screen-blend a blurred copy over the image.
    Bloom {
        radius: f32,
        intensity: f32,
    },
    UnsharpMask {
        radius: f32,
        intensity: f32,
    },
    /// Darken towards the corners. `radius` is where falloff starts, as a fraction of the
    /// centre-to-corner distance; at 1 or more no pixel is darkened.
    Vignette {
        radius: f32,
        intensity: f32,
    },
    ColorControls {
        brightness: f32,
        saturation: f32,
        contrast: f32,
    },
    /// Tint towards `color` scaled by luma.
    ColorMonochrome {
        color: [f32; 3],
        intensity: f32,
    },
    /// Re-balance white from one blackbody temperature to another.
    TemperatureShift {
        from_kelvin: f32,
        to_kelvin: f32,
    },
    Exposure {
        ev: f32,
    },
    /// Directional box blur along `angle_deg` (0 = horizontal).
    MotionBlur {
        radius: f32,
        angle_deg: f32,
    },
}

const KELVIN_RANGE: std::ops::RangeInclusive<f32> = 2000.0..=12000.0;

impl Operator {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Monochrome => "monochrome",
            Self::SepiaTone { .. } => "sepiaTone",
            Self::ToneCurve { .. } => "toneCurve",
            Self::Bloom { .. } => "bloom",
            Self::UnsharpMask { .. } => "unsharpMask",
            Self::Vignette { .. } => "vignette",
            Self::ColorControls { .. } => "colorControls",
            Self::ColorMonochrome { .. } => "colorMonochrome",
            Self::TemperatureShift { .. } => "temperatureShift",
            Self::Exposure { .. } => "exposure",
            Self::MotionBlur { .. } => "motionBlur",
        }
    }

    pub(crate) fn validate(&self) -> PhotoboothResult<()> {
        fn finite(name: &str, v: f32) -> PhotoboothResult<()> {
            if v.is_finite() {
                Ok(())
            } else {
                Err(PhotoboothError::validation(format!("{name} must be finite")))
            }
        }
        fn unit(name: &str, v: f32) -> PhotoboothResult<()> {
            finite(name, v)?;
            if (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(PhotoboothError::validation(format!("{name} must be in 0..=1")))
            }
        }
        fn radius(name: &str, v: f32) -> PhotoboothResult<()> {
            finite(name, v)?;
            if v < 0.0 || v > MAX_BLUR_RADIUS_PX as f32 {
                return Err(PhotoboothError::validation(format!(
                    "{name} must be in 0..={MAX_BLUR_RADIUS_PX}"
                )));
            }
            Ok(())
        }

        match *self {
            Self::Monochrome => Ok(()),
            Self::SepiaTone { intensity } => unit("sepia intensity", intensity),
            Self::ToneCurve { points } => {
                for (x, y) in points {
                    unit("tone curve x", x)?;
                    unit("tone curve y", y)?;
                }
                if points.windows(2).any(|w| w[1].0 <= w[0].0) {
                    return Err(PhotoboothError::validation(
                        "tone curve x must be strictly increasing",
                    ));
                }
                Ok(())
            }
            Self::Bloom {
                radius: r,
                intensity,
            }
            | Self::UnsharpMask {
                radius: r,
                intensity,
            } => {
                radius("blur radius", r)?;
                finite("intensity", intensity)?;
                if intensity < 0.0 {
                    return Err(PhotoboothError::validation("intensity must be >= 0"));
                }
                Ok(())
            }
            Self::Vignette { radius, intensity } => {
                finite("vignette radius", radius)?;
                if radius < 0.0 {
                    return Err(PhotoboothError::validation("vignette radius must be >= 0"));
                }
                unit("vignette intensity", intensity)
            }
            Self::ColorControls {
                brightness,
                saturation,
                contrast,
            } => {
                finite("brightness", brightness)?;
                finite("saturation", saturation)?;
                finite("contrast", contrast)?;
                if saturation < 0.0 || contrast < 0.0 {
                    return Err(PhotoboothError::validation(
                        "saturation and contrast must be >= 0",
                    ));
                }
                Ok(())
            }
            Self::ColorMonochrome { color, intensity } => {
                for c in color {
                    unit("monochrome color", c)?;
                }
                unit("monochrome intensity", intensity)
            }
            Self::TemperatureShift {
                from_kelvin,
                to_kelvin,
            } => {
                for k in [from_kelvin, to_kelvin] {
                    finite("temperature", k)?;
                    if !KELVIN_RANGE.contains(&k) {
                        return Err(PhotoboothError::validation(format!(
                            "temperature {k}K outside {}..={}K",
                            KELVIN_RANGE.start(),
                            KELVIN_RANGE.end()
                        )));
                    }
                }
                Ok(())
            }
            Self::Exposure { ev } => finite("exposure ev", ev),
            Self::MotionBlur {
                radius: r,
                angle_deg,
            } => {
                radius("motion blur radius", r)?;
                finite("motion blur angle", angle_deg)
            }
        }
    }

    /// Run the operator. The result always has the extent of `src`.
    pub(crate) fn apply(
        &self,
        src: &WorkingImage,
        scratch: &mut BlurScratch,
    ) -> PhotoboothResult<WorkingImage> {
        self.validate()?;
        let out = match *self {
            Self::Monochrome => src.map_pixels(|_, _, p| color_matrix(p, &MONOCHROME_MATRIX)),
            Self::SepiaTone { intensity } => {
                src.map_pixels(|_, _, p| mix(p, color_matrix(p, &SEPIA_MATRIX), intensity))
            }
            Self::ToneCurve { points } => src.map_pixels(|_, _, p| {
                [
                    tone_curve(&points, p[0]),
                    tone_curve(&points, p[1]),
                    tone_curve(&points, p[2]),
                    p[3],
                ]
            }),
            Self::Bloom { radius, intensity } => {
                let blurred = scratch.gaussian(src, radius)?;
                zip_pixels(src, &blurred, |p, b| {
                    let mut o = p;
                    for c in 0..3 {
                        let glow = (b[c] * intensity).clamp(0.0, 1.0);
                        o[c] = 1.0 - (1.0 - p[c]) * (1.0 - glow);
                    }
                    o
                })
            }
            Self::UnsharpMask { radius, intensity } => {
                let blurred = scratch.gaussian(src, radius)?;
                zip_pixels(src, &blurred, |p, b| {
                    let mut o = p;
                    for c in 0..3 {
                        o[c] = (p[c] + (p[c] - b[c]) * intensity).clamp(0.0, 1.0);
                    }
                    o
                })
            }
            Self::Vignette { radius, intensity } => {
                if radius >= 1.0 {
                    return Ok(src.clone());
                }
                let (w, h) = (src.width as f32, src.height as f32);
                src.map_pixels(|x, y, p| {
                    let dx = (x as f32 + 0.5) / w - 0.5;
                    let dy = (y as f32 + 0.5) / h - 0.5;
                    let d = (dx * dx + dy * dy).sqrt() / std::f32::consts::FRAC_1_SQRT_2;
                    let k = 1.0 - intensity * smoothstep(radius, 1.0, d);
                    [p[0] * k, p[1] * k, p[2] * k, p[3]]
                })
            }
            Self::ColorControls {
                brightness,
                saturation,
                contrast,
            } => src.map_pixels(|_, _, p| {
                let mut rgb = [p[0] + brightness, p[1] + brightness, p[2] + brightness];
                let l = luma(rgb);
                for c in &mut rgb {
                    *c = l + (*c - l) * saturation;
                    *c = ((*c - 0.5) * contrast + 0.5).clamp(0.0, 1.0);
                }
                [rgb[0], rgb[1], rgb[2], p[3]]
            }),
            Self::ColorMonochrome { color, intensity } => src.map_pixels(|_, _, p| {
                let l = luma([p[0], p[1], p[2]]);
                let tinted = [l * color[0], l * color[1], l * color[2], p[3]];
                mix(p, tinted, intensity)
            }),
            Self::TemperatureShift {
                from_kelvin,
                to_kelvin,
            } => {
                if from_kelvin == to_kelvin {
                    return Ok(src.clone());
                }
                let from = kelvin_to_rgb(from_kelvin);
                let to = kelvin_to_rgb(to_kelvin);
                let gain = [to[0] / from[0], to[1] / from[1], to[2] / from[2]];
                src.map_pixels(|_, _, p| {
                    [
                        (p[0] * gain[0]).clamp(0.0, 1.0),
                        (p[1] * gain[1]).clamp(0.0, 1.0),
                        (p[2] * gain[2]).clamp(0.0, 1.0),
                        p[3],
                    ]
                })
            }
            Self::Exposure { ev } => {
                let gain = ev.exp2();
                src.map_pixels(|_, _, p| {
                    [
                        (p[0] * gain).clamp(0.0, 1.0),
                        (p[1] * gain).clamp(0.0, 1.0),
                        (p[2] * gain).clamp(0.0, 1.0),
                        p[3],
                    ]
                })
            }
            Self::MotionBlur { radius, angle_deg } => motion_blur(src, radius, angle_deg),
        };
        Ok(out)
    }
}

fn luma(rgb: [f32; 3]) -> f32 {
    LUMA[0] * rgb[0] + LUMA[1] * rgb[1] + LUMA[2] * rgb[2]
}

fn color_matrix(p: [f32; 4], m: &ColorMatrix) -> [f32; 4] {
    let row = |i: usize| (m[i] * p[0] + m[i + 1] * p[1] + m[i + 2] * p[2] + m[i + 3]).clamp(0.0, 1.0);
    [row(0), row(4), row(8), p[3]]
}

fn mix(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
        a[3],
    ]
}

fn zip_pixels(
    a: &WorkingImage,
    b: &WorkingImage,
    f: impl Fn([f32; 4], [f32; 4]) -> [f32; 4],
) -> WorkingImage {
    WorkingImage {
        width: a.width,
        height: a.height,
        px: a.px.iter().zip(&b.px).map(|(&p, &q)| f(p, q)).collect(),
    }
}

pub(crate) fn smoothstep(a: f32, b: f32, x: f32) -> f32 {
    if x <= a {
        return 0.0;
    }
    if x >= b {
        return 1.0;
    }
    let t = (x - a) / (b - a);
    (t * t * (3.0 - 2.0 * t)).clamp(0.0, 1.0)
}

pub(crate) fn tone_curve(points: &[(f32, f32); 5], v: f32) -> f32 {
    let v = v.clamp(0.0, 1.0);
    let first = points[0];
    let last = points[4];
    if v <= first.0 {
        return first.1;
    }
    if v >= last.0 {
        return last.1;
    }
    for w in points.windows(2) {
        let ((x0, y0), (x1, y1)) = (w[0], w[1]);
        if v <= x1 {
            let t = (v - x0) / (x1 - x0);
            return y0 + (y1 - y0) * t;
        }
    }
    last.1
}

/// Approximate sRGB white point of a blackbody at `kelvin`, channels in `0..1`.
pub(crate) fn kelvin_to_rgb(kelvin: f32) -> [f32; 3] {
    let t = f64::from(kelvin) / 100.0;
    let r = if t <= 66.0 {
        255.0
    } else {
        329.698_727_446 * (t - 60.0).powf(-0.133_204_759_2)
    };
    let g = if t <= 66.0 {
        99.470_802_586_1 * t.ln() - 161.119_568_166_1
    } else {
        288.122_169_528_3 * (t - 60.0).powf(-0.075_514_849_2)
    };
    let b = if t >= 66.0 {
        255.0
    } else if t <= 19.0 {
        0.0
    } else {
        138.517_731_223_1 * (t - 10.0).ln() - 305.044_792_730_7
    };
    let norm = |v: f64| (v.clamp(1.0, 255.0) / 255.0) as f32;
    [norm(r), norm(g), norm(b)]
}

fn motion_blur(src: &WorkingImage, radius: f32, angle_deg: f32) -> WorkingImage {
    let taps = radius.ceil() as i64;
    if taps == 0 {
        return src.clone();
    }
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    let offsets: Vec<(i64, i64)> = (-taps..=taps)
        .map(|k| {
            let d = k as f32 * radius / taps as f32;
            ((d * cos).round() as i64, (d * sin).round() as i64)
        })
        .collect();
    let n = offsets.len() as f32;
    src.map_pixels(|x, y, p| {
        let mut acc = [0.0f32; 3];
        for &(dx, dy) in &offsets {
            let s = src.sample_clamped(i64::from(x) + dx, i64::from(y) + dy);
            for c in 0..3 {
                acc[c] += s[c];
            }
        }
        [acc[0] / n, acc[1] / n, acc[2] / n, p[3]]
    })
}

#[cfg(test)]
#[path = "../../tests/unit/effects/ops.rs"]
mod tests;
