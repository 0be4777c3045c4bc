use std::fmt;
use std::str::FromStr;

use crate::effects::ops::Operator;
use crate::foundation::error::{PhotoboothError, PhotoboothResult};

/// Named look a user can pick for their strip.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum EffectKind {
    Original,
    #[default]
    Sepia,
    FadedMono,
    SoftGlow,
    MotionBlurred,
    Vintage,
    Noir,
}

impl EffectKind {
    /// Picker order.
    pub const ALL: [Self; 7] = [
        Self::Original,
        Self::Sepia,
        Self::FadedMono,
        Self::SoftGlow,
        Self::MotionBlurred,
        Self::Vintage,
        Self::Noir,
    ];

    /// The following kind in picker order, wrapping after the last.
    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::Sepia => "sepia",
            Self::FadedMono => "fadedMono",
            Self::SoftGlow => "softGlow",
            Self::MotionBlurred => "motionBlurred",
            Self::Vintage => "vintage",
            Self::Noir => "noir",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Original => "Original",
            Self::Sepia => "Sepia",
            Self::FadedMono => "Faded Mono",
            Self::SoftGlow => "Soft Glow",
            Self::MotionBlurred => "Motion Blurred",
            Self::Vintage => "Vintage",
            Self::Noir => "Noir",
        }
    }

    /// Operators run in order for this kind. Empty for `Original`.
    pub fn chain(self) -> &'static [Operator] {
        match self {
            Self::Original => &[],
            Self::Sepia => SEPIA,
            Self::FadedMono => FADED_MONO,
            Self::SoftGlow => SOFT_GLOW,
            Self::MotionBlurred => MOTION_BLURRED,
            Self::Vintage => VINTAGE,
            Self::Noir => NOIR,
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EffectKind {
    type Err = PhotoboothError;

    /// Case-insensitive; `-`, `_` and spaces are ignored, so `faded-mono` and `Faded Mono` work.
    fn from_str(s: &str) -> PhotoboothResult<Self> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        Self::ALL
            .into_iter()
            .find(|k| k.name().to_ascii_lowercase() == key)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|k| k.name()).collect();
                PhotoboothError::validation(format!(
                    "unknown effect '{s}' (expected one of: {})",
                    known.join(", ")
                ))
            })
    }
}

static SEPIA: &[Operator] = &[
    Operator::Monochrome,
    Operator::SepiaTone { intensity: 0.6 },
    Operator::Bloom {
        radius: 2.0,
        intensity: 0.3,
    },
];

static FADED_MONO: &[Operator] = &[
    Operator::Monochrome,
    Operator::ToneCurve {
        points: [(0.0, 0.1), (0.25, 0.3), (0.5, 0.5), (0.75, 0.75), (1.0, 1.0)],
    },
    Operator::Bloom {
        radius: 5.0,
        intensity: 0.5,
    },
    Operator::UnsharpMask {
        radius: 1.2,
        intensity: 0.3,
    },
    Operator::Vignette {
        radius: 10.0,
        intensity: 0.4,
    },
];

static SOFT_GLOW: &[Operator] = &[
    Operator::ColorControls {
        brightness: 0.09,
        saturation: 1.1,
        contrast: 1.1,
    },
    Operator::ColorMonochrome {
        color: [1.0, 0.7, 0.9],
        intensity: 0.1,
    },
    Operator::ToneCurve {
        points: [(0.0, 0.0), (0.25, 0.2), (0.5, 0.5), (0.75, 0.8), (1.0, 1.0)],
    },
    Operator::Bloom {
        radius: 6.0,
        intensity: 0.4,
    },
    Operator::TemperatureShift {
        from_kelvin: 7500.0,
        to_kelvin: 7500.0,
    },
];

static MOTION_BLURRED: &[Operator] = &[
    Operator::Monochrome,
    Operator::ColorMonochrome {
        color: [0.3, 0.4, 0.7],
        intensity: 0.3,
    },
    Operator::MotionBlur {
        radius: 2.0,
        angle_deg: 0.0,
    },
    Operator::ColorControls {
        brightness: 0.08,
        saturation: 0.5,
        contrast: 1.2,
    },
    Operator::Exposure { ev: -0.2 },
    Operator::Vignette {
        radius: 10.0,
        intensity: 0.5,
    },
];

static VINTAGE: &[Operator] = &[
    Operator::SepiaTone { intensity: 0.35 },
    Operator::ColorControls {
        brightness: 0.02,
        saturation: 0.8,
        contrast: 0.95,
    },
    Operator::ToneCurve {
        points: [(0.0, 0.08), (0.25, 0.28), (0.5, 0.52), (0.75, 0.76), (1.0, 0.94)],
    },
    Operator::TemperatureShift {
        from_kelvin: 6500.0,
        to_kelvin: 5200.0,
    },
    Operator::Vignette {
        radius: 0.4,
        intensity: 0.45,
    },
];

static NOIR: &[Operator] = &[
    Operator::Monochrome,
    Operator::ToneCurve {
        points: [(0.0, 0.0), (0.25, 0.12), (0.5, 0.5), (0.75, 0.88), (1.0, 1.0)],
    },
    Operator::ColorControls {
        brightness: 0.0,
        saturation: 1.0,
        contrast: 1.3,
    },
    Operator::UnsharpMask {
        radius: 1.5,
        intensity: 0.4,
    },
    Operator::Vignette {
        radius: 0.35,
        intensity: 0.6,
    },
];
