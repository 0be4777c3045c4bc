use serde::{Deserialize, Serialize};

use crate::foundation::error::{PhotoboothError, PhotoboothResult};

/// Colour as written in configuration: normalized `0..1` channels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub(crate) struct ColorDef {
    pub(crate) r: f64,
    pub(crate) g: f64,
    pub(crate) b: f64,
    pub(crate) a: f64,
}

impl ColorDef {
    pub(crate) fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    fn to_rgba8(self) -> [u8; 4] {
        fn to_u8(x: f64) -> u8 {
            (x.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        [to_u8(self.r), to_u8(self.g), to_u8(self.b), to_u8(self.a)]
    }
}

impl<'de> Deserialize<'de> for ColorDef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            RgbaObj {
                r: f64,
                g: f64,
                b: f64,
                #[serde(default = "one")]
                a: f64,
            },
            Arr(Vec<f64>),
        }

        fn one() -> f64 {
            1.0
        }

        match Repr::deserialize(deserializer)? {
            Repr::Text(s) => parse_text(&s).map_err(serde::de::Error::custom),
            Repr::RgbaObj { r, g, b, a } => Ok(Self::rgba(r, g, b, a)),
            Repr::Arr(v) => match v.as_slice() {
                [r, g, b] => Ok(Self::rgba(*r, *g, *b, 1.0)),
                [r, g, b, a] => Ok(Self::rgba(*r, *g, *b, *a)),
                _ => Err(serde::de::Error::custom(
                    "rgba array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                )),
            },
        }
    }
}

fn parse_text(s: &str) -> Result<ColorDef, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "white" => return Ok(ColorDef::rgba(1.0, 1.0, 1.0, 1.0)),
        "black" => return Ok(ColorDef::rgba(0.0, 0.0, 0.0, 1.0)),
        _ => {}
    }
    parse_hex(s)
}

fn parse_hex(s: &str) -> Result<ColorDef, String> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    if !s.is_ascii() {
        return Err("hex color must be ASCII".to_owned());
    }
    let (r, g, b, a) = match s.len() {
        6 => (
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            255,
        ),
        8 => (
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            hex_byte(&s[6..8])?,
        ),
        _ => {
            return Err(
                "color must be \"white\", \"black\", #RRGGBB or #RRGGBBAA (case-insensitive)"
                    .to_owned(),
            );
        }
    };

    Ok(ColorDef::rgba(
        (r as f64) / 255.0,
        (g as f64) / 255.0,
        (b as f64) / 255.0,
        (a as f64) / 255.0,
    ))
}

/// Opaque border colour of a strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ColorDef", into = "String")]
pub struct FrameColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl FrameColor {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }

    /// Rec.601 luma in `0..1`.
    pub fn luma(self) -> f32 {
        (0.299 * f32::from(self.r) + 0.587 * f32::from(self.g) + 0.114 * f32::from(self.b))
            / 255.0
    }

    pub fn is_dark(self) -> bool {
        self.luma() < 0.5
    }

    /// Caption text colour: light text on a dark frame, dark text on a light frame.
    pub fn caption_color(self) -> Self {
        if self.is_dark() {
            Self::WHITE
        } else {
            Self::BLACK
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Default for FrameColor {
    fn default() -> Self {
        Self::WHITE
    }
}

impl TryFrom<ColorDef> for FrameColor {
    type Error = String;

    fn try_from(c: ColorDef) -> Result<Self, Self::Error> {
        let [r, g, b, a] = c.to_rgba8();
        if a != 255 {
            return Err("frame color must be opaque".to_owned());
        }
        Ok(Self::rgb(r, g, b))
    }
}

impl From<FrameColor> for String {
    fn from(c: FrameColor) -> Self {
        c.to_hex()
    }
}

impl std::str::FromStr for FrameColor {
    type Err = PhotoboothError;

    fn from_str(s: &str) -> PhotoboothResult<Self> {
        let def = parse_text(s).map_err(PhotoboothError::validation)?;
        Self::try_from(def).map_err(PhotoboothError::validation)
    }
}
