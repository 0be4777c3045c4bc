use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::assets::color::FrameColor;
use crate::assets::text::CaptionFont;
use crate::effects::kind::EffectKind;
use crate::encode::export::{EncodeFormat, ExportFormat};
use crate::foundation::error::{PhotoboothError, PhotoboothResult};
use crate::render::layout::StripLayout;
use crate::render::strip::{DEFAULT_DATE_FORMAT, StripCompositor, StripStyle, validate_date_format};

/// Settings for a photo booth, usually read from a JSON file.
///
/// Every field has a default, so `{}` is a valid configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhotoboothConfig {
    pub total_shots: usize,
    pub show_date: bool,
    pub frame_color: FrameColor,
    /// Effect selected when a session starts.
    pub effect: EffectKind,
    pub layout: StripLayout,
    pub caption: CaptionConfig,
    pub export: ExportConfig,
}

impl Default for PhotoboothConfig {
    fn default() -> Self {
        Self {
            total_shots: 3,
            show_date: true,
            frame_color: FrameColor::WHITE,
            effect: EffectKind::Sepia,
            layout: StripLayout::default(),
            caption: CaptionConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaptionConfig {
    /// Font file for the caption; the bundled serif italic when absent.
    pub font_path: Option<PathBuf>,
    /// `chrono` strftime pattern.
    pub date_format: String,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            font_path: None,
            date_format: DEFAULT_DATE_FORMAT.to_owned(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    pub format: ExportFormat,
    pub jpeg_quality: u8,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::Jpeg,
            jpeg_quality: 90,
        }
    }
}

impl ExportConfig {
    pub fn encode_format(&self) -> EncodeFormat {
        match self.format {
            ExportFormat::Png => EncodeFormat::Png,
            ExportFormat::Jpeg => EncodeFormat::Jpeg {
                quality: self.jpeg_quality,
            },
        }
    }
}

impl PhotoboothConfig {
    pub fn from_reader<R: std::io::Read>(r: R) -> PhotoboothResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| PhotoboothError::config(format!("parse photobooth config JSON: {e}")))
    }

    pub fn from_path(path: impl AsRef<Path>) -> PhotoboothResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            PhotoboothError::config(format!("open config JSON '{}': {e}", path.display()))
        })?;
        let cfg = Self::from_reader(BufReader::new(f))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> PhotoboothResult<()> {
        if self.total_shots == 0 {
            return Err(PhotoboothError::validation("total_shots must be > 0"));
        }
        self.layout.validate()?;
        validate_date_format(&self.caption.date_format)?;
        if !(1..=100).contains(&self.export.jpeg_quality) {
            return Err(PhotoboothError::validation(
                "export jpeg_quality must be in 1..=100",
            ));
        }
        Ok(())
    }

    /// Style for the next strip build.
    pub fn strip_style(&self) -> StripStyle {
        StripStyle {
            frame_color: self.frame_color,
            show_date: self.show_date,
        }
    }

    pub fn caption_font(&self) -> PhotoboothResult<CaptionFont> {
        match &self.caption.font_path {
            Some(p) => CaptionFont::from_path(p),
            None => Ok(CaptionFont::bundled()),
        }
    }

    pub fn compositor(&self) -> PhotoboothResult<StripCompositor> {
        StripCompositor::new(
            self.layout,
            self.caption_font()?,
            self.caption.date_format.clone(),
        )
    }
}
