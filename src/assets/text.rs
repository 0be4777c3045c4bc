use std::hash::{Hash as _, Hasher as _};
use std::path::Path;
use std::sync::Arc;

use crate::foundation::error::{PhotoboothError, PhotoboothResult};

static BUNDLED_CAPTION_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSerif-Italic.ttf");

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

/// Font used for the strip's date caption.
#[derive(Clone)]
pub struct CaptionFont {
    bytes: Arc<Vec<u8>>,
}

impl std::fmt::Debug for CaptionFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptionFont")
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl CaptionFont {
    /// The serif italic face shipped with the crate.
    pub fn bundled() -> Self {
        Self {
            bytes: Arc::new(BUNDLED_CAPTION_FONT.to_vec()),
        }
    }

    pub fn from_bytes(bytes: Vec<u8>) -> PhotoboothResult<Self> {
        if bytes.is_empty() {
            return Err(PhotoboothError::validation("caption font bytes are empty"));
        }
        Ok(Self {
            bytes: Arc::new(bytes),
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> PhotoboothResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            PhotoboothError::config(format!(
                "failed to read caption font '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_bytes(bytes)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Default for CaptionFont {
    fn default() -> Self {
        Self::bundled()
    }
}

/// Content key identifying a font blob across caches.
pub(crate) fn font_key(bytes: &[u8]) -> u64 {
    let mut h = std::collections::hash_map::DefaultHasher::new();
    bytes.hash(&mut h);
    h.finish()
}

/// Stateful helper for building Parley text layouts from raw font bytes.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    // Keyed by a hash of the font bytes so a font is registered once per engine.
    registered: Vec<(u64, String)>,
    last_family_name: Option<String>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            registered: Vec::new(),
            last_family_name: None,
        }
    }

    /// Family name resolved by the most recent layout.
    pub(crate) fn last_family_name(&self) -> Option<&str> {
        self.last_family_name.as_deref()
    }

    fn family_for(&mut self, font_bytes: &[u8]) -> PhotoboothResult<String> {
        let key = font_key(font_bytes);
        if let Some((_, name)) = self.registered.iter().find(|(k, _)| *k == key) {
            return Ok(name.clone());
        }

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            PhotoboothError::validation("no font families registered from font bytes")
        })?;

        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| PhotoboothError::validation("registered font family has no name"))?
            .to_string();
        self.registered.push((key, family_name.clone()));
        Ok(family_name)
    }

    /// Shape a single unwrapped line of text.
    pub(crate) fn layout_line(
        &mut self,
        text: &str,
        font_bytes: &[u8],
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> PhotoboothResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(PhotoboothError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let family_name = self.family_for(font_bytes)?;
        self.last_family_name = Some(family_name.clone());

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}
