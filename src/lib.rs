//! Photobooth turns a session's captured frames into a finished photo strip.
//!
//! Two stages run in order for every build:
//!
//! - the effect processor applies one [`EffectKind`] to each frame, falling back to the untouched
//!   frame on any failure;
//! - the [`StripCompositor`] stacks the processed frames on a bordered card and captions it with
//!   the date.
//!
//! [`Pipeline`] owns the shared [`RenderContext`] and sequences both stages. Export is left to a
//! [`StripSink`].
#![forbid(unsafe_code)]

mod assets;
mod foundation;

/// Photobooth configuration.
pub mod config;
/// Per-photo effects.
pub mod effects;
/// Strip encoding and sinks.
pub mod encode;
/// Strip compositing.
pub mod render;
/// Capture and pipeline sessions.
pub mod session;

pub use crate::assets::color::FrameColor;
pub use crate::assets::text::CaptionFont;
pub use crate::foundation::core::{Bitmap, Orientation, PixelFormat, Point, Rect, Size};
pub use crate::foundation::error::{PhotoboothError, PhotoboothResult};

pub use crate::config::{CaptionConfig, ExportConfig, PhotoboothConfig};
pub use crate::effects::kind::EffectKind;
pub use crate::effects::ops::Operator;
pub use crate::effects::processor::apply_effect;
pub use crate::encode::export::{EncodeFormat, ExportFormat, encode_bitmap};
pub use crate::encode::sink::{Delivery, InMemorySink, LibrarySink, StripSink};
pub use crate::render::context::RenderContext;
pub use crate::render::layout::{AspectFill, StripLayout, aspect_fill};
pub use crate::render::strip::{DEFAULT_DATE_FORMAT, StripCompositor, StripStyle};
pub use crate::session::capture::{CaptureSession, FrameSequence};
pub use crate::session::pipeline::Pipeline;
