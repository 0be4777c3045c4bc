//! Strip export.
//!
//! Strips are encoded to PNG or JPEG and handed to a [`StripSink`](sink::StripSink).

/// Encoders and export formats.
pub mod export;
/// Sink trait and built-in sinks.
pub mod sink;
