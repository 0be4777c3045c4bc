//! Session-level API: collecting shots and turning them into a strip.

/// Shot collection and the validated frame sequence.
pub mod capture;
/// The effect + composite pipeline.
pub mod pipeline;
