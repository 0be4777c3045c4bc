//! Strip rasterization on the CPU.

/// Reusable rendering resources.
pub mod context;
/// Strip geometry and aspect-fill math.
pub mod layout;
pub(crate) mod pixmap;
/// The strip compositor.
pub mod strip;
