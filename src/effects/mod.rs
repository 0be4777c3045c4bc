//! Per-photo looks.
//!
//! Every [`EffectKind`](kind::EffectKind) is a fixed chain of [`Operator`](ops::Operator)s run on
//! a straight-alpha float copy of the photo. Failures never surface to callers: the source is
//! returned instead.

pub(crate) mod blur;
/// Effect kinds and their operator chains.
pub mod kind;
/// Individual image operators.
pub mod ops;
/// Entry point that runs a chain on a bitmap.
pub mod processor;
pub(crate) mod working;
