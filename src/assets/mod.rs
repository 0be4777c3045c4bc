/// Frame colours and their configuration forms.
pub mod color;
/// Caption font loading and text shaping.
pub mod text;
