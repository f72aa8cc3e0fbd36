//! Color model shared between apps and renderers.
//!
//! All colors handed to the GPU are linear premultiplied RGBA.

pub mod color;

pub use color::Color;
