//! Platform event translation.

pub(crate) mod winit;
