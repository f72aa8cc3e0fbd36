//! Holo engine crate.
//!
//! Owns the platform + GPU runtime pieces used by the hologram viewer:
//! window/event loop, surface management, frame timing, input translation and
//! a textured-quad renderer.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;
