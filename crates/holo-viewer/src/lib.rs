//! Glasses-free stereo "pop-out" hologram.
//!
//! Two offset images sit behind a line-screen barrier; a perspective camera
//! drifts with pointer, touch and tilt input while both images pulse toward
//! the viewer. Built on the `holo-engine` runtime.

pub mod acquire;
pub mod animation;
pub mod app;
pub mod barrier;
pub mod camera;
pub mod config;
pub mod parallax;
pub mod render;
pub mod scene;

pub use app::{HologramApp, HologramContext};
pub use config::HologramConfig;
