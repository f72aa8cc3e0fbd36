//! Coordinate types shared between the runtime, renderers and apps.
//!
//! Canonical CPU space for pointer input:
//! - Logical pixels (DPI-aware)
//! - Origin top-left
//! - +X right, +Y down
//!
//! 3D math (positions, matrices) uses `glam`.

mod viewport;

pub use viewport::Viewport;
