//! GPU rendering subsystem.
//!
//! Renderers own their GPU resources (pipelines, buffers, bind groups) and
//! record into the frame's encoder through a [`RenderTarget`].
//!
//! Convention:
//! - World space is right-handed, +Y up, camera looking down -Z.
//! - Callers hand renderers a full clip-space transform per draw.

mod ctx;
mod quad;
mod texture;

pub use ctx::{RenderCtx, RenderTarget};
pub use quad::{QuadDraw, QuadRenderer};
pub use texture::{GpuTexture, TextureFilter};
