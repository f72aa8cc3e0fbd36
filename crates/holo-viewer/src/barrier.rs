use std::sync::Arc;

use image::{Rgba, RgbaImage};

/// Slit pixel: opaque white.
pub const SLIT: Rgba<u8> = Rgba([255, 255, 255, 255]);
/// Gap pixel: fully transparent.
pub const GAP: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Line-screen mask for the parallax barrier.
///
/// Even columns are opaque, odd columns transparent (period 2). The raster is
/// generated once and shared immutably.
#[derive(Debug, Clone)]
pub struct BarrierMask {
    image: Arc<RgbaImage>,
}

impl BarrierMask {
    pub fn generate(size: u32) -> Self {
        Self {
            image: Arc::new(stripe_raster(size)),
        }
    }

    #[inline]
    pub fn image(&self) -> &Arc<RgbaImage> {
        &self.image
    }

    #[inline]
    pub fn size(&self) -> u32 {
        self.image.width()
    }
}

fn stripe_raster(size: u32) -> RgbaImage {
    RgbaImage::from_fn(size, size, |x, _| if x % 2 == 0 { SLIT } else { GAP })
}
