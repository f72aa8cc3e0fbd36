use std::path::PathBuf;
use std::time::Duration;

/// Environment variable overriding the directory holding `left.png`/`right.png`.
pub const ENV_ASSET_DIR: &str = "HOLO_ASSET_DIR";
/// Environment variable overriding the fallback timeout, in milliseconds.
pub const ENV_FALLBACK_TIMEOUT_MS: &str = "HOLO_FALLBACK_TIMEOUT_MS";

/// Perspective camera parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_y_deg: f32,
    pub near: f32,
    pub far: f32,
    /// Distance from the image planes along +Z.
    pub distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_deg: 75.0,
            near: 0.1,
            far: 1000.0,
            distance: 2.0,
        }
    }
}

/// Procedural stereo pair drawn when the photographic pair is unavailable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallbackStyle {
    /// Square raster edge in pixels.
    pub size: u32,
    pub radius: f32,
    pub left_center: (f32, f32),
    pub right_center: (f32, f32),
    /// sRGB background.
    pub background: [u8; 3],
    /// sRGB circle fill.
    pub circle: [u8; 3],
}

impl Default for FallbackStyle {
    fn default() -> Self {
        Self {
            size: 512,
            radius: 150.0,
            left_center: (230.0, 256.0),
            right_center: (282.0, 256.0),
            background: [0x00, 0xff, 0xff],
            circle: [0xff, 0x00, 0xff],
        }
    }
}

/// Every tuning constant of the hologram.
#[derive(Debug, Clone, PartialEq)]
pub struct HologramConfig {
    pub asset_dir: PathBuf,
    pub left_file: String,
    pub right_file: String,

    /// Time after start at which an unresolved pair falls back to procedural.
    pub fallback_timeout: Duration,
    pub fallback: FallbackStyle,
    /// Loaded images are downscaled so neither side exceeds this; matches
    /// `wgpu::Limits::default().max_texture_dimension_2d`.
    pub max_texture_edge: u32,

    pub camera: CameraConfig,

    /// Edge length of each square surface in world units.
    pub plane_size: f32,
    /// `k` in `left.x = -k`, `right.x = +k`.
    pub stereo_half_separation: f32,

    /// Barrier mask raster edge in pixels.
    pub mask_size: u32,
    pub barrier_opacity: f32,
    /// Extra clearance between the barrier and the fully popped-out images.
    pub barrier_gap: f32,

    /// Peak z displacement of the image planes.
    pub pop_out_depth: f32,
    /// Phase increment per rendered frame.
    pub jump_speed: f64,

    /// Camera displacement per unit of normalized input.
    pub parallax_sensitivity: f32,
}

impl Default for HologramConfig {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("assets"),
            left_file: "left.png".to_string(),
            right_file: "right.png".to_string(),
            fallback_timeout: Duration::from_millis(1000),
            fallback: FallbackStyle::default(),
            max_texture_edge: 8192,
            camera: CameraConfig::default(),
            plane_size: 2.0,
            stereo_half_separation: 0.5,
            mask_size: 512,
            barrier_opacity: 0.8,
            barrier_gap: 0.01,
            pop_out_depth: 0.04,
            jump_speed: 0.02,
            parallax_sensitivity: 0.02,
        }
    }
}

impl HologramConfig {
    /// Defaults, overridden by `HOLO_ASSET_DIR` / `HOLO_FALLBACK_TIMEOUT_MS`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Applies overrides from `lookup`; invalid values are logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_ASSET_DIR).filter(|d| !d.trim().is_empty()) {
            self.asset_dir = PathBuf::from(dir);
        }

        if let Some(raw) = lookup(ENV_FALLBACK_TIMEOUT_MS) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => self.fallback_timeout = Duration::from_millis(ms),
                Err(e) => log::warn!("ignoring {ENV_FALLBACK_TIMEOUT_MS}={raw:?}: {e}"),
            }
        }
    }

    pub fn left_path(&self) -> PathBuf {
        self.asset_dir.join(&self.left_file)
    }

    pub fn right_path(&self) -> PathBuf {
        self.asset_dir.join(&self.right_file)
    }

    /// Depth of the barrier plane: in front of the images at peak pop-out.
    pub fn barrier_depth(&self) -> f32 {
        self.pop_out_depth + self.barrier_gap
    }
}
