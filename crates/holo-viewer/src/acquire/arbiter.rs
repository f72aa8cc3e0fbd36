use std::sync::Arc;

use image::RgbaImage;

use crate::config::FallbackStyle;

use super::{procedural, AssetError, Eye, StereoPair};

/// Per-eye acquisition state.
#[derive(Debug, Clone, Default)]
pub enum EyeState {
    #[default]
    Unloaded,
    Loaded(Arc<RgbaImage>),
    Failed,
}

impl EyeState {
    #[inline]
    pub fn is_loaded(&self) -> bool {
        matches!(self, EyeState::Loaded(_))
    }
}

/// Where the displayed pair came from.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum StereoSource {
    Photographic,
    Procedural,
}

/// Pair-level state. `Resolved` is terminal.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PairState {
    BothPending,
    Resolved(StereoSource),
}

/// Texture change the scene must apply to its live materials.
#[derive(Debug, Clone)]
pub enum Install {
    /// One photographic eye arrived before the pair resolved.
    Eye(Eye, Arc<RgbaImage>),
    /// Procedural pair replacing both eyes.
    Pair(StereoPair),
}

/// Combines the two eye loads and the fallback timer.
///
/// Rules:
/// - A real image is installed as soon as it loads, unless the pair already
///   resolved.
/// - A failure warns; if the other eye has not loaded, the procedural pair
///   replaces both eyes.
/// - The timer forces the procedural pair unless both eyes loaded.
/// - The procedural pair is generated at most once and is final.
#[derive(Debug)]
pub struct StereoArbiter {
    style: FallbackStyle,
    left: EyeState,
    right: EyeState,
    pair: PairState,
    warnings: Vec<String>,
}

impl StereoArbiter {
    pub fn new(style: FallbackStyle) -> Self {
        Self {
            style,
            left: EyeState::Unloaded,
            right: EyeState::Unloaded,
            pair: PairState::BothPending,
            warnings: Vec::new(),
        }
    }

    pub fn eye(&self, eye: Eye) -> &EyeState {
        match eye {
            Eye::Left => &self.left,
            Eye::Right => &self.right,
        }
    }

    fn eye_mut(&mut self, eye: Eye) -> &mut EyeState {
        match eye {
            Eye::Left => &mut self.left,
            Eye::Right => &mut self.right,
        }
    }

    #[inline]
    pub fn pair(&self) -> PairState {
        self.pair
    }

    /// Every recorded load failure, in arrival order.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn loaded(&mut self, eye: Eye, image: Arc<RgbaImage>) -> Option<Install> {
        *self.eye_mut(eye) = EyeState::Loaded(image.clone());

        if let PairState::Resolved(source) = self.pair {
            log::debug!("{eye} image arrived after the pair resolved ({source:?}); ignored");
            return None;
        }

        log::info!("{eye} image loaded ({}x{})", image.width(), image.height());
        if self.left.is_loaded() && self.right.is_loaded() {
            self.pair = PairState::Resolved(StereoSource::Photographic);
            log::info!("stereo pair resolved: photographic");
        }
        Some(Install::Eye(eye, image))
    }

    pub fn failed(&mut self, error: &AssetError) -> Option<Install> {
        let eye = error.eye();
        log::warn!("{error}; using procedural fallback");
        self.warnings.push(error.to_string());
        *self.eye_mut(eye) = EyeState::Failed;

        if self.eye(eye.other()).is_loaded() {
            // The timer decides once the other eye is in.
            return None;
        }
        self.fallback("load failure")
    }

    /// Fallback deadline reached.
    pub fn timed_out(&mut self) -> Option<Install> {
        self.fallback("timeout")
    }

    fn fallback(&mut self, reason: &str) -> Option<Install> {
        if self.pair != PairState::BothPending {
            return None;
        }
        self.pair = PairState::Resolved(StereoSource::Procedural);
        log::info!("stereo pair resolved: procedural ({reason})");
        Some(Install::Pair(procedural::generate_pair(&self.style)))
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn image(tag: u8) -> Arc<RgbaImage> {
        Arc::new(RgbaImage::from_pixel(4, 4, image::Rgba([tag, tag, tag, 255])))
    }

    fn load_error(eye: Eye) -> AssetError {
        AssetError::Load {
            eye,
            path: PathBuf::from(format!("assets/{eye}.png")),
            source: image::ImageError::IoError(std::io::Error::from(
                std::io::ErrorKind::NotFound,
            )),
        }
    }

    fn arbiter() -> StereoArbiter {
        StereoArbiter::new(FallbackStyle::default())
    }

    // ── photographic path ────────────────────────────────────────────────

    #[test]
    fn both_loads_resolve_photographic() {
        let mut a = arbiter();
        assert!(matches!(a.loaded(Eye::Left, image(1)), Some(Install::Eye(Eye::Left, _))));
        assert_eq!(a.pair(), PairState::BothPending);
        assert!(matches!(a.loaded(Eye::Right, image(2)), Some(Install::Eye(Eye::Right, _))));
        assert_eq!(a.pair(), PairState::Resolved(StereoSource::Photographic));
        assert!(a.timed_out().is_none());
        assert!(a.warnings().is_empty());
    }

    // ── failure path ─────────────────────────────────────────────────────

    #[test]
    fn first_failure_installs_fallback_pair() {
        let mut a = arbiter();
        let Some(Install::Pair(pair)) = a.failed(&load_error(Eye::Left)) else {
            panic!("expected fallback pair");
        };
        assert_eq!(pair.left.dimensions(), (512, 512));
        assert_eq!(a.pair(), PairState::Resolved(StereoSource::Procedural));
    }

    #[test]
    fn both_failures_generate_once_and_warn_twice() {
        let mut a = arbiter();
        assert!(a.failed(&load_error(Eye::Left)).is_some());
        assert!(a.failed(&load_error(Eye::Right)).is_none());
        assert!(a.timed_out().is_none());
        assert_eq!(a.warnings().len(), 2);
        assert!(a.warnings()[0].contains("left"));
        assert!(a.warnings()[1].contains("right"));
    }

    #[test]
    fn failure_after_other_eye_loaded_waits_for_timer() {
        let mut a = arbiter();
        a.loaded(Eye::Left, image(1));
        assert!(a.failed(&load_error(Eye::Right)).is_none());
        assert_eq!(a.pair(), PairState::BothPending);
        assert!(matches!(a.timed_out(), Some(Install::Pair(_))));
    }

    // ── timer ────────────────────────────────────────────────────────────

    #[test]
    fn timeout_with_nothing_settled_installs_fallback() {
        let mut a = arbiter();
        assert!(matches!(a.timed_out(), Some(Install::Pair(_))));
        assert_eq!(a.pair(), PairState::Resolved(StereoSource::Procedural));
    }

    #[test]
    fn fallback_is_terminal_against_late_loads() {
        let mut a = arbiter();
        a.timed_out();
        assert!(a.loaded(Eye::Left, image(1)).is_none());
        assert!(a.loaded(Eye::Right, image(2)).is_none());
        assert_eq!(a.pair(), PairState::Resolved(StereoSource::Procedural));
        assert!(a.eye(Eye::Left).is_loaded());
    }

    #[test]
    fn late_failure_still_warns() {
        let mut a = arbiter();
        a.timed_out();
        assert!(a.failed(&load_error(Eye::Right)).is_none());
        assert_eq!(a.warnings().len(), 1);
        assert!(matches!(a.eye(Eye::Right), EyeState::Failed));
    }
}
