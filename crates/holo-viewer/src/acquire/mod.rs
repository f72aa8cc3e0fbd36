//! Stereo texture acquisition.
//!
//! Two background loads race a fallback deadline. Results are drained on the
//! frame loop by [`Acquisition::poll`], so every state change happens on the
//! event-loop thread and the scene never needs locking.

mod arbiter;
mod error;
mod loader;
mod procedural;

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crossbeam_channel::{Receiver, TryRecvError};
use image::RgbaImage;

use crate::config::{FallbackStyle, HologramConfig};

pub use arbiter::{EyeState, Install, PairState, StereoArbiter, StereoSource};
pub use error::AssetError;
pub use loader::{fit_within, load_rgba, spawn_loaders, LoadOutcome};
pub use procedural::generate_pair;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Eye {
    Left,
    Right,
}

impl Eye {
    pub const BOTH: [Eye; 2] = [Eye::Left, Eye::Right];

    #[inline]
    pub fn other(self) -> Eye {
        match self {
            Eye::Left => Eye::Right,
            Eye::Right => Eye::Left,
        }
    }
}

impl fmt::Display for Eye {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Eye::Left => "left",
            Eye::Right => "right",
        })
    }
}

/// Left/right raster pair.
#[derive(Debug, Clone)]
pub struct StereoPair {
    pub left: Arc<RgbaImage>,
    pub right: Arc<RgbaImage>,
}

/// Loader threads + fallback deadline, arbitrated by a [`StereoArbiter`].
pub struct Acquisition {
    arbiter: StereoArbiter,
    results: Option<Receiver<LoadOutcome>>,
    deadline: Instant,
    deadline_fired: bool,
}

impl Acquisition {
    /// Spawns both loaders; the fallback deadline is `now + fallback_timeout`.
    pub fn start(config: &HologramConfig, now: Instant) -> Self {
        let results = spawn_loaders(
            config.left_path(),
            config.right_path(),
            config.max_texture_edge,
        );
        Self::from_receiver(results, config.fallback, now + config.fallback_timeout)
    }

    /// Arbitrates outcomes from an arbitrary source.
    pub fn from_receiver(
        results: Receiver<LoadOutcome>,
        style: FallbackStyle,
        deadline: Instant,
    ) -> Self {
        Self {
            arbiter: StereoArbiter::new(style),
            results: Some(results),
            deadline,
            deadline_fired: false,
        }
    }

    /// Applies every settled load and the deadline, as of `now`.
    ///
    /// Loads that settled at or after the deadline lose to it: the timer is
    /// applied first. Returned installs must be applied in order.
    pub fn poll(&mut self, now: Instant) -> Vec<Install> {
        let mut installs = Vec::new();
        let mut disconnected = false;

        if let Some(results) = self.results.as_ref() {
            loop {
                match results.try_recv() {
                    Ok(outcome) => {
                        if outcome.finished_at >= self.deadline && !self.deadline_fired {
                            self.deadline_fired = true;
                            installs.extend(self.arbiter.timed_out());
                        }
                        installs.extend(settle(&mut self.arbiter, outcome));
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        disconnected = true;
                        break;
                    }
                }
            }
        }

        if disconnected {
            self.results = None;
            for eye in Eye::BOTH {
                if matches!(self.arbiter.eye(eye), EyeState::Unloaded) {
                    installs.extend(self.arbiter.failed(&AssetError::Vanished { eye }));
                }
            }
        }

        if now >= self.deadline && !self.deadline_fired {
            self.deadline_fired = true;
            installs.extend(self.arbiter.timed_out());
        }

        installs
    }

    #[inline]
    pub fn pair(&self) -> PairState {
        self.arbiter.pair()
    }

    pub fn eye(&self, eye: Eye) -> &EyeState {
        self.arbiter.eye(eye)
    }

    pub fn warnings(&self) -> &[String] {
        self.arbiter.warnings()
    }

    /// True once both loaders reported and the pair is resolved.
    pub fn is_finished(&self) -> bool {
        self.results.is_none() && self.pair() != PairState::BothPending
    }
}

fn settle(arbiter: &mut StereoArbiter, outcome: LoadOutcome) -> Option<Install> {
    match outcome.result {
        Ok(image) => arbiter.loaded(outcome.eye, image),
        Err(error) => arbiter.failed(&error),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use crossbeam_channel::unbounded;

    use super::*;

    fn image(tag: u8) -> Arc<RgbaImage> {
        Arc::new(RgbaImage::from_pixel(2, 2, image::Rgba([tag, 0, 0, 255])))
    }

    fn ok(eye: Eye, at: Instant, tag: u8) -> LoadOutcome {
        LoadOutcome { eye, finished_at: at, result: Ok(image(tag)) }
    }

    fn missing(eye: Eye, at: Instant) -> LoadOutcome {
        LoadOutcome {
            eye,
            finished_at: at,
            result: load_rgba(eye, &PathBuf::from("/nonexistent/holo/missing.png"), 8192),
        }
    }

    // ── in-memory outcomes ───────────────────────────────────────────────

    #[test]
    fn settles_before_deadline_are_photographic() {
        let t0 = Instant::now();
        let deadline = t0 + Duration::from_secs(1);
        let (tx, rx) = unbounded();
        let mut acq = Acquisition::from_receiver(rx, FallbackStyle::default(), deadline);

        tx.send(ok(Eye::Left, t0, 1)).unwrap();
        tx.send(ok(Eye::Right, t0, 2)).unwrap();
        drop(tx);

        let installs = acq.poll(t0 + Duration::from_millis(10));
        assert_eq!(installs.len(), 2);
        assert!(installs.iter().all(|i| matches!(i, Install::Eye(..))));
        assert_eq!(acq.pair(), PairState::Resolved(StereoSource::Photographic));
        assert!(acq.is_finished());

        // Deadline passing later changes nothing.
        assert!(acq.poll(deadline + Duration::from_secs(5)).is_empty());
    }

    #[test]
    fn deadline_wins_against_late_success() {
        let t0 = Instant::now();
        let deadline = t0 + Duration::from_secs(1);
        let (tx, rx) = unbounded();
        let mut acq = Acquisition::from_receiver(rx, FallbackStyle::default(), deadline);

        assert!(acq.poll(t0).is_empty());

        let late = deadline + Duration::from_millis(300);
        tx.send(ok(Eye::Left, late, 1)).unwrap();
        tx.send(ok(Eye::Right, late, 2)).unwrap();

        let installs = acq.poll(late);
        assert_eq!(installs.len(), 1);
        assert!(matches!(installs[0], Install::Pair(_)));
        assert_eq!(acq.pair(), PairState::Resolved(StereoSource::Procedural));
    }

    #[test]
    fn deadline_fires_without_any_outcome() {
        let t0 = Instant::now();
        let deadline = t0 + Duration::from_secs(1);
        let (_tx, rx) = unbounded::<LoadOutcome>();
        let mut acq = Acquisition::from_receiver(rx, FallbackStyle::default(), deadline);

        assert!(acq.poll(deadline - Duration::from_millis(1)).is_empty());
        let installs = acq.poll(deadline);
        assert!(matches!(installs.as_slice(), [Install::Pair(_)]));
        assert!(acq.poll(deadline + Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn vanished_loader_counts_as_failure() {
        let t0 = Instant::now();
        let (tx, rx) = unbounded();
        let mut acq =
            Acquisition::from_receiver(rx, FallbackStyle::default(), t0 + Duration::from_secs(1));

        tx.send(ok(Eye::Left, t0, 1)).unwrap();
        drop(tx);

        let installs = acq.poll(t0);
        // Left installs; right vanished while left is loaded, so the timer decides.
        assert!(matches!(installs.as_slice(), [Install::Eye(Eye::Left, _)]));
        assert_eq!(acq.warnings().len(), 1);
        assert_eq!(acq.pair(), PairState::BothPending);

        let installs = acq.poll(t0 + Duration::from_secs(1));
        assert!(matches!(installs.as_slice(), [Install::Pair(_)]));
    }

    #[test]
    fn both_failures_share_one_fallback_pair() {
        let t0 = Instant::now();
        let (tx, rx) = unbounded();
        let mut acq =
            Acquisition::from_receiver(rx, FallbackStyle::default(), t0 + Duration::from_secs(1));

        tx.send(missing(Eye::Left, t0)).unwrap();
        tx.send(missing(Eye::Right, t0)).unwrap();
        drop(tx);

        let installs = acq.poll(t0);
        assert_eq!(installs.len(), 1);
        assert!(matches!(installs[0], Install::Pair(_)));
        assert_eq!(acq.warnings().len(), 2);
        assert!(acq.is_finished());
    }

    // ── real loader threads ──────────────────────────────────────────────

    fn drain_until_finished(acq: &mut Acquisition) -> Vec<Install> {
        let mut installs = Vec::new();
        let give_up = Instant::now() + Duration::from_secs(10);
        while !acq.is_finished() && Instant::now() < give_up {
            // Poll with a time well before the deadline.
            installs.extend(acq.poll(Instant::now()));
            std::thread::sleep(Duration::from_millis(5));
        }
        installs
    }

    #[test]
    fn loads_real_png_pair_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        RgbaImage::from_pixel(8, 4, image::Rgba([10, 20, 30, 255]))
            .save(dir.path().join("left.png"))
            .unwrap();
        RgbaImage::from_pixel(8, 4, image::Rgba([40, 50, 60, 255]))
            .save(dir.path().join("right.png"))
            .unwrap();

        let config = HologramConfig {
            asset_dir: dir.path().to_path_buf(),
            fallback_timeout: Duration::from_secs(3600),
            ..HologramConfig::default()
        };
        let mut acq = Acquisition::start(&config, Instant::now());
        let installs = drain_until_finished(&mut acq);

        assert_eq!(acq.pair(), PairState::Resolved(StereoSource::Photographic));
        assert_eq!(installs.len(), 2);
        for install in &installs {
            let Install::Eye(_, img) = install else { panic!("unexpected fallback") };
            assert_eq!(img.dimensions(), (8, 4));
        }
    }

    #[test]
    fn missing_assets_fall_back_with_two_warnings() {
        let dir = tempfile::tempdir().unwrap();
        let config = HologramConfig {
            asset_dir: dir.path().to_path_buf(),
            fallback_timeout: Duration::from_secs(3600),
            ..HologramConfig::default()
        };
        let mut acq = Acquisition::start(&config, Instant::now());
        let installs = drain_until_finished(&mut acq);

        assert_eq!(acq.pair(), PairState::Resolved(StereoSource::Procedural));
        assert_eq!(installs.iter().filter(|i| matches!(i, Install::Pair(_))).count(), 1);
        assert_eq!(acq.warnings().len(), 2);
        assert!(matches!(acq.eye(Eye::Left), EyeState::Failed));
        assert!(matches!(acq.eye(Eye::Right), EyeState::Failed));
    }
}
