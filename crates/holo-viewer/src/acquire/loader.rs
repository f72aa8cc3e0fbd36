use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use crossbeam_channel::{unbounded, Receiver, Sender};
use image::imageops::{self, FilterType};
use image::RgbaImage;

use super::{AssetError, Eye};

/// Result of one background image load.
#[derive(Debug)]
pub struct LoadOutcome {
    pub eye: Eye,
    /// When the loader settled; compared against the fallback deadline.
    pub finished_at: Instant,
    pub result: Result<Arc<RgbaImage>, AssetError>,
}

/// Starts one loader thread per eye.
///
/// Each thread sends exactly one [`LoadOutcome`] and exits; the channel
/// disconnects once both are done. Images larger than `max_edge` on either
/// axis are downscaled to fit.
pub fn spawn_loaders(left: PathBuf, right: PathBuf, max_edge: u32) -> Receiver<LoadOutcome> {
    let (tx, rx) = unbounded();
    spawn_one(Eye::Left, left, max_edge, tx.clone());
    spawn_one(Eye::Right, right, max_edge, tx);
    rx
}

fn spawn_one(eye: Eye, path: PathBuf, max_edge: u32, tx: Sender<LoadOutcome>) {
    let fail_tx = tx.clone();

    let spawned = thread::Builder::new()
        .name(format!("holo-load-{eye}"))
        .spawn(move || {
            log::debug!("loading {eye} image from {}", path.display());
            let result = load_rgba(eye, &path, max_edge);
            // A closed channel means the viewer is gone; nothing to report to.
            let _ = tx.send(LoadOutcome {
                eye,
                finished_at: Instant::now(),
                result,
            });
        });

    if let Err(source) = spawned {
        let _ = fail_tx.send(LoadOutcome {
            eye,
            finished_at: Instant::now(),
            result: Err(AssetError::Spawn { eye, source }),
        });
    }
}

/// Decodes `path` into straight-alpha RGBA8 no larger than `max_edge` per axis.
pub fn load_rgba(eye: Eye, path: &Path, max_edge: u32) -> Result<Arc<RgbaImage>, AssetError> {
    let image = image::open(path)
        .map_err(|source| AssetError::Load {
            eye,
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();
    Ok(Arc::new(fit_within(image, max_edge)))
}

/// Downscales `image` so neither side exceeds `max_edge`, keeping aspect.
pub fn fit_within(image: RgbaImage, max_edge: u32) -> RgbaImage {
    let (w, h) = image.dimensions();
    let max_edge = max_edge.max(1);
    if w <= max_edge && h <= max_edge {
        return image;
    }

    let scale = max_edge as f64 / w.max(h) as f64;
    let nw = ((w as f64 * scale).round() as u32).clamp(1, max_edge);
    let nh = ((h as f64 * scale).round() as u32).clamp(1, max_edge);
    log::info!("downscaling {w}x{h} image to {nw}x{nh} (max edge {max_edge})");
    imageops::resize(&image, nw, nh, FilterType::Triangle)
}
