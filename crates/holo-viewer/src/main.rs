use anyhow::Result;
use winit::dpi::LogicalSize;

use holo_engine::device::GpuInit;
use holo_engine::logging::{init_logging, LoggingConfig};
use holo_engine::window::{Runtime, RuntimeConfig};
use holo_viewer::{HologramApp, HologramConfig};

const TITLE: &str = "Holo";

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = HologramConfig::from_env();
    log::info!(
        "stereo assets: {} / {} (fallback after {} ms)",
        config.left_path().display(),
        config.right_path().display(),
        config.fallback_timeout.as_millis()
    );

    let runtime = RuntimeConfig {
        title: TITLE.to_string(),
        initial_size: LogicalSize::new(1280.0, 720.0),
        transparent: false,
    };
    let aspect = (runtime.initial_size.width / runtime.initial_size.height) as f32;

    let app = HologramApp::new(config, TITLE, aspect);
    Runtime::run(runtime, GpuInit::default(), app)
}
