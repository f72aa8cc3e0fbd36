use std::path::PathBuf;

use super::Eye;

/// Failure to produce one eye's photographic texture.
///
/// Never fatal: the acquisition logs it and degrades to the procedural pair.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("could not load {eye} image {}: {source}", path.display())]
    Load {
        eye: Eye,
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("could not start {eye} loader: {source}")]
    Spawn {
        eye: Eye,
        #[source]
        source: std::io::Error,
    },

    #[error("{eye} loader exited without a result")]
    Vanished { eye: Eye },
}

impl AssetError {
    pub fn eye(&self) -> Eye {
        match self {
            AssetError::Load { eye, .. }
            | AssetError::Spawn { eye, .. }
            | AssetError::Vanished { eye } => *eye,
        }
    }
}
