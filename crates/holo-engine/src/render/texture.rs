use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{ensure, Result};
use wgpu::util::{DeviceExt, TextureDataOrder};

static NEXT_TEXTURE_ID: AtomicU64 = AtomicU64::new(1);

/// Sampling filter for magnification/minification.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum TextureFilter {
    #[default]
    Linear,
    Nearest,
}

impl TextureFilter {
    fn to_wgpu(self) -> wgpu::FilterMode {
        match self {
            TextureFilter::Linear => wgpu::FilterMode::Linear,
            TextureFilter::Nearest => wgpu::FilterMode::Nearest,
        }
    }
}

/// A sampled 2D RGBA texture uploaded to the GPU.
///
/// Each texture carries a process-unique id so renderers can cache bind
/// groups and notice when a material's texture was swapped.
pub struct GpuTexture {
    id: u64,
    size: (u32, u32),
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
}

impl GpuTexture {
    /// Uploads tightly packed straight-alpha sRGB RGBA8 pixels.
    pub fn from_rgba8(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        width: u32,
        height: u32,
        rgba: &[u8],
        filter: TextureFilter,
    ) -> Result<Self> {
        check_upload(
            label,
            width,
            height,
            rgba.len(),
            device.limits().max_texture_dimension_2d,
        )?;

        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            TextureDataOrder::LayerMajor,
            rgba,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: filter.to_wgpu(),
            min_filter: filter.to_wgpu(),
            ..Default::default()
        });

        Ok(Self {
            id: NEXT_TEXTURE_ID.fetch_add(1, Ordering::Relaxed),
            size: (width, height),
            _texture: texture,
            view,
            sampler,
        })
    }

    /// A 1x1 fully transparent texture: renders as nothing, binds like anything.
    pub fn placeholder(device: &wgpu::Device, queue: &wgpu::Queue, label: &str) -> Result<Self> {
        Self::from_rgba8(device, queue, label, 1, 1, &[0, 0, 0, 0], TextureFilter::Nearest)
    }

    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    #[inline]
    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }
}

/// Checks an RGBA8 upload against its byte length and the device's 2D limit.
fn check_upload(label: &str, width: u32, height: u32, len: usize, max_dimension: u32) -> Result<()> {
    ensure!(width > 0 && height > 0, "texture {label:?} has zero size");
    ensure!(
        width <= max_dimension && height <= max_dimension,
        "texture {label:?} is {width}x{height}, GPU max texture dimension is {max_dimension}"
    );
    let expected = width as usize * height as usize * 4;
    ensure!(
        len == expected,
        "texture {label:?}: expected {expected} bytes for {width}x{height}, got {len}"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_within_limits_passes() {
        assert!(check_upload("eye", 512, 512, 512 * 512 * 4, 8192).is_ok());
        assert!(check_upload("eye", 8192, 1, 8192 * 4, 8192).is_ok());
    }

    #[test]
    fn oversized_upload_is_rejected() {
        let err = check_upload("eye", 9000, 4000, 9000 * 4000 * 4, 8192).unwrap_err();
        assert!(err.to_string().contains("8192"), "{err}");
        assert!(check_upload("eye", 10, 8193, 10 * 8193 * 4, 8192).is_err());
    }

    #[test]
    fn zero_size_and_short_buffers_are_rejected() {
        assert!(check_upload("eye", 0, 4, 0, 8192).is_err());
        assert!(check_upload("eye", 2, 2, 15, 8192).is_err());
    }
}
