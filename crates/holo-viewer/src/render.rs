use holo_engine::render::{GpuTexture, QuadDraw, QuadRenderer, RenderCtx, RenderTarget};

use crate::camera::Camera;
use crate::scene::{HologramScene, TextureMap};

/// GPU side of a [`HologramScene`].
///
/// Mirrors each surface's material texture and re-uploads it whenever the
/// material revision changes. Empty maps bind a transparent placeholder.
#[derive(Default)]
pub struct HologramRenderer {
    quads: QuadRenderer,
    placeholder: Option<GpuTexture>,
    uploads: Vec<Upload>,
}

struct Upload {
    revision: u64,
    /// `None` draws the placeholder.
    texture: Option<GpuTexture>,
}

impl HologramRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        scene: &HologramScene,
        camera: &Camera,
    ) {
        self.sync(ctx, scene);

        let Self {
            quads,
            placeholder,
            uploads,
        } = self;
        let Some(placeholder) = placeholder.as_ref() else {
            return;
        };

        let view_projection = camera.view_projection();
        let surfaces = scene.surfaces();

        let draws: Vec<QuadDraw<'_>> = scene
            .paint_order()
            .into_iter()
            .map(|i| {
                let surface = &surfaces[i];
                let material = &surface.material;
                QuadDraw {
                    clip_from_local: view_projection * surface.model(),
                    texture: uploads[i].texture.as_ref().unwrap_or(placeholder),
                    tint: material.tint(),
                    transparent: material.transparent,
                }
            })
            .collect();

        quads.render(ctx, target, &draws);
    }

    fn sync(&mut self, ctx: &RenderCtx<'_>, scene: &HologramScene) {
        if self.placeholder.is_none() {
            match GpuTexture::placeholder(ctx.device, ctx.queue, "holo placeholder") {
                Ok(t) => self.placeholder = Some(t),
                Err(e) => {
                    log::error!("placeholder texture upload failed: {e:#}");
                    return;
                }
            }
        }

        for (i, surface) in scene.surfaces().iter().enumerate() {
            let material = &surface.material;
            if self
                .uploads
                .get(i)
                .is_some_and(|u| u.revision == material.revision())
            {
                continue;
            }

            let texture = match material.map() {
                TextureMap::Empty => None,
                TextureMap::Image(img) => {
                    let label = format!("holo {} texture", surface.name);
                    match GpuTexture::from_rgba8(
                        ctx.device,
                        ctx.queue,
                        &label,
                        img.width(),
                        img.height(),
                        img.as_raw(),
                        material.filter,
                    ) {
                        Ok(t) => {
                            log::debug!(
                                "uploaded {} texture r{} ({}x{})",
                                surface.name,
                                material.revision(),
                                img.width(),
                                img.height()
                            );
                            Some(t)
                        }
                        Err(e) => {
                            log::warn!("{} texture upload failed: {e:#}", surface.name);
                            None
                        }
                    }
                }
            };

            let upload = Upload {
                revision: material.revision(),
                texture,
            };
            if i < self.uploads.len() {
                self.uploads[i] = upload;
            } else {
                self.uploads.push(upload);
            }
        }
    }
}
