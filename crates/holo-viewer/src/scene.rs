use std::sync::Arc;

use glam::{Mat4, Vec2, Vec3};
use holo_engine::paint::Color;
use holo_engine::render::TextureFilter;
use image::RgbaImage;

use crate::acquire::{Eye, Install};
use crate::barrier::BarrierMask;
use crate::config::HologramConfig;

/// Texture bound to a material.
#[derive(Debug, Clone, Default)]
pub enum TextureMap {
    /// Placeholder: renders as nothing until a real texture arrives.
    #[default]
    Empty,
    Image(Arc<RgbaImage>),
}

impl TextureMap {
    pub fn image(&self) -> Option<&Arc<RgbaImage>> {
        match self {
            TextureMap::Empty => None,
            TextureMap::Image(img) => Some(img),
        }
    }
}

/// Unlit textured material.
///
/// `revision` increases whenever the texture is swapped so the renderer
/// re-uploads without the surface being rebuilt.
#[derive(Debug, Clone)]
pub struct Material {
    map: TextureMap,
    revision: u64,
    pub color: Color,
    pub opacity: f32,
    /// Honor texture alpha and `opacity`.
    pub transparent: bool,
    pub filter: TextureFilter,
}

impl Material {
    pub fn opaque(map: TextureMap) -> Self {
        Self {
            map,
            revision: 0,
            color: Color::WHITE,
            opacity: 1.0,
            transparent: false,
            filter: TextureFilter::Linear,
        }
    }

    pub fn translucent(map: TextureMap, opacity: f32) -> Self {
        Self {
            opacity,
            transparent: true,
            ..Self::opaque(map)
        }
    }

    #[inline]
    pub fn map(&self) -> &TextureMap {
        &self.map
    }

    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_map(&mut self, map: TextureMap) {
        self.map = map;
        self.revision += 1;
    }

    /// Premultiplied tint the quad renderer multiplies texels by.
    pub fn tint(&self) -> Color {
        if self.transparent {
            self.color.with_opacity(self.opacity)
        } else {
            self.color
        }
    }
}

/// Flat square quad centred on `position`, facing +Z.
#[derive(Debug, Clone)]
pub struct Surface {
    pub name: &'static str,
    pub position: Vec3,
    pub size: Vec2,
    pub material: Material,
}

impl Surface {
    pub fn model(&self) -> Mat4 {
        Mat4::from_translation(self.position) * Mat4::from_scale(self.size.extend(1.0))
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceId {
    Left,
    Right,
    Barrier,
}

impl From<Eye> for SurfaceId {
    fn from(eye: Eye) -> Self {
        match eye {
            Eye::Left => SurfaceId::Left,
            Eye::Right => SurfaceId::Right,
        }
    }
}

/// The three hologram surfaces: left eye, right eye, barrier.
#[derive(Debug, Clone)]
pub struct HologramScene {
    surfaces: [Surface; 3],
}

impl HologramScene {
    /// Builds all surfaces immediately; eye textures start as placeholders.
    pub fn compose(config: &HologramConfig, mask: &BarrierMask) -> Self {
        let size = Vec2::splat(config.plane_size);
        let k = config.stereo_half_separation;

        let left = Surface {
            name: "left",
            position: Vec3::new(-k, 0.0, 0.0),
            size,
            material: Material::opaque(TextureMap::Empty),
        };
        let right = Surface {
            name: "right",
            position: Vec3::new(k, 0.0, 0.0),
            size,
            material: Material::opaque(TextureMap::Empty),
        };
        let barrier = Surface {
            name: "barrier",
            position: Vec3::new(0.0, 0.0, config.barrier_depth()),
            size,
            material: Material::translucent(
                TextureMap::Image(mask.image().clone()),
                config.barrier_opacity,
            ),
        };

        Self {
            surfaces: [left, right, barrier],
        }
    }

    fn index(id: SurfaceId) -> usize {
        match id {
            SurfaceId::Left => 0,
            SurfaceId::Right => 1,
            SurfaceId::Barrier => 2,
        }
    }

    pub fn surface(&self, id: SurfaceId) -> &Surface {
        &self.surfaces[Self::index(id)]
    }

    pub fn surface_mut(&mut self, id: SurfaceId) -> &mut Surface {
        &mut self.surfaces[Self::index(id)]
    }

    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    /// Swaps acquired textures into the live eye materials.
    pub fn install(&mut self, install: Install) {
        match install {
            Install::Eye(eye, image) => {
                self.surface_mut(eye.into())
                    .material
                    .set_map(TextureMap::Image(image));
            }
            Install::Pair(pair) => {
                self.surface_mut(SurfaceId::Left)
                    .material
                    .set_map(TextureMap::Image(pair.left));
                self.surface_mut(SurfaceId::Right)
                    .material
                    .set_map(TextureMap::Image(pair.right));
            }
        }
    }

    /// Sets the shared pop-out depth of both eye surfaces; the barrier stays put.
    pub fn set_image_depth(&mut self, z: f32) {
        self.surface_mut(SurfaceId::Left).position.z = z;
        self.surface_mut(SurfaceId::Right).position.z = z;
    }

    /// Surface indices back-to-front (ascending z, ties in insertion order).
    pub fn paint_order(&self) -> [usize; 3] {
        let mut order = [0, 1, 2];
        order.sort_by(|&a, &b| {
            self.surfaces[a]
                .position
                .z
                .total_cmp(&self.surfaces[b].position.z)
        });
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquire::{generate_pair, StereoPair};
    use crate::animation::PopOutClock;

    fn scene() -> (HologramConfig, HologramScene) {
        let config = HologramConfig::default();
        let mask = BarrierMask::generate(config.mask_size);
        let scene = HologramScene::compose(&config, &mask);
        (config, scene)
    }

    // ── composition ──────────────────────────────────────────────────────

    #[test]
    fn eyes_are_offset_symmetrically() {
        let (config, s) = scene();
        let k = config.stereo_half_separation;
        assert_eq!(s.surface(SurfaceId::Left).position.x, -k);
        assert_eq!(s.surface(SurfaceId::Right).position.x, k);
        assert_eq!(s.surface(SurfaceId::Barrier).size, Vec2::splat(2.0));
    }

    #[test]
    fn eye_surfaces_start_with_placeholders() {
        let (_, s) = scene();
        assert!(s.surface(SurfaceId::Left).material.map().image().is_none());
        assert!(s.surface(SurfaceId::Right).material.map().image().is_none());
        assert_eq!(s.surface(SurfaceId::Left).material.color, Color::WHITE);
    }

    #[test]
    fn barrier_material_is_translucent_mask() {
        let (_, s) = scene();
        let m = &s.surface(SurfaceId::Barrier).material;
        assert!(m.transparent);
        assert_eq!(m.opacity, 0.8);
        assert_eq!(m.filter, TextureFilter::Linear);
        assert_eq!(m.map().image().map(|i| i.width()), Some(512));
    }

    // ── texture installs ─────────────────────────────────────────────────

    #[test]
    fn install_swaps_texture_in_place() {
        let (_, mut s) = scene();
        let img = Arc::new(RgbaImage::new(4, 4));
        s.install(Install::Eye(Eye::Right, img.clone()));

        let right = &s.surface(SurfaceId::Right).material;
        assert_eq!(right.revision(), 1);
        assert!(Arc::ptr_eq(right.map().image().unwrap(), &img));
        assert_eq!(s.surface(SurfaceId::Left).material.revision(), 0);
    }

    #[test]
    fn fallback_pair_overwrites_both_eyes() {
        let (config, mut s) = scene();
        s.install(Install::Eye(Eye::Left, Arc::new(RgbaImage::new(4, 4))));

        let pair: StereoPair = generate_pair(&config.fallback);
        s.install(Install::Pair(pair.clone()));

        let left = s.surface(SurfaceId::Left).material.map().image().unwrap();
        let right = s.surface(SurfaceId::Right).material.map().image().unwrap();
        assert!(Arc::ptr_eq(left, &pair.left));
        assert!(Arc::ptr_eq(right, &pair.right));
    }

    // ── depth ordering ───────────────────────────────────────────────────

    #[test]
    fn barrier_stays_in_front_through_animation() {
        let (config, mut s) = scene();
        let mut clock = PopOutClock::new(config.jump_speed, config.pop_out_depth);
        for _ in 0..1000 {
            s.set_image_depth(clock.tick());
            let barrier_z = s.surface(SurfaceId::Barrier).position.z;
            assert!(barrier_z > s.surface(SurfaceId::Left).position.z);
            assert!(barrier_z > s.surface(SurfaceId::Right).position.z);
            assert_eq!(s.paint_order()[2], 2);
        }
    }

    #[test]
    fn paint_order_keeps_insertion_order_for_ties() {
        let (_, s) = scene();
        assert_eq!(s.paint_order(), [0, 1, 2]);
    }

    #[test]
    fn model_scales_unit_quad_to_plane_size() {
        let (_, s) = scene();
        let corner = s.surface(SurfaceId::Left).model().transform_point3(Vec3::new(0.5, 0.5, 0.0));
        assert_eq!(corner, Vec3::new(0.5, 1.0, 0.0));
    }
}
