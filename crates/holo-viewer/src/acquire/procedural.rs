use std::sync::Arc;

use image::{Rgba, RgbaImage};

use crate::config::FallbackStyle;

use super::StereoPair;

/// Synthesizes the fallback stereo pair.
///
/// Both eyes share the background and circle; only the circle's horizontal
/// centre differs, which the barrier decodes into depth.
pub fn generate_pair(style: &FallbackStyle) -> StereoPair {
    StereoPair {
        left: Arc::new(draw_eye(style, style.left_center)),
        right: Arc::new(draw_eye(style, style.right_center)),
    }
}

fn draw_eye(style: &FallbackStyle, (cx, cy): (f32, f32)) -> RgbaImage {
    let [br, bg, bb] = style.background;
    let [cr, cg, cb] = style.circle;
    let background = Rgba([br, bg, bb, 255]);
    let circle = Rgba([cr, cg, cb, 255]);
    let r2 = style.radius * style.radius;

    RgbaImage::from_fn(style.size, style.size, |x, y| {
        // Sample at pixel centres.
        let dx = x as f32 + 0.5 - cx;
        let dy = y as f32 + 0.5 - cy;
        if dx * dx + dy * dy <= r2 { circle } else { background }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circle_px() -> Rgba<u8> {
        Rgba([0xff, 0x00, 0xff, 0xff])
    }

    fn background_px() -> Rgba<u8> {
        Rgba([0x00, 0xff, 0xff, 0xff])
    }

    /// Horizontal centre of the circle on row `y`.
    fn circle_center_x(img: &RgbaImage, y: u32) -> f32 {
        let xs: Vec<u32> = (0..img.width())
            .filter(|&x| *img.get_pixel(x, y) == circle_px())
            .collect();
        let (first, last) = (xs[0], xs[xs.len() - 1]);
        (first + last + 1) as f32 / 2.0
    }

    #[test]
    fn pair_is_square_and_sized() {
        let pair = generate_pair(&FallbackStyle::default());
        assert_eq!(pair.left.dimensions(), (512, 512));
        assert_eq!(pair.right.dimensions(), (512, 512));
    }

    #[test]
    fn circles_sit_at_per_eye_centres() {
        let pair = generate_pair(&FallbackStyle::default());
        assert!((circle_center_x(&pair.left, 256) - 230.0).abs() <= 1.0);
        assert!((circle_center_x(&pair.right, 256) - 282.0).abs() <= 1.0);
    }

    #[test]
    fn disparity_is_symmetric_about_frame_centre() {
        let style = FallbackStyle::default();
        let mid = style.size as f32 / 2.0;
        assert_eq!(mid - style.left_center.0, style.right_center.0 - mid);
    }

    #[test]
    fn corners_are_background_and_radius_is_respected() {
        let pair = generate_pair(&FallbackStyle::default());
        assert_eq!(*pair.left.get_pixel(0, 0), background_px());
        assert_eq!(*pair.right.get_pixel(511, 511), background_px());
        // Radius 150 around (230, 256): row 256 spans x = 80..=379.
        assert_eq!(*pair.left.get_pixel(378, 256), circle_px());
        assert_eq!(*pair.left.get_pixel(381, 256), background_px());
    }
}
