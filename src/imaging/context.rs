/// Minimal 2D drawing context over an RGBA8 surface
///
/// Mirrors the small part of a canvas 2D context the compositor needs:
/// a current transform, fill color, global alpha and composite mode, a
/// save/restore stack and rectangle fills.
///
/// Coverage is binary: a pixel is painted when its center, mapped back into
/// user space through the inverse transform, lies inside the rectangle.

use cgmath::{Matrix3, Rad, SquareMatrix, Vector2, Vector3};
use image::{Rgba, RgbaImage};

use crate::state::data::Region;

/// How a fill combines with the pixels already on the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositeOp {
    #[default]
    SourceOver,
    /// Per-channel maximum of source and backdrop
    Lighten,
    /// Per-channel minimum of source and backdrop
    Darken,
}

impl CompositeOp {
    /// Separable blend function B(cb, cs)
    fn blend(self, backdrop: f32, source: f32) -> f32 {
        match self {
            CompositeOp::SourceOver => source,
            CompositeOp::Lighten => backdrop.max(source),
            CompositeOp::Darken => backdrop.min(source),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DrawState {
    transform: Matrix3<f32>,
    fill: Rgba<u8>,
    global_alpha: f32,
    composite: CompositeOp,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Matrix3::identity(),
            fill: Rgba([0, 0, 0, 255]),
            global_alpha: 1.0,
            composite: CompositeOp::SourceOver,
        }
    }
}

pub struct DrawContext<'a> {
    surface: &'a mut RgbaImage,
    state: DrawState,
    saved: Vec<DrawState>,
}

impl<'a> DrawContext<'a> {
    pub fn new(surface: &'a mut RgbaImage) -> Self {
        Self {
            surface,
            state: DrawState::default(),
            saved: Vec::new(),
        }
    }

    /// Push the current state
    pub fn save(&mut self) {
        self.saved.push(self.state);
    }

    /// Pop the last saved state; no-op when nothing was saved
    pub fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.state = state;
        }
    }

    /// Run `draw` between a save and a restore
    pub fn scoped<R>(&mut self, draw: impl FnOnce(&mut Self) -> R) -> R {
        self.save();
        let result = draw(self);
        self.restore();
        result
    }

    pub fn translate(&mut self, x: f32, y: f32) {
        self.state.transform = self.state.transform * Matrix3::from_translation(Vector2::new(x, y));
    }

    /// Rotate clockwise on screen (y axis points down)
    pub fn rotate(&mut self, radians: f32) {
        self.state.transform = self.state.transform * Matrix3::from_angle_z(Rad(radians));
    }

    pub fn set_fill(&mut self, color: Rgba<u8>) {
        self.state.fill = color;
    }

    pub fn set_global_alpha(&mut self, alpha: f32) {
        self.state.global_alpha = alpha.clamp(0.0, 1.0);
    }

    pub fn set_composite(&mut self, op: CompositeOp) {
        self.state.composite = op;
    }

    /// Fill a rectangle given in user space
    pub fn fill_rect(&mut self, rect: Region) {
        let DrawState {
            transform,
            fill,
            global_alpha,
            composite,
        } = self.state;

        let source_alpha = fill[3] as f32 / 255.0 * global_alpha;
        if source_alpha <= 0.0 || rect.width <= 0.0 || rect.height <= 0.0 {
            return;
        }
        let Some(inverse) = transform.invert() else {
            return;
        };

        // Device-space bounding box of the transformed corners
        let corners = [
            (rect.x, rect.y),
            (rect.x + rect.width, rect.y),
            (rect.x, rect.y + rect.height),
            (rect.x + rect.width, rect.y + rect.height),
        ];
        let (mut min_x, mut min_y) = (f32::INFINITY, f32::INFINITY);
        let (mut max_x, mut max_y) = (f32::NEG_INFINITY, f32::NEG_INFINITY);
        for (x, y) in corners {
            let device = transform * Vector3::new(x, y, 1.0);
            min_x = min_x.min(device.x);
            min_y = min_y.min(device.y);
            max_x = max_x.max(device.x);
            max_y = max_y.max(device.y);
        }

        let (width, height) = self.surface.dimensions();
        let x0 = min_x.floor().clamp(0.0, width as f32) as u32;
        let y0 = min_y.floor().clamp(0.0, height as f32) as u32;
        let x1 = max_x.ceil().clamp(0.0, width as f32) as u32;
        let y1 = max_y.ceil().clamp(0.0, height as f32) as u32;

        for py in y0..y1 {
            for px in x0..x1 {
                let user = inverse * Vector3::new(px as f32 + 0.5, py as f32 + 0.5, 1.0);
                if rect.contains(user.x, user.y) {
                    let pixel = self.surface.get_pixel_mut(px, py);
                    blend_pixel(pixel, fill, source_alpha, composite);
                }
            }
        }
    }
}

/// Composite one source color over a backdrop pixel.
///
/// `source_alpha` already includes the global alpha.
pub fn blend_pixel(backdrop: &mut Rgba<u8>, source: Rgba<u8>, source_alpha: f32, op: CompositeOp) {
    let alpha_s = source_alpha.clamp(0.0, 1.0);
    let alpha_b = backdrop[3] as f32 / 255.0;
    let alpha_o = alpha_s + alpha_b * (1.0 - alpha_s);
    if alpha_o <= 0.0 {
        return;
    }

    for channel in 0..3 {
        let cs = source[channel] as f32 / 255.0;
        let cb = backdrop[channel] as f32 / 255.0;
        let mixed = op.blend(cb, cs);
        let premultiplied = alpha_s * (1.0 - alpha_b) * cs
            + alpha_s * alpha_b * mixed
            + (1.0 - alpha_s) * alpha_b * cb;
        backdrop[channel] = to_byte(premultiplied / alpha_o);
    }
    backdrop[3] = to_byte(alpha_o);
}

fn to_byte(value: f32) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_aligned_fill_covers_exact_pixels() {
        let mut surface = RgbaImage::from_pixel(10, 10, Rgba([255, 255, 255, 255]));
        let mut ctx = DrawContext::new(&mut surface);
        ctx.set_fill(Rgba([0, 0, 255, 255]));
        ctx.fill_rect(Region::new(2.0, 3.0, 4.0, 2.0));

        let painted = surface
            .enumerate_pixels()
            .filter(|(_, _, p)| **p == Rgba([0, 0, 255, 255]))
            .count();
        assert_eq!(painted, 8);
        assert_eq!(*surface.get_pixel(2, 3), Rgba([0, 0, 255, 255]));
        assert_eq!(*surface.get_pixel(5, 4), Rgba([0, 0, 255, 255]));
        assert_eq!(*surface.get_pixel(6, 4), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_source_over_with_alpha() {
        let mut pixel = Rgba([100, 100, 100, 255]);
        blend_pixel(&mut pixel, Rgba([255, 0, 102, 255]), 0.8, CompositeOp::SourceOver);
        assert_eq!(pixel, Rgba([224, 20, 102, 255]));
    }

    #[test]
    fn test_lighten_and_darken() {
        let mut light = Rgba([101, 201, 51, 255]);
        blend_pixel(&mut light, Rgba([255, 255, 255, 255]), 0.5, CompositeOp::Lighten);
        assert_eq!(light, Rgba([178, 228, 153, 255]));

        let mut dark = Rgba([100, 200, 50, 255]);
        blend_pixel(&mut dark, Rgba([0, 0, 0, 255]), 0.5, CompositeOp::Darken);
        assert_eq!(dark, Rgba([50, 100, 25, 255]));
    }

    #[test]
    fn test_transparent_backdrop_takes_source() {
        let mut pixel = Rgba([0, 0, 0, 0]);
        blend_pixel(&mut pixel, Rgba([10, 20, 30, 255]), 0.5, CompositeOp::SourceOver);
        assert_eq!(pixel, Rgba([10, 20, 30, 128]));
    }

    #[test]
    fn test_restore_undoes_transform() {
        let mut surface = RgbaImage::from_pixel(20, 20, Rgba([0, 0, 0, 255]));
        let mut ctx = DrawContext::new(&mut surface);
        ctx.set_fill(Rgba([255, 0, 0, 255]));

        ctx.scoped(|ctx| {
            ctx.translate(10.0, 10.0);
            ctx.set_fill(Rgba([0, 255, 0, 255]));
            ctx.fill_rect(Region::new(0.0, 0.0, 2.0, 2.0));
        });
        ctx.fill_rect(Region::new(0.0, 0.0, 2.0, 2.0));

        assert_eq!(*surface.get_pixel(10, 10), Rgba([0, 255, 0, 255]));
        assert_eq!(*surface.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_quarter_turn_about_center_swaps_extent() {
        let mut surface = RgbaImage::from_pixel(20, 20, Rgba([0, 0, 0, 255]));
        let mut ctx = DrawContext::new(&mut surface);
        ctx.set_fill(Rgba([255, 255, 255, 255]));
        ctx.translate(10.0, 10.0);
        ctx.rotate(std::f32::consts::FRAC_PI_2);
        ctx.translate(-10.0, -10.0);
        // 8 wide, 2 tall, centered on (10, 10)
        ctx.fill_rect(Region::new(6.0, 9.0, 8.0, 2.0));

        // Now 2 wide, 8 tall
        assert_eq!(*surface.get_pixel(10, 7), Rgba([255, 255, 255, 255]));
        assert_eq!(*surface.get_pixel(9, 12), Rgba([255, 255, 255, 255]));
        assert_eq!(*surface.get_pixel(13, 10), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_fill_outside_surface_is_clipped() {
        let mut surface = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        let mut ctx = DrawContext::new(&mut surface);
        ctx.set_fill(Rgba([255, 255, 255, 255]));
        ctx.fill_rect(Region::new(-10.0, -10.0, 12.0, 12.0));
        ctx.fill_rect(Region::new(50.0, 50.0, 5.0, 5.0));

        assert_eq!(*surface.get_pixel(1, 1), Rgba([255, 255, 255, 255]));
        assert_eq!(*surface.get_pixel(2, 2), Rgba([0, 0, 0, 255]));
    }
}
