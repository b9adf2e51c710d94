/// Nail color compositing
///
/// `recompute` is a pure function of the source image and the composite
/// inputs: every pass starts from a fresh copy of the source, so identical
/// inputs always produce an identical raster.

use image::{Rgba, RgbaImage};

use super::context::{CompositeOp, DrawContext};
use crate::color;
use crate::error::Result;
use crate::state::data::{Region, SourceImage};
use crate::state::edit::Adjustments;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Everything besides the source image that a composite pass depends on
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeInputs {
    /// Regions to paint, in paint order
    pub regions: Vec<Region>,
    /// Color text exactly as entered
    pub color: String,
    pub adjustments: Adjustments,
}

/// Redraw the source and paint every region
pub fn recompute(source: &SourceImage, inputs: &CompositeInputs) -> Result<RgbaImage> {
    let mut surface = source.to_canvas()?;
    let fill = color::fill_color(&inputs.color);
    let adjustments = &inputs.adjustments;

    let mut ctx = DrawContext::new(&mut surface);
    for region in &inputs.regions {
        ctx.scoped(|ctx| paint_region(ctx, *region, fill, adjustments));
    }

    Ok(surface)
}

/// Paint one region; the caller scopes the context state around this
fn paint_region(ctx: &mut DrawContext<'_>, region: Region, fill: Rgba<u8>, adjustments: &Adjustments) {
    // Rotate about the region's own center, then shift by the offsets
    let (center_x, center_y) = region.center();
    ctx.translate(center_x + adjustments.offset_x, center_y + adjustments.offset_y);
    ctx.rotate(adjustments.rotation_radians());
    ctx.translate(-center_x, -center_y);

    ctx.set_fill(fill);
    ctx.set_global_alpha(adjustments.fill_alpha());
    ctx.fill_rect(region);

    if let Some(alpha) = adjustments.brightness_alpha() {
        if adjustments.brightness > 100.0 {
            ctx.set_composite(CompositeOp::Lighten);
            ctx.set_fill(WHITE);
        } else {
            ctx.set_composite(CompositeOp::Darken);
            ctx.set_fill(BLACK);
        }
        ctx.set_global_alpha(alpha);
        ctx.fill_rect(region);
    }
}
