/// Placeholder nail detection
///
/// There is no model behind this: five fixed rectangles at proportional
/// positions roughly where fingertips sit in a hand photo taken palm-down.

use crate::state::data::Region;

/// Region origins as percent of (width, height)
const ORIGINS_PERCENT: [(f32, f32); 5] = [
    (20.0, 30.0),
    (35.0, 25.0),
    (50.0, 20.0),
    (65.0, 25.0),
    (80.0, 30.0),
];

/// Region size as percent of each dimension
const SIZE_PERCENT: f32 = 10.0;

/// Return the five placeholder regions for an image of the given size
pub fn detect_regions(width: u32, height: u32) -> Vec<Region> {
    let (w, h) = (width as f32, height as f32);

    ORIGINS_PERCENT
        .iter()
        .map(|&(px, py)| {
            Region::new(
                w * px / 100.0,
                h * py / 100.0,
                w * SIZE_PERCENT / 100.0,
                h * SIZE_PERCENT / 100.0,
            )
        })
        .collect()
}
