/// Shared data structures for the application state
///
/// These structs flow between the loaders, the compositor and the UI.

use image::RgbaImage;

use crate::error::{Error, Result};

/// A decoded image at its natural resolution
#[derive(Debug, Clone, PartialEq)]
pub struct SourceImage {
    /// Natural width in pixels
    pub width: u32,
    /// Natural height in pixels
    pub height: u32,
    /// Tightly packed RGBA8 pixels, row-major
    pub data: Vec<u8>,
}

impl SourceImage {
    pub fn from_rgba(image: RgbaImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            data: image.into_raw(),
        }
    }

    /// Copy the pixels into a fresh drawing surface.
    ///
    /// Fails when the buffer length disagrees with the dimensions.
    pub fn to_canvas(&self) -> Result<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.data.clone()).ok_or(
            Error::ContextUnavailable {
                width: self.width,
                height: self.height,
            },
        )
    }
}

/// A nail rectangle in image pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Region {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether a point in the region's own (untransformed) space lies inside.
    /// Left/top edges are inclusive, right/bottom exclusive.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// Where regions come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Five placeholder regions derived from the image size
    #[default]
    Auto,
    /// Regions drawn by the user on the selection overlay
    Manual,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::Auto => Mode::Manual,
            Mode::Manual => Mode::Auto,
        }
    }
}

/// Generation number attached to an in-flight image load
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

/// Hands out load tickets and remembers which one is current.
///
/// A completion carrying an older ticket belongs to a superseded load and
/// must be dropped.
#[derive(Debug, Default)]
pub struct LoadCounter {
    latest: u64,
}

impl LoadCounter {
    /// Start a new load, superseding every earlier one
    pub fn begin(&mut self) -> LoadTicket {
        self.latest += 1;
        LoadTicket(self.latest)
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.latest
    }
}
