/// Manual nail-area drawing
///
/// Press starts a candidate rectangle, moves resize it (the size may go
/// negative when dragging up or left), release normalizes it and commits it
/// if it is big enough. All coordinates are image-space.

use super::data::Region;

/// Minimum normalized width and height for a drag to count as a region
pub const MIN_REGION_SIZE: f32 = 5.0;

/// Rectangle being dragged out; size is `current - start`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub start_x: f32,
    pub start_y: f32,
    pub width: f32,
    pub height: f32,
}

impl Candidate {
    /// Flip the origin where the size is negative and take absolute sizes
    pub fn normalized(&self) -> Region {
        Region {
            x: if self.width >= 0.0 { self.start_x } else { self.start_x + self.width },
            y: if self.height >= 0.0 { self.start_y } else { self.start_y + self.height },
            width: self.width.abs(),
            height: self.height.abs(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Selection {
    #[default]
    Idle,
    Drawing(Candidate),
}

impl Selection {
    /// Pointer went down at an image-space point
    pub fn press(&mut self, x: f32, y: f32) {
        *self = Selection::Drawing(Candidate {
            start_x: x,
            start_y: y,
            width: 0.0,
            height: 0.0,
        });
    }

    /// Pointer moved; returns true when the live candidate changed
    pub fn drag(&mut self, x: f32, y: f32) -> bool {
        match self {
            Selection::Drawing(candidate) => {
                candidate.width = x - candidate.start_x;
                candidate.height = y - candidate.start_y;
                true
            }
            Selection::Idle => false,
        }
    }

    /// Pointer released. Always returns to idle; yields the region to commit
    /// if both normalized dimensions exceed [`MIN_REGION_SIZE`].
    pub fn release(&mut self) -> Option<Region> {
        let finished = std::mem::take(self);
        match finished {
            Selection::Drawing(candidate) => {
                let region = candidate.normalized();
                (region.width > MIN_REGION_SIZE && region.height > MIN_REGION_SIZE)
                    .then_some(region)
            }
            Selection::Idle => None,
        }
    }

    pub fn candidate(&self) -> Option<&Candidate> {
        match self {
            Selection::Drawing(candidate) => Some(candidate),
            Selection::Idle => None,
        }
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self, Selection::Drawing(_))
    }
}
