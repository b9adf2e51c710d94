/// Adjustment parameters for the nail overlay
///
/// One shared set is applied uniformly to every region in a composite pass.
/// It is serialized to JSON as part of the settings file so that the
/// defaults can be tuned without rebuilding.

use serde::{Deserialize, Serialize};

/// Brightness slider range, 100 is neutral
pub const BRIGHTNESS_RANGE: std::ops::RangeInclusive<f32> = 0.0..=200.0;
/// Opacity slider range in percent
pub const OPACITY_RANGE: std::ops::RangeInclusive<f32> = 0.0..=100.0;
/// Rotation slider range in degrees
pub const ROTATION_RANGE: std::ops::RangeInclusive<f32> = -180.0..=180.0;
/// Offset slider range in image pixels
pub const OFFSET_RANGE: std::ops::RangeInclusive<f32> = -100.0..=100.0;

/// Identifies a single field of [`Adjustments`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    Brightness,
    Opacity,
    Rotation,
    OffsetX,
    OffsetY,
}

/// All overlay adjustments
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct Adjustments {
    // ========== Tone ==========

    /// Brightness (0.0 to 200.0)
    /// - Below 100 darkens the painted nail with a black `darken` pass
    /// - Above 100 lightens it with a white `lighten` pass
    /// - 100.0 = no adjustment
    pub brightness: f32,

    /// Fill opacity in percent (0.0 to 100.0)
    pub opacity: f32,

    // ========== Placement ==========

    /// Rotation about each region's own center, in degrees
    pub rotation: f32,

    /// Horizontal shift in image pixels
    pub offset_x: f32,

    /// Vertical shift in image pixels
    pub offset_y: f32,
}

impl Default for Adjustments {
    fn default() -> Self {
        Self {
            brightness: 100.0,
            opacity: 80.0,
            rotation: 0.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl Adjustments {
    /// Read one field
    pub fn get(&self, adjustment: Adjustment) -> f32 {
        match adjustment {
            Adjustment::Brightness => self.brightness,
            Adjustment::Opacity => self.opacity,
            Adjustment::Rotation => self.rotation,
            Adjustment::OffsetX => self.offset_x,
            Adjustment::OffsetY => self.offset_y,
        }
    }

    /// Return a copy with one field replaced.
    ///
    /// Brightness and opacity are clamped to their slider ranges.
    pub fn with(self, adjustment: Adjustment, value: f32) -> Self {
        let mut next = self;
        match adjustment {
            Adjustment::Brightness => {
                next.brightness = value.clamp(*BRIGHTNESS_RANGE.start(), *BRIGHTNESS_RANGE.end())
            }
            Adjustment::Opacity => {
                next.opacity = value.clamp(*OPACITY_RANGE.start(), *OPACITY_RANGE.end())
            }
            Adjustment::Rotation => next.rotation = value,
            Adjustment::OffsetX => next.offset_x = value,
            Adjustment::OffsetY => next.offset_y = value,
        }
        next
    }

    /// Clamp every ranged field, used for values coming from the settings file
    pub fn clamped(self) -> Self {
        self.with(Adjustment::Brightness, self.brightness)
            .with(Adjustment::Opacity, self.opacity)
    }

    /// Alpha of the color fill (0.0 to 1.0)
    pub fn fill_alpha(&self) -> f32 {
        self.opacity / 100.0
    }

    /// Alpha of the brightness pass, `None` when brightness is neutral
    pub fn brightness_alpha(&self) -> Option<f32> {
        if self.brightness == 100.0 {
            None
        } else {
            Some((self.brightness - 100.0).abs() / 200.0)
        }
    }

    /// Rotation in radians
    pub fn rotation_radians(&self) -> f32 {
        self.rotation.to_radians()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_neutral() {
        let adjustments = Adjustments::default();
        assert_eq!(adjustments.brightness, 100.0);
        assert_eq!(adjustments.brightness_alpha(), None);
        assert!((adjustments.fill_alpha() - 0.8).abs() < f32::EPSILON);
    }

    #[test]
    fn test_with_clamps_ranged_fields() {
        let adjustments = Adjustments::default()
            .with(Adjustment::Brightness, 250.0)
            .with(Adjustment::Opacity, -3.0)
            .with(Adjustment::Rotation, 720.0);

        assert_eq!(adjustments.brightness, 200.0);
        assert_eq!(adjustments.opacity, 0.0);
        // Rotation is not clamped
        assert_eq!(adjustments.rotation, 720.0);
    }

    #[test]
    fn test_brightness_alpha_is_two_sided() {
        let brighter = Adjustments::default().with(Adjustment::Brightness, 150.0);
        let darker = Adjustments::default().with(Adjustment::Brightness, 50.0);

        assert_eq!(brighter.brightness_alpha(), Some(0.25));
        assert_eq!(darker.brightness_alpha(), Some(0.25));
        assert_eq!(
            Adjustments::default().with(Adjustment::Brightness, 0.0).brightness_alpha(),
            Some(0.5)
        );
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let restored: Adjustments = serde_json::from_str(r#"{"opacity": 40.0}"#).unwrap();

        assert_eq!(restored.opacity, 40.0);
        assert_eq!(restored.brightness, 100.0);
        assert_eq!(restored.get(Adjustment::OffsetX), 0.0);
    }
}
