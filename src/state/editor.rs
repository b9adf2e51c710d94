/// The nail editor model
///
/// Holds the loaded image, the regions, the color text and the adjustments.
/// Mutations only replace state; the caller runs [`Editor::refresh`] after
/// each one, which re-runs the pure compositor when the composite inputs
/// differ from the previous pass.

use image::RgbaImage;
use std::sync::Arc;

use super::data::{LoadCounter, LoadTicket, Mode, Region, SourceImage};
use super::edit::{Adjustment, Adjustments};
use crate::error::Error;
use crate::imaging::compose::{self, CompositeInputs};
use crate::imaging::detect::detect_regions;

/// Outcome of a background load, cloneable so it can travel in a message
pub type LoadResult = Result<Arc<SourceImage>, Arc<Error>>;

#[derive(Debug)]
pub struct Editor {
    source: Option<Arc<SourceImage>>,
    regions: Vec<Region>,
    mode: Mode,
    color: String,
    adjustments: Adjustments,
    /// What a new upload or "Reset Adjustments" goes back to
    default_adjustments: Adjustments,
    error: Option<String>,
    loads: LoadCounter,
    loading: bool,
    composite: Option<RgbaImage>,
    last_inputs: Option<CompositeInputs>,
    passes: u64,
}

impl Editor {
    pub fn new(color: impl Into<String>, default_adjustments: Adjustments) -> Self {
        Self {
            source: None,
            regions: Vec::new(),
            mode: Mode::Auto,
            color: color.into(),
            adjustments: default_adjustments,
            default_adjustments,
            error: None,
            loads: LoadCounter::default(),
            loading: false,
            composite: None,
            last_inputs: None,
            passes: 0,
        }
    }

    // ========== Loading ==========

    /// Start a load; completions with older tickets will be ignored
    pub fn begin_load(&mut self) -> LoadTicket {
        self.loading = true;
        self.loads.begin()
    }

    /// Apply a finished load. Returns false when the ticket was stale.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: LoadResult) -> bool {
        if !self.loads.is_current(ticket) {
            log::debug!("Ignoring superseded image load {:?}", ticket);
            return false;
        }
        self.loading = false;

        match result {
            Ok(source) => {
                self.source = Some(source);
                self.regions = Vec::new();
                self.error = None;
                self.adjustments = self.default_adjustments;
                self.last_inputs = None;
                self.composite = None;
            }
            Err(error) => match &*error {
                Error::Read { path, .. } => {
                    log::warn!("Could not read {}: {}", path.display(), error);
                    self.error = Some(error.to_string());
                }
                other => log::warn!("Image load failed: {}", other),
            },
        }
        true
    }

    // ========== Edits ==========

    pub fn set_color(&mut self, color: impl Into<String>) {
        self.color = color.into();
    }

    pub fn set_adjustment(&mut self, adjustment: Adjustment, value: f32) {
        self.adjustments = self.adjustments.with(adjustment, value);
    }

    pub fn reset_adjustments(&mut self) {
        self.adjustments = self.default_adjustments;
    }

    /// Switch between auto and manual. Entering manual mode drops every
    /// region; returning to auto re-detects on the next refresh.
    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
        if self.mode == Mode::Manual {
            self.regions = Vec::new();
        }
    }

    pub fn clear_regions(&mut self) {
        self.regions = Vec::new();
    }

    /// Append a drawn region; ignored outside manual mode
    pub fn add_region(&mut self, region: Region) {
        if self.mode != Mode::Manual {
            log::debug!("Dropping drawn region outside manual mode");
            return;
        }
        let mut regions = self.regions.clone();
        regions.push(region);
        self.regions = regions;
    }

    // ========== Composition ==========

    /// Regions a composite pass paints: the drawn ones in manual mode, the
    /// placeholders in auto mode or while nothing has been drawn yet
    pub fn regions_to_paint(&self) -> Vec<Region> {
        let Some(source) = &self.source else {
            return Vec::new();
        };
        match self.mode {
            Mode::Manual if !self.regions.is_empty() => self.regions.clone(),
            _ => detect_regions(source.width, source.height),
        }
    }

    /// Recompose if anything the output depends on changed.
    ///
    /// Returns the new composite when a pass ran.
    pub fn refresh(&mut self) -> Option<&RgbaImage> {
        let source = self.source.clone()?;

        if self.mode == Mode::Auto {
            self.regions = detect_regions(source.width, source.height);
        }

        let inputs = CompositeInputs {
            regions: self.regions_to_paint(),
            color: self.color.clone(),
            adjustments: self.adjustments,
        };
        if self.last_inputs.as_ref() == Some(&inputs) {
            return None;
        }

        self.passes += 1;
        log::debug!(
            "Composite pass {}: {} regions, color {:?}",
            self.passes,
            inputs.regions.len(),
            inputs.color
        );

        let result = compose::recompute(&source, &inputs);
        self.last_inputs = Some(inputs);
        match result {
            Ok(composite) => {
                self.composite = Some(composite);
                self.composite.as_ref()
            }
            Err(error) => {
                log::warn!("Composite aborted: {}", error);
                self.composite = None;
                None
            }
        }
    }

    // ========== Accessors ==========

    pub fn source(&self) -> Option<&Arc<SourceImage>> {
        self.source.as_ref()
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn adjustments(&self) -> &Adjustments {
        &self.adjustments
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn composite(&self) -> Option<&RgbaImage> {
        self.composite.as_ref()
    }

    /// Number of composite passes run so far
    #[cfg(test)]
    pub fn passes(&self) -> u64 {
        self.passes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::DEFAULT_COLOR;
    use image::Rgba;
    use std::path::PathBuf;

    fn image(width: u32, height: u32) -> LoadResult {
        Ok(Arc::new(SourceImage::from_rgba(RgbaImage::from_pixel(
            width,
            height,
            Rgba([120, 90, 80, 255]),
        ))))
    }

    fn loaded(width: u32, height: u32) -> Editor {
        let mut editor = Editor::new(DEFAULT_COLOR, Adjustments::default());
        let ticket = editor.begin_load();
        assert!(editor.finish_load(ticket, image(width, height)));
        editor.refresh();
        editor
    }

    #[test]
    fn test_auto_mode_stores_detected_regions() {
        let editor = loaded(1000, 800);

        assert_eq!(editor.regions(), detect_regions(1000, 800).as_slice());
        assert_eq!(editor.composite().unwrap().dimensions(), (1000, 800));
        assert_eq!(editor.passes(), 1);
    }

    #[test]
    fn test_toggle_to_manual_empties_regions() {
        let mut editor = loaded(200, 100);
        editor.toggle_mode();
        editor.refresh();

        assert_eq!(editor.mode(), Mode::Manual);
        assert!(editor.regions().is_empty());
        // Nothing drawn yet: placeholders are still painted
        assert_eq!(editor.regions_to_paint(), detect_regions(200, 100));

        editor.toggle_mode();
        editor.refresh();
        assert_eq!(editor.regions().len(), 5);
    }

    #[test]
    fn test_manual_regions_replace_placeholders() {
        let mut editor = loaded(200, 100);
        editor.toggle_mode();
        editor.add_region(Region::new(10.0, 10.0, 20.0, 20.0));
        editor.refresh();

        assert_eq!(editor.regions_to_paint(), vec![Region::new(10.0, 10.0, 20.0, 20.0)]);
        let composite = editor.composite().unwrap();
        assert_ne!(*composite.get_pixel(15, 15), Rgba([120, 90, 80, 255]));
        assert_eq!(*composite.get_pixel(45, 35), Rgba([120, 90, 80, 255]));

        editor.clear_regions();
        editor.refresh();
        assert!(editor.regions().is_empty());
    }

    #[test]
    fn test_regions_drawn_in_auto_mode_are_dropped() {
        let mut editor = loaded(200, 100);
        editor.add_region(Region::new(1.0, 1.0, 50.0, 50.0));
        assert_eq!(editor.regions().len(), 5);
    }

    #[test]
    fn test_unchanged_inputs_skip_recomposition() {
        let mut editor = loaded(64, 64);
        assert!(editor.refresh().is_none());
        assert_eq!(editor.passes(), 1);

        editor.set_color("#00CCFF");
        assert!(editor.refresh().is_some());
        assert_eq!(editor.passes(), 2);

        // Same value written again
        editor.set_color("#00CCFF");
        assert!(editor.refresh().is_none());
        assert_eq!(editor.passes(), 2);
    }

    #[test]
    fn test_new_upload_resets_adjustments_and_regions() {
        let mut editor = loaded(64, 64);
        editor.toggle_mode();
        editor.add_region(Region::new(1.0, 1.0, 10.0, 10.0));
        editor.set_adjustment(Adjustment::Opacity, 30.0);
        editor.set_color("green");

        let ticket = editor.begin_load();
        editor.finish_load(ticket, image(32, 32));

        assert!(editor.regions().is_empty());
        assert_eq!(*editor.adjustments(), Adjustments::default());
        assert_eq!(editor.color(), "green");
        assert!(editor.refresh().is_some());
    }

    #[test]
    fn test_stale_load_is_ignored() {
        let mut editor = Editor::new(DEFAULT_COLOR, Adjustments::default());
        let old = editor.begin_load();
        let new = editor.begin_load();

        assert!(editor.finish_load(new, image(50, 40)));
        assert!(!editor.finish_load(old, image(10, 10)));

        let source = editor.source().unwrap();
        assert_eq!((source.width, source.height), (50, 40));
        assert!(!editor.is_loading());
    }

    #[test]
    fn test_read_failure_is_surfaced() {
        let mut editor = Editor::new(DEFAULT_COLOR, Adjustments::default());
        let ticket = editor.begin_load();
        let error = Error::Read {
            path: PathBuf::from("hand.png"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        editor.finish_load(ticket, Err(Arc::new(error)));

        assert_eq!(editor.error(), Some("Error reading the image file"));
        assert!(editor.source().is_none());
        assert!(editor.refresh().is_none());
    }

    #[test]
    fn test_decode_failure_is_silent() {
        let mut editor = Editor::new(DEFAULT_COLOR, Adjustments::default());
        let ticket = editor.begin_load();
        let error = Error::Decode {
            path: PathBuf::from("hand.jpg"),
            source: image::load_from_memory(b"garbage").unwrap_err(),
        };
        editor.finish_load(ticket, Err(Arc::new(error)));

        assert_eq!(editor.error(), None);
        assert!(!editor.is_loading());
    }

    #[test]
    fn test_reset_adjustments_uses_configured_defaults() {
        let defaults = Adjustments::default().with(Adjustment::Opacity, 60.0);
        let mut editor = Editor::new(DEFAULT_COLOR, defaults);
        editor.set_adjustment(Adjustment::Rotation, 45.0);
        editor.reset_adjustments();

        assert_eq!(*editor.adjustments(), defaults);
    }
}
