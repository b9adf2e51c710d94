/// Raster side of the application
///
/// This module handles:
/// - Loading images from disk (loader.rs)
/// - Placeholder nail detection (detect.rs)
/// - The 2D drawing context and compositing (context.rs, compose.rs)
/// - The grayscale demo filter (grayscale.rs)
/// - PNG export (export.rs)

pub mod compose;
pub mod context;
pub mod detect;
pub mod export;
pub mod grayscale;
pub mod loader;
