/// UI components
///
/// - canvas.rs - manual-mode selection overlay and display-to-image mapping
/// - grayscale.rs - the standalone grayscale demo panel

pub mod canvas;
pub mod grayscale;
