/// State management module
///
/// This module handles all application state, including:
/// - Shared data structures (data.rs)
/// - Overlay adjustments (edit.rs)
/// - The nail editor model and its composite cache (editor.rs)
/// - The manual drawing state machine (selection.rs)

pub mod data;
pub mod edit;
pub mod editor;
pub mod selection;
