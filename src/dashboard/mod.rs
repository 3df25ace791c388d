//! Desktop viewer
//!
//! Load a card photograph, run the OCR pipeline and inspect the detected
//! regions, the extracted fields and the raw transcript.

pub mod app;
pub mod components;
pub mod state;
pub mod theme;
pub mod views;

pub use app::{run_viewer, ViewerApp};
