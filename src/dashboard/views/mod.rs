//! Viewer views

pub mod results;
pub mod upload;

pub use results::render_results_view;
pub use upload::{render_upload_controls, render_upload_preview};
