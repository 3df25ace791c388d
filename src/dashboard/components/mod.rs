//! Reusable UI components for the viewer

pub mod fields_table;
pub mod image_frame;
pub mod status_card;

pub use fields_table::render_fields_table;
pub use image_frame::{load_rgba_texture, show_image};
pub use status_card::StatusCard;
