use lazy_static::lazy_static;
use palette::PaletteCatalog;

pub mod app;
pub mod controller;
pub mod error;
pub mod info_box;
pub mod palette;
pub mod plate;
pub mod render_chart;
pub mod render_details;
pub mod render_export;
pub mod render_grid;
pub mod selection;
pub mod viewer_config;
pub mod well;

lazy_static! {
    // Fixed 20-color line palettes
    pub static ref PALETTES: PaletteCatalog = PaletteCatalog::default();
}
