//! Construction-time configuration for the viewer and its three views.

use crate::error::QpcrError;
use crate::palette::LineGrouping;
use crate::well::{DEFAULT_KEY_PATTERN, WellKeyParser};
use eframe::egui::Color32;

pub const DEFAULT_CYCLE_FIELD: &str = "cycle";
pub const DEFAULT_FLUORESCENCE_FIELD: &str = "fluorescence";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    #[inline(always)]
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    #[inline(always)]
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 50.0,
            right: 50.0,
            bottom: 50.0,
            left: 50.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ChartOptions {
    pub width: f32,
    pub height: f32,
    pub margins: Margins,
    pub grouping: LineGrouping,
    /// Axis captions ("Cycles" / "Fluorescence").
    pub labels: bool,
    /// Palette selector; accepts catalog names or the short aliases.
    pub palette: String,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 700.0,
            height: 300.0,
            margins: Margins::default(),
            grouping: LineGrouping::default(),
            labels: true,
            palette: "category20".to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct GridOptions {
    pub width: f32,
    pub height: f32,
    pub margins: Margins,
    /// Fixed marker radius; when `None` the largest non-overlapping radius
    /// is computed at draw time from the plate dimensions.
    pub radius: Option<f32>,
    pub well_color: Color32,
    pub well_hover_color: Color32,
    pub header_color: Color32,
    pub header_hover_color: Color32,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            width: 700.0,
            height: 400.0,
            margins: Margins::default(),
            radius: None,
            well_color: Color32::from_rgb(173, 216, 230),
            well_hover_color: Color32::BLUE,
            header_color: Color32::BLACK,
            header_hover_color: Color32::from_rgb(255, 165, 0),
        }
    }
}

/// Everything the viewer needs at construction. One dataset, one optional
/// threshold, and per-view presence plus options.
#[derive(Clone, Debug)]
pub struct ViewerConfig {
    /// File path or HTTP(S) URL of the dataset (required).
    pub data_source: String,
    pub key_pattern: String,
    pub cycle_field: String,
    pub fluorescence_field: String,
    pub threshold: Option<f64>,
    pub threshold_color: Color32,
    pub chart: Option<ChartOptions>,
    pub grid: Option<GridOptions>,
    pub details: bool,
    /// Contextual help overlays on the chart and grid.
    pub info: bool,
}

impl ViewerConfig {
    /// All three views enabled with their defaults.
    pub fn new(data_source: impl Into<String>) -> Self {
        Self {
            data_source: data_source.into(),
            key_pattern: DEFAULT_KEY_PATTERN.to_string(),
            cycle_field: DEFAULT_CYCLE_FIELD.to_string(),
            fluorescence_field: DEFAULT_FLUORESCENCE_FIELD.to_string(),
            threshold: None,
            threshold_color: Color32::BLACK,
            chart: Some(ChartOptions::default()),
            grid: Some(GridOptions::default()),
            details: true,
            info: false,
        }
    }

    /// Rejects configurations the views cannot render from: empty source or
    /// field names, a non-compiling key pattern, non-positive dimensions or
    /// radius, negative margins, margins that leave no drawing area.
    pub fn validate(&self) -> Result<(), QpcrError> {
        if self.data_source.trim().is_empty() {
            return Err(QpcrError::Configuration("data source is empty".to_string()));
        }
        if self.cycle_field.is_empty() || self.fluorescence_field.is_empty() {
            return Err(QpcrError::Configuration(
                "cycle/fluorescence field names must be non-empty".to_string(),
            ));
        }
        WellKeyParser::new(&self.key_pattern)?;

        if let Some(chart) = &self.chart {
            Self::validate_area("chart", chart.width, chart.height, &chart.margins)?;
        }
        if let Some(grid) = &self.grid {
            Self::validate_area("grid", grid.width, grid.height, &grid.margins)?;
            if let Some(radius) = grid.radius {
                if radius <= 0.0 {
                    return Err(QpcrError::Configuration(format!(
                        "grid marker radius must be positive, got {radius}"
                    )));
                }
            }
        }
        Ok(())
    }

    fn validate_area(
        view: &str,
        width: f32,
        height: f32,
        margins: &Margins,
    ) -> Result<(), QpcrError> {
        if width <= 0.0 || height <= 0.0 {
            return Err(QpcrError::Configuration(format!(
                "{view} dimensions must be positive, got {width}x{height}"
            )));
        }
        if margins.top < 0.0 || margins.right < 0.0 || margins.bottom < 0.0 || margins.left < 0.0 {
            return Err(QpcrError::Configuration(format!(
                "{view} margins must be non-negative"
            )));
        }
        if margins.horizontal() >= width || margins.vertical() >= height {
            return Err(QpcrError::Configuration(format!(
                "{view} margins leave no drawing area"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = ViewerConfig::new("plate.json");
        let chart = config.chart.as_ref().unwrap();
        let grid = config.grid.as_ref().unwrap();
        assert_eq!((chart.width, chart.height), (700.0, 300.0));
        assert_eq!((grid.width, grid.height), (700.0, 400.0));
        assert_eq!(chart.margins.top, 50.0);
        assert_eq!(config.cycle_field, "cycle");
        assert_eq!(config.fluorescence_field, "fluorescence");
        assert!(chart.labels);
        assert!(config.details);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_dimensions() {
        let mut config = ViewerConfig::new("plate.json");
        config.chart.as_mut().unwrap().width = 0.0;
        assert!(matches!(
            config.validate(),
            Err(QpcrError::Configuration(_))
        ));
    }

    #[test]
    fn test_rejects_margins_without_drawing_area() {
        let mut config = ViewerConfig::new("plate.json");
        config.grid.as_mut().unwrap().margins.left = 400.0;
        config.grid.as_mut().unwrap().margins.right = 400.0;
        assert!(matches!(
            config.validate(),
            Err(QpcrError::Configuration(_))
        ));
    }

    #[test]
    fn test_rejects_bad_key_pattern() {
        let mut config = ViewerConfig::new("plate.json");
        config.key_pattern = "(\\d+".to_string();
        assert!(matches!(
            config.validate(),
            Err(QpcrError::Configuration(_))
        ));
    }

    #[test]
    fn test_rejects_zero_radius() {
        let mut config = ViewerConfig::new("plate.json");
        config.grid.as_mut().unwrap().radius = Some(0.0);
        assert!(matches!(
            config.validate(),
            Err(QpcrError::Configuration(_))
        ));
    }
}
