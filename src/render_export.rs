//! Headless SVG export of the chart and grid views, for the CLI and for
//! embedding without a display. Shares the derivation rules (grouping
//! colors, focus opacity, threshold line, grid layout) with the live views.

use crate::PALETTES;
use crate::palette::color_to_hex;
use crate::plate::Plate;
use crate::viewer_config::{ChartOptions, GridOptions};
use eframe::egui::Color32;
use itertools::Itertools;
use svg::Document;
use svg::node::element::{Circle, Line, Polyline, Text};

const BLUR_OPACITY: f32 = 0.05;

fn axis_text(content: String, x: f32, y: f32) -> Text {
    Text::new(content)
        .set("x", x)
        .set("y", y)
        .set("font-family", "monospace")
        .set("font-size", 12)
        .set("fill", "#374151")
}

/// One polyline per well, axes, and the optional threshold reference line.
/// Unfocused wells are emitted at 5% stroke opacity, as in the live chart.
pub fn export_chart_svg(
    plate: &Plate,
    options: &ChartOptions,
    threshold: Option<f64>,
    threshold_color: Color32,
) -> String {
    let left = options.margins.left;
    let right = options.width - options.margins.right;
    let top = options.margins.top;
    let bottom = options.height - options.margins.bottom;

    let cycle_count = plate.cycle_count().max(1);
    let peak = plate.peak_fluorescence().max(f64::MIN_POSITIVE);
    let x_of = |cycle: f64| -> f32 {
        let span = (cycle_count - 1).max(1) as f64;
        left + ((cycle - 1.0) / span) as f32 * (right - left)
    };
    let y_of = |fluorescence: f64| -> f32 { bottom - (fluorescence / peak) as f32 * (bottom - top) };

    let mut doc = Document::new()
        .set("viewBox", (0, 0, options.width, options.height))
        .set("width", options.width)
        .set("height", options.height)
        .add(
            Line::new()
                .set("x1", left)
                .set("y1", bottom)
                .set("x2", right)
                .set("y2", bottom)
                .set("stroke", "black")
                .set("shape-rendering", "crispEdges"),
        )
        .add(
            Line::new()
                .set("x1", left)
                .set("y1", top)
                .set("x2", left)
                .set("y2", bottom)
                .set("stroke", "black")
                .set("shape-rendering", "crispEdges"),
        )
        .add(axis_text("1".to_string(), x_of(1.0), bottom + 16.0))
        .add(axis_text(
            format!("{cycle_count}"),
            x_of(cycle_count as f64),
            bottom + 16.0,
        ))
        .add(axis_text(format!("{peak:.1}"), 4.0, y_of(peak) + 4.0));

    if options.labels {
        doc = doc
            .add(axis_text("Cycles".to_string(), right - 50.0, bottom + 32.0))
            .add(axis_text("Fluorescence".to_string(), 4.0, top - 8.0));
    }

    let palette = PALETTES.select(&options.palette);
    for well in plate.wells() {
        let color = palette.color(options.grouping.palette_index(
            well.row(),
            well.col(),
            plate.num_cols(),
        ));
        let points = well
            .data()
            .iter()
            .map(|r| format!("{},{}", x_of(r.cycle() as f64), y_of(r.fluorescence())))
            .join(" ");
        let opacity = if well.is_focused() { 1.0 } else { BLUR_OPACITY };
        doc = doc.add(
            Polyline::new()
                .set("class", "well-line")
                .set("points", points)
                .set("stroke", color_to_hex(color))
                .set("stroke-opacity", opacity)
                .set("fill", "none"),
        );
    }

    if let Some(t) = threshold {
        doc = doc.add(
            Line::new()
                .set("class", "threshold-line")
                .set("x1", x_of(1.0))
                .set("y1", y_of(t))
                .set("x2", x_of(cycle_count as f64))
                .set("y2", y_of(t))
                .set("stroke", color_to_hex(threshold_color))
                .set("stroke-width", 3),
        );
    }

    doc.to_string()
}

/// Well circles on the ordinal grid plus row/column header texts, matching
/// the live grid layout (index 0 on each axis is the header lane).
pub fn export_grid_svg(plate: &Plate, options: &GridOptions) -> String {
    let inner_w = options.width - options.margins.horizontal();
    let inner_h = options.height - options.margins.vertical();
    let step_x = inner_w / (plate.num_cols() + 1) as f32;
    let step_y = inner_h / (plate.num_rows() + 1) as f32;
    let x_of = |index: u32| options.margins.left + (index as f32 + 0.5) * step_x;
    let y_of = |index: u32| options.margins.top + (index as f32 + 0.5) * step_y;

    let radius = options.radius.unwrap_or_else(|| {
        if plate.num_rows() == 0 || plate.num_cols() == 0 {
            return 0.0;
        }
        let r_y = (inner_h / plate.num_rows() as f32 * 0.4).floor();
        let r_x = (inner_w / plate.num_cols() as f32 * 0.4).floor();
        r_y.min(r_x)
    });

    let mut doc = Document::new()
        .set("viewBox", (0, 0, options.width, options.height))
        .set("width", options.width)
        .set("height", options.height);

    for well in plate.wells() {
        doc = doc.add(
            Circle::new()
                .set("class", "well-marker")
                .set("cx", x_of(well.col()))
                .set("cy", y_of(well.row()))
                .set("r", radius)
                .set("fill", color_to_hex(options.well_color)),
        );
    }

    for group in plate.rows() {
        doc = doc.add(
            axis_text(format!("r{}", group.row()), x_of(0), y_of(group.row()) + 4.0)
                .set("text-anchor", "middle")
                .set("fill", color_to_hex(options.header_color)),
        );
    }
    for group in plate.cols() {
        doc = doc.add(
            axis_text(format!("c{}", group.col()), x_of(group.col()), y_of(0) + 4.0)
                .set("text-anchor", "middle")
                .set("fill", color_to_hex(options.header_color)),
        );
    }

    doc.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::PlateController;
    use crate::selection::FocusTarget;
    use crate::viewer_config::ViewerConfig;
    use serde_json::json;

    fn ready_controller() -> PlateController {
        let mut controller =
            PlateController::from_config(&ViewerConfig::new("plate.json")).unwrap();
        controller
            .load_value(&json!({
                "r1c1": [{"cycle": 1, "fluorescence": 5.0}, {"cycle": 2, "fluorescence": 50.0}],
                "r1c2": [{"cycle": 1, "fluorescence": 6.0}, {"cycle": 2, "fluorescence": 80.0}],
                "r2c1": [{"cycle": 1, "fluorescence": 7.0}, {"cycle": 2, "fluorescence": 120.0}]
            }))
            .unwrap();
        controller
    }

    #[test]
    fn test_chart_export_has_one_polyline_per_well() {
        let controller = ready_controller();
        let svg = export_chart_svg(
            controller.plate().unwrap(),
            &ChartOptions::default(),
            None,
            Color32::BLACK,
        );
        assert!(svg.contains("<svg"));
        assert_eq!(svg.matches("well-line").count(), 3);
        assert!(!svg.contains("threshold-line"));
    }

    #[test]
    fn test_chart_export_draws_threshold_when_configured() {
        let controller = ready_controller();
        let svg = export_chart_svg(
            controller.plate().unwrap(),
            &ChartOptions::default(),
            Some(100.0),
            Color32::BLACK,
        );
        assert!(svg.contains("threshold-line"));
        assert!(svg.contains("stroke=\"#000000\""));
    }

    #[test]
    fn test_chart_export_blurs_unfocused_wells() {
        let mut controller = ready_controller();
        controller.focus(FocusTarget::Well(1, 1));
        let svg = export_chart_svg(
            controller.plate().unwrap(),
            &ChartOptions::default(),
            None,
            Color32::BLACK,
        );
        assert_eq!(svg.matches("stroke-opacity=\"0.05\"").count(), 2);
        assert_eq!(svg.matches("stroke-opacity=\"1\"").count(), 1);
    }

    #[test]
    fn test_grid_export_markers_and_headers() {
        let controller = ready_controller();
        let svg = export_grid_svg(controller.plate().unwrap(), &GridOptions::default());
        assert_eq!(svg.matches("well-marker").count(), 3);
        assert!(svg.contains(">r1<"));
        assert!(svg.contains(">r2<"));
        assert!(svg.contains(">c2<"));
    }
}
