//! Chart view: one fluorescence-vs-cycle line per well, with focus-derived
//! opacity and an optional threshold reference line.

use crate::PALETTES;
use crate::controller::PlateController;
use crate::info_box::InfoBox;
use crate::viewer_config::ChartOptions;
use eframe::egui::{self, Color32, Vec2};
use egui_plot::{HLine, Line, Plot, PlotPoints};
use std::sync::{Arc, RwLock};

/// Unfocused lines stay in the plot at 5% opacity so the axes and scale do
/// not jump while hovering.
const BLUR_ALPHA: u8 = 13;
const THRESHOLD_STROKE_WIDTH: f32 = 3.0;

/// One plotted line, bound to its well at construction. Points are computed
/// once; only the stroke color varies per frame.
#[derive(Clone, Debug)]
struct ChartLine {
    id: String,
    points: Vec<[f64; 2]>,
    color: Color32,
}

#[derive(Clone, Debug)]
pub struct RenderChart {
    controller: Arc<RwLock<PlateController>>,
    options: ChartOptions,
    threshold_color: Color32,
    info: Option<InfoBox>,
    lines: Vec<ChartLine>,
}

impl RenderChart {
    /// Built after the controller reaches `Ready`; the line set and colors
    /// are fixed for the lifetime of the view.
    pub fn new(
        controller: Arc<RwLock<PlateController>>,
        options: ChartOptions,
        threshold_color: Color32,
        info: Option<InfoBox>,
    ) -> Self {
        let lines = {
            let guard = controller.read().expect("controller lock poisoned");
            let palette = PALETTES.select(&options.palette);
            match guard.plate() {
                Some(plate) => plate
                    .wells()
                    .iter()
                    .map(|well| ChartLine {
                        id: well.id().to_owned(),
                        points: well
                            .data()
                            .iter()
                            .map(|r| [r.cycle() as f64, r.fluorescence()])
                            .collect(),
                        color: palette.color(options.grouping.palette_index(
                            well.row(),
                            well.col(),
                            plate.num_cols(),
                        )),
                    })
                    .collect(),
                None => vec![],
            }
        };
        Self {
            controller,
            options,
            threshold_color,
            info,
            lines,
        }
    }

    fn stroke_color(base: Color32, focused: bool) -> Color32 {
        if focused {
            base
        } else {
            Color32::from_rgba_unmultiplied(base.r(), base.g(), base.b(), BLUR_ALPHA)
        }
    }

    pub fn render(&mut self, ui: &mut egui::Ui) {
        let (cycle_count, peak_fluorescence, threshold, focus_flags) = {
            let guard = self.controller.read().expect("controller lock poisoned");
            let Some(plate) = guard.plate() else {
                return;
            };
            let flags: Vec<bool> = plate.wells().iter().map(|w| w.is_focused()).collect();
            (
                plate.cycle_count(),
                plate.peak_fluorescence(),
                guard.threshold(),
                flags,
            )
        };

        let mut plot = Plot::new("fluor_chart")
            .width(self.options.width)
            .height(self.options.height)
            .include_x(1.0)
            .include_x(cycle_count as f64)
            .include_y(0.0)
            .include_y(peak_fluorescence)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false);
        if self.options.labels {
            plot = plot.x_axis_label("Cycles").y_axis_label("Fluorescence");
        }

        let threshold_color = self.threshold_color;
        let lines = &self.lines;
        let response = plot.show(ui, |plot_ui| {
            for (line, focused) in lines.iter().zip(focus_flags.iter().copied()) {
                plot_ui.line(
                    Line::new(line.id.clone(), PlotPoints::from(line.points.clone()))
                        .color(Self::stroke_color(line.color, focused)),
                );
            }
            if let Some(t) = threshold {
                plot_ui.hline(
                    HLine::new("threshold", t)
                        .color(threshold_color)
                        .width(THRESHOLD_STROKE_WIDTH),
                );
            }
            plot_ui.pointer_coordinate()
        });

        // hovering near the reference line reveals the configured value
        if let (Some(t), Some(pointer)) = (threshold, response.inner) {
            let tolerance = peak_fluorescence.max(1.0) * 0.02;
            if (pointer.y - t).abs() <= tolerance {
                response
                    .response
                    .clone()
                    .on_hover_text_at_pointer(format!(
                        "The fluorescence threshold is set at {t}"
                    ));
            }
        }

        if let Some(info) = &self.info {
            let anchor = response.response.rect.right_top() + Vec2::new(-16.0, 16.0);
            info.show(ui, anchor);
        }
    }
}
