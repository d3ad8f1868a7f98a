//! Grid view: one marker per well plus row/column headers. Hovering a
//! marker or header drives the shared focus state; the chart and details
//! views pick the change up on their next frame.

use crate::controller::PlateController;
use crate::info_box::InfoBox;
use crate::selection::FocusTarget;
use crate::viewer_config::GridOptions;
use eframe::egui::{self, Align2, FontFamily, FontId, Pos2, Rect, Sense, Vec2};
use std::sync::{Arc, RwLock};

const HEADER_HIT_SIZE: Vec2 = Vec2::new(40.0, 18.0);

/// Marker and header positions for one frame. Index 0 on each axis is the
/// header lane; wells sit at their 1-based (row, col).
#[derive(Clone, Copy, Debug)]
struct GridLayout {
    inner: Rect,
    step_x: f32,
    step_y: f32,
    radius: f32,
    num_rows: u32,
    num_cols: u32,
}

impl GridLayout {
    fn new(inner: Rect, num_rows: u32, num_cols: u32, fixed_radius: Option<f32>) -> Self {
        let step_x = inner.width() / (num_cols + 1) as f32;
        let step_y = inner.height() / (num_rows + 1) as f32;
        let radius = fixed_radius.unwrap_or_else(|| Self::auto_radius(inner, num_rows, num_cols));
        Self {
            inner,
            step_x,
            step_y,
            radius,
            num_rows,
            num_cols,
        }
    }

    /// Largest marker radius that avoids overlap given the plate dimensions
    /// and the available drawing area.
    fn auto_radius(inner: Rect, num_rows: u32, num_cols: u32) -> f32 {
        if num_rows == 0 || num_cols == 0 {
            return 0.0;
        }
        let r_y = (inner.height() / num_rows as f32 * 0.4).floor();
        let r_x = (inner.width() / num_cols as f32 * 0.4).floor();
        r_y.min(r_x)
    }

    #[inline(always)]
    fn x(&self, index: u32) -> f32 {
        self.inner.left() + (index as f32 + 0.5) * self.step_x
    }

    #[inline(always)]
    fn y(&self, index: u32) -> f32 {
        self.inner.top() + (index as f32 + 0.5) * self.step_y
    }

    fn well_center(&self, row: u32, col: u32) -> Pos2 {
        Pos2::new(self.x(col), self.y(row))
    }

    fn row_header_pos(&self, row: u32) -> Pos2 {
        Pos2::new(self.x(0), self.y(row))
    }

    fn col_header_pos(&self, col: u32) -> Pos2 {
        Pos2::new(self.x(col), self.y(0))
    }

    /// What the pointer is over: a well circle, a header, or nothing.
    fn hit_test(&self, pos: Pos2) -> FocusTarget {
        for row in 1..=self.num_rows {
            for col in 1..=self.num_cols {
                if self.well_center(row, col).distance(pos) <= self.radius {
                    return FocusTarget::Well(row, col);
                }
            }
        }
        for row in 1..=self.num_rows {
            let rect = Rect::from_center_size(self.row_header_pos(row), HEADER_HIT_SIZE);
            if rect.contains(pos) {
                return FocusTarget::Row(row);
            }
        }
        for col in 1..=self.num_cols {
            let rect = Rect::from_center_size(self.col_header_pos(col), HEADER_HIT_SIZE);
            if rect.contains(pos) {
                return FocusTarget::Col(col);
            }
        }
        FocusTarget::All
    }
}

#[derive(Clone, Debug)]
pub struct RenderGrid {
    controller: Arc<RwLock<PlateController>>,
    options: GridOptions,
    info: Option<InfoBox>,
    hovered: FocusTarget,
}

impl RenderGrid {
    pub fn new(
        controller: Arc<RwLock<PlateController>>,
        options: GridOptions,
        info: Option<InfoBox>,
    ) -> Self {
        Self {
            controller,
            options,
            info,
            hovered: FocusTarget::All,
        }
    }

    fn tooltip_text(target: FocusTarget) -> String {
        match target {
            FocusTarget::Well(row, col) => format!("row {row}, col {col}"),
            FocusTarget::Row(row) => format!("row {row} group"),
            FocusTarget::Col(col) => format!("col {col} group"),
            FocusTarget::All => String::new(),
        }
    }

    pub fn render(&mut self, ui: &mut egui::Ui) {
        let (num_rows, num_cols, well_coords) = {
            let guard = self.controller.read().expect("controller lock poisoned");
            let Some(plate) = guard.plate() else {
                return;
            };
            let coords: Vec<(u32, u32)> = plate
                .wells()
                .iter()
                .map(|w| (w.row(), w.col()))
                .collect();
            (plate.num_rows(), plate.num_cols(), coords)
        };

        let size = Vec2::new(self.options.width, self.options.height);
        let (response, painter) = ui.allocate_painter(size, Sense::hover());
        let rect = response.rect;
        let margins = &self.options.margins;
        let inner = Rect::from_min_max(
            rect.min + Vec2::new(margins.left, margins.top),
            rect.max - Vec2::new(margins.right, margins.bottom),
        );
        let layout = GridLayout::new(inner, num_rows, num_cols, self.options.radius);

        // hover dispatch: a change of target goes straight to the controller
        let hover = response
            .hover_pos()
            .map(|pos| layout.hit_test(pos))
            .unwrap_or(FocusTarget::All);
        if hover != self.hovered {
            self.hovered = hover;
            self.controller
                .write()
                .expect("controller lock poisoned")
                .focus(hover);
        }

        let header_font = FontId {
            size: 13.0,
            family: FontFamily::Monospace,
        };

        for (row, col) in &well_coords {
            let hovered_here = hover != FocusTarget::All && hover.matches(*row, *col);
            let fill = if hovered_here {
                self.options.well_hover_color
            } else {
                self.options.well_color
            };
            painter.circle_filled(layout.well_center(*row, *col), layout.radius, fill);
        }

        for row in 1..=num_rows {
            let color = if hover == FocusTarget::Row(row) {
                self.options.header_hover_color
            } else {
                self.options.header_color
            };
            painter.text(
                layout.row_header_pos(row),
                Align2::CENTER_CENTER,
                format!("r{row}"),
                header_font.to_owned(),
                color,
            );
        }
        for col in 1..=num_cols {
            let color = if hover == FocusTarget::Col(col) {
                self.options.header_hover_color
            } else {
                self.options.header_color
            };
            painter.text(
                layout.col_header_pos(col),
                Align2::CENTER_CENTER,
                format!("c{col}"),
                header_font.to_owned(),
                color,
            );
        }

        if hover != FocusTarget::All {
            response
                .clone()
                .on_hover_text_at_pointer(Self::tooltip_text(hover));
        }

        if let Some(info) = &self.info {
            let anchor = Pos2::new(
                rect.right() - margins.right / 2.0,
                rect.top() + margins.top / 2.0,
            );
            info.show(ui, anchor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> GridLayout {
        // 600x300 drawing area, 2 rows x 3 cols
        let inner = Rect::from_min_max(Pos2::ZERO, Pos2::new(600.0, 300.0));
        GridLayout::new(inner, 2, 3, None)
    }

    #[test]
    fn test_auto_radius_is_largest_non_overlapping() {
        let l = layout();
        // floor(min(300/2, 600/3) * 0.4) = floor(min(150, 200) * 0.4) = 60
        assert_eq!(l.radius, 60.0);
    }

    #[test]
    fn test_fixed_radius_overrides_auto() {
        let inner = Rect::from_min_max(Pos2::ZERO, Pos2::new(600.0, 300.0));
        let l = GridLayout::new(inner, 2, 3, Some(12.0));
        assert_eq!(l.radius, 12.0);
    }

    #[test]
    fn test_well_positions_leave_a_header_lane() {
        let l = layout();
        // steps: x = 600/4 = 150, y = 300/3 = 100
        assert_eq!(l.well_center(1, 1), Pos2::new(225.0, 150.0));
        assert_eq!(l.well_center(2, 3), Pos2::new(525.0, 250.0));
        assert_eq!(l.row_header_pos(1), Pos2::new(75.0, 150.0));
        assert_eq!(l.col_header_pos(2), Pos2::new(375.0, 50.0));
    }

    #[test]
    fn test_hit_test_well() {
        let l = layout();
        assert_eq!(l.hit_test(Pos2::new(225.0, 150.0)), FocusTarget::Well(1, 1));
        // just outside the marker radius, between two columns
        assert_eq!(l.hit_test(Pos2::new(225.0 + 61.0, 150.0)), FocusTarget::All);
    }

    #[test]
    fn test_hit_test_headers() {
        let l = layout();
        assert_eq!(l.hit_test(Pos2::new(75.0, 150.0)), FocusTarget::Row(1));
        assert_eq!(l.hit_test(Pos2::new(375.0, 50.0)), FocusTarget::Col(2));
    }

    #[test]
    fn test_hit_test_empty_space() {
        let l = layout();
        assert_eq!(l.hit_test(Pos2::new(1.0, 1.0)), FocusTarget::All);
    }

    #[test]
    fn test_zero_plate_has_zero_radius() {
        let inner = Rect::from_min_max(Pos2::ZERO, Pos2::new(600.0, 300.0));
        let l = GridLayout::new(inner, 0, 0, None);
        assert_eq!(l.radius, 0.0);
    }

    #[test]
    fn test_tooltip_text() {
        assert_eq!(
            RenderGrid::tooltip_text(FocusTarget::Well(2, 5)),
            "row 2, col 5"
        );
        assert_eq!(RenderGrid::tooltip_text(FocusTarget::Row(2)), "row 2 group");
        assert_eq!(RenderGrid::tooltip_text(FocusTarget::Col(5)), "col 5 group");
    }
}
