//! Contextual "i" overlays for the chart and grid views.

use eframe::egui::{self, Align2, Color32, FontFamily, FontId, Pos2, Rect, Sense, Vec2};

const INFO_RADIUS: f32 = 10.0;

/// Small hoverable marker with a title and explanatory text. The text
/// adapts to which sibling views and threshold are configured.
#[derive(Clone, Debug)]
pub struct InfoBox {
    title: String,
    content: String,
}

impl InfoBox {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    pub fn chart_info(has_threshold: bool, has_grid: bool) -> Self {
        let mut content = String::from(
            "This chart shows the fluorescence correlated to the cycle count \
             for each of the samples in the qPCR tray.",
        );
        if has_threshold {
            content.push_str(
                " The threshold value is plotted horizontally for reference, \
                 and the line can be hovered on to see the threshold value.",
            );
        }
        if has_grid {
            content.push_str(
                " Elements that are not currently in focus on the grid will \
                 be mostly transparent.",
            );
        }
        Self::new("Fluorescence vs Cycle Graph", content)
    }

    pub fn grid_info(has_chart: bool, has_details: bool, has_threshold: bool) -> Self {
        let mut content = String::from(
            "This grid shows all the wells in the qPCR tray, aligned by \
             column and row. Rows, columns, and individual wells can be \
             hovered over for more detail.",
        );
        if has_chart {
            content.push_str(" Hovered wells or groups will be emphasized in the graph.");
        }
        if has_details {
            content.push_str(
                " Hovered wells will have their exact fluorescence values \
                 displayed in the accompanying fluorescence data table.",
            );
        }
        if has_details && has_threshold {
            content.push_str(
                " The fluorescence values will be color-coded to indicate \
                 whether they are above or below the fluorescence threshold.",
            );
        }
        Self::new("qPCR Tray Grid View", content)
    }

    #[inline(always)]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[inline(always)]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Paints the marker centered on `anchor` and attaches the hover text.
    pub fn show(&self, ui: &mut egui::Ui, anchor: Pos2) {
        let rect = Rect::from_center_size(anchor, Vec2::splat(INFO_RADIUS * 2.0));
        let response = ui.interact(rect, ui.id().with(("info_box", &self.title)), Sense::hover());

        let painter = ui.painter();
        painter.circle_filled(anchor, INFO_RADIUS, Color32::from_gray(220));
        painter.text(
            anchor,
            Align2::CENTER_CENTER,
            "i",
            FontId {
                size: 16.0,
                family: FontFamily::Proportional,
            },
            Color32::BLACK,
        );

        response.on_hover_ui(|ui| {
            ui.strong(&self.title);
            ui.label(&self.content);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_info_mentions_threshold_only_when_configured() {
        assert!(InfoBox::chart_info(true, false).content().contains("threshold"));
        assert!(!InfoBox::chart_info(false, false).content().contains("threshold"));
    }

    #[test]
    fn test_grid_info_adapts_to_siblings() {
        let bare = InfoBox::grid_info(false, false, false);
        assert!(!bare.content().contains("graph"));
        assert!(!bare.content().contains("table"));

        let full = InfoBox::grid_info(true, true, true);
        assert!(full.content().contains("emphasized in the graph"));
        assert!(full.content().contains("data table"));
        assert!(full.content().contains("color-coded"));
    }
}
