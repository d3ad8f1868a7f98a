//! Details view: per-cycle fluorescence readout for the focused single well.

use crate::controller::PlateController;
use eframe::egui::{self, Color32, RichText};
use std::sync::{Arc, RwLock};

/// Threshold classification of one reading. A reading exactly at the
/// threshold counts as above (>=, not >).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ThresholdClass {
    Above,
    Below,
    Unclassified,
}

impl ThresholdClass {
    pub fn classify(fluorescence: f64, threshold: Option<f64>) -> Self {
        match threshold {
            Some(t) if fluorescence >= t => Self::Above,
            Some(_) => Self::Below,
            None => Self::Unclassified,
        }
    }

    fn text_color(self) -> Option<Color32> {
        match self {
            Self::Above => Some(Color32::RED),
            Self::Below => Some(Color32::DARK_GRAY),
            Self::Unclassified => None,
        }
    }
}

/// Table of one value column per cycle. The header row of cycle numbers is
/// static; the value row is populated only while the selection resolves to
/// exactly one well, and reverts to empty placeholders otherwise.
///
/// The value row is cached and invalidated via the controller's selection
/// epoch rather than rebuilt every frame.
#[derive(Clone, Debug)]
pub struct RenderDetails {
    controller: Arc<RwLock<PlateController>>,
    cached_epoch: Option<u64>,
    values: Vec<(String, ThresholdClass)>,
}

impl RenderDetails {
    pub fn new(controller: Arc<RwLock<PlateController>>) -> Self {
        Self {
            controller,
            cached_epoch: None,
            values: vec![],
        }
    }

    fn rebuild_values(controller: &PlateController, cycle_count: usize) -> Vec<(String, ThresholdClass)> {
        let focused = controller.focused_well();
        let threshold = controller.threshold();
        (0..cycle_count)
            .map(|slot| match focused.and_then(|well| well.data().get(slot)) {
                Some(reading) => (
                    format!("{}", reading.fluorescence()),
                    ThresholdClass::classify(reading.fluorescence(), threshold),
                ),
                None => (String::new(), ThresholdClass::Unclassified),
            })
            .collect()
    }

    pub fn render(&mut self, ui: &mut egui::Ui) {
        let cycle_count = {
            let guard = self.controller.read().expect("controller lock poisoned");
            let Some(plate) = guard.plate() else {
                return;
            };
            let cycle_count = plate.cycle_count() as usize;
            let epoch = guard.selection_epoch();
            if self.cached_epoch != Some(epoch) {
                self.values = Self::rebuild_values(&guard, cycle_count);
                self.cached_epoch = Some(epoch);
            }
            cycle_count
        };

        egui::ScrollArea::horizontal()
            .id_salt("fluor_table_scroll")
            .show(ui, |ui| {
                egui::Grid::new("fluor_table").striped(true).show(ui, |ui| {
                    ui.strong("Cycle");
                    for cycle in 1..=cycle_count {
                        ui.label(cycle.to_string());
                    }
                    ui.end_row();

                    ui.strong("Fluor");
                    for (value, class) in &self.values {
                        let mut text = RichText::new(value.as_str());
                        if let Some(color) = class.text_color() {
                            text = text.color(color);
                        }
                        ui.label(text);
                    }
                    ui.end_row();
                });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::FocusTarget;
    use crate::viewer_config::ViewerConfig;
    use serde_json::json;

    #[test]
    fn test_reading_at_threshold_is_above() {
        assert_eq!(
            ThresholdClass::classify(100.0, Some(100.0)),
            ThresholdClass::Above
        );
    }

    #[test]
    fn test_reading_just_below_threshold() {
        assert_eq!(
            ThresholdClass::classify(99.999, Some(100.0)),
            ThresholdClass::Below
        );
    }

    #[test]
    fn test_no_threshold_leaves_readings_unclassified() {
        assert_eq!(
            ThresholdClass::classify(1000.0, None),
            ThresholdClass::Unclassified
        );
    }

    #[test]
    fn test_zero_threshold_is_honored() {
        // an explicit 0.0 threshold is a real threshold
        assert_eq!(
            ThresholdClass::classify(0.0, Some(0.0)),
            ThresholdClass::Above
        );
    }

    fn ready_controller(threshold: Option<f64>) -> PlateController {
        let mut config = ViewerConfig::new("plate.json");
        config.threshold = threshold;
        let mut controller = PlateController::from_config(&config).unwrap();
        controller
            .load_value(&json!({
                "r1c1": [{"cycle": 1, "fluorescence": 40.0}, {"cycle": 2, "fluorescence": 160.0}],
                "r1c2": [{"cycle": 1, "fluorescence": 10.0}, {"cycle": 2, "fluorescence": 20.0}]
            }))
            .unwrap();
        controller
    }

    #[test]
    fn test_values_for_a_single_focused_well() {
        let mut controller = ready_controller(Some(100.0));
        controller.focus(FocusTarget::Well(1, 1));
        let values = RenderDetails::rebuild_values(&controller, 2);
        assert_eq!(
            values,
            vec![
                ("40".to_string(), ThresholdClass::Below),
                ("160".to_string(), ThresholdClass::Above)
            ]
        );
    }

    #[test]
    fn test_group_targets_clear_the_value_row() {
        let mut controller = ready_controller(Some(100.0));
        controller.focus(FocusTarget::Row(1));
        let values = RenderDetails::rebuild_values(&controller, 2);
        assert!(values.iter().all(|(text, class)| {
            text.is_empty() && *class == ThresholdClass::Unclassified
        }));
    }

    #[test]
    fn test_hover_leave_clears_the_value_row() {
        let mut controller = ready_controller(None);
        controller.focus(FocusTarget::Well(1, 2));
        controller.focus(FocusTarget::All);
        let values = RenderDetails::rebuild_values(&controller, 2);
        assert!(values.iter().all(|(text, _)| text.is_empty()));
    }
}
