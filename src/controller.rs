//! The controller owns the loaded plate and the shared selection state; all
//! views read from it and focus changes go through it.

use crate::error::QpcrError;
use crate::plate::Plate;
use crate::selection::FocusTarget;
use crate::viewer_config::ViewerConfig;
use crate::well::{Well, WellKeyParser};

/// One-shot load lifecycle. Views render nothing until `Ready`; a failure is
/// terminal for this controller (the embedding application retries by
/// re-instantiating).
#[derive(Clone, Debug, Default)]
pub enum LoadState {
    #[default]
    Uninitialized,
    Loading,
    Ready(Plate),
    Failed(String),
}

impl LoadState {
    #[inline(always)]
    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready(_))
    }
}

#[derive(Clone, Debug)]
pub struct PlateController {
    key_parser: WellKeyParser,
    cycle_field: String,
    fluorescence_field: String,
    threshold: Option<f64>,
    state: LoadState,
    selection: FocusTarget,
    selection_epoch: u64,
}

impl PlateController {
    pub fn from_config(config: &ViewerConfig) -> Result<Self, QpcrError> {
        config.validate()?;
        Ok(Self {
            key_parser: WellKeyParser::new(&config.key_pattern)?,
            cycle_field: config.cycle_field.clone(),
            fluorescence_field: config.fluorescence_field.clone(),
            threshold: config.threshold,
            state: LoadState::Uninitialized,
            selection: FocusTarget::All,
            selection_epoch: 0,
        })
    }

    /// Fetches and parses the dataset. Exactly one attempt: the state moves
    /// to `Ready` or `Failed` and stays there.
    pub fn load(&mut self, source: &str) -> Result<(), QpcrError> {
        self.state = LoadState::Loading;
        let parsed = Plate::fetch_json(source).and_then(|value| {
            Plate::from_json_value(
                &value,
                &self.key_parser,
                &self.cycle_field,
                &self.fluorescence_field,
            )
        });
        self.finish_load(source, parsed)
    }

    /// Same as [`load`](Self::load) for an already-decoded dataset.
    pub fn load_value(&mut self, data: &serde_json::Value) -> Result<(), QpcrError> {
        self.state = LoadState::Loading;
        let parsed = Plate::from_json_value(
            data,
            &self.key_parser,
            &self.cycle_field,
            &self.fluorescence_field,
        );
        self.finish_load("<inline>", parsed)
    }

    fn finish_load(&mut self, source: &str, parsed: Result<Plate, QpcrError>) -> Result<(), QpcrError> {
        match parsed {
            Ok(plate) => {
                log::info!(
                    "loaded {} wells ({}x{}, {} cycles) from {source}",
                    plate.wells().len(),
                    plate.num_rows(),
                    plate.num_cols(),
                    plate.cycle_count()
                );
                self.state = LoadState::Ready(plate);
                self.selection = FocusTarget::All;
                Ok(())
            }
            Err(err) => {
                log::error!("loading {source}: {err}");
                self.state = LoadState::Failed(err.to_string());
                Err(err)
            }
        }
    }

    #[inline(always)]
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn plate(&self) -> Option<&Plate> {
        match &self.state {
            LoadState::Ready(plate) => Some(plate),
            _ => None,
        }
    }

    #[inline(always)]
    pub fn threshold(&self) -> Option<f64> {
        self.threshold
    }

    #[inline(always)]
    pub fn selection(&self) -> FocusTarget {
        self.selection
    }

    /// Bumped on every selection change; views re-derive their
    /// focus-dependent visuals when it moves.
    #[inline(always)]
    pub fn selection_epoch(&self) -> u64 {
        self.selection_epoch
    }

    /// Recomputes every well's focus cache from the target. Idempotent: the
    /// same target always yields the same focus set, and only an actual
    /// change bumps the epoch. Full O(wells) scan; plates are small and
    /// focus changes arrive at hover rate.
    pub fn focus(&mut self, target: FocusTarget) {
        let changed = self.selection != target;
        self.selection = target;
        if let LoadState::Ready(plate) = &mut self.state {
            for well in plate.wells_mut() {
                well.set_focus(target.matches(well.row(), well.col()));
            }
        }
        if changed {
            self.selection_epoch += 1;
        }
    }

    /// The well the details view should show, if the current selection
    /// resolves to exactly one.
    pub fn focused_well(&self) -> Option<&Well> {
        let (row, col) = self.selection.single_well()?;
        self.plate()?.well_at(row, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ready_controller() -> PlateController {
        let mut controller =
            PlateController::from_config(&ViewerConfig::new("plate.json")).unwrap();
        controller
            .load_value(&json!({
                "r1c1": [{"cycle": 1, "fluorescence": 10.0}, {"cycle": 2, "fluorescence": 20.0}],
                "r1c2": [{"cycle": 1, "fluorescence": 11.0}, {"cycle": 2, "fluorescence": 22.0}],
                "r2c1": [{"cycle": 1, "fluorescence": 12.0}, {"cycle": 2, "fluorescence": 24.0}],
                "r2c2": [{"cycle": 1, "fluorescence": 13.0}, {"cycle": 2, "fluorescence": 500.0}]
            }))
            .unwrap();
        controller
    }

    fn focused_ids(controller: &PlateController) -> Vec<String> {
        controller
            .plate()
            .unwrap()
            .wells()
            .iter()
            .filter(|w| w.is_focused())
            .map(|w| w.id().to_string())
            .collect()
    }

    #[test]
    fn test_all_wells_start_focused() {
        let controller = ready_controller();
        assert_eq!(focused_ids(&controller).len(), 4);
    }

    #[test]
    fn test_focus_single_well() {
        let mut controller = ready_controller();
        controller.focus(FocusTarget::Well(2, 2));
        assert_eq!(focused_ids(&controller), vec!["r2c2"]);
        assert_eq!(controller.focused_well().unwrap().id(), "r2c2");
    }

    #[test]
    fn test_focus_missing_well_focuses_none() {
        let mut controller = ready_controller();
        controller.focus(FocusTarget::Well(9, 9));
        assert!(focused_ids(&controller).is_empty());
        assert!(controller.focused_well().is_none());
    }

    #[test]
    fn test_focus_by_row_ignores_column() {
        let mut controller = ready_controller();
        controller.focus(FocusTarget::Row(1));
        assert_eq!(focused_ids(&controller), vec!["r1c1", "r1c2"]);
        // row/col targets never resolve to a single well
        assert!(controller.focused_well().is_none());
    }

    #[test]
    fn test_focus_by_col() {
        let mut controller = ready_controller();
        controller.focus(FocusTarget::Col(2));
        assert_eq!(focused_ids(&controller), vec!["r1c2", "r2c2"]);
    }

    #[test]
    fn test_focus_all_restores_everything() {
        let mut controller = ready_controller();
        controller.focus(FocusTarget::Well(1, 1));
        controller.focus(FocusTarget::All);
        assert_eq!(focused_ids(&controller).len(), 4);
    }

    #[test]
    fn test_focus_is_idempotent() {
        let mut controller = ready_controller();
        controller.focus(FocusTarget::Row(2));
        let first = focused_ids(&controller);
        let epoch = controller.selection_epoch();
        controller.focus(FocusTarget::Row(2));
        assert_eq!(focused_ids(&controller), first);
        assert_eq!(controller.selection_epoch(), epoch);
    }

    #[test]
    fn test_epoch_moves_on_change() {
        let mut controller = ready_controller();
        let epoch = controller.selection_epoch();
        controller.focus(FocusTarget::Col(1));
        assert_eq!(controller.selection_epoch(), epoch + 1);
    }

    #[test]
    fn test_malformed_key_fails_the_load() {
        let mut controller =
            PlateController::from_config(&ViewerConfig::new("plate.json")).unwrap();
        let err = controller
            .load_value(&json!({"well5": [{"cycle": 1, "fluorescence": 1.0}]}))
            .unwrap_err();
        assert!(matches!(err, QpcrError::MalformedKey(_)));
        // no partial state: nothing is Ready, no statistics exist
        assert!(controller.plate().is_none());
        assert!(matches!(controller.state(), LoadState::Failed(_)));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let mut controller =
            PlateController::from_config(&ViewerConfig::new("plate.json")).unwrap();
        assert!(controller.load("/no/such/plate.json").is_err());
        assert!(matches!(controller.state(), LoadState::Failed(_)));
    }

    #[test]
    fn test_statistics_after_load() {
        let controller = ready_controller();
        let plate = controller.plate().unwrap();
        assert_eq!(plate.peak_fluorescence(), 500.0);
        assert_eq!(plate.cycle_count(), 2);
        assert_eq!(plate.num_rows(), 2);
        assert_eq!(plate.num_cols(), 2);
    }
}
