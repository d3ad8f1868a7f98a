//! Dataset loading: raw JSON records in, typed wells and plate statistics out.

use crate::error::QpcrError;
use crate::well::{Reading, Well, WellKeyParser};
use serde::Serialize;
use serde_json::Value;

/// Synthetic row-header entity; one per row in `1..=num_rows`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowGroup {
    row: u32,
}

impl RowGroup {
    #[inline(always)]
    pub fn row(&self) -> u32 {
        self.row
    }
}

/// Synthetic column-header entity; one per column in `1..=num_cols`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColGroup {
    col: u32,
}

impl ColGroup {
    #[inline(always)]
    pub fn col(&self) -> u32 {
        self.col
    }
}

/// Aggregate dataset facts, reported by the CLI as JSON.
#[derive(Clone, Debug, Serialize)]
pub struct PlateSummary {
    pub wells: usize,
    pub num_rows: u32,
    pub num_cols: u32,
    pub cycle_count: u32,
    pub peak_fluorescence: f64,
}

/// The parsed dataset: all wells plus statistics computed once after load.
/// Immutable after construction, except for the per-well focus caches the
/// controller maintains.
#[derive(Clone, Debug, Default)]
pub struct Plate {
    wells: Vec<Well>,
    rows: Vec<RowGroup>,
    cols: Vec<ColGroup>,
    peak_fluorescence: f64,
    cycle_count: u32,
    num_rows: u32,
    num_cols: u32,
}

impl Plate {
    /// Builds the well collection and statistics from the decoded dataset:
    /// an object mapping well keys to arrays of reading records.
    ///
    /// A key the parser rejects fails the whole load; statistics assume
    /// complete row/col coverage, so skipping records would corrupt them.
    pub fn from_json_value(
        data: &Value,
        key_parser: &WellKeyParser,
        cycle_field: &str,
        fluorescence_field: &str,
    ) -> Result<Self, QpcrError> {
        let map = data
            .as_object()
            .ok_or_else(|| QpcrError::Load("dataset root is not a JSON object".to_string()))?;

        let mut wells = Vec::with_capacity(map.len());
        for (key, records) in map.iter() {
            let (row, col) = key_parser.parse(key)?;
            let data = Self::parse_readings(key, records, cycle_field, fluorescence_field)?;
            wells.push(Well::new(key.to_owned(), row, col, data));
        }

        Ok(Self::with_statistics(wells))
    }

    pub fn from_json_str(
        data: &str,
        key_parser: &WellKeyParser,
        cycle_field: &str,
        fluorescence_field: &str,
    ) -> Result<Self, QpcrError> {
        let value: Value = serde_json::from_str(data)?;
        Self::from_json_value(&value, key_parser, cycle_field, fluorescence_field)
    }

    /// Fetches the raw dataset from a local file path or an HTTP(S) URL.
    pub fn fetch_json(source: &str) -> Result<Value, QpcrError> {
        if source.starts_with("http://") || source.starts_with("https://") {
            let value = reqwest::blocking::get(source)?.error_for_status()?.json()?;
            Ok(value)
        } else {
            let text = std::fs::read_to_string(source)
                .map_err(|e| QpcrError::Load(format!("cannot read {source}: {e}")))?;
            Ok(serde_json::from_str(&text)?)
        }
    }

    fn parse_readings(
        key: &str,
        records: &Value,
        cycle_field: &str,
        fluorescence_field: &str,
    ) -> Result<Vec<Reading>, QpcrError> {
        let records = records.as_array().ok_or_else(|| {
            QpcrError::Load(format!("readings for {key} are not a JSON array"))
        })?;
        records
            .iter()
            .map(|record| {
                let cycle = record
                    .get(cycle_field)
                    .and_then(Value::as_u64)
                    .ok_or_else(|| {
                        QpcrError::Load(format!("{key}: missing or non-integer {cycle_field:?}"))
                    })?;
                let fluorescence = record
                    .get(fluorescence_field)
                    .and_then(Value::as_f64)
                    .ok_or_else(|| {
                        QpcrError::Load(format!(
                            "{key}: missing or non-numeric {fluorescence_field:?}"
                        ))
                    })?;
                Ok(Reading::new(cycle as u32, fluorescence))
            })
            .collect()
    }

    /// Single pass over all wells and readings for the dataset maxima, plus
    /// the ascending header lists.
    fn with_statistics(wells: Vec<Well>) -> Self {
        let mut peak_fluorescence = 0.0_f64;
        let mut cycle_count = 0_u32;
        let mut num_rows = 0_u32;
        let mut num_cols = 0_u32;
        for well in &wells {
            num_rows = num_rows.max(well.row());
            num_cols = num_cols.max(well.col());
            for reading in well.data() {
                peak_fluorescence = peak_fluorescence.max(reading.fluorescence());
                cycle_count = cycle_count.max(reading.cycle());
            }
        }

        let rows = (1..=num_rows).map(|row| RowGroup { row }).collect();
        let cols = (1..=num_cols).map(|col| ColGroup { col }).collect();

        Self {
            wells,
            rows,
            cols,
            peak_fluorescence,
            cycle_count,
            num_rows,
            num_cols,
        }
    }

    #[inline(always)]
    pub fn wells(&self) -> &[Well] {
        &self.wells
    }

    pub(crate) fn wells_mut(&mut self) -> &mut [Well] {
        &mut self.wells
    }

    pub fn well_at(&self, row: u32, col: u32) -> Option<&Well> {
        self.wells
            .iter()
            .find(|well| well.row() == row && well.col() == col)
    }

    #[inline(always)]
    pub fn rows(&self) -> &[RowGroup] {
        &self.rows
    }

    #[inline(always)]
    pub fn cols(&self) -> &[ColGroup] {
        &self.cols
    }

    #[inline(always)]
    pub fn peak_fluorescence(&self) -> f64 {
        self.peak_fluorescence
    }

    #[inline(always)]
    pub fn cycle_count(&self) -> u32 {
        self.cycle_count
    }

    #[inline(always)]
    pub fn num_rows(&self) -> u32 {
        self.num_rows
    }

    #[inline(always)]
    pub fn num_cols(&self) -> u32 {
        self.num_cols
    }

    pub fn summary(&self) -> PlateSummary {
        PlateSummary {
            wells: self.wells.len(),
            num_rows: self.num_rows,
            num_cols: self.num_cols,
            cycle_count: self.cycle_count,
            peak_fluorescence: self.peak_fluorescence,
        }
    }
}
