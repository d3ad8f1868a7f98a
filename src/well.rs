//! Wells and their per-cycle readings, plus the key pattern that maps raw
//! record keys onto plate coordinates.

use crate::error::QpcrError;
use regex::Regex;
use serde::Serialize;

/// Default pattern for well keys of the form "r<row>...c<col>", e.g. "r1c12"
/// or "row 3 col 4".
pub const DEFAULT_KEY_PATTERN: &str = r"^r.*?(\d+).*?c.*?(\d+)$";

/// One fluorescence measurement at one amplification cycle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Reading {
    cycle: u32,
    fluorescence: f64,
}

impl Reading {
    pub fn new(cycle: u32, fluorescence: f64) -> Self {
        Self {
            cycle,
            fluorescence,
        }
    }

    #[inline(always)]
    pub fn cycle(&self) -> u32 {
        self.cycle
    }

    #[inline(always)]
    pub fn fluorescence(&self) -> f64 {
        self.fluorescence
    }
}

/// One sample position on the plate, with its ordered reading series.
///
/// The `focus` flag is a cache derived from the current [`FocusTarget`]
/// (recomputed by the controller on every focus change); it is never
/// authoritative state of its own.
///
/// [`FocusTarget`]: crate::selection::FocusTarget
#[derive(Clone, Debug, Serialize)]
pub struct Well {
    id: String,
    row: u32,
    col: u32,
    data: Vec<Reading>,
    focus: bool,
}

impl Well {
    pub fn new(id: String, row: u32, col: u32, data: Vec<Reading>) -> Self {
        Self {
            id,
            row,
            col,
            data,
            focus: true,
        }
    }

    #[inline(always)]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline(always)]
    pub fn row(&self) -> u32 {
        self.row
    }

    #[inline(always)]
    pub fn col(&self) -> u32 {
        self.col
    }

    #[inline(always)]
    pub fn data(&self) -> &[Reading] {
        &self.data
    }

    #[inline(always)]
    pub fn is_focused(&self) -> bool {
        self.focus
    }

    pub(crate) fn set_focus(&mut self, focus: bool) {
        self.focus = focus;
    }
}

/// Extracts (row, col) from a well key string via a two-capture-group regex.
#[derive(Clone, Debug)]
pub struct WellKeyParser {
    regex: Regex,
}

impl WellKeyParser {
    pub fn new(pattern: &str) -> Result<Self, QpcrError> {
        let regex = Regex::new(pattern).map_err(|e| {
            QpcrError::Configuration(format!("key pattern {pattern:?} does not compile: {e}"))
        })?;
        if regex.captures_len() < 3 {
            return Err(QpcrError::Configuration(format!(
                "key pattern {pattern:?} needs two capture groups (row, col)"
            )));
        }
        Ok(Self { regex })
    }

    /// A key that does not match, or whose captures are not positive
    /// integers, is malformed and aborts the whole load.
    pub fn parse(&self, key: &str) -> Result<(u32, u32), QpcrError> {
        let captures = self
            .regex
            .captures(key)
            .ok_or_else(|| QpcrError::MalformedKey(key.to_string()))?;
        let row = Self::capture_as_u32(&captures, 1, key)?;
        let col = Self::capture_as_u32(&captures, 2, key)?;
        if row == 0 || col == 0 {
            return Err(QpcrError::MalformedKey(key.to_string()));
        }
        Ok((row, col))
    }

    fn capture_as_u32(
        captures: &regex::Captures,
        group: usize,
        key: &str,
    ) -> Result<u32, QpcrError> {
        captures
            .get(group)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .ok_or_else(|| QpcrError::MalformedKey(key.to_string()))
    }
}

impl Default for WellKeyParser {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_PATTERN).expect("default key pattern is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pattern_parses_plain_keys() {
        let parser = WellKeyParser::default();
        assert_eq!(parser.parse("r1c1").unwrap(), (1, 1));
        assert_eq!(parser.parse("r12c8").unwrap(), (12, 8));
    }

    #[test]
    fn test_default_pattern_tolerates_decoration() {
        let parser = WellKeyParser::default();
        assert_eq!(parser.parse("row 3 col 4").unwrap(), (3, 4));
        assert_eq!(parser.parse("r_07_c_11").unwrap(), (7, 11));
    }

    #[test]
    fn test_malformed_key_is_rejected() {
        let parser = WellKeyParser::default();
        assert!(matches!(
            parser.parse("well5"),
            Err(QpcrError::MalformedKey(_))
        ));
        assert!(matches!(
            parser.parse("c2r1"),
            Err(QpcrError::MalformedKey(_))
        ));
    }

    #[test]
    fn test_zero_coordinates_are_malformed() {
        let parser = WellKeyParser::default();
        assert!(matches!(
            parser.parse("r0c1"),
            Err(QpcrError::MalformedKey(_))
        ));
    }

    #[test]
    fn test_custom_pattern() {
        let parser = WellKeyParser::new(r"^well_(\d+)_(\d+)$").unwrap();
        assert_eq!(parser.parse("well_2_9").unwrap(), (2, 9));
    }

    #[test]
    fn test_pattern_without_groups_is_a_config_error() {
        assert!(matches!(
            WellKeyParser::new(r"^rc$"),
            Err(QpcrError::Configuration(_))
        ));
        assert!(matches!(
            WellKeyParser::new(r"(\d+"),
            Err(QpcrError::Configuration(_))
        ));
    }
}
