//! Fixed 20-color line palettes and the grouping rule that buckets wells
//! into them.

use eframe::egui::Color32;
use std::collections::HashMap;

/// Palette bucket count. Plates with more than 20 rows/cols/cells alias
/// colors; known limitation of the fixed palettes.
pub const PALETTE_SIZE: usize = 20;

/// How chart lines are colored: by the well's row, column, or cell ordinal.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LineGrouping {
    #[default]
    Row,
    Col,
    Cell,
}

impl LineGrouping {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Row => "row",
            Self::Col => "col",
            Self::Cell => "cell",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        let norm = text.trim().to_ascii_lowercase();
        match norm.as_str() {
            "row" => Some(Self::Row),
            "col" | "column" => Some(Self::Col),
            "cell" | "none" => Some(Self::Cell),
            _ => None,
        }
    }

    /// Palette bucket for a well, mod [`PALETTE_SIZE`].
    pub fn palette_index(self, row: u32, col: u32, num_cols: u32) -> usize {
        let key = match self {
            Self::Row => row as usize,
            Self::Col => col as usize,
            Self::Cell => ((row as usize - 1) * num_cols as usize) + col as usize,
        };
        key % PALETTE_SIZE
    }
}

#[derive(Clone, Debug)]
pub struct Palette {
    name: String,
    colors: Vec<Color32>,
}

impl Palette {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self, index: usize) -> Color32 {
        self.colors[index % self.colors.len()]
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct PaletteCatalog {
    palettes: HashMap<String, Palette>,
}

impl PaletteCatalog {
    pub fn from_json_str(data: &str) -> Self {
        let res: serde_json::Value = serde_json::from_str(data).expect("Invalid palette JSON");
        let map = res.as_object().expect("Palette JSON is not an object");
        let mut palettes = HashMap::new();
        for (name, entries) in map.iter() {
            let colors = entries
                .as_array()
                .expect("Palette entry is not an array")
                .iter()
                .filter_map(|v| v.as_str())
                .filter_map(parse_hex_color)
                .collect::<Vec<_>>();
            palettes.insert(
                name.to_owned(),
                Palette {
                    name: name.to_owned(),
                    colors,
                },
            );
        }
        Self { palettes }
    }

    pub fn get(&self, name: &str) -> Option<&Palette> {
        self.palettes.get(name)
    }

    pub fn names_sorted(&self) -> Vec<String> {
        let mut names = self.palettes.keys().cloned().collect::<Vec<_>>();
        names.sort_unstable();
        names
    }

    /// Resolves a palette selector, accepting short aliases ("a"/"1",
    /// "b"/"2", "c"/"3") as well as catalog names. Unknown selectors fall
    /// back to "category20".
    pub fn select(&self, selector: &str) -> &Palette {
        let name = match selector.trim().to_ascii_lowercase().as_str() {
            "b" | "2" | "category20b" => "category20b",
            "c" | "3" | "category20c" => "category20c",
            _ => "category20",
        };
        self.palettes
            .get(name)
            .expect("built-in palette catalog is complete")
    }
}

impl Default for PaletteCatalog {
    fn default() -> Self {
        default_palettes()
    }
}

pub fn default_palettes() -> PaletteCatalog {
    PaletteCatalog::from_json_str(include_str!("../assets/palettes.json"))
}

fn parse_hex_color(text: &str) -> Option<Color32> {
    let hex = text.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color32::from_rgb(r, g, b))
}

/// Hex form for SVG attributes; alpha is emitted separately as opacity.
pub fn color_to_hex(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}
