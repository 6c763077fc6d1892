// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// The number of ordinal categories handled by the transformation.
pub const NUM_CATEGORIES: usize = 5;

/// The category labels, in output order.
pub const CATEGORIES: [i64; NUM_CATEGORIES] = [1, 2, 3, 4, 5];

/// One answer in a survey column.
///
/// `None` is a cell that could not be read as a whole number (blank, text, ...).
/// `Some(v)` with `v` outside of 1..=5 is kept as is: it is dropped when the
/// frequencies are counted.
pub type Observation = Option<i64>;

/// A survey question and the answers of every respondent, in row order.
#[derive(PartialEq, Debug, Clone)]
pub struct Item {
    pub name: String,
    pub observations: Vec<Observation>,
}

impl Item {
    pub fn new(name: &str, observations: &[Observation]) -> Item {
        Item {
            name: name.to_string(),
            observations: observations.to_vec(),
        }
    }

    /// Convenience constructor when all the cells are filled.
    pub fn from_values(name: &str, values: &[i64]) -> Item {
        Item {
            name: name.to_string(),
            observations: values.iter().map(|v| Some(*v)).collect(),
        }
    }

    /// The observations with the scale inverted (v -> 6 - v).
    ///
    /// A value too small to be inverted is kept as is. It is out of range either way.
    pub fn reverse_coded(&self) -> Vec<Observation> {
        self.observations
            .iter()
            .map(|o| o.map(|v| (NUM_CATEGORIES as i64 + 1).checked_sub(v).unwrap_or(v)))
            .collect()
    }
}

// ******** Output data structures *********

/// All the per-category statistics of one item.
///
/// Every array is indexed by category: index 0 is category 1.
#[derive(PartialEq, Debug, Clone)]
pub struct CategoryStats {
    /// Number of in-range observations. This is the denominator of the proportions.
    pub n: u64,
    /// Observations that were present but outside of 1..=5.
    pub excluded: u64,
    pub frequency: [u64; NUM_CATEGORIES],
    pub proportion: [f64; NUM_CATEGORIES],
    pub cumulative: [f64; NUM_CATEGORIES],
    pub midpoint: [f64; NUM_CATEGORIES],
    /// 0.5 - midpoint
    pub complement: [f64; NUM_CATEGORIES],
    pub z: [f64; NUM_CATEGORIES],
    /// z - min(z)
    pub zc: [f64; NUM_CATEGORIES],
    pub rounded: [i64; NUM_CATEGORIES],
}

impl CategoryStats {
    pub fn recode_map(&self) -> RecodeMap {
        RecodeMap {
            scores: self.rounded,
        }
    }
}

/// Maps a raw category to its rounded interval score.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct RecodeMap {
    scores: [i64; NUM_CATEGORIES],
}

impl RecodeMap {
    /// Returns None for anything that is not a category.
    pub fn get(&self, category: i64) -> Option<i64> {
        if (1..=NUM_CATEGORIES as i64).contains(&category) {
            Some(self.scores[(category - 1) as usize])
        } else {
            None
        }
    }

    pub fn recode(&self, observation: &Observation) -> Option<i64> {
        observation.and_then(|c| self.get(c))
    }
}

/// A cell of the diagnostic sheet.
#[derive(PartialEq, Debug, Clone)]
pub enum Cell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
}

/// The long-format table: one block of 9 rows per item, then 2 blank rows.
/// Every row has the same width: the label and the 5 categories.
pub type DiagnosticTable = Vec<Vec<Cell>>;

/// The respondents' answers, replaced by the rounded scores of their item.
#[derive(PartialEq, Debug, Clone)]
pub struct RecodedTable {
    pub columns: Vec<String>,
    /// One vector per column, in the same order as `columns`.
    pub values: Vec<Vec<Option<i64>>>,
}

impl RecodedTable {
    pub fn num_rows(&self) -> usize {
        self.values.iter().map(|c| c.len()).max().unwrap_or(0)
    }
}

/// The statistics for one item, as computed during a full report.
#[derive(PartialEq, Debug, Clone)]
pub struct ItemStats {
    pub name: String,
    pub reversed: bool,
    pub stats: CategoryStats,
}

#[derive(PartialEq, Debug, Clone)]
pub struct Report {
    pub diagnostic: DiagnosticTable,
    pub recoded: RecodedTable,
    pub items: Vec<ItemStats>,
}

/// Errors that prevent the transformation from completing.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum MsiError {
    /// No observation in 1..=5: the proportions are not defined.
    NoObservations,
    /// Same as NoObservations, for a named item.
    EmptyItem(String),
}

impl Error for MsiError {}

impl Display for MsiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MsiError::NoObservations => write!(f, "no observation in the range 1..5"),
            MsiError::EmptyItem(name) => {
                write!(f, "item {:?} has no observation in the range 1..5", name)
            }
        }
    }
}
