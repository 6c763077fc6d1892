use log::{info, warn};
use std::collections::HashSet;

use crate::config::*;
use crate::transform;

/// Receives the progress of a report.
///
/// The default implementations do nothing, so that a sink only needs to
/// implement the notifications it cares about.
pub trait Reporter {
    fn reverse_coding(&mut self, _item: &str) {}

    /// Some observations of the item were present but not in 1..=5.
    fn excluded_values(&mut self, _item: &str, _count: u64) {}

    fn progress(&mut self, _processed: usize, _total: usize) {}
}

/// Forwards all the notifications to the `log` facade.
pub struct LogReporter;

impl Reporter for LogReporter {
    fn reverse_coding(&mut self, item: &str) {
        info!("  • Reverse-coding '{}'", item);
    }

    fn excluded_values(&mut self, item: &str, count: u64) {
        warn!(
            "  • Item '{}': {} value(s) outside of 1..5 left out of the frequencies",
            item, count
        );
    }

    fn progress(&mut self, processed: usize, total: usize) {
        info!("  • Processed {}/{} items", processed, total);
    }
}

/// Discards everything.
pub struct NoReporter;

impl Reporter for NoReporter {}

pub const LABEL_FREQUENCY: &str = "F";
pub const LABEL_PROPORTION: &str = "P=F/N";
pub const LABEL_CUMULATIVE: &str = "CP";
pub const LABEL_MIDPOINT: &str = "MID_CP";
pub const LABEL_COMPLEMENT: &str = "0.5-MID_CP";
pub const LABEL_Z: &str = "Z";
pub const LABEL_ZC: &str = "ZC";
pub const LABEL_ROUNDED: &str = "Pembulatan";

/// Width of every row of the diagnostic table.
pub const DIAGNOSTIC_WIDTH: usize = NUM_CATEGORIES + 1;

/// Rows of a block, including the header row.
pub const BLOCK_ROWS: usize = 9;

/// Blank rows after every block.
pub const BLOCK_SPACING: usize = 2;

// Progress is reported every that many items, and for the last one.
const PROGRESS_STEP: usize = 10;

/// Runs the transformation on one item, applying reverse coding if the item is flagged.
fn item_stats(
    item: &Item,
    reverse_items: &HashSet<&str>,
) -> Result<(bool, Vec<Observation>, CategoryStats), MsiError> {
    let reversed = reverse_items.contains(item.name.as_str());
    let observations = if reversed {
        item.reverse_coded()
    } else {
        item.observations.clone()
    };
    let stats = transform(&observations).map_err(|e| match e {
        MsiError::NoObservations => MsiError::EmptyItem(item.name.clone()),
        e => e,
    })?;
    Ok((reversed, observations, stats))
}

fn reverse_set(reverse_items: &[String]) -> HashSet<&str> {
    reverse_items.iter().map(|s| s.as_str()).collect()
}

fn float_row(label: &str, values: &[f64; NUM_CATEGORIES]) -> Vec<Cell> {
    let mut row = vec![Cell::Text(label.to_string())];
    row.extend(values.iter().map(|v| Cell::Float(*v)));
    row
}

fn int_row(label: &str, values: &[i64]) -> Vec<Cell> {
    let mut row = vec![Cell::Text(label.to_string())];
    row.extend(values.iter().map(|v| Cell::Int(*v)));
    row
}

/// The 9 rows describing one item, followed by the blank rows.
pub fn diagnostic_block(name: &str, stats: &CategoryStats) -> Vec<Vec<Cell>> {
    let frequency: Vec<i64> = stats.frequency.iter().map(|f| *f as i64).collect();
    let mut rows = vec![
        int_row(name, &CATEGORIES),
        int_row(LABEL_FREQUENCY, &frequency),
        float_row(LABEL_PROPORTION, &stats.proportion),
        float_row(LABEL_CUMULATIVE, &stats.cumulative),
        float_row(LABEL_MIDPOINT, &stats.midpoint),
        float_row(LABEL_COMPLEMENT, &stats.complement),
        float_row(LABEL_Z, &stats.z),
        float_row(LABEL_ZC, &stats.zc),
        int_row(LABEL_ROUNDED, &stats.rounded),
    ];
    for _ in 0..BLOCK_SPACING {
        rows.push(vec![Cell::Empty; DIAGNOSTIC_WIDTH]);
    }
    rows
}

/// Replaces every answer by the rounded score of its category.
///
/// The observations are expected to be reverse coded already if needed.
pub fn recode_column(observations: &[Observation], map: &RecodeMap) -> Vec<Option<i64>> {
    observations.iter().map(|o| map.recode(o)).collect()
}

/// Builds the long-format table with the statistics of every item, in input order.
pub fn build_diagnostic_table(
    items: &[Item],
    reverse_items: &[String],
) -> Result<DiagnosticTable, MsiError> {
    Ok(build_report(items, reverse_items, &mut NoReporter)?.diagnostic)
}

/// Builds the table of the respondents' answers mapped to their interval scores.
pub fn build_recoded_table(
    items: &[Item],
    reverse_items: &[String],
) -> Result<RecodedTable, MsiError> {
    let rev = reverse_set(reverse_items);
    let mut values: Vec<Vec<Option<i64>>> = Vec::new();
    for item in items.iter() {
        let (_, observations, stats) = item_stats(item, &rev)?;
        values.push(recode_column(&observations, &stats.recode_map()));
    }
    Ok(RecodedTable {
        columns: items.iter().map(|i| i.name.clone()).collect(),
        values,
    })
}

/// Builds both output tables and keeps the statistics of every item.
///
/// Stops at the first item that cannot be transformed: nothing is returned
/// for the other items in that case.
pub fn build_report(
    items: &[Item],
    reverse_items: &[String],
    reporter: &mut dyn Reporter,
) -> Result<Report, MsiError> {
    let rev = reverse_set(reverse_items);
    let total = items.len();
    let mut diagnostic: DiagnosticTable = Vec::with_capacity(total * (BLOCK_ROWS + BLOCK_SPACING));
    let mut values: Vec<Vec<Option<i64>>> = Vec::with_capacity(total);
    let mut all_stats: Vec<ItemStats> = Vec::with_capacity(total);

    for (idx, item) in items.iter().enumerate() {
        let (reversed, observations, stats) = item_stats(item, &rev)?;
        if reversed {
            reporter.reverse_coding(&item.name);
        }
        if stats.excluded > 0 {
            reporter.excluded_values(&item.name, stats.excluded);
        }

        diagnostic.extend(diagnostic_block(&item.name, &stats));
        values.push(recode_column(&observations, &stats.recode_map()));

        let processed = idx + 1;
        if processed % PROGRESS_STEP == 0 || processed == total {
            reporter.progress(processed, total);
        }
        all_stats.push(ItemStats {
            name: item.name.clone(),
            reversed,
            stats,
        });
    }

    Ok(Report {
        diagnostic,
        recoded: RecodedTable {
            columns: items.iter().map(|i| i.name.clone()).collect(),
            values,
        },
        items: all_stats,
    })
}
