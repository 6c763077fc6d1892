use std::collections::HashMap;
use std::fs;

use calamine::DataType;
use log::warn;
use snafu::prelude::*;
use successive_intervals::{Item, Observation};

use crate::msi::{MsiResult, WritingFileSnafu};

/// Name of a column without a header, following the spreadsheet conventions.
pub fn unnamed_column(idx: usize) -> String {
    format!("Unnamed: {}", idx)
}

fn integral(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 {
        Some(f as i64)
    } else {
        None
    }
}

/// Reads an answer from an Excel cell. Anything that is not a whole number is a missing answer.
pub fn cell_observation(cell: &DataType) -> Observation {
    match cell {
        DataType::Int(i) => Some(*i),
        DataType::Float(f) => integral(*f),
        _ => None,
    }
}

/// Reads an answer from a text field.
pub fn parse_observation(s: &str) -> Observation {
    let s = s.trim();
    s.parse::<i64>()
        .ok()
        .or_else(|| s.parse::<f64>().ok().and_then(integral))
}

pub fn header_name(idx: usize, cell: &DataType) -> String {
    match cell {
        DataType::String(s) if !s.trim().is_empty() => s.clone(),
        DataType::Int(i) => i.to_string(),
        DataType::Float(f) => match integral(*f) {
            Some(i) => i.to_string(),
            None => f.to_string(),
        },
        DataType::Bool(b) => b.to_string(),
        _ => unnamed_column(idx),
    }
}

/// Renames the repeated column names: the second `Q1` becomes `Q1.1`, the third `Q1.2`
/// and so on, skipping the names that are already taken.
pub fn dedup_names(names: Vec<String>) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut res: Vec<String> = Vec::with_capacity(names.len());
    for name in names.into_iter() {
        let mut col = name.clone();
        let mut cur_count = counts.get(&col).cloned().unwrap_or(0);
        while cur_count > 0 {
            counts.insert(col.clone(), cur_count + 1);
            col = format!("{}.{}", col, cur_count);
            cur_count = counts.get(&col).cloned().unwrap_or(0);
        }
        if col != name {
            warn!("Duplicate column {:?} renamed to {:?}", name, col);
        }
        counts.insert(col.clone(), cur_count + 1);
        res.push(col);
    }
    res
}

/// Assembles the columns of a table read row by row.
/// Rows shorter than the header are padded with missing answers.
pub fn assemble_items(names: Vec<String>, rows: Vec<Vec<Observation>>) -> Vec<Item> {
    let mut columns: Vec<Vec<Observation>> = vec![Vec::with_capacity(rows.len()); names.len()];
    for row in rows.iter() {
        for (idx, col) in columns.iter_mut().enumerate() {
            col.push(row.get(idx).cloned().flatten());
        }
    }
    dedup_names(names)
        .into_iter()
        .zip(columns)
        .map(|(name, observations)| Item { name, observations })
        .collect()
}

fn discard(tmp_paths: &[String]) {
    for p in tmp_paths.iter() {
        if let Err(e) = fs::remove_file(p) {
            warn!("Could not remove the temporary file {:?}: {}", p, e);
        }
    }
}

/// Writes all the files, or none of them if writing any of the contents fails.
///
/// Every content goes first to a temporary file next to its target. The temporary
/// files are renamed once they are all written, and removed if anything fails.
pub fn commit_files(files: &[(&str, &[u8])]) -> MsiResult<()> {
    let mut staged: Vec<String> = Vec::with_capacity(files.len());
    for (path, contents) in files.iter() {
        let tmp_path = format!("{}.tmp", path);
        if let Err(e) = fs::write(&tmp_path, contents) {
            discard(&staged);
            return Err(e).context(WritingFileSnafu { path: tmp_path });
        }
        staged.push(tmp_path);
    }
    for (idx, ((path, _), tmp_path)) in files.iter().zip(staged.iter()).enumerate() {
        if let Err(e) = fs::rename(tmp_path, path) {
            discard(&staged[idx..]);
            return Err(e).context(WritingFileSnafu { path: *path });
        }
    }
    Ok(())
}
