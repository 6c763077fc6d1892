// Primitives for reading CSV files.

use log::debug;

use crate::msi::{
    io_common::{assemble_items, parse_observation, unnamed_column},
    *,
};

/// Reads the items of a survey from a CSV file with a header row.
pub fn read_csv_items(path: &str) -> MsiResult<Vec<Item>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;

    let names: Vec<String> = rdr
        .headers()
        .context(CsvLineParseSnafu { path, lineno: 1usize })?
        .iter()
        .enumerate()
        .map(|(idx, s)| {
            if s.trim().is_empty() {
                unnamed_column(idx)
            } else {
                s.to_string()
            }
        })
        .collect();
    debug!("read_csv_items: header: {:?}", names);

    let mut rows: Vec<Vec<Observation>> = Vec::new();
    for (idx, line_r) in rdr.records().enumerate() {
        // The header is on the first line
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { path, lineno })?;
        debug!("read_csv_items: lineno: {:?} row: {:?}", lineno, line);
        rows.push(line.iter().map(parse_observation).collect());
    }
    Ok(assemble_items(names, rows))
}
