use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};

use successive_intervals::*;

use crate::msi::config_reader::Settings;

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_xlsx;
mod summary;

#[derive(Debug, Snafu)]
pub enum MsiCliError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Worksheet {sheet:?} not found in {path}"))]
    MissingSheet { sheet: String, path: String },
    #[snafu(display("Worksheet {sheet:?} in {path} has no header row"))]
    EmptyExcel { sheet: String, path: String },
    #[snafu(display("Error opening file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error parsing line {lineno} of {path}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Transformation failed: {source}"))]
    Transform { source: MsiError },
    #[snafu(display("Error writing workbook {path}"))]
    WritingExcel {
        source: rust_xlsxwriter::XlsxError,
        path: String,
    },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing the JSON summary"))]
    ParsingJson { source: serde_json::Error },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type MsiResult<T> = Result<T, MsiCliError>;

fn read_items(settings: &Settings) -> MsiResult<Vec<Item>> {
    let path = settings.input_file.as_str();
    if path.to_lowercase().ends_with(".csv") {
        info!("Reading data from '{}' …", path);
        io_csv::read_csv_items(path)
    } else {
        info!(
            "Reading data from '{}' sheet '{}' …",
            path, settings.input_sheet
        );
        io_xlsx::read_excel_items(path, &settings.input_sheet)
    }
}

fn item_names_preview(items: &[Item]) -> String {
    let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
    if names.len() <= 10 {
        format!("{:?}", names)
    } else {
        format!(
            "{:?} … {:?}",
            &names[..5],
            &names[names.len() - 5..]
        )
    }
}

/// Reads the survey, runs the transformation on every item and writes the outputs.
///
/// Both output tables and the optional summary are fully built before anything is written.
pub fn run_msi(settings: &Settings) -> MsiResult<()> {
    info!(
        "Config → INPUT_FILE='{}', INPUT_SHEET='{}', OUTPUT_FILE='{}'",
        settings.input_file, settings.input_sheet, settings.output_file
    );
    if settings.reverse_items.is_empty() {
        info!("Reverse-coded items: (none)");
    } else {
        info!("Reverse-coded items: {:?}", settings.reverse_items);
    }

    let items = read_items(settings)?;
    let num_rows = items
        .iter()
        .map(|i| i.observations.len())
        .max()
        .unwrap_or(0);
    info!("Data shape: {} rows × {} columns", num_rows, items.len());
    info!(
        "Detected items ({}): {}",
        items.len(),
        item_names_preview(&items)
    );

    for name in settings.reverse_items.iter() {
        if !items.iter().any(|i| &i.name == name) {
            warn!("Reverse-coded item {:?} is not a column of the input", name);
        }
    }

    info!("Computing the statistics of every item …");
    let report =
        build_report(&items, &settings.reverse_items, &mut LogReporter).context(TransformSnafu)?;
    info!("Sheet1 built: {} rows", report.diagnostic.len());
    info!(
        "Sheet2 built: {} rows × {} columns",
        report.recoded.num_rows(),
        report.recoded.columns.len()
    );

    let summary_js = summary::build_summary_js(&report);
    debug!("summary: {:?}", summary_js);

    let workbook = io_xlsx::workbook_bytes(&settings.output_file, &report)?;
    let summary_contents = match &settings.summary_file {
        Some(summary_p) => Some((summary_p.as_str(), summary::summary_bytes(&summary_js)?)),
        None => None,
    };
    let mut outputs: Vec<(&str, &[u8])> = vec![(settings.output_file.as_str(), workbook.as_slice())];
    info!("Writing output to '{}' …", settings.output_file);
    if let Some((summary_p, contents)) = &summary_contents {
        info!("Writing summary to '{}' …", summary_p);
        outputs.push((*summary_p, contents.as_slice()));
    }
    io_common::commit_files(&outputs)?;
    info!("Done writing.");

    // The reference summary, if provided for comparison
    if let Some(reference_p) = &settings.reference_file {
        summary::check_reference(reference_p, &summary_js)?;
        info!("The statistics match the reference '{}'", reference_p);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{open_workbook, DataType, Reader, Xlsx};
    use rust_xlsxwriter::Workbook;
    use std::fs;
    use std::path::Path;

    fn path_str(p: &Path) -> String {
        p.display().to_string()
    }

    fn settings(input: &Path, output: &Path) -> Settings {
        Settings {
            input_file: path_str(input),
            input_sheet: "Sheet1".to_string(),
            output_file: path_str(output),
            reverse_items: vec![],
            summary_file: None,
            reference_file: None,
        }
    }

    fn write_input_xlsx(path: &Path, sheet: &str, header: &[&str], rows: &[Vec<Option<f64>>]) {
        let mut workbook = Workbook::new();
        let ws = workbook.add_worksheet();
        ws.set_name(sheet).unwrap();
        for (col, name) in header.iter().enumerate() {
            ws.write_string(0, col as u16, *name).unwrap();
        }
        for (idx, row) in rows.iter().enumerate() {
            for (col, v) in row.iter().enumerate() {
                if let Some(x) = v {
                    ws.write_number(idx as u32 + 1, col as u16, *x).unwrap();
                }
            }
        }
        workbook.save(path).unwrap();
    }

    fn read_sheet(path: &Path, sheet: &str) -> Vec<Vec<DataType>> {
        let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
        let range = workbook.worksheet_range(sheet).unwrap().unwrap();
        range.rows().map(|r| r.to_vec()).collect()
    }

    fn as_f64(c: &DataType) -> f64 {
        match c {
            DataType::Float(f) => *f,
            DataType::Int(i) => *i as f64,
            x => panic!("not a number: {:?}", x),
        }
    }

    // Q1 is the mixed fixture, Q2 is all 3s, Q3 is Q1 mirrored.
    fn sample_rows() -> Vec<Vec<Option<f64>>> {
        let q1 = [1, 1, 2, 3, 3, 3, 4, 5, 5, 5];
        q1.iter()
            .map(|v| {
                vec![
                    Some(*v as f64),
                    Some(3.0),
                    Some((6 - *v) as f64),
                ]
            })
            .collect()
    }

    #[test]
    fn end_to_end_excel() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("responses.xlsx");
        let output = dir.path().join("out.xlsx");
        write_input_xlsx(&input, "Sheet1", &["Q1", "Q2", "Q3"], &sample_rows());

        let mut s = settings(&input, &output);
        s.reverse_items = vec!["Q3".to_string()];
        run_msi(&s).unwrap();

        let sheet1 = read_sheet(&output, "Sheet1");
        // The trailing blank rows of the last block are not part of the range.
        assert_eq!(sheet1.len(), 3 * 11 - 2);
        assert_eq!(sheet1[0][0], DataType::String("Q1".to_string()));
        assert_eq!(as_f64(&sheet1[0][5]), 5.0);
        assert_eq!(sheet1[1][0], DataType::String("F".to_string()));
        assert_eq!(as_f64(&sheet1[1][3]), 3.0);
        assert!((as_f64(&sheet1[4][2]) - 0.25).abs() < 1e-12);
        assert_eq!(sheet1[8][0], DataType::String("Pembulatan".to_string()));
        let rounded: Vec<f64> = sheet1[8][1..].iter().map(as_f64).collect();
        assert_eq!(rounded, vec![0.0, 1.0, 1.0, 2.0, 2.0]);
        assert!(sheet1[9].iter().all(|c| *c == DataType::Empty));
        assert_eq!(sheet1[11][0], DataType::String("Q2".to_string()));
        assert_eq!(as_f64(&sheet1[17][1]), -3.9);
        assert_eq!(sheet1[22][0], DataType::String("Q3".to_string()));
        // Q3 is reverse coded: same statistics as Q1
        assert_eq!(sheet1[23], sheet1[1]);

        let sheet2 = read_sheet(&output, "Sheet2");
        assert_eq!(sheet2.len(), 11);
        assert_eq!(
            sheet2[0],
            vec![
                DataType::String("Q1".to_string()),
                DataType::String("Q2".to_string()),
                DataType::String("Q3".to_string()),
            ]
        );
        let q1: Vec<f64> = sheet2[1..].iter().map(|r| as_f64(&r[0])).collect();
        assert_eq!(q1, vec![0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 2.0]);
        assert!(sheet2[1..].iter().all(|r| as_f64(&r[1]) == 4.0));
        let q3: Vec<f64> = sheet2[1..].iter().map(|r| as_f64(&r[2])).collect();
        assert_eq!(q1, q3);
    }

    #[test]
    fn end_to_end_csv_with_summary() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("responses.csv");
        let output = dir.path().join("out.xlsx");
        let summary_p = dir.path().join("summary.json");
        fs::write(&input, "A,B\n1,5\n2,\n3,4\n4,4\n5,x\n").unwrap();

        let mut s = settings(&input, &output);
        s.summary_file = Some(path_str(&summary_p));
        run_msi(&s).unwrap();

        let sheet2 = read_sheet(&output, "Sheet2");
        assert_eq!(sheet2.len(), 6);
        // Missing and non numeric answers stay empty
        assert_eq!(sheet2[2][1], DataType::Empty);
        assert_eq!(sheet2[5][1], DataType::Empty);

        let js: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&summary_p).unwrap()).unwrap();
        assert_eq!(js["items"][0]["item"], "A");
        assert_eq!(js["items"][0]["n"], 5);
        assert_eq!(js["items"][1]["n"], 3);
        assert_eq!(js["items"][1]["frequency"], serde_json::json!([0, 0, 0, 2, 1]));

        // A second run checked against the first one
        let mut s2 = settings(&input, &dir.path().join("out2.xlsx"));
        s2.reference_file = Some(path_str(&summary_p));
        run_msi(&s2).unwrap();

        // A different reverse coding does not match anymore
        let mut s3 = settings(&input, &dir.path().join("out3.xlsx"));
        s3.reverse_items = vec!["B".to_string()];
        s3.reference_file = Some(path_str(&summary_p));
        assert!(matches!(run_msi(&s3), Err(MsiCliError::Whatever { .. })));
    }

    #[test]
    fn unwritable_summary_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("responses.csv");
        let output = dir.path().join("out.xlsx");
        fs::write(&input, "A\n1\n2\n").unwrap();
        let mut s = settings(&input, &output);
        s.summary_file = Some(path_str(&dir.path().join("missing").join("summary.json")));
        let res = run_msi(&s);
        assert!(matches!(res, Err(MsiCliError::WritingFile { .. })));
        assert!(!output.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn duplicate_headers_get_a_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("responses.csv");
        let output = dir.path().join("out.xlsx");
        fs::write(&input, "Q1,Q1\n1,1\n2,5\n").unwrap();
        let mut s = settings(&input, &output);
        s.reverse_items = vec!["Q1".to_string()];
        run_msi(&s).unwrap();
        let sheet2 = read_sheet(&output, "Sheet2");
        assert_eq!(
            sheet2[0],
            vec![
                DataType::String("Q1".to_string()),
                DataType::String("Q1.1".to_string()),
            ]
        );
        let sheet1 = read_sheet(&output, "Sheet1");
        // Only the first column is reverse coded: 1 -> 5 and 2 -> 4
        let freq: Vec<f64> = sheet1[1][1..].iter().map(as_f64).collect();
        assert_eq!(freq, vec![0.0, 0.0, 0.0, 1.0, 1.0]);
        assert_eq!(sheet1[11][0], DataType::String("Q1.1".to_string()));
        let freq: Vec<f64> = sheet1[12][1..].iter().map(as_f64).collect();
        assert_eq!(freq, vec![1.0, 0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn missing_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("responses.xlsx");
        let output = dir.path().join("out.xlsx");
        write_input_xlsx(&input, "Answers", &["Q1"], &[vec![Some(1.0)]]);
        let res = run_msi(&settings(&input, &output));
        assert!(matches!(res, Err(MsiCliError::MissingSheet { .. })));
        assert!(!output.exists());
    }

    #[test]
    fn missing_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let res = run_msi(&settings(
            &dir.path().join("nope.xlsx"),
            &dir.path().join("out.xlsx"),
        ));
        assert!(matches!(res, Err(MsiCliError::OpeningExcel { .. })));
    }

    #[test]
    fn empty_item_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("responses.xlsx");
        let output = dir.path().join("out.xlsx");
        write_input_xlsx(
            &input,
            "Sheet1",
            &["Q1", "Q2"],
            &[vec![Some(1.0), None], vec![Some(2.0), Some(9.0)]],
        );
        let res = run_msi(&settings(&input, &output));
        match res {
            Err(MsiCliError::Transform { source }) => {
                assert_eq!(source, MsiError::EmptyItem("Q2".to_string()))
            }
            x => panic!("unexpected result {:?}", x),
        }
        assert!(!output.exists());
    }
}
