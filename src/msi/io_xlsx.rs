use calamine::{open_workbook, Reader, Xlsx};
use log::debug;
use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};

use crate::msi::{
    io_common::{assemble_items, cell_observation, header_name},
    *,
};

pub const DIAGNOSTIC_SHEET: &str = "Sheet1";
pub const RECODED_SHEET: &str = "Sheet2";

/// Reads the items of a survey from an Excel worksheet.
///
/// The first row holds the names of the items, the next rows the answers of each respondent.
pub fn read_excel_items(path: &str, sheet: &str) -> MsiResult<Vec<Item>> {
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let wrange = workbook
        .worksheet_range(sheet)
        .context(MissingSheetSnafu { sheet, path })?
        .context(OpeningExcelSnafu { path })?;

    let mut iter = wrange.rows();
    let header = iter.next().context(EmptyExcelSnafu { sheet, path })?;
    debug!("read_excel_items: header: {:?}", header);
    let names: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(idx, cell)| header_name(idx, cell))
        .collect();

    let mut rows: Vec<Vec<Observation>> = Vec::new();
    for (idx, row) in iter.enumerate() {
        debug!("read_excel_items: idx: {:?} row: {:?}", idx, row);
        rows.push(row.iter().map(cell_observation).collect());
    }
    Ok(assemble_items(names, rows))
}

fn write_diagnostic(ws: &mut Worksheet, table: &DiagnosticTable) -> Result<(), XlsxError> {
    for (row_idx, row) in table.iter().enumerate() {
        let r = row_idx as u32;
        for (col_idx, cell) in row.iter().enumerate() {
            let c = col_idx as u16;
            match cell {
                Cell::Empty => {}
                Cell::Text(s) => {
                    ws.write_string(r, c, s.as_str())?;
                }
                Cell::Int(i) => {
                    ws.write_number(r, c, *i as f64)?;
                }
                Cell::Float(f) => {
                    ws.write_number(r, c, *f)?;
                }
            }
        }
    }
    Ok(())
}

fn write_recoded(ws: &mut Worksheet, table: &RecodedTable) -> Result<(), XlsxError> {
    for (col_idx, name) in table.columns.iter().enumerate() {
        ws.write_string(0, col_idx as u16, name.as_str())?;
    }
    for (col_idx, column) in table.values.iter().enumerate() {
        for (row_idx, value) in column.iter().enumerate() {
            if let Some(v) = value {
                ws.write_number(row_idx as u32 + 1, col_idx as u16, *v as f64)?;
            }
        }
    }
    Ok(())
}

fn build_workbook(report: &Report) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();

    let diagnostic_ws = workbook.add_worksheet();
    diagnostic_ws.set_name(DIAGNOSTIC_SHEET)?;
    write_diagnostic(diagnostic_ws, &report.diagnostic)?;

    let recoded_ws = workbook.add_worksheet();
    recoded_ws.set_name(RECODED_SHEET)?;
    write_recoded(recoded_ws, &report.recoded)?;

    workbook.save_to_buffer()
}

/// The diagnostic table and the recoded answers as two sheets of one workbook,
/// assembled in memory. `path` is only used in the error message.
pub fn workbook_bytes(path: &str, report: &Report) -> MsiResult<Vec<u8>> {
    let contents = build_workbook(report).context(WritingExcelSnafu { path })?;
    debug!("workbook_bytes: {} bytes", contents.len());
    Ok(contents)
}
