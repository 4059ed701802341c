use std::collections::{HashMap, HashSet};
use std::io::Cursor;

use anyhow::{bail, Context, Result};
use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};

use super::model::{CellValue, Column, ColumnType, FileFormat, Table, UploadedFile};
use crate::error::SweepError;

/// Strings read as missing values (the Pandas default set, minus the
/// exotic ones nobody writes by hand).
const MISSING_MARKERS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "#N/A", "<NA>",
];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Decode an uploaded file into a [`Table`].  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row followed by data rows
/// * `.xlsx` – first worksheet, first row is the header
pub fn load(file: &UploadedFile) -> Result<Table, SweepError> {
    let decoded = match file.format() {
        FileFormat::Csv => decode_csv(file.bytes()),
        FileFormat::Xlsx => decode_xlsx(file.bytes()),
        FileFormat::Unsupported(ext) => {
            log::warn!("Skipping {}: unsupported extension '.{ext}'", file.name());
            return Err(SweepError::UnsupportedFormat {
                file: file.name().to_string(),
                extension: ext.clone(),
            });
        }
    };

    match decoded {
        Ok(table) => {
            log::info!(
                "Loaded {} with {} rows and columns {:?}",
                file.name(),
                table.n_rows(),
                table.column_names()
            );
            Ok(table)
        }
        Err(e) => {
            log::error!("Failed to decode {}: {e:#}", file.name());
            Err(SweepError::decode(file.name(), e))
        }
    }
}

// ---------------------------------------------------------------------------
// CSV decoder
// ---------------------------------------------------------------------------

/// CSV layout: one header row with column names, then equally wide records.
/// Column types are inferred from the raw text of each column.
fn decode_csv(bytes: &[u8]) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    if headers.is_empty() || (headers.len() == 1 && headers[0].is_empty()) {
        bail!("No columns to parse from file");
    }

    let mut raw: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {}", row_no + 1))?;
        for (col, field) in raw.iter_mut().zip(record.iter()) {
            col.push(field.to_string());
        }
    }

    let columns = unique_headers(headers)
        .into_iter()
        .zip(raw)
        .map(|(name, values)| column_from_text(name, values))
        .collect();
    Table::new(columns)
}

/// Type a column of raw CSV fields.
///
/// Mixed columns keep the original text rather than the re-rendered
/// numbers, so `007` next to `abc` stays `007`.
fn column_from_text(name: String, raw: Vec<String>) -> Column {
    let cells: Vec<CellValue> = raw.iter().map(|s| guess_cell(s)).collect();
    if ColumnType::infer(&cells) != ColumnType::Text {
        return Column::from_cells(name, cells);
    }
    let values = raw
        .into_iter()
        .zip(cells)
        .map(|(text, cell)| match cell {
            CellValue::Null => CellValue::Null,
            _ => CellValue::Text(text),
        })
        .collect();
    Column {
        name,
        dtype: ColumnType::Text,
        values,
    }
}

fn guess_cell(s: &str) -> CellValue {
    if is_missing(s) {
        return CellValue::Null;
    }
    let t = s.trim();
    if let Ok(i) = t.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = t.parse::<f64>() {
        // `NAN`, `Nan` and friends
        return if f.is_nan() {
            CellValue::Null
        } else {
            CellValue::Float(f)
        };
    }
    match t {
        "true" | "True" | "TRUE" => CellValue::Bool(true),
        "false" | "False" | "FALSE" => CellValue::Bool(false),
        _ => CellValue::Text(s.to_string()),
    }
}

/// Markers match exactly; a field of blanks is text.
fn is_missing(s: &str) -> bool {
    MISSING_MARKERS.contains(&s)
}

// ---------------------------------------------------------------------------
// XLSX decoder
// ---------------------------------------------------------------------------

/// Read the first worksheet of a workbook. The first row is the header;
/// integral numbers come back as integers, dates as ISO-8601 text.
fn decode_xlsx(bytes: &[u8]) -> Result<Table> {
    let mut workbook: Xlsx<_> =
        open_workbook_from_rs(Cursor::new(bytes)).context("opening workbook")?;
    let range = workbook
        .worksheet_range_at(0)
        .context("workbook has no worksheets")?
        .context("reading first worksheet")?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        bail!("No columns to parse from file");
    };
    let headers: Vec<String> = header_row
        .iter()
        .enumerate()
        .map(|(idx, cell)| header_text(cell, idx))
        .collect();
    let width = headers.len();

    let body: Vec<Vec<CellValue>> = rows
        .map(|row| {
            let mut cells: Vec<CellValue> = row.iter().map(excel_cell).collect();
            cells.resize(width, CellValue::Null);
            cells
        })
        .collect();

    Table::from_rows(unique_headers(headers), body).context("assembling worksheet columns")
}

fn header_text(cell: &Data, idx: usize) -> String {
    match excel_cell(cell) {
        CellValue::Null => format!("Unnamed: {idx}"),
        other => other.to_string(),
    }
}

fn excel_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(s) if is_missing(s) => CellValue::Null,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) if f.is_nan() => CellValue::Null,
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                CellValue::Integer(*f as i64)
            } else {
                CellValue::Float(*f)
            }
        }
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ndt) => CellValue::DateTime(ndt.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => CellValue::Float(dt.as_f64()),
        },
        Data::DateTimeIso(s) => CellValue::DateTime(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Make header names unique: a repeated `a` becomes `a.1`, `a.2`, ...
fn unique_headers(headers: Vec<String>) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    let mut counters: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(headers.len());
    for h in headers {
        let mut name = h.clone();
        if taken.contains(&name) {
            let counter = counters.entry(h.clone()).or_insert(0);
            loop {
                *counter += 1;
                name = format!("{h}.{counter}");
                if !taken.contains(&name) {
                    break;
                }
            }
        }
        taken.insert(name.clone());
        out.push(name);
    }
    out
}
