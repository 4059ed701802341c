use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use rust_xlsxwriter::{Format, Workbook};

use super::model::{format_float, CellValue, Table};
use crate::error::SweepError;

pub const CSV_MIME: &str = "text/csv";
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

// ---------------------------------------------------------------------------
// Target formats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Excel,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 2] = [ExportFormat::Csv, ExportFormat::Excel];

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "xlsx",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            ExportFormat::Csv => CSV_MIME,
            ExportFormat::Excel => XLSX_MIME,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Csv => f.write_str("CSV"),
            ExportFormat::Excel => f.write_str("Excel"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            other => bail!("unknown export format '{other}' (expected csv or excel)"),
        }
    }
}

// ---------------------------------------------------------------------------
// Artifacts
// ---------------------------------------------------------------------------

/// A converted file, ready to be saved.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, &self.bytes).with_context(|| format!("writing {}", path.display()))
    }
}

/// Swap the extension of `source_name` for the target format's one.
pub fn output_file_name(source_name: &str, format: ExportFormat) -> String {
    let stem = match source_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => source_name,
    };
    format!("{stem}.{}", format.extension())
}

/// Serialize `table` for download as `format`.
pub fn export_table(
    table: &Table,
    source_name: &str,
    format: ExportFormat,
) -> Result<ExportArtifact, SweepError> {
    let encoded = match format {
        ExportFormat::Csv => encode_csv(table),
        ExportFormat::Excel => encode_xlsx(table),
    };
    let bytes = encoded.map_err(|e| {
        log::error!("Failed to convert {source_name} to {format}: {e:#}");
        SweepError::encode(source_name, e)
    })?;

    let artifact = ExportArtifact {
        file_name: output_file_name(source_name, format),
        mime: format.mime(),
        bytes,
    };
    log::info!(
        "Converted {source_name} to {} ({} bytes)",
        artifact.file_name,
        artifact.bytes.len()
    );
    Ok(artifact)
}

// ---------------------------------------------------------------------------
// Encoders
// ---------------------------------------------------------------------------

/// Header plus one record per row, no index column. Missing cells are
/// written as empty fields.
pub(crate) fn encode_csv(table: &Table) -> Result<Vec<u8>> {
    if table.n_cols() == 0 {
        return Ok(Vec::new());
    }
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(table.columns().iter().map(|c| c.name.as_str()))
        .context("writing CSV header")?;
    for i in 0..table.n_rows() {
        writer
            .write_record(table.row(i).iter().map(|cell| cell.to_string()))
            .with_context(|| format!("writing CSV row {i}"))?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow!("flushing CSV buffer: {}", e.error()))
}

/// One worksheet with a bold header row. Numbers and booleans keep their
/// Excel type; text and dates are written as strings.
pub(crate) fn encode_xlsx(table: &Table) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Sheet1").context("naming worksheet")?;

        for (c, column) in table.columns().iter().enumerate() {
            let col = u16::try_from(c).context("too many columns for a worksheet")?;
            sheet
                .write_string_with_format(0, col, &column.name, &bold)
                .with_context(|| format!("writing header '{}'", column.name))?;

            for (r, cell) in column.values.iter().enumerate() {
                let row = u32::try_from(r + 1).context("too many rows for a worksheet")?;
                let written = match cell {
                    CellValue::Null => continue,
                    CellValue::Bool(b) => sheet.write_boolean(row, col, *b),
                    CellValue::Integer(i) => sheet.write_number(row, col, *i as f64),
                    CellValue::Float(v) if v.is_finite() => sheet.write_number(row, col, *v),
                    CellValue::Float(v) => sheet.write_string(row, col, format_float(*v)),
                    CellValue::Text(s) | CellValue::DateTime(s) => sheet.write_string(row, col, s),
                };
                written.with_context(|| format!("writing cell ({row}, {col})"))?;
            }
        }
    }
    workbook.save_to_buffer().context("saving workbook")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load;
    use crate::data::model::UploadedFile;

    fn people() -> Table {
        load(&UploadedFile::new(
            "people.csv",
            b"name,age,score\nAnn,31,1.5\nBob,40,\n\"Lee, Jr\",22,3.0\n".to_vec(),
        ))
        .unwrap()
    }

    #[test]
    fn file_name_swaps_extension() {
        assert_eq!(output_file_name("data.csv", ExportFormat::Excel), "data.xlsx");
        assert_eq!(output_file_name("Data.XLSX", ExportFormat::Csv), "Data.csv");
        assert_eq!(output_file_name("a.b.csv", ExportFormat::Excel), "a.b.xlsx");
        assert_eq!(output_file_name("noext", ExportFormat::Csv), "noext.csv");
    }

    #[test]
    fn excel_export_uses_spreadsheet_mime() {
        let artifact = export_table(&people(), "people.csv", ExportFormat::Excel).unwrap();
        assert_eq!(artifact.file_name, "people.xlsx");
        assert_eq!(artifact.mime, XLSX_MIME);
        // xlsx is a zip archive
        assert_eq!(&artifact.bytes[..2], b"PK");
    }

    #[test]
    fn csv_export_has_no_index_column() {
        let artifact = export_table(&people(), "people.csv", ExportFormat::Csv).unwrap();
        assert_eq!(artifact.mime, CSV_MIME);
        assert_eq!(
            String::from_utf8(artifact.bytes).unwrap(),
            "name,age,score\nAnn,31,1.5\nBob,40,\n\"Lee, Jr\",22,3.0\n"
        );
    }

    #[test]
    fn csv_round_trip_preserves_table() {
        let table = people();
        let artifact = export_table(&table, "people.csv", ExportFormat::Csv).unwrap();
        let back = load(&UploadedFile::new("again.csv", artifact.bytes)).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn zero_column_csv_is_empty() {
        let table = Table::default();
        assert!(encode_csv(&table).unwrap().is_empty());
    }

    #[test]
    fn format_parses_from_config_strings() {
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!(" Excel ".parse::<ExportFormat>().unwrap(), ExportFormat::Excel);
        assert!("parquet".parse::<ExportFormat>().is_err());
    }
}
