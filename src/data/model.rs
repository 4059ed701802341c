use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};

// ---------------------------------------------------------------------------
// CellValue – a single cell of a table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring the common Pandas dtypes.
/// Rows are hashed for deduplication, so `CellValue` must be `Eq + Hash`.
#[derive(Debug, Clone)]
pub enum CellValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    /// ISO-8601 date-time kept as text.
    DateTime(String),
}

// -- Manual Eq/Ord/Hash: floats compare by total order with -0.0 folded
// into 0.0, Null equals Null --

/// `-0.0` and `0.0` share one key so equal cells hash alike.
fn float_key(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else {
        v
    }
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn rank(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
                DateTime(_) => 5,
            }
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => float_key(*a).total_cmp(&float_key(*b)),
            (Text(a), Text(b)) | (DateTime(a), DateTime(b)) => a.cmp(b),
            _ => rank(self).cmp(&rank(other)),
        }
    }
}

impl Hash for CellValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Text(s) | CellValue::DateTime(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => float_key(*f).to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

/// Renders the value the way it is written to CSV (missing is empty).
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(true) => write!(f, "True"),
            CellValue::Bool(false) => write!(f, "False"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{}", format_float(*v)),
            CellValue::Text(s) | CellValue::DateTime(s) => write!(f, "{s}"),
        }
    }
}

/// Integral floats keep one decimal (`3.0`) or an exponent (`1e16`), so
/// they never read back as integers. Everything else uses the shortest
/// representation that parses back to the same value.
pub fn format_float(v: f64) -> String {
    if !v.is_finite() || v.fract() != 0.0 {
        format!("{v}")
    } else if v.abs() < 1e16 {
        format!("{v:.1}")
    } else {
        format!("{v:?}")
    }
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Null, or a float that holds no number.
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Float(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Numeric view of the cell, used by mean imputation and the chart.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Text for the preview grid.
    pub fn preview_text(&self) -> String {
        match self {
            CellValue::Null => "null".to_string(),
            other => other.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// ColumnType – explicit per-column type tag
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Float,
    Bool,
    DateTime,
    Text,
}

impl ColumnType {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }

    /// Infer the tag from already-typed cells.
    ///
    /// Integers with gaps become `Float` (as Pandas does), a column without
    /// any observed value is `Text`, and any mix of kinds is `Text`.
    pub fn infer(values: &[CellValue]) -> ColumnType {
        let mut ints = 0usize;
        let mut floats = 0usize;
        let mut bools = 0usize;
        let mut dates = 0usize;
        let mut nulls = 0usize;
        for v in values {
            match v {
                CellValue::Null => nulls += 1,
                CellValue::Integer(_) => ints += 1,
                CellValue::Float(_) => floats += 1,
                CellValue::Bool(_) => bools += 1,
                CellValue::DateTime(_) => dates += 1,
                CellValue::Text(_) => {}
            }
        }
        let observed = values.len() - nulls;
        if observed == 0 {
            ColumnType::Text
        } else if ints == observed && nulls == 0 {
            ColumnType::Integer
        } else if ints + floats == observed {
            ColumnType::Float
        } else if bools == observed {
            ColumnType::Bool
        } else if dates == observed {
            ColumnType::DateTime
        } else {
            ColumnType::Text
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Integer => "int64",
            ColumnType::Float => "float64",
            ColumnType::Bool => "bool",
            ColumnType::DateTime => "datetime",
            ColumnType::Text => "object",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Column / Table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub dtype: ColumnType,
    pub values: Vec<CellValue>,
}

impl Column {
    /// Build a column from typed cells, tagging it and coercing the cells
    /// so that every value agrees with the tag.
    pub fn from_cells(name: impl Into<String>, values: Vec<CellValue>) -> Self {
        let dtype = ColumnType::infer(&values);
        let values = values
            .into_iter()
            .map(|v| match (dtype, v) {
                (_, CellValue::Null) => CellValue::Null,
                (ColumnType::Float, CellValue::Integer(i)) => CellValue::Float(i as f64),
                (ColumnType::Text, CellValue::Text(s)) => CellValue::Text(s),
                (ColumnType::Text, other) => CellValue::Text(other.to_string()),
                (_, other) => other,
            })
            .collect();
        Column {
            name: name.into(),
            dtype,
            values,
        }
    }

    pub fn has_missing(&self) -> bool {
        self.values.iter().any(CellValue::is_missing)
    }
}

/// An ordered set of equally long columns.
///
/// The row count is stored separately so that a projection to zero columns
/// still knows how many rows it has. Each row also carries its position in
/// the loaded file, which survives row removal.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    n_rows: usize,
    index: Vec<usize>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let n_rows = columns.first().map_or(0, |c| c.values.len());
        for col in &columns {
            if col.values.len() != n_rows {
                bail!(
                    "column '{}' has {} values, expected {n_rows}",
                    col.name,
                    col.values.len()
                );
            }
        }
        Ok(Table {
            columns,
            n_rows,
            index: (0..n_rows).collect(),
        })
    }

    /// Build a table from a header and row-major cells, inferring each
    /// column's type. Rows must all be as wide as the header.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Result<Self> {
        let width = headers.len();
        let mut columns: Vec<Vec<CellValue>> = vec![Vec::with_capacity(rows.len()); width];
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                bail!("row {i} has {} cells, expected {width}", row.len());
            }
            for (col, cell) in columns.iter_mut().zip(row) {
                col.push(cell);
            }
        }
        Table::new(
            headers
                .into_iter()
                .zip(columns)
                .map(|(name, values)| Column::from_cells(name, values))
                .collect(),
        )
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Row labels: the position of each row in the loaded file.
    pub fn index(&self) -> &[usize] {
        &self.index
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Numeric columns in column order.
    pub fn numeric_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.dtype.is_numeric())
    }

    /// Borrow row `i` across all columns.
    pub fn row(&self, i: usize) -> Vec<&CellValue> {
        self.columns.iter().map(|c| &c.values[i]).collect()
    }

    /// Keep the rows whose flag is `true`. `keep` must have one flag per row.
    pub(crate) fn retain_rows(&mut self, keep: &[bool]) {
        debug_assert_eq!(keep.len(), self.n_rows);
        for col in &mut self.columns {
            let mut flags = keep.iter();
            col.values.retain(|_| flags.next().copied().unwrap_or(false));
        }
        let mut flags = keep.iter();
        self.index.retain(|_| flags.next().copied().unwrap_or(false));
        self.n_rows = self.index.len();
    }

    pub(crate) fn columns_mut(&mut self) -> &mut Vec<Column> {
        &mut self.columns
    }
}

// ---------------------------------------------------------------------------
// Uploaded files
// ---------------------------------------------------------------------------

/// Decoder selected from the file name's extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Xlsx,
    Unsupported(String),
}

impl FileFormat {
    pub fn from_name(name: &str) -> Self {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "csv" => FileFormat::Csv,
            "xlsx" => FileFormat::Xlsx,
            _ => FileFormat::Unsupported(ext),
        }
    }
}

/// Identity of an upload inside a session: name, size and a content hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileKey {
    pub name: String,
    pub size: usize,
    pub digest: u64,
}

impl fmt::Display for FileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{:016x}", self.name, self.digest)
    }
}

/// A file handed to the app: name, raw bytes and the format tag.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    name: String,
    bytes: Arc<[u8]>,
    format: FileFormat,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let name = name.into();
        let format = FileFormat::from_name(&name);
        UploadedFile {
            name,
            bytes: bytes.into(),
            format,
        }
    }

    /// Read a file from disk, keeping only its file name.
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("invalid file name: {}", path.display()))?
            .to_string();
        let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        Ok(UploadedFile::new(name, bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn format(&self) -> &FileFormat {
        &self.format
    }

    pub fn key(&self) -> FileKey {
        let mut hasher = DefaultHasher::new();
        self.bytes.hash(&mut hasher);
        FileKey {
            name: self.name.clone(),
            size: self.bytes.len(),
            digest: hasher.finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_with_gaps_become_float() {
        let col = Column::from_cells(
            "n",
            vec![CellValue::Integer(1), CellValue::Null, CellValue::Integer(3)],
        );
        assert_eq!(col.dtype, ColumnType::Float);
        assert_eq!(
            col.values,
            vec![CellValue::Float(1.0), CellValue::Null, CellValue::Float(3.0)]
        );
    }

    #[test]
    fn mixed_kinds_become_text() {
        let col = Column::from_cells(
            "m",
            vec![CellValue::Integer(7), CellValue::Text("x".into()), CellValue::Null],
        );
        assert_eq!(col.dtype, ColumnType::Text);
        assert_eq!(col.values[0], CellValue::Text("7".into()));
        assert!(col.values[2].is_null());
    }

    #[test]
    fn all_missing_column_is_not_numeric() {
        let col = Column::from_cells("e", vec![CellValue::Null, CellValue::Null]);
        assert_eq!(col.dtype, ColumnType::Text);
        assert!(!col.dtype.is_numeric());
    }

    #[test]
    fn row_labels_survive_row_removal() {
        let col = Column::from_cells(
            "n",
            vec![CellValue::Integer(1), CellValue::Integer(2), CellValue::Integer(3)],
        );
        let mut table = Table::new(vec![col]).unwrap();
        table.retain_rows(&[true, false, true]);
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.index(), &[0, 2]);
    }

    #[test]
    fn ragged_columns_are_rejected() {
        let a = Column::from_cells("a", vec![CellValue::Integer(1)]);
        let b = Column::from_cells("b", vec![CellValue::Integer(1), CellValue::Integer(2)]);
        assert!(Table::new(vec![a, b]).is_err());
    }

    #[test]
    fn signed_zero_and_nan_cells_are_consistent() {
        use std::collections::HashSet;

        assert_eq!(CellValue::Float(0.0), CellValue::Float(-0.0));
        let zeros: HashSet<CellValue> =
            [CellValue::Float(0.0), CellValue::Float(-0.0)].into_iter().collect();
        assert_eq!(zeros.len(), 1);

        let nan = CellValue::Float(f64::NAN);
        assert_eq!(nan, nan.clone());
        assert!(nan.is_missing());
        assert_ne!(CellValue::Float(1.0), CellValue::Integer(1));
    }

    #[test]
    fn float_formatting() {
        assert_eq!(CellValue::Float(1e16).to_string(), "1e16");
        assert_eq!(CellValue::Float(-2e20).to_string(), "-2e20");
        assert_eq!(CellValue::Float(3.0).to_string(), "3.0");
        assert_eq!(CellValue::Float(2.5).to_string(), "2.5");
        assert_eq!(CellValue::Bool(true).to_string(), "True");
        assert_eq!(CellValue::Null.to_string(), "");
    }

    #[test]
    fn format_from_extension_is_case_insensitive() {
        assert_eq!(FileFormat::from_name("Report.CSV"), FileFormat::Csv);
        assert_eq!(FileFormat::from_name("book.XlSx"), FileFormat::Xlsx);
        assert_eq!(
            FileFormat::from_name("data.txt"),
            FileFormat::Unsupported("txt".into())
        );
        assert_eq!(
            FileFormat::from_name("README"),
            FileFormat::Unsupported(String::new())
        );
    }

    #[test]
    fn file_key_tracks_content() {
        let a = UploadedFile::new("a.csv", b"x\n1\n".to_vec());
        let b = UploadedFile::new("a.csv", b"x\n2\n".to_vec());
        assert_ne!(a.key(), b.key());
        assert_eq!(a.key(), a.clone().key());
    }
}
