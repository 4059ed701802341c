use std::collections::HashSet;

use super::model::{CellValue, ColumnType, Table};

// ---------------------------------------------------------------------------
// Duplicate removal
// ---------------------------------------------------------------------------

/// Drop every row that exactly equals an earlier one, keeping the first
/// occurrence and the order of the remaining rows.
///
/// Returns the number of rows removed.
pub fn deduplicate(table: &mut Table) -> usize {
    let n_rows = table.n_rows();
    let keep: Vec<bool> = {
        let mut seen: HashSet<Vec<&CellValue>> = HashSet::with_capacity(n_rows);
        (0..n_rows).map(|i| seen.insert(table.row(i))).collect()
    };
    let removed = keep.iter().filter(|k| !**k).count();
    if removed > 0 {
        table.retain_rows(&keep);
    }
    removed
}

// ---------------------------------------------------------------------------
// Mean imputation
// ---------------------------------------------------------------------------

/// What [`fill_missing_numeric`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum FillOutcome {
    /// The table has no numeric column at all.
    NoNumericColumns,
    /// Numeric columns exist; `cells` gaps were filled.
    Filled { cells: usize },
}

/// Replace missing cells (null or NaN) of every numeric column with the
/// mean of that column's observed values. Integer columns that receive a
/// fill become float columns. Columns without any observed value are left
/// alone.
pub fn fill_missing_numeric(table: &mut Table) -> FillOutcome {
    if table.numeric_columns().next().is_none() {
        return FillOutcome::NoNumericColumns;
    }

    let mut cells = 0;
    for col in table.columns_mut().iter_mut().filter(|c| c.dtype.is_numeric()) {
        if !col.has_missing() {
            continue;
        }
        let observed: Vec<f64> = col
            .values
            .iter()
            .filter_map(CellValue::as_f64)
            .filter(|v| !v.is_nan())
            .collect();
        if observed.is_empty() {
            continue;
        }
        let mean = observed.iter().sum::<f64>() / observed.len() as f64;

        for value in &mut col.values {
            *value = match &*value {
                v if v.is_missing() => {
                    cells += 1;
                    CellValue::Float(mean)
                }
                CellValue::Integer(i) => CellValue::Float(*i as f64),
                other => other.clone(),
            };
        }
        col.dtype = ColumnType::Float;
        log::debug!("Filled gaps in '{}' with mean {mean}", col.name);
    }
    FillOutcome::Filled { cells }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load;
    use crate::data::model::{Column, UploadedFile};

    fn sample() -> Table {
        Table::from_rows(
            vec!["name".into(), "qty".into(), "price".into()],
            vec![
                vec![CellValue::Text("a".into()), CellValue::Integer(1), CellValue::Float(2.0)],
                vec![CellValue::Text("b".into()), CellValue::Integer(3), CellValue::Null],
                vec![CellValue::Text("a".into()), CellValue::Integer(1), CellValue::Float(2.0)],
                vec![CellValue::Text("c".into()), CellValue::Integer(5), CellValue::Float(4.0)],
            ],
        )
        .unwrap()
    }

    #[test]
    fn deduplicate_keeps_first_occurrence_in_order() {
        let mut table = sample();
        assert_eq!(deduplicate(&mut table), 1);
        assert_eq!(table.n_rows(), 3);
        assert_eq!(
            table.column("name").unwrap().values,
            vec![
                CellValue::Text("a".into()),
                CellValue::Text("b".into()),
                CellValue::Text("c".into())
            ]
        );
    }

    #[test]
    fn deduplicate_is_idempotent() {
        let mut once = sample();
        deduplicate(&mut once);
        let mut twice = once.clone();
        assert_eq!(deduplicate(&mut twice), 0);
        assert_eq!(once, twice);
    }

    #[test]
    fn missing_cells_compare_equal_for_dedup() {
        let mut table = Table::from_rows(
            vec!["x".into()],
            vec![vec![CellValue::Null], vec![CellValue::Null]],
        )
        .unwrap();
        assert_eq!(deduplicate(&mut table), 1);
    }

    #[test]
    fn signed_zero_rows_are_duplicates() {
        let mut table = Table::from_rows(
            vec!["v".into(), "k".into()],
            vec![
                vec![CellValue::Float(0.0), CellValue::Text("a".into())],
                vec![CellValue::Float(-0.0), CellValue::Text("a".into())],
                vec![CellValue::Float(1.5), CellValue::Text("a".into())],
            ],
        )
        .unwrap();
        assert_eq!(deduplicate(&mut table), 1);
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.index(), &[0, 2]);
    }

    #[test]
    fn nan_rows_are_duplicates() {
        let mut table = Table::from_rows(
            vec!["v".into()],
            vec![
                vec![CellValue::Float(f64::NAN)],
                vec![CellValue::Float(f64::NAN)],
                vec![CellValue::Float(2.0)],
            ],
        )
        .unwrap();
        assert_eq!(deduplicate(&mut table), 1);
    }

    #[test]
    fn nan_cell_does_not_poison_the_mean() {
        let col = Column {
            name: "v".into(),
            dtype: ColumnType::Float,
            values: vec![
                CellValue::Float(1.0),
                CellValue::Float(f64::NAN),
                CellValue::Null,
                CellValue::Float(3.0),
            ],
        };
        let mut table = Table::new(vec![col]).unwrap();
        assert_eq!(fill_missing_numeric(&mut table), FillOutcome::Filled { cells: 2 });
        let col = table.column("v").unwrap();
        assert!(!col.has_missing());
        assert_eq!(
            col.values,
            vec![
                CellValue::Float(1.0),
                CellValue::Float(2.0),
                CellValue::Float(2.0),
                CellValue::Float(3.0)
            ]
        );
    }

    #[test]
    fn nan_text_in_csv_is_filled_with_mean() {
        let file = UploadedFile::new("n.csv", b"x\n1\nNAN\n3\n".to_vec());
        let mut table = load(&file).unwrap();
        assert_eq!(fill_missing_numeric(&mut table), FillOutcome::Filled { cells: 1 });
        assert_eq!(
            table.column("x").unwrap().values,
            vec![CellValue::Float(1.0), CellValue::Float(2.0), CellValue::Float(3.0)]
        );
    }

    #[test]
    fn fill_uses_mean_and_keeps_observed_values() {
        let mut table = sample();
        let outcome = fill_missing_numeric(&mut table);
        assert_eq!(outcome, FillOutcome::Filled { cells: 1 });

        let price = table.column("price").unwrap();
        assert!(!price.has_missing());
        assert_eq!(
            price.values,
            vec![
                CellValue::Float(2.0),
                CellValue::Float(8.0 / 3.0),
                CellValue::Float(2.0),
                CellValue::Float(4.0)
            ]
        );
        // untouched: no gaps, still integers
        assert_eq!(table.column("qty").unwrap().dtype, ColumnType::Integer);
    }

    #[test]
    fn fill_without_numeric_columns_is_a_noop() {
        let mut table = Table::from_rows(
            vec!["t".into()],
            vec![vec![CellValue::Text("x".into())], vec![CellValue::Null]],
        )
        .unwrap();
        let before = table.clone();
        assert_eq!(fill_missing_numeric(&mut table), FillOutcome::NoNumericColumns);
        assert_eq!(table, before);
    }

    #[test]
    fn fill_promotes_integer_column_with_gaps() {
        let col = Column {
            name: "n".into(),
            dtype: ColumnType::Integer,
            values: vec![CellValue::Integer(2), CellValue::Null, CellValue::Integer(4)],
        };
        let mut table = Table::new(vec![col]).unwrap();
        fill_missing_numeric(&mut table);
        let col = table.column("n").unwrap();
        assert_eq!(col.dtype, ColumnType::Float);
        assert_eq!(
            col.values,
            vec![CellValue::Float(2.0), CellValue::Float(3.0), CellValue::Float(4.0)]
        );
    }

    #[test]
    fn fill_is_idempotent() {
        let mut table = sample();
        fill_missing_numeric(&mut table);
        let once = table.clone();
        assert_eq!(fill_missing_numeric(&mut table), FillOutcome::Filled { cells: 0 });
        assert_eq!(table, once);
    }
}
