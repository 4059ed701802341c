use super::model::Table;

/// Most numeric columns drawn in one chart.
pub const MAX_SERIES: usize = 2;

/// One numeric column laid out as bars keyed by row label.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    pub name: String,
    /// `(row label, value)`; missing cells have no bar. Labels are row
    /// positions in the loaded file, so removed rows leave gaps.
    pub bars: Vec<(usize, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    Bars(Vec<BarSeries>),
    NoNumericData,
}

/// Take the first [`MAX_SERIES`] numeric columns, in column order.
pub fn bar_series(table: &Table) -> ChartData {
    let series: Vec<BarSeries> = table
        .numeric_columns()
        .take(MAX_SERIES)
        .map(|col| BarSeries {
            name: col.name.clone(),
            bars: col
                .values
                .iter()
                .zip(table.index())
                .filter_map(|(v, &i)| v.as_f64().map(|y| (i, y)))
                .collect(),
        })
        .collect();

    if series.is_empty() {
        ChartData::NoNumericData
    } else {
        ChartData::Bars(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::clean::deduplicate;
    use crate::data::model::CellValue;

    #[test]
    fn picks_first_two_numeric_columns() {
        let table = Table::from_rows(
            vec!["label".into(), "x".into(), "y".into(), "z".into()],
            vec![
                vec![
                    CellValue::Text("p".into()),
                    CellValue::Integer(1),
                    CellValue::Float(0.5),
                    CellValue::Integer(9),
                ],
                vec![
                    CellValue::Text("q".into()),
                    CellValue::Integer(2),
                    CellValue::Null,
                    CellValue::Integer(8),
                ],
            ],
        )
        .unwrap();

        let ChartData::Bars(series) = bar_series(&table) else {
            panic!("expected bars");
        };
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].name, "x");
        assert_eq!(series[0].bars, vec![(0, 1.0), (1, 2.0)]);
        assert_eq!(series[1].name, "y");
        assert_eq!(series[1].bars, vec![(0, 0.5)]);
    }

    #[test]
    fn bars_keep_labels_after_dedupe() {
        let mut table = Table::from_rows(
            vec!["x".into()],
            vec![
                vec![CellValue::Integer(1)],
                vec![CellValue::Integer(1)],
                vec![CellValue::Integer(4)],
            ],
        )
        .unwrap();
        deduplicate(&mut table);

        let ChartData::Bars(series) = bar_series(&table) else {
            panic!("expected bars");
        };
        assert_eq!(series[0].bars, vec![(0, 1.0), (2, 4.0)]);
    }

    #[test]
    fn no_numeric_columns_is_reported() {
        let table = Table::from_rows(
            vec!["label".into()],
            vec![vec![CellValue::Text("p".into())]],
        )
        .unwrap();
        assert_eq!(bar_series(&table), ChartData::NoNumericData);
    }
}
