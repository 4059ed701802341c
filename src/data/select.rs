use std::collections::HashSet;

use super::model::Table;

/// Restrict `table` to the named columns, in the order given.
///
/// * An empty `names` leaves a table with no columns (same row count).
/// * A repeated name is kept once, at its first position.
/// * Names the table does not have are skipped.
pub fn select_columns(table: &mut Table, names: &[String]) {
    let mut wanted: HashSet<&str> = HashSet::with_capacity(names.len());
    let mut available: Vec<_> = std::mem::take(table.columns_mut())
        .into_iter()
        .map(Some)
        .collect();

    let mut picked = Vec::with_capacity(names.len());
    for name in names {
        if !wanted.insert(name.as_str()) {
            continue;
        }
        let slot = available
            .iter_mut()
            .find(|slot| slot.as_ref().is_some_and(|c| &c.name == name));
        match slot.and_then(Option::take) {
            Some(col) => picked.push(col),
            None => log::warn!("Column '{name}' not found, skipping"),
        }
    }
    *table.columns_mut() = picked;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn abc() -> Table {
        Table::from_rows(
            vec!["a".into(), "b".into(), "c".into()],
            vec![
                vec![CellValue::Integer(1), CellValue::Integer(2), CellValue::Integer(3)],
                vec![CellValue::Integer(4), CellValue::Integer(5), CellValue::Integer(6)],
            ],
        )
        .unwrap()
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn projection_follows_requested_order() {
        let mut table = abc();
        select_columns(&mut table, &names(&["c", "a"]));
        assert_eq!(table.column_names(), names(&["c", "a"]));
        assert_eq!(table.n_rows(), 2);
        assert_eq!(
            table.column("c").unwrap().values,
            vec![CellValue::Integer(3), CellValue::Integer(6)]
        );
    }

    #[test]
    fn selecting_nothing_keeps_row_count() {
        let mut table = abc();
        select_columns(&mut table, &[]);
        assert_eq!(table.n_cols(), 0);
        assert_eq!(table.n_rows(), 2);
    }

    #[test]
    fn selecting_everything_is_identity() {
        let mut table = abc();
        let before = table.clone();
        select_columns(&mut table, &before.column_names());
        assert_eq!(table, before);
    }

    #[test]
    fn repeats_and_unknown_names_are_dropped() {
        let mut table = abc();
        select_columns(&mut table, &names(&["b", "zzz", "b", "a"]));
        assert_eq!(table.column_names(), names(&["b", "a"]));
    }
}
