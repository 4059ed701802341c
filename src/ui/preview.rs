use eframe::egui::{ScrollArea, Ui};
use egui_extras::{Column as GridColumn, TableBuilder};

use crate::data::model::Table;

const ROW_HEIGHT: f32 = 18.0;

/// Render the first `rows` rows of `table` as a striped grid.
/// Hovering a header shows the column's type.
pub fn table_preview(ui: &mut Ui, id: &str, table: &Table, rows: usize) {
    if table.n_cols() == 0 {
        ui.label("No columns selected.");
        return;
    }
    let shown = rows.min(table.n_rows());

    ui.push_id(("preview", id), |ui: &mut Ui| {
        ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .vscroll(false)
                .columns(GridColumn::auto().at_least(60.0), table.n_cols())
                .header(ROW_HEIGHT + 2.0, |mut header| {
                    for col in table.columns() {
                        header.col(|ui: &mut Ui| {
                            ui.strong(&col.name).on_hover_text(col.dtype.to_string());
                        });
                    }
                })
                .body(|body| {
                    body.rows(ROW_HEIGHT, shown, |mut row| {
                        let i = row.index();
                        for col in table.columns() {
                            row.col(|ui: &mut Ui| {
                                ui.label(col.values[i].preview_text());
                            });
                        }
                    });
                });
        });
    });

    ui.label(format!(
        "{} rows × {} columns",
        table.n_rows(),
        table.n_cols()
    ));
}
