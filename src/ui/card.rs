use eframe::egui::{self, RichText, Ui};

use crate::color;
use crate::data::export::ExportFormat;
use crate::data::pipeline::{NoticeLevel, PipelineOptions};
use crate::state::FileSession;
use crate::ui::{plot, preview};

// ---------------------------------------------------------------------------
// One collapsible card per uploaded file
// ---------------------------------------------------------------------------

/// Render the controls for one file and apply whatever the user changed.
///
/// Widgets edit a copy of the options; the copy is handed back to the
/// session at the end so the pipeline re-runs at most once per frame.
pub fn file_card(ui: &mut Ui, id: &str, session: &mut FileSession, preview_rows: usize) {
    let name = session.name().to_string();

    egui::CollapsingHeader::new(RichText::new(&name).strong().size(16.0))
        .id_salt(id)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            let source = match &session.loaded {
                Ok(table) => table,
                Err(e) => {
                    ui.colored_label(color::ERROR, e.to_string());
                    return;
                }
            };

            ui.label(RichText::new(format!("Preview of `{name}`:")).italics());
            preview::table_preview(ui, &format!("{id}/source"), source, preview_rows);
            ui.add_space(8.0);

            let mut options = session.options.clone();

            cleaning_section(ui, &name, &mut options);
            for notice in session
                .processed
                .iter()
                .flat_map(|p| p.notices.iter())
            {
                ui.colored_label(color::notice(notice.level), &notice.message);
            }
            ui.add_space(8.0);

            columns_section(ui, &name, session, &mut options);
            ui.add_space(8.0);

            ui.strong("Data Visualization 📊");
            ui.checkbox(
                &mut options.visualize,
                format!("Show visualization for {name}"),
            );
            if let Some(chart) = session.chart() {
                plot::bar_chart(ui, id, &chart);
            }
            ui.add_space(8.0);

            let (convert, save) = conversion_section(ui, &name, session, &mut options);

            session.set_options(options);
            if convert {
                session.convert();
            }
            if save {
                save_dialog(session);
            }
        });
    ui.separator();
}

fn cleaning_section(ui: &mut Ui, name: &str, options: &mut PipelineOptions) {
    ui.strong("Data Cleaning Options");
    ui.checkbox(&mut options.clean, format!("Clean data for {name}"));
    if options.clean {
        ui.horizontal(|ui: &mut Ui| {
            ui.checkbox(&mut options.dedupe, "Remove duplicates");
            ui.checkbox(&mut options.fill_missing, "Fill missing values");
        });
    }
}

fn columns_section(
    ui: &mut Ui,
    name: &str,
    session: &FileSession,
    options: &mut PipelineOptions,
) {
    ui.strong(format!("Choose columns for {name}"));

    let available = session.available_columns();
    let selected = session.selected_columns();

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            options.columns = Some(available.clone());
        }
        if ui.small_button("None").clicked() {
            options.columns = Some(Vec::new());
        }
    });

    ui.horizontal_wrapped(|ui: &mut Ui| {
        for col in &available {
            let mut checked = selected.contains(col);
            if ui.checkbox(&mut checked, col).changed() {
                options.columns = session.options_with_column_toggled(col).columns;
            }
        }
    });

    if !selected.is_empty() && selected != available {
        ui.label(RichText::new(format!("Keeping: {}", selected.join(", "))).weak());
    }
}

/// Returns `(convert clicked, download clicked)`.
fn conversion_section(
    ui: &mut Ui,
    name: &str,
    session: &FileSession,
    options: &mut PipelineOptions,
) -> (bool, bool) {
    ui.strong("Conversion Options");
    ui.horizontal(|ui: &mut Ui| {
        ui.label(format!("Convert {name} to:"));
        for format in ExportFormat::ALL {
            ui.radio_value(&mut options.target, format, format.to_string());
        }
    });

    let convert = ui.button(format!("Convert {name}")).clicked();

    let mut save = false;
    match &session.export {
        Some(Ok(artifact)) => {
            save = ui
                .button(format!("⬇ Download {}", artifact.file_name))
                .on_hover_text(format!("{} ({} bytes)", artifact.mime, artifact.bytes.len()))
                .clicked();
            ui.colored_label(
                color::notice(NoticeLevel::Success),
                format!("✅ {name} converted successfully!"),
            );
        }
        Some(Err(e)) => {
            ui.colored_label(color::ERROR, e.to_string());
        }
        None => {}
    }

    match &session.download {
        Some(Ok(path)) => {
            ui.label(format!("Saved to {}", path.display()));
        }
        Some(Err(msg)) => {
            ui.colored_label(color::ERROR, format!("Error: {msg}"));
        }
        None => {}
    }

    (convert, save)
}

fn save_dialog(session: &mut FileSession) {
    let Some(Ok(artifact)) = &session.export else {
        return;
    };
    let format = session.options.target;
    let path = rfd::FileDialog::new()
        .set_title("Save converted file")
        .set_file_name(&artifact.file_name)
        .add_filter(format.to_string(), &[format.extension()])
        .save_file();

    if let Some(path) = path {
        session.save_export(&path);
    }
}
