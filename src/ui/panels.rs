use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::color;
use crate::state::AppState;
use crate::ui::card;

// ---------------------------------------------------------------------------
// Left side panel – batch overview
// ---------------------------------------------------------------------------

/// Render the list of uploaded files with their load status.
pub fn side_panel(ui: &mut Ui, state: &AppState) {
    ui.heading("Files");
    ui.separator();

    if state.session.is_empty() {
        ui.label("No files uploaded.");
        ui.label(RichText::new("Use File → Upload… or drop files here.").weak());
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for session in state.session.iter() {
                match (&session.loaded, session.table()) {
                    (Ok(_), Some(table)) => {
                        ui.label(format!("✔ {}", session.name()))
                            .on_hover_text(format!(
                                "{} rows × {} columns after cleaning",
                                table.n_rows(),
                                table.n_cols()
                            ));
                    }
                    (Err(e), _) => {
                        ui.colored_label(color::ERROR, format!("✖ {}", session.name()))
                            .on_hover_text(e.to_string());
                    }
                    (Ok(_), None) => {
                        ui.label(session.name());
                    }
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Central panel – one card per file
// ---------------------------------------------------------------------------

pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Data Sweeper 🚀");
    ui.label(
        "Transform your files between CSV and Excel formats with built-in 🧹 data cleaning and 📊 visualization.",
    );
    ui.separator();

    if state.session.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Upload your files (CSV or Excel)  (File → Upload…)");
        });
        return;
    }

    let keys = state.session.keys().to_vec();
    let preview_rows = state.config.preview_rows;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for key in &keys {
                if let Some(session) = state.session.get_mut(key) {
                    card::file_card(ui, &key.to_string(), session, preview_rows);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Upload…").clicked() {
                open_files_dialog(state);
                ui.close_menu();
            }
            if ui.button("Quit").clicked() {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });

        ui.separator();

        if !state.session.is_empty() {
            ui.label(format!(
                "{} file(s) uploaded, {} loaded",
                state.session.len(),
                state.session.loaded_count()
            ));
            ui.separator();
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(color::ERROR));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_files_dialog(state: &mut AppState) {
    let files = rfd::FileDialog::new()
        .set_title("Upload your files (CSV or Excel)")
        .add_filter("Supported files", &["csv", "xlsx"])
        .add_filter("CSV", &["csv"])
        .add_filter("Excel", &["xlsx"])
        .pick_files();

    if let Some(paths) = files {
        state.upload_paths(&paths);
    }
}
