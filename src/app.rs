use std::path::PathBuf;

use eframe::egui;

use crate::config::AppConfig;
use crate::data::model::UploadedFile;
use crate::state::AppState;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DataSweeperApp {
    pub state: AppState,
}

impl DataSweeperApp {
    /// Create the app, loading any files given on the command line as the
    /// first batch.
    pub fn new(config: AppConfig, initial_files: &[PathBuf]) -> Self {
        let mut state = AppState::new(config);
        if !initial_files.is_empty() {
            state.upload_paths(initial_files);
        }
        Self { state }
    }

    /// Files dropped onto the window replace the current batch.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped: Vec<egui::DroppedFile> = ctx.input(|i| i.raw.dropped_files.clone());
        if dropped.is_empty() {
            return;
        }
        let sources = dropped
            .into_iter()
            .map(|file| match (file.bytes, file.path) {
                (Some(bytes), _) => Ok(UploadedFile::new(file.name, bytes)),
                (None, Some(path)) => UploadedFile::from_path(&path),
                (None, None) => Err(anyhow::anyhow!("no data for dropped file {}", file.name)),
            })
            .collect();
        self.state.upload_sources(sources);
    }
}

impl eframe::App for DataSweeperApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: uploaded files ----
        egui::SidePanel::left("file_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &self.state);
            });

        // ---- Central panel: one card per file ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::central_panel(ui, &mut self.state);
        });
    }
}
