use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::AppConfig;
use crate::data::chart::{bar_series, ChartData};
use crate::data::export::{export_table, ExportArtifact, ExportFormat};
use crate::data::loader::load;
use crate::data::model::{FileKey, Table, UploadedFile};
use crate::data::pipeline::{run_pipeline, PipelineOptions, Processed};
use crate::error::SweepError;

// ---------------------------------------------------------------------------
// Per-file session entry
// ---------------------------------------------------------------------------

/// Everything the UI remembers about one uploaded file.
pub struct FileSession {
    pub upload: UploadedFile,
    /// Decoded table, or why the file was skipped.
    pub loaded: Result<Table, SweepError>,
    pub options: PipelineOptions,
    /// Output of the last pipeline run (None when loading failed).
    pub processed: Option<Processed>,
    /// Last conversion, cleared whenever the options change.
    pub export: Option<Result<ExportArtifact, SweepError>>,
    /// Outcome of the last save: saved path or error text.
    pub download: Option<Result<PathBuf, String>>,
}

impl FileSession {
    pub fn new(upload: UploadedFile, default_format: ExportFormat) -> Self {
        let loaded = load(&upload);
        let mut session = FileSession {
            upload,
            loaded,
            options: PipelineOptions {
                target: default_format,
                ..Default::default()
            },
            processed: None,
            export: None,
            download: None,
        };
        session.rerun();
        session
    }

    pub fn name(&self) -> &str {
        self.upload.name()
    }

    /// Replace the options; re-runs the pipeline when anything changed.
    pub fn set_options(&mut self, options: PipelineOptions) {
        if options == self.options {
            return;
        }
        self.options = options;
        self.export = None;
        self.download = None;
        self.rerun();
    }

    fn rerun(&mut self) {
        self.processed = match &self.loaded {
            Ok(table) => {
                log::debug!("Re-running pipeline for {}: {:?}", self.upload.name(), self.options);
                Some(run_pipeline(table, &self.options))
            }
            Err(_) => None,
        };
    }

    /// The table after cleaning and column selection.
    pub fn table(&self) -> Option<&Table> {
        self.processed.as_ref().map(|p| &p.table)
    }

    /// Column choices offered in the multi-select: every loaded column.
    pub fn available_columns(&self) -> Vec<String> {
        self.loaded
            .as_ref()
            .map(Table::column_names)
            .unwrap_or_default()
    }

    /// Columns currently kept, in order.
    pub fn selected_columns(&self) -> Vec<String> {
        match &self.options.columns {
            Some(cols) => cols.clone(),
            None => self.available_columns(),
        }
    }

    /// Options with `column` switched in or out of the selection.
    /// A newly chosen column goes to the end, like a multi-select.
    pub fn options_with_column_toggled(&self, column: &str) -> PipelineOptions {
        let mut selected = self.selected_columns();
        if let Some(pos) = selected.iter().position(|c| c == column) {
            selected.remove(pos);
        } else {
            selected.push(column.to_string());
        }
        PipelineOptions {
            columns: Some(selected),
            ..self.options.clone()
        }
    }

    /// Chart data for the processed table, when the chart is switched on.
    pub fn chart(&self) -> Option<ChartData> {
        if !self.options.visualize {
            return None;
        }
        self.table().map(bar_series)
    }

    /// Serialize the processed table to the chosen target format.
    pub fn convert(&mut self) {
        let Some(table) = self.table() else {
            return;
        };
        let result = export_table(table, self.upload.name(), self.options.target);
        self.export = Some(result);
        self.download = None;
    }

    /// Write the last converted artifact to `path`.
    pub fn save_export(&mut self, path: &Path) {
        let Some(Ok(artifact)) = &self.export else {
            return;
        };
        self.download = Some(match artifact.write_to(path) {
            Ok(()) => {
                log::info!("Saved {} to {}", artifact.file_name, path.display());
                Ok(path.to_path_buf())
            }
            Err(e) => {
                log::error!("Failed to save {}: {e:#}", artifact.file_name);
                Err(format!("{e:#}"))
            }
        });
    }
}

// ---------------------------------------------------------------------------
// Session store
// ---------------------------------------------------------------------------

/// Session-scoped store of uploaded files, keyed by file identity.
/// Upload order is kept separately for display.
#[derive(Default)]
pub struct SessionStore {
    entries: BTreeMap<FileKey, FileSession>,
    order: Vec<FileKey>,
}

impl SessionStore {
    /// Drop the previous batch and load `files` in its place.
    /// A file uploaded twice in the same batch is kept once.
    pub fn replace_batch(&mut self, files: Vec<UploadedFile>, default_format: ExportFormat) {
        self.entries.clear();
        self.order.clear();
        for file in files {
            let key = file.key();
            if self.entries.contains_key(&key) {
                log::warn!("Skipping duplicate upload {key}");
                continue;
            }
            self.entries
                .insert(key.clone(), FileSession::new(file, default_format));
            self.order.push(key);
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Keys in upload order.
    pub fn keys(&self) -> &[FileKey] {
        &self.order
    }

    pub fn get(&self, key: &FileKey) -> Option<&FileSession> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &FileKey) -> Option<&mut FileSession> {
        self.entries.get_mut(key)
    }

    /// Entries in upload order.
    pub fn iter(&self) -> impl Iterator<Item = &FileSession> {
        self.order.iter().filter_map(|k| self.get(k))
    }

    /// Number of entries whose file decoded successfully.
    pub fn loaded_count(&self) -> usize {
        self.iter().filter(|s| s.loaded.is_ok()).count()
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,
    pub session: SessionStore,
    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            session: SessionStore::default(),
            status_message: None,
        }
    }

    /// Start a new batch from in-memory uploads.
    pub fn upload(&mut self, files: Vec<UploadedFile>) {
        self.session
            .replace_batch(files, self.config.default_format);
        let total = self.session.len();
        let loaded = self.session.loaded_count();
        log::info!("Batch uploaded: {loaded} of {total} file(s) loaded");
        self.status_message = (loaded < total)
            .then(|| format!("{} of {total} file(s) could not be loaded", total - loaded));
    }

    /// Start a new batch from files on disk. Unreadable paths are reported
    /// in the status bar; the rest of the batch still loads.
    pub fn upload_paths(&mut self, paths: &[PathBuf]) {
        self.upload_sources(paths.iter().map(|p| UploadedFile::from_path(p)).collect());
    }

    /// Start a new batch from uploads that may have failed to arrive.
    pub fn upload_sources(&mut self, sources: Vec<anyhow::Result<UploadedFile>>) {
        let mut files = Vec::with_capacity(sources.len());
        let mut failures = Vec::new();
        for source in sources {
            match source {
                Ok(file) => files.push(file),
                Err(e) => {
                    log::error!("Failed to read upload: {e:#}");
                    failures.push(format!("{e:#}"));
                }
            }
        }
        self.upload(files);
        if !failures.is_empty() {
            self.status_message = Some(format!("Error: {}", failures.join("; ")));
        }
    }
}
