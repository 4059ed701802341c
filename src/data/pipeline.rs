use super::clean::{deduplicate, fill_missing_numeric, FillOutcome};
use super::export::ExportFormat;
use super::model::Table;
use super::select::select_columns;

// ---------------------------------------------------------------------------
// Options and stages
// ---------------------------------------------------------------------------

/// Per-file switches set from the UI.
///
/// Cleaning switches are sticky: once on, they apply on every re-run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PipelineOptions {
    /// Master switch for the cleaning stages.
    pub clean: bool,
    pub dedupe: bool,
    pub fill_missing: bool,
    /// Columns to keep, in order. `None` keeps every column.
    pub columns: Option<Vec<String>>,
    pub visualize: bool,
    pub target: ExportFormat,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Deduplicate,
    FillMissing,
    SelectColumns(Vec<String>),
}

impl PipelineOptions {
    /// The transform stages to run, in order: dedupe, fill, select.
    pub fn stages(&self) -> Vec<Stage> {
        let mut stages = Vec::new();
        if self.clean && self.dedupe {
            stages.push(Stage::Deduplicate);
        }
        if self.clean && self.fill_missing {
            stages.push(Stage::FillMissing);
        }
        if let Some(cols) = &self.columns {
            stages.push(Stage::SelectColumns(cols.clone()));
        }
        stages
    }
}

// ---------------------------------------------------------------------------
// Running
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn success(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    fn warning(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }
}

/// Result of one pipeline run over a loaded table.
#[derive(Debug, Clone, PartialEq)]
pub struct Processed {
    pub table: Table,
    pub notices: Vec<Notice>,
}

/// Run the enabled stages over a copy of `source`.
pub fn run_pipeline(source: &Table, options: &PipelineOptions) -> Processed {
    let mut table = source.clone();
    let mut notices = Vec::new();

    for stage in options.stages() {
        log::debug!("Running stage {stage:?}");
        match stage {
            Stage::Deduplicate => {
                let removed = deduplicate(&mut table);
                notices.push(Notice::success(format!(
                    "Duplicates removed ({removed} row(s))"
                )));
            }
            Stage::FillMissing => match fill_missing_numeric(&mut table) {
                FillOutcome::Filled { cells } => notices.push(Notice::success(format!(
                    "Missing values filled ({cells} cell(s))"
                ))),
                FillOutcome::NoNumericColumns => {
                    log::warn!("Fill requested but the table has no numeric columns");
                    notices.push(Notice::warning(
                        "No numeric columns found to fill missing values.",
                    ));
                }
            },
            Stage::SelectColumns(cols) => select_columns(&mut table, &cols),
        }
    }

    Processed { table, notices }
}
