use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::DashboardConfig;
use crate::data::aggregate::Summary;
use crate::data::filter::{FilteredView, Selection};
use crate::data::loader::{LoadError, load_file};
use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded table, read-only once set (None until a load succeeds).
    pub dataset: Option<Arc<Dataset>>,

    /// File the dataset came from.
    pub source_path: Option<PathBuf>,

    /// Current multi-select state.
    pub selection: Selection,

    /// Aggregates of the current selection (recomputed on change).
    pub summary: Option<Summary>,

    /// `file://` URI of the sidebar logo, if the file exists.
    pub logo_uri: Option<String>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        let logo_uri = logo_uri(&config.logo_path);
        Self {
            config,
            dataset: None,
            source_path: None,
            selection: Selection::all(),
            summary: None,
            logo_uri,
            status_message: None,
        }
    }

    /// Load `path` with the configured options. On failure the previous
    /// dataset (if any) stays in place and the error becomes the status.
    pub fn load(&mut self, path: &Path) -> Result<(), LoadError> {
        match load_file(path, &self.config.load_options()) {
            Ok(dataset) => {
                if dataset.is_empty() {
                    log::warn!("{} has a header but no data rows", path.display());
                }
                log::info!(
                    "Loaded {} records from {} with slide columns {:?}",
                    dataset.len(),
                    path.display(),
                    dataset.slide_columns
                );
                self.source_path = Some(path.to_path_buf());
                self.set_dataset(dataset);
                Ok(())
            }
            Err(e) => {
                self.status_message = Some(status_for(&e));
                Err(e)
            }
        }
    }

    /// Ingest a newly loaded dataset and reset the filters.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.dataset = Some(Arc::new(dataset));
        self.selection = Selection::all();
        self.status_message = None;
        self.recompute();
    }

    /// Replace the selection, recomputing only if it actually changed.
    pub fn set_selection(&mut self, selection: Selection) {
        if selection != self.selection {
            self.selection = selection;
            self.recompute();
        }
    }

    /// Rebuild the filtered view and every aggregate from the full table.
    pub fn recompute(&mut self) {
        self.summary = self.dataset.as_ref().map(|ds| {
            let view = FilteredView::new(ds, &self.selection);
            log::debug!(
                "Selection {:?} matches {} of {} records",
                self.selection,
                view.len(),
                ds.len()
            );
            Summary::compute(&view)
        });
    }
}

/// Error text for the UI; cell errors also say which sheet row to fix.
fn status_for(e: &LoadError) -> String {
    match e {
        LoadError::InvalidValue { row, .. } | LoadError::InvalidNumber { row, .. } => {
            format!("Error: {e}. Fix row {row} of the sheet and open it again.")
        }
        _ => format!("Error: {e}"),
    }
}

fn logo_uri(path: &Path) -> Option<String> {
    match std::fs::canonicalize(path) {
        Ok(abs) if abs.is_file() => Some(format!("file://{}", abs.display())),
        _ => {
            log::warn!("Logo {} not found, sidebar image omitted", path.display());
            None
        }
    }
}
