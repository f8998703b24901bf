//! File selection state: zero or one recording, plus its display indicator.

use std::path::PathBuf;

use shared::domain::SelectedFile;

pub const NO_FILE_INDICATOR: &str = "No file selected";

#[derive(Debug, Default)]
pub struct SelectionHandler {
    current: Option<SelectedFile>,
}

impl SelectionHandler {
    /// A cancelled dialog (`None`) leaves the previous selection in place.
    pub fn select(&mut self, path: Option<PathBuf>) -> Option<&SelectedFile> {
        if let Some(path) = path {
            let file = SelectedFile::from_path(path);
            tracing::debug!(file = %file.name, "recording selected");
            self.current = Some(file);
        }
        self.current.as_ref()
    }

    pub fn current(&self) -> Option<&SelectedFile> {
        self.current.as_ref()
    }

    pub fn indicator(&self) -> String {
        match &self.current {
            Some(file) => format!("Selected File: {}", file.name),
            None => NO_FILE_INDICATOR.to_string(),
        }
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}
