use std::path::{Path, PathBuf};

/// Label the classification service uses for a detected condition.
pub const POSITIVE_LABEL: &str = "MDD";
/// Label shown when the response carries neither `label` nor `prediction`.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// A recording chosen by the user. The file itself is opaque to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
}

impl SelectedFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = display_name(&path);
        Self { path, name }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadState {
    #[default]
    Idle,
    Uploading,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    ConditionDetected,
    HealthyControl,
}

impl Badge {
    /// Exact, case-sensitive match against [`POSITIVE_LABEL`]; every other
    /// label falls on the healthy-control side.
    pub fn for_label(label: &str) -> Self {
        if label == POSITIVE_LABEL {
            Self::ConditionDetected
        } else {
            Self::HealthyControl
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            Self::ConditionDetected => "⚠ Major Depressive Disorder",
            Self::HealthyControl => "✓ Healthy Control",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selected_file_uses_final_path_component_as_name() {
        let file = SelectedFile::from_path("/data/subjects/02010002_still.raw");
        assert_eq!(file.name, "02010002_still.raw");
    }

    #[test]
    fn only_exact_positive_label_selects_condition_badge() {
        assert_eq!(Badge::for_label("MDD"), Badge::ConditionDetected);
        assert_eq!(Badge::for_label("mdd"), Badge::HealthyControl);
        assert_eq!(Badge::for_label("HC"), Badge::HealthyControl);
        assert_eq!(Badge::for_label(UNKNOWN_LABEL), Badge::HealthyControl);
        assert_eq!(Badge::for_label(""), Badge::HealthyControl);
    }
}
