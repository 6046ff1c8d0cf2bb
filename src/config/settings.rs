use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::options::OutputFormat;

/// Defaults loaded from an optional `settings.yaml`; CLI flags override
/// every field.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub format: OutputFormat,
    pub quality: u8,
    pub dpi: u32,
    pub output_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            format: OutputFormat::Jpeg,
            quality: 80,
            dpi: 150,
            output_dir: PathBuf::from("./converted_comics"),
        }
    }
}

impl Settings {
    pub fn from_yaml(yaml: &str) -> crate::error::Result<Self> {
        serde_yml::from_str(yaml).map_err(|e| {
            crate::error::ConvertError::config(format!("Failed to parse settings YAML: {e}"))
        })
    }

    pub fn from_file(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }
}
