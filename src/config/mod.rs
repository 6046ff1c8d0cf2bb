pub mod options;
pub mod settings;

use std::path::Path;

use settings::Settings;

/// Load defaults for a run.
///
/// An explicitly given settings file must exist and parse. Without one,
/// a `settings.yaml` in the current directory is picked up if present,
/// otherwise built-in defaults apply.
pub fn load_settings(explicit_path: Option<&Path>) -> crate::error::Result<Settings> {
    match explicit_path {
        Some(path) => Settings::from_file(path),
        None => {
            let implicit = Path::new("settings.yaml");
            if implicit.exists() {
                Settings::from_file(implicit)
            } else {
                Ok(Settings::default())
            }
        }
    }
}
