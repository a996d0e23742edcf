use std::fs;
use std::path::Path;
use std::time::Duration;

use audit_engine::ClientSettings;
use audit_logging::{audit_info, audit_warn};
use serde::{Deserialize, Serialize};

/// Optional settings file, e.g.
///
/// ```ron
/// (base_url: Some("https://audit.example"), lang: Some("fr"), connect_timeout_secs: Some(5))
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct FileSettings {
    pub base_url: Option<String>,
    pub lang: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
}

impl FileSettings {
    /// Merges with defaults; `base_url_override` wins over the file.
    pub fn client_settings(&self, base_url_override: Option<&str>) -> ClientSettings {
        let mut settings = ClientSettings::default();
        if let Some(base_url) = base_url_override.or(self.base_url.as_deref()) {
            settings.base_url = base_url.to_string();
        }
        if let Some(secs) = self.connect_timeout_secs {
            settings.connect_timeout = Duration::from_secs(secs);
        }
        settings.request_timeout = self.request_timeout_secs.map(Duration::from_secs);
        settings
    }
}

pub(crate) fn load_settings(path: &Path) -> FileSettings {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return FileSettings::default();
        }
        Err(err) => {
            audit_warn!("Failed to read settings from {:?}: {}", path, err);
            return FileSettings::default();
        }
    };

    match ron::from_str(&content) {
        Ok(settings) => {
            audit_info!("Loaded settings from {:?}", path);
            settings
        }
        Err(err) => {
            audit_warn!("Failed to parse settings from {:?}: {}", path, err);
            FileSettings::default()
        }
    }
}
