use std::{collections::HashMap, fs, path::Path};

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const SETTINGS_FILE: &str = "task_client.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub api_url: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
        }
    }
}

/// Defaults, then `task_client.toml` in the working directory, then the
/// `TASK_API_URL` / `APP__API_URL` environment variables.
pub fn load_settings() -> ClientSettings {
    load_settings_from(Path::new(SETTINGS_FILE), |name| std::env::var(name).ok())
}

pub(crate) fn load_settings_from(
    settings_path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Ok(raw) = fs::read_to_string(settings_path) {
        match toml::from_str::<HashMap<String, String>>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.get("api_url") {
                    settings.apply_api_url(v);
                }
            }
            Err(err) => tracing::warn!(
                path = %settings_path.display(),
                "ignoring unreadable client settings file: {err}"
            ),
        }
    }

    for name in ["TASK_API_URL", "APP__API_URL"] {
        if let Some(v) = env(name) {
            settings.apply_api_url(&v);
        }
    }

    settings
}

impl ClientSettings {
    /// Replaces the base URL unless `raw` is blank.
    pub fn apply_api_url(&mut self, raw: &str) {
        let normalized = normalize_api_url(raw);
        if !normalized.is_empty() {
            self.api_url = normalized;
        }
    }
}

pub fn normalize_api_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
