use std::{collections::HashMap, fs, path::Path, time::Duration};

use anyhow::Context;
use serde::Deserialize;
use url::Url;

pub const SETTINGS_FILE: &str = "classifier.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub server_url: String,
    pub endpoint_path: String,
    /// Advisory only: exceeding it is logged, the request is never aborted.
    pub upload_timeout_hint_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".into(),
            endpoint_path: "/full-pipeline".into(),
            upload_timeout_hint_secs: 180,
        }
    }
}

impl Settings {
    pub fn endpoint_url(&self) -> anyhow::Result<Url> {
        let base = self.server_url.trim().trim_end_matches('/');
        let path = self.endpoint_path.trim().trim_start_matches('/');
        let raw = format!("{base}/{path}");
        Url::parse(&raw).with_context(|| format!("invalid classification endpoint url '{raw}'"))
    }

    pub fn upload_timeout_hint(&self) -> Duration {
        Duration::from_secs(self.upload_timeout_hint_secs)
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the flat `key = "value"` settings file, then environment.
pub fn load_settings_from(
    settings_file: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(settings_file) {
        match toml::from_str::<HashMap<String, toml::Value>>(&raw) {
            Ok(file_cfg) => apply_file_values(&mut settings, &file_cfg),
            Err(err) => tracing::warn!(
                file = %settings_file.display(),
                "ignoring unparsable settings file: {err}"
            ),
        }
    }

    if let Some(v) = env("CLASSIFIER_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = env("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = env("CLASSIFIER_ENDPOINT_PATH") {
        settings.endpoint_path = v;
    }
    if let Some(v) = env("APP__ENDPOINT_PATH") {
        settings.endpoint_path = v;
    }

    if let Some(v) = env("APP__UPLOAD_TIMEOUT_HINT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.upload_timeout_hint_secs = parsed;
        }
    }

    settings
}

fn apply_file_values(settings: &mut Settings, file_cfg: &HashMap<String, toml::Value>) {
    if let Some(v) = file_cfg.get("server_url").and_then(toml::Value::as_str) {
        settings.server_url = v.to_string();
    }
    if let Some(v) = file_cfg.get("endpoint_path").and_then(toml::Value::as_str) {
        settings.endpoint_path = v.to_string();
    }
    match file_cfg.get("upload_timeout_hint_secs") {
        Some(toml::Value::Integer(secs)) if *secs >= 0 => {
            settings.upload_timeout_hint_secs = *secs as u64;
        }
        Some(toml::Value::String(secs)) => {
            if let Ok(parsed) = secs.parse::<u64>() {
                settings.upload_timeout_hint_secs = parsed;
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use std::{
        env, fs,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn joins_base_url_and_endpoint_path_without_double_slash() {
        let settings = Settings {
            server_url: "http://10.0.0.5:8000/".into(),
            endpoint_path: "/api/full-pipeline".into(),
            ..Settings::default()
        };
        assert_eq!(
            settings.endpoint_url().expect("url").as_str(),
            "http://10.0.0.5:8000/api/full-pipeline"
        );
    }

    #[test]
    fn rejects_unparsable_server_url() {
        let settings = Settings {
            server_url: "not a url".into(),
            ..Settings::default()
        };
        assert!(settings.endpoint_url().is_err());
    }

    #[test]
    fn missing_file_and_env_yield_defaults() {
        let settings = load_settings_from(Path::new("/nonexistent/classifier.toml"), no_env);
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn env_overrides_file_values() {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let temp_root = env::temp_dir().join(format!("eeg_classifier_config_test_{suffix}"));
        fs::create_dir_all(&temp_root).expect("temp root");
        let path = temp_root.join("classifier.toml");
        fs::write(
            &path,
            "server_url = \"http://file-host:9000\"\nendpoint_path = \"/api/full-pipeline\"\nupload_timeout_hint_secs = 60\n",
        )
        .expect("write settings");

        let from_file = load_settings_from(&path, no_env);
        assert_eq!(from_file.server_url, "http://file-host:9000");
        assert_eq!(from_file.endpoint_path, "/api/full-pipeline");
        assert_eq!(from_file.upload_timeout_hint_secs, 60);

        let overridden = load_settings_from(&path, |key| match key {
            "APP__SERVER_URL" => Some("http://env-host:8000".to_string()),
            "APP__UPLOAD_TIMEOUT_HINT_SECS" => Some("not-a-number".to_string()),
            _ => None,
        });
        assert_eq!(overridden.server_url, "http://env-host:8000");
        assert_eq!(overridden.endpoint_path, "/api/full-pipeline");
        assert_eq!(overridden.upload_timeout_hint_secs, 60);

        fs::remove_dir_all(temp_root).expect("cleanup");
    }
}
