use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rowpost_engine::{ClientSettings, RunSettings, MAX_WORKERS};
use rowpost_logging::rowpost_info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum ConfigFileError {
    #[error("cannot read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("unknown profile {0:?}")]
    UnknownProfile(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub(crate) struct CsvConfig {
    pub separator: String,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub(crate) struct ProfileConfig {
    pub token: String,
    pub method: String,
    pub url_template: String,
    pub body_template: String,
    pub headers: BTreeMap<String, String>,
    pub csv: CsvConfig,
    pub workers: usize,
    pub output_path: String,
    pub input_dir: Option<PathBuf>,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            method: "POST".to_string(),
            url_template: String::new(),
            body_template: String::new(),
            headers: BTreeMap::new(),
            csv: CsvConfig::default(),
            workers: 1,
            output_path: String::new(),
            input_dir: None,
            connect_timeout_secs: None,
            request_timeout_secs: None,
        }
    }
}

impl ProfileConfig {
    pub(crate) fn run_settings(&self) -> RunSettings {
        let output_path = Some(self.output_path.trim())
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);
        RunSettings {
            token: self.token.clone(),
            method: self.method.clone(),
            url_template: self.url_template.clone(),
            body_template: self.body_template.clone(),
            headers: self
                .headers
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            separator: self.csv.separator.clone(),
            fields: self.csv.fields.clone(),
            workers: self.workers,
            max_workers: MAX_WORKERS,
            output_path,
        }
    }

    pub(crate) fn client_settings(&self) -> ClientSettings {
        let mut settings = ClientSettings::default();
        if let Some(secs) = self.connect_timeout_secs {
            settings.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = self.request_timeout_secs {
            // Zero disables the whole-request timeout.
            settings.request_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        settings
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub default_profile: Option<String>,
    pub profile: ProfileConfig,
    pub profiles: BTreeMap<String, ProfileConfig>,
}

impl AppConfig {
    /// Picks the named profile, then the file's default, then the top-level one.
    pub(crate) fn select(&self, name: Option<&str>) -> Result<&ProfileConfig, ConfigFileError> {
        match name.or(self.default_profile.as_deref()) {
            Some(name) => self
                .profiles
                .get(name)
                .ok_or_else(|| ConfigFileError::UnknownProfile(name.to_string())),
            None => Ok(&self.profile),
        }
    }
}

pub(crate) fn load(path: &Path) -> Result<AppConfig, ConfigFileError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse(&content).map_err(|source| ConfigFileError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    rowpost_info!(
        "Loaded config from {:?} ({} named profiles)",
        path,
        config.profiles.len()
    );
    Ok(config)
}

fn parse(content: &str) -> Result<AppConfig, ron::error::SpannedError> {
    ron::from_str(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"(
        default_profile: Some("staging"),
        profile: (
            token: "top",
            url_template: "https://h/api/{{.id}}",
        ),
        profiles: {
            "staging": (
                token: "abc",
                method: "PUT",
                url_template: "https://staging/api/{{.id}}",
                body_template: "{\"v\":\"{{.v}}\"}",
                headers: { "X-Env": "staging" },
                csv: (separator: ";", fields: ["id", "v"]),
                workers: 9,
                output_path: "out.jsonl",
                request_timeout_secs: Some(0),
            ),
        },
    )"#;

    #[test]
    fn parses_profiles_and_selects_default() {
        let config = parse(SAMPLE).unwrap();
        let profile = config.select(None).unwrap();
        assert_eq!(profile.token, "abc");

        let settings = profile.run_settings();
        assert_eq!(settings.method, "PUT");
        assert_eq!(settings.separator, ";");
        assert_eq!(settings.fields, vec!["id".to_string(), "v".to_string()]);
        assert_eq!(settings.effective_workers(), MAX_WORKERS);
        assert_eq!(settings.output_path, Some(PathBuf::from("out.jsonl")));
        assert_eq!(
            settings.headers,
            vec![("X-Env".to_string(), "staging".to_string())]
        );
        assert_eq!(profile.client_settings().request_timeout, None);
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let config = parse(SAMPLE).unwrap();
        let err = config.select(Some("prod")).unwrap_err();
        assert!(matches!(err, ConfigFileError::UnknownProfile(name) if name == "prod"));
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let config = parse("(profile: (token: \"t\"))").unwrap();
        let profile = config.select(None).unwrap();
        let settings = profile.run_settings();
        assert_eq!(settings.method, "POST");
        assert_eq!(settings.separator, "");
        assert_eq!(settings.output_path, None);
        assert_eq!(settings.effective_workers(), 1);
    }

    #[test]
    fn missing_file_is_reported_with_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = load(&dir.path().join("absent.ron")).unwrap_err();
        assert!(err.to_string().contains("absent.ron"));
    }
}
