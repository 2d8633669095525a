//! Project configuration parsed from `.locsync/config.toml`

use std::time::Duration;

use locsync_fs::{ConfigStore, NormalizedPath, ProjectPath};
use serde::{Deserialize, Serialize};

use crate::resource::{JsonBackend, ResourceBackend};
use crate::{Error, Result};

fn default_resource_path() -> String {
    "locales".to_string()
}

fn default_format() -> String {
    "json".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Where the local resource files live and how they are encoded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcesSection {
    /// Resource directory, relative to the project root
    #[serde(default = "default_resource_path")]
    pub path: String,

    /// Resource file format (only "json" is supported locally)
    #[serde(default = "default_format")]
    pub format: String,

    /// Language treated as the source language
    #[serde(default)]
    pub default_language: Option<String>,
}

impl Default for ResourcesSection {
    fn default() -> Self {
        Self {
            path: default_resource_path(),
            format: default_format(),
            default_language: None,
        }
    }
}

/// Remote project store the project synchronizes with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSection {
    /// Base URL of the remote service
    pub url: String,

    /// Project identifier on the remote
    pub project: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl RemoteSection {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Parsed project configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub resources: ResourcesSection,

    #[serde(default)]
    pub remote: Option<RemoteSection>,
}

impl SyncConfig {
    /// Path of the config file for a project root.
    pub fn path(root: &NormalizedPath) -> NormalizedPath {
        root.join(ProjectPath::ConfigFile.as_str())
    }

    /// Load the configuration of the project at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigNotFound`] if the file is missing.
    pub fn load(root: &NormalizedPath) -> Result<Self> {
        let path = Self::path(root);
        if !path.exists() {
            return Err(Error::ConfigNotFound {
                path: path.to_native(),
            });
        }
        let config: SyncConfig = ConfigStore::new().load(&path)?;
        tracing::debug!(path = %path, "loaded project config");
        Ok(config)
    }

    /// Write the configuration of the project at `root`.
    pub fn save(&self, root: &NormalizedPath) -> Result<()> {
        ConfigStore::new().save(&Self::path(root), self)?;
        Ok(())
    }

    /// Absolute path of the resource directory.
    pub fn resource_dir(&self, root: &NormalizedPath) -> NormalizedPath {
        root.join(&self.resources.path)
    }

    /// Backend for the configured resource format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for a format with no local backend.
    pub fn open_backend(&self, root: &NormalizedPath) -> Result<Box<dyn ResourceBackend>> {
        match self.resources.format.to_ascii_lowercase().as_str() {
            "json" => Ok(Box::new(JsonBackend::new(
                self.resource_dir(root),
                self.resources.default_language.clone(),
            ))),
            other => Err(Error::configuration(format!(
                "resource format '{other}' is not supported locally; use \"json\""
            ))),
        }
    }

    /// The remote target, validated for use.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if no remote is configured, the URL
    /// is not http(s), or the project name is empty.
    pub fn remote(&self) -> Result<&RemoteSection> {
        let remote = self.remote.as_ref().ok_or_else(|| {
            Error::configuration("no [remote] section; set `url` and `project` to push")
        })?;

        let url = remote.url.trim();
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(Error::configuration(format!(
                "remote url '{}' must start with http:// or https://",
                remote.url
            )));
        }
        if remote.project.trim().is_empty() {
            return Err(Error::configuration("remote project must not be empty"));
        }
        if remote.timeout_secs == 0 {
            return Err(Error::configuration("remote timeout_secs must be positive"));
        }
        Ok(remote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: SyncConfig = toml::from_str("").unwrap();
        assert_eq!(config.resources.path, "locales");
        assert_eq!(config.resources.format, "json");
        assert!(config.remote.is_none());
    }

    #[test]
    fn remote_section_parses() {
        let config: SyncConfig = toml::from_str(
            r#"
[resources]
path = "i18n"
default_language = "en"

[remote]
url = "https://strings.example.com"
project = "my-app"
"#,
        )
        .unwrap();

        let remote = config.remote().unwrap();
        assert_eq!(remote.project, "my-app");
        assert_eq!(remote.timeout(), Duration::from_secs(30));
        assert_eq!(config.resources.default_language.as_deref(), Some("en"));
    }

    #[test]
    fn json_format_opens_json_backend() {
        let config = SyncConfig::default();
        let backend = config.open_backend(&NormalizedPath::new("/project")).unwrap();
        assert_eq!(backend.format(), "json");
    }

    #[test]
    fn unknown_format_is_configuration_error() {
        let config = SyncConfig {
            resources: ResourcesSection {
                format: "resx".into(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            config.open_backend(&NormalizedPath::new("/project")),
            Err(Error::Configuration { .. })
        ));
    }

    #[test]
    fn missing_remote_is_configuration_error() {
        let config = SyncConfig::default();
        assert!(matches!(config.remote(), Err(Error::Configuration { .. })));
    }

    #[test]
    fn non_http_url_is_rejected() {
        let config = SyncConfig {
            remote: Some(RemoteSection {
                url: "ftp://strings.example.com".into(),
                project: "app".into(),
                timeout_secs: 30,
            }),
            ..Default::default()
        };
        let err = config.remote().unwrap_err();
        assert!(err.to_string().contains("ftp://"));
    }

    #[test]
    fn blank_project_is_rejected() {
        let config = SyncConfig {
            remote: Some(RemoteSection {
                url: "https://strings.example.com".into(),
                project: "  ".into(),
                timeout_secs: 30,
            }),
            ..Default::default()
        };
        assert!(matches!(config.remote(), Err(Error::Configuration { .. })));
    }
}
