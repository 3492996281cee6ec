//! Configuration management for ferrofetch
//!
//! The on-disk format is deliberately plain: one `key = value` pair per line,
//! `#` comments, values lower-cased on parse. The same parser backs the main
//! config file and named profiles. The parsed map is also the read-only
//! snapshot handed to every plugin (as JSON on stdin), so it stays a string
//! map rather than a typed struct.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;

use crate::Result;

/// Default per-plugin execution timeout in seconds
const DEFAULT_PLUGIN_TIMEOUT_SECS: u64 = 10;

/// Parsed ferrofetch configuration
///
/// Missing keys fall back to defaults; boolean display flags default to on.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct FetchConfig {
    values: BTreeMap<String, String>,
}

impl FetchConfig {
    /// Parse configuration from file contents
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let mut values = BTreeMap::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            values.insert(key.trim().to_string(), value.trim().to_lowercase());
        }

        Self { values }
    }

    /// Load configuration from a file
    ///
    /// A missing file yields the default (empty) configuration; other read
    /// failures are logged and also fall back to defaults, so a broken config
    /// never prevents the primary display.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                tracing::debug!(path = %path.display(), "loaded configuration");
                Self::parse(&content)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Self::default()
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to read config file, using defaults"
                );
                Self::default()
            }
        }
    }

    /// Look up a raw value
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Boolean display flag; any value other than "false" counts as enabled
    #[must_use]
    pub fn flag(&self, key: &str) -> bool {
        self.get(key) != Some("false")
    }

    /// Banner text override; `None` means the distro name is used
    #[must_use]
    pub fn banner_text(&self) -> Option<&str> {
        self.get("banner_text").filter(|s| !s.is_empty())
    }

    /// Per-plugin execution timeout (`plugin_timeout_secs`, default 10s)
    #[must_use]
    pub fn plugin_timeout(&self) -> Duration {
        let secs = self
            .get("plugin_timeout_secs")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_PLUGIN_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    /// Serialize the full snapshot for handing to a plugin process
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.values)?)
    }

    /// Number of configured keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no keys are configured
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Return the ferrofetch config directory (`~/.config/ferrofetch` on Linux)
///
/// `FERROFETCH_CONFIG_DIR` overrides the default location.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("FERROFETCH_CONFIG_DIR") {
        return PathBuf::from(dir);
    }

    directories::BaseDirs::new().map_or_else(
        || PathBuf::from(".ferrofetch"),
        |dirs| dirs.config_dir().join("ferrofetch"),
    )
}

/// Path to the main config file
#[must_use]
pub fn config_file(config_dir: &Path) -> PathBuf {
    config_dir.join("ferrofetch.conf")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_key_values() {
        let config = FetchConfig::parse(
            "# comment\n\
             show_distro = true\n\
             banner_text = Arch\n\
             \n\
             not a pair\n\
             show_ip=FALSE\n",
        );

        assert_eq!(config.get("show_distro"), Some("true"));
        assert_eq!(config.get("banner_text"), Some("arch"));
        assert_eq!(config.get("show_ip"), Some("false"));
        assert_eq!(config.len(), 3);
    }

    #[test]
    fn values_are_lowercased() {
        let config = FetchConfig::parse("allow_plugins = True\n");
        assert_eq!(config.get("allow_plugins"), Some("true"));
        assert!(config.flag("allow_plugins"));
    }

    #[test]
    fn flags_default_on() {
        let config = FetchConfig::default();
        assert!(config.flag("show_kernel"));
        assert!(config.flag("allow_plugins"));

        let config = FetchConfig::parse("show_kernel = false\n");
        assert!(!config.flag("show_kernel"));
    }

    #[test]
    fn commented_banner_is_absent() {
        let config = FetchConfig::parse("# banner_text = custom\n");
        assert!(config.banner_text().is_none());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = FetchConfig::load(Path::new("/nonexistent/ferrofetch.conf"));
        assert!(config.is_empty());
        assert!(config.flag("show_distro"));
    }

    #[test]
    fn plugin_timeout_parsing() {
        let config = FetchConfig::parse("plugin_timeout_secs = 3\n");
        assert_eq!(config.plugin_timeout(), Duration::from_secs(3));

        let config = FetchConfig::parse("plugin_timeout_secs = nope\n");
        assert_eq!(
            config.plugin_timeout(),
            Duration::from_secs(DEFAULT_PLUGIN_TIMEOUT_SECS)
        );
    }

    #[test]
    fn snapshot_serializes_as_flat_object() {
        let config = FetchConfig::parse("a = 1\nb = two\n");
        let json = config.to_json().unwrap();
        assert_eq!(json, r#"{"a":"1","b":"two"}"#);
    }
}
