//! Named profile management
//!
//! A profile is a standalone config variant at
//! `<config>/ferrofetch/profiles/<name>.conf`, parsed with the same parser
//! as the main config file.

use std::path::{Path, PathBuf};

use crate::config::{self, FetchConfig};
use crate::{Error, Result};

/// Commented starter config written when no main config exists to copy
const PROFILE_TEMPLATE: &str = "\
# ferrofetch profile
# Uncomment a key to override the default (all display flags default to true).
#
# ascii_art = true
# banner_text = custom banner
# show_distro = true
# show_kernel = true
# show_de = true
# show_packages = true
# fun_facts = true
# show_version = true
# show_ip = true
# show_shell = true
# show_battery = true
# allow_plugins = true
# enable_plugin_guard = true
# plugin_timeout_secs = 10
";

/// Path to the profiles directory
#[must_use]
pub fn profiles_dir(config_dir: &Path) -> PathBuf {
    config_dir.join("profiles")
}

/// Path a named profile lives at
///
/// # Errors
///
/// Returns error if the name is empty or contains a path separator
pub fn profile_path(config_dir: &Path, name: &str) -> Result<PathBuf> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Profile(
            "profile name is required (example: ferrofetch create-profile work)".to_string(),
        ));
    }
    if name.contains(['/', '\\']) {
        return Err(Error::Profile(format!("invalid profile name '{name}'")));
    }
    Ok(profiles_dir(config_dir).join(format!("{name}.conf")))
}

/// Create a new profile file, seeded from the main config when present
///
/// Returns the created path; the caller decides whether to open an editor.
///
/// # Errors
///
/// Returns error if the profile already exists or cannot be written
pub fn create(config_dir: &Path, name: &str) -> Result<PathBuf> {
    let path = profile_path(config_dir, name)?;
    if path.exists() {
        return Err(Error::Profile(format!("profile '{}' already exists", name.trim())));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let main_conf = config::config_file(config_dir);
    let seed = std::fs::read_to_string(&main_conf)
        .unwrap_or_else(|_| PROFILE_TEMPLATE.to_string());
    std::fs::write(&path, seed)?;

    tracing::info!(profile = name.trim(), path = %path.display(), "created profile");
    Ok(path)
}

/// Delete a profile
///
/// # Errors
///
/// Returns error if the profile does not exist
pub fn remove(config_dir: &Path, name: &str) -> Result<()> {
    let path = existing(config_dir, name)?;
    std::fs::remove_file(&path)?;
    tracing::info!(profile = name.trim(), "deleted profile");
    Ok(())
}

/// List profile names (`.conf` file stems; other files are ignored)
#[must_use]
pub fn list(config_dir: &Path) -> Vec<String> {
    let dir = profiles_dir(config_dir);
    let Ok(entries) = std::fs::read_dir(&dir) else {
        return Vec::new();
    };

    let mut names: Vec<String> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "conf"))
        .filter_map(|p| {
            p.file_stem()
                .and_then(|s| s.to_str())
                .map(ToString::to_string)
        })
        .collect();
    names.sort();
    names
}

/// Load a profile's configuration
///
/// # Errors
///
/// Returns error if the profile does not exist
pub fn load(config_dir: &Path, name: &str) -> Result<FetchConfig> {
    let path = existing(config_dir, name)?;
    Ok(FetchConfig::load(&path))
}

/// Resolve a profile path, requiring that it exists
///
/// # Errors
///
/// Returns error if the name is invalid or the profile does not exist
pub fn existing(config_dir: &Path, name: &str) -> Result<PathBuf> {
    let path = profile_path(config_dir, name)?;
    if !path.exists() {
        return Err(Error::Profile(format!("profile '{}' not found", name.trim())));
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_list_load_remove_cycle() {
        let dir = tempfile::tempdir().unwrap();

        let path = create(dir.path(), "work").unwrap();
        assert!(path.exists());
        assert_eq!(list(dir.path()), vec!["work".to_string()]);

        let config = load(dir.path(), "work").unwrap();
        // Template is all comments, so every flag stays at its default
        assert!(config.flag("show_distro"));

        remove(dir.path(), "work").unwrap();
        assert!(list(dir.path()).is_empty());
    }

    #[test]
    fn create_seeds_from_main_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(config::config_file(dir.path()), "show_ip = false\n").unwrap();

        create(dir.path(), "offline").unwrap();
        let config = load(dir.path(), "offline").unwrap();
        assert!(!config.flag("show_ip"));
    }

    #[test]
    fn list_ignores_non_conf_files() {
        let dir = tempfile::tempdir().unwrap();
        create(dir.path(), "work").unwrap();
        std::fs::write(profiles_dir(dir.path()).join("notes.txt"), "scratch\n").unwrap();

        assert_eq!(list(dir.path()), vec!["work".to_string()]);
    }

    #[test]
    fn duplicate_create_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        create(dir.path(), "work").unwrap();
        assert!(create(dir.path(), "work").is_err());
    }

    #[test]
    fn missing_profile_operations_fail() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(dir.path(), "ghost").is_err());
        assert!(remove(dir.path(), "ghost").is_err());
    }

    #[test]
    fn invalid_names_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(profile_path(dir.path(), "").is_err());
        assert!(profile_path(dir.path(), "  ").is_err());
        assert!(profile_path(dir.path(), "../evil").is_err());
    }
}
