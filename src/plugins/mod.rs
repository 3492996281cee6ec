//! Plugin runtime for ferrofetch
//!
//! Third-party plugins are single files dropped into the plugins directory
//! and discovered at startup. The pipeline is:
//!
//! ```text
//! Discovery ──▶ descriptors ──▶ Version check ──▶ Execution supervisor
//!                   │                                     │
//!                   └──▶ Listing (diagnostic)             └──▶ per-plugin outcome
//! ```
//!
//! The guard (policy gate) is consulted once, before the supervisor runs;
//! discovery and listing work regardless of guard state. No plugin can abort
//! the pass: load errors, version mismatches, and execution failures are all
//! confined to the one file or plugin that caused them.

mod compat;
mod discovery;
mod guard;
mod runner;

use std::path::{Path, PathBuf};

pub use compat::{host_version, is_compatible};
pub use discovery::{EntryPoint, PluginDescriptor, discover};
pub use guard::{GuardStatus, engage};
pub use runner::{ExecutionOutcome, PluginReport, run_all};

/// Path to the plugins directory under the config directory
#[must_use]
pub fn plugins_dir(config_dir: &Path) -> PathBuf {
    config_dir.join("plugins")
}

/// Human-readable enumeration of discovered plugins
///
/// Read-only and side-effect free; works whether or not the guard ever
/// engaged. Inert plugins and version requirements are annotated.
#[must_use]
pub fn listing(descriptors: &[PluginDescriptor]) -> Vec<String> {
    descriptors
        .iter()
        .map(|d| {
            let mut line = d.name.clone();
            if let Some(required) = &d.required_version {
                line.push_str(&format!(" (requires {required})"));
            }
            if d.entry.is_none() {
                line.push_str(" (inert)");
            }
            line
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_names_and_annotations() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("weather.sh"),
            "# ferrofetch-require: 2.0.0\necho hi\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("dormant"), "data\n").unwrap();
        std::fs::write(dir.path().join("plain.sh"), "echo hi\n").unwrap();

        let lines = listing(&discover(dir.path()));
        assert_eq!(
            lines,
            vec![
                "dormant (inert)".to_string(),
                "plain".to_string(),
                "weather (requires 2.0.0)".to_string(),
            ]
        );
    }

    #[test]
    fn listing_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.sh"), "echo a\n").unwrap();
        std::fs::write(dir.path().join("b.sh"), "echo b\n").unwrap();

        let first = listing(&discover(dir.path()));
        let second = listing(&discover(dir.path()));
        assert_eq!(first, second);
    }
}
