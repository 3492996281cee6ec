//! Plugin guard - the pre-execution policy gate
//!
//! A single externally supplied hook, consulted at most once per process
//! before any plugin runs. The guard is an executable at a fixed, well-known
//! location in the config directory; what it does internally (locking down
//! capabilities, auditing, nothing at all) is its own business. Activation is
//! fire-and-forget: the hook's exit status is logged, never consulted.
//!
//! Failure policy: a guard that is enabled but absent (or cannot be spawned)
//! fails closed - the plugin pass is refused with a clear diagnostic instead
//! of running unguarded. A guard file that exists but is not runnable is
//! treated as a configuration defect: reported, then execution continues.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;

use super::discovery;
use crate::{Error, Result};

/// Well-known guard hook file names, checked in order
const GUARD_CANDIDATES: &[&str] = &["guard", "guard.sh", "guard.py", "guard.js", "guard.rb"];

/// How long the guard hook may take to activate
const GUARD_TIMEOUT: Duration = Duration::from_secs(10);

/// What happened when the guard was consulted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardStatus {
    /// Hook was invoked
    Engaged,
    /// Guard disabled by configuration; plugins run unguarded
    Disabled,
    /// Hook file exists but is not runnable; plugins run unguarded
    NotRunnable,
}

/// Consult the guard before the plugin pass
///
/// Call once per process, before any plugin executes. Discovery and listing
/// do not require the guard.
///
/// # Errors
///
/// Returns error if the guard is enabled but its hook is missing or cannot
/// be spawned (fail closed).
pub async fn engage(config_dir: &Path, enabled: bool) -> Result<GuardStatus> {
    if !enabled {
        tracing::warn!("plugin guard is disabled; plugins will run unguarded");
        return Ok(GuardStatus::Disabled);
    }

    let Some(hook_path) = find_hook(config_dir) else {
        return Err(Error::Guard(format!(
            "guard enabled but no hook found under {} (expected one of: {}); \
             refusing to run plugins - set enable_plugin_guard = false to opt out",
            config_dir.display(),
            GUARD_CANDIDATES.join(", ")
        )));
    };

    let entry = match discovery::resolve_entry(&hook_path) {
        Ok(Some(entry)) => entry,
        Ok(None) | Err(_) => {
            tracing::warn!(
                path = %hook_path.display(),
                "guard hook is not runnable; continuing unguarded"
            );
            return Ok(GuardStatus::NotRunnable);
        }
    };

    tracing::debug!(path = %hook_path.display(), "activating plugin guard");

    let child = Command::new(&entry.program)
        .args(&entry.args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            Error::Guard(format!(
                "failed to spawn guard hook {}: {e}",
                hook_path.display()
            ))
        })?;

    // Fire-and-forget: the outcome of activation is reported, not consulted.
    match timeout(GUARD_TIMEOUT, child.wait_with_output()).await {
        Ok(Ok(output)) if output.status.success() => {
            tracing::debug!("plugin guard activated");
        }
        Ok(Ok(output)) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(
                status = %output.status,
                stderr = %stderr.trim(),
                "guard hook exited abnormally"
            );
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "guard hook wait failed");
        }
        Err(_) => {
            tracing::warn!(timeout = ?GUARD_TIMEOUT, "guard hook timed out");
        }
    }

    Ok(GuardStatus::Engaged)
}

/// Locate the guard hook file under the config directory
fn find_hook(config_dir: &Path) -> Option<PathBuf> {
    GUARD_CANDIDATES
        .iter()
        .map(|name| config_dir.join(name))
        .find(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_guard_is_not_consulted() {
        let dir = tempfile::tempdir().unwrap();
        let status = engage(dir.path(), false).await.unwrap();
        assert_eq!(status, GuardStatus::Disabled);
    }

    #[tokio::test]
    async fn missing_hook_fails_closed() {
        let dir = tempfile::tempdir().unwrap();
        let err = engage(dir.path(), true).await.unwrap_err();
        assert!(err.to_string().contains("refusing to run plugins"));
    }

    #[tokio::test]
    async fn runnable_hook_is_invoked() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("activated");
        std::fs::write(
            dir.path().join("guard.sh"),
            format!("touch '{}'\n", marker.display()),
        )
        .unwrap();

        let status = engage(dir.path(), true).await.unwrap();
        assert_eq!(status, GuardStatus::Engaged);
        assert!(marker.exists());
    }

    #[tokio::test]
    async fn non_runnable_hook_continues_unguarded() {
        let dir = tempfile::tempdir().unwrap();
        // Extensionless, not executable: present but no activation hook
        std::fs::write(dir.path().join("guard"), "inert\n").unwrap();

        let status = engage(dir.path(), true).await.unwrap();
        assert_eq!(status, GuardStatus::NotRunnable);
    }

    #[tokio::test]
    async fn failing_hook_is_still_engaged() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("guard.sh"), "exit 3\n").unwrap();

        let status = engage(dir.path(), true).await.unwrap();
        assert_eq!(status, GuardStatus::Engaged);
    }
}
