//! Execution supervisor - run discovered plugins inside a fault boundary
//!
//! Plugins run sequentially, in discovery order, one child process at a time.
//! Each invocation gets the read-only config snapshot as JSON on stdin and
//! the host version in `FERROFETCH_VERSION`; plugin stdout is inherited so
//! display lines land on the console. Any failure - spawn error, non-zero
//! exit, timeout - is confined to that one plugin and reported; the loop
//! always proceeds to the next plugin.

use std::process::Stdio;
use std::time::Duration;

use semver::Version;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;

use super::compat;
use super::discovery::{EntryPoint, PluginDescriptor};
use crate::config::FetchConfig;

/// Per-plugin result of one supervised pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// Not executed; the reason names the plugin and why
    Skipped(String),
    /// Entry point ran to completion
    Succeeded,
    /// Entry point failed; the error is the full diagnostic
    Failed(String),
}

/// Outcome of one plugin within a pass
#[derive(Debug, Clone)]
pub struct PluginReport {
    /// Plugin name
    pub name: String,
    /// What happened
    pub outcome: ExecutionOutcome,
}

/// Run every runnable plugin once, collecting per-plugin outcomes
///
/// Inert plugins (no entry point) are silently skipped and produce no
/// report entry. Version-incompatible plugins are skipped with a
/// diagnostic naming both versions. Execution errors never abort the pass.
pub async fn run_all(
    descriptors: &[PluginDescriptor],
    config: &FetchConfig,
    host: &Version,
    plugin_timeout: Duration,
) -> Vec<PluginReport> {
    let snapshot = match config.to_json() {
        Ok(json) => json,
        Err(e) => {
            // Unreachable for a string map, but never worth a panic
            tracing::error!(error = %e, "failed to serialize config snapshot");
            return Vec::new();
        }
    };

    let mut reports = Vec::new();

    for descriptor in descriptors {
        let Some(entry) = &descriptor.entry else {
            tracing::debug!(plugin = %descriptor.name, "plugin is inert, not running");
            continue;
        };

        if !compat::is_compatible(host, descriptor.required_version.as_ref()) {
            let required = descriptor
                .required_version
                .as_ref()
                .map_or_else(String::new, ToString::to_string);
            let reason = format!(
                "plugin '{}' requires ferrofetch {required}, but you're running {host}",
                descriptor.name
            );
            tracing::warn!("{reason}");
            reports.push(PluginReport {
                name: descriptor.name.clone(),
                outcome: ExecutionOutcome::Skipped(reason),
            });
            continue;
        }

        let outcome = match execute(descriptor, entry, &snapshot, host, plugin_timeout).await {
            Ok(()) => {
                tracing::debug!(plugin = %descriptor.name, "plugin succeeded");
                ExecutionOutcome::Succeeded
            }
            Err(e) => {
                tracing::error!(plugin = %descriptor.name, error = %e, "plugin failed");
                ExecutionOutcome::Failed(e)
            }
        };

        reports.push(PluginReport {
            name: descriptor.name.clone(),
            outcome,
        });
    }

    reports
}

/// Execute one plugin entry point under the fault boundary
async fn execute(
    descriptor: &PluginDescriptor,
    entry: &EntryPoint,
    snapshot: &str,
    host: &Version,
    plugin_timeout: Duration,
) -> Result<(), String> {
    let dir = descriptor
        .path
        .parent()
        .unwrap_or_else(|| std::path::Path::new("."));

    let mut child = Command::new(&entry.program)
        .args(&entry.args)
        .current_dir(dir)
        .env("FERROFETCH_VERSION", host.to_string())
        .stdin(Stdio::piped())
        .stdout(Stdio::inherit())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| format!("failed to spawn plugin: {e}"))?;

    // Plugins are free to exit without reading stdin, so a broken pipe
    // here is not a failure.
    if let Some(mut stdin) = child.stdin.take() {
        let _ = stdin.write_all(snapshot.as_bytes()).await;
    }

    let output = timeout(plugin_timeout, child.wait_with_output())
        .await
        .map_err(|_| format!("plugin timed out after {plugin_timeout:?}"))?
        .map_err(|e| format!("plugin execution failed: {e}"))?;

    if !output.stderr.is_empty() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        tracing::debug!(plugin = %descriptor.name, stderr = %stderr.trim(), "plugin stderr");
    }

    if !output.status.success() {
        let code = output.status.code().unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();
        if stderr.is_empty() {
            return Err(format!("plugin exited with code {code}"));
        }
        return Err(format!("plugin exited with code {code}: {stderr}"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::discovery::discover;

    const SHORT_TIMEOUT: Duration = Duration::from_secs(10);

    fn host() -> Version {
        Version::new(1, 2, 0)
    }

    #[tokio::test]
    async fn one_failure_does_not_stop_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("ok-ran");
        std::fs::write(dir.path().join("broken.sh"), "echo boom >&2\nexit 1\n").unwrap();
        std::fs::write(
            dir.path().join("ok.sh"),
            format!("touch '{}'\n", marker.display()),
        )
        .unwrap();

        let descriptors = discover(dir.path());
        let config = FetchConfig::default();
        let reports = run_all(&descriptors, &config, &host(), SHORT_TIMEOUT).await;

        assert_eq!(reports.len(), 2);
        let failures: Vec<_> = reports
            .iter()
            .filter(|r| matches!(r.outcome, ExecutionOutcome::Failed(_)))
            .collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].name, "broken");
        assert!(marker.exists(), "subsequent plugin must still run");
    }

    #[tokio::test]
    async fn incompatible_plugin_is_never_invoked() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("weather-ran");
        std::fs::write(
            dir.path().join("weather.sh"),
            format!(
                "# ferrofetch-require: 2.0.0\ntouch '{}'\n",
                marker.display()
            ),
        )
        .unwrap();

        let descriptors = discover(dir.path());
        let config = FetchConfig::default();
        let reports = run_all(&descriptors, &config, &host(), SHORT_TIMEOUT).await;

        assert_eq!(reports.len(), 1);
        match &reports[0].outcome {
            ExecutionOutcome::Skipped(reason) => {
                assert!(reason.contains("weather"));
                assert!(reason.contains("2.0.0"));
                assert!(reason.contains("1.2.0"));
            }
            other => panic!("expected skip, got {other:?}"),
        }
        assert!(!marker.exists(), "skipped plugin must not execute");
    }

    #[tokio::test]
    async fn compatible_requirement_runs_exactly_once() {
        let dir = tempfile::tempdir().unwrap();
        let counter = dir.path().join("count");
        std::fs::write(
            dir.path().join("counted.sh"),
            format!(
                "# ferrofetch-require: 1.0.0\necho run >> '{}'\n",
                counter.display()
            ),
        )
        .unwrap();

        let descriptors = discover(dir.path());
        let config = FetchConfig::default();
        let reports = run_all(&descriptors, &config, &host(), SHORT_TIMEOUT).await;

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].outcome, ExecutionOutcome::Succeeded);
        let runs = std::fs::read_to_string(&counter).unwrap();
        assert_eq!(runs.lines().count(), 1);
    }

    #[tokio::test]
    async fn inert_plugin_produces_no_outcome() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("dormant"), "data\n").unwrap();
        std::fs::write(dir.path().join("live.sh"), "exit 0\n").unwrap();

        let descriptors = discover(dir.path());
        let config = FetchConfig::default();
        let reports = run_all(&descriptors, &config, &host(), SHORT_TIMEOUT).await;

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].name, "live");
    }

    #[tokio::test]
    async fn hung_plugin_times_out() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("hang.sh"), "sleep 30\n").unwrap();

        let descriptors = discover(dir.path());
        let config = FetchConfig::default();
        let reports =
            run_all(&descriptors, &config, &host(), Duration::from_millis(300)).await;

        assert_eq!(reports.len(), 1);
        match &reports[0].outcome {
            ExecutionOutcome::Failed(e) => assert!(e.contains("timed out")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn plugin_receives_config_and_host_version() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("seen");
        std::fs::write(
            dir.path().join("probe.sh"),
            format!(
                "cat - > '{out}'\necho \"$FERROFETCH_VERSION\" >> '{out}'\n",
                out = out.display()
            ),
        )
        .unwrap();

        let descriptors = discover(dir.path());
        let config = FetchConfig::parse("show_ip = false\n");
        let reports = run_all(&descriptors, &config, &host(), SHORT_TIMEOUT).await;

        assert_eq!(reports[0].outcome, ExecutionOutcome::Succeeded);
        let seen = std::fs::read_to_string(&out).unwrap();
        assert!(seen.contains(r#""show_ip":"false""#));
        assert!(seen.contains("1.2.0"));
    }

    #[tokio::test]
    async fn failure_diagnostic_names_the_plugin_and_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.sh"), "echo kaput >&2\nexit 7\n").unwrap();

        let descriptors = discover(dir.path());
        let config = FetchConfig::default();
        let reports = run_all(&descriptors, &config, &host(), SHORT_TIMEOUT).await;

        assert_eq!(reports[0].name, "broken");
        match &reports[0].outcome {
            ExecutionOutcome::Failed(e) => {
                assert!(e.contains("code 7"));
                assert!(e.contains("kaput"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }
}
