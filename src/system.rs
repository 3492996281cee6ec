//! Host telemetry gathering
//!
//! Every probe here is best-effort: a missing file, absent tool, or offline
//! network degrades to a placeholder value, never an error. The display must
//! always complete.

use std::path::Path;
use std::process::Command;
use std::time::Duration;

/// Package managers probed for an installed-package count, in order
const PACKAGE_MANAGERS: &[(&str, &[&str])] = &[
    ("pacman", &["-Q"]),
    ("dpkg", &["-l"]),
    ("rpm", &["-qa"]),
    ("apk", &["info"]),
    ("xbps-query", &["-l"]),
    ("pkg", &["info"]),
    ("apt", &["list", "--installed"]),
];

/// Distro name from `/etc/os-release`
#[must_use]
pub fn distro_name() -> Option<String> {
    let content = std::fs::read_to_string("/etc/os-release").ok()?;
    parse_os_release(&content)
}

/// Extract the `NAME=` value from os-release content
fn parse_os_release(content: &str) -> Option<String> {
    content
        .lines()
        .find_map(|line| line.strip_prefix("NAME="))
        .map(|value| value.trim().trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}

/// Host name
#[must_use]
pub fn host_name() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Current user name
#[must_use]
pub fn user_name() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("LOGNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Kernel name and release, e.g. "Linux 6.8.0"
#[must_use]
pub fn kernel() -> String {
    let name = sysinfo::System::name().unwrap_or_else(|| std::env::consts::OS.to_string());
    match sysinfo::System::kernel_version() {
        Some(version) => format!("{name} {version}"),
        None => name,
    }
}

/// Desktop environment from the session environment
#[must_use]
pub fn desktop_environment() -> String {
    std::env::var("XDG_CURRENT_DESKTOP")
        .or_else(|_| std::env::var("DESKTOP_SESSION"))
        .unwrap_or_else(|_| "Unknown".to_string())
}

/// Installed package count from the first package manager found on PATH
#[must_use]
pub fn package_count() -> Option<usize> {
    for (manager, args) in PACKAGE_MANAGERS {
        if which::which(manager).is_err() {
            continue;
        }

        let output = match Command::new(manager).args(*args).output() {
            Ok(output) if output.status.success() => output,
            Ok(_) | Err(_) => return None,
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let count = match *manager {
            // dpkg -l lists headers too; installed packages are "ii" rows
            "dpkg" => stdout.lines().filter(|l| l.starts_with("ii")).count(),
            _ => stdout.lines().filter(|l| !l.trim().is_empty()).count(),
        };
        return Some(count);
    }
    None
}

/// Login shell name and version (first line of `--version` output)
#[must_use]
pub fn shell_version() -> String {
    let shell_path = std::env::var("SHELL").unwrap_or_default();
    let shell = Path::new(&shell_path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown");

    match Command::new(shell).arg("--version").output() {
        Ok(output) if output.status.success() => String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .unwrap_or(shell)
            .to_string(),
        Ok(_) | Err(_) => format!("{shell} (version unknown)"),
    }
}

/// Battery charge percentage, read from sysfs
#[must_use]
pub fn battery() -> Option<String> {
    battery_from(Path::new("/sys/class/power_supply"))
}

/// Find the first `BAT*` supply under `dir` and read its capacity
fn battery_from(dir: &Path) -> Option<String> {
    let entries = std::fs::read_dir(dir).ok()?;

    for entry in entries.flatten() {
        let name = entry.file_name();
        if !name.to_string_lossy().starts_with("BAT") {
            continue;
        }
        let capacity = std::fs::read_to_string(entry.path().join("capacity")).ok()?;
        return Some(format!("{}%", capacity.trim()));
    }
    None
}

/// Public IP address via HTTPS lookup; "Unavailable" on any failure
pub async fn public_ip() -> String {
    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            tracing::debug!(error = %e, "failed to build HTTP client");
            return "Unavailable".to_string();
        }
    };

    match client.get("https://api.ipify.org").send().await {
        Ok(response) => match response.text().await {
            Ok(ip) => ip.trim().to_string(),
            Err(e) => {
                tracing::debug!(error = %e, "failed to read public IP response");
                "Unavailable".to_string()
            }
        },
        Err(e) => {
            tracing::debug!(error = %e, "public IP lookup failed");
            "Unavailable".to_string()
        }
    }
}

/// CPU architecture
#[must_use]
pub fn cpu_arch() -> &'static str {
    std::env::consts::ARCH
}

/// Total RAM in GiB, two decimal places
#[must_use]
pub fn total_ram() -> String {
    let mut sys = sysinfo::System::new();
    sys.refresh_memory();

    #[allow(clippy::cast_precision_loss)]
    let gib = sys.total_memory() as f64 / f64::from(1u32 << 30);
    format!("{gib:.2} GB")
}
