//! Plugin discovery - scan the plugins directory for loadable files
//!
//! Every regular file directly inside the plugins directory (non-recursive)
//! is a candidate plugin. Loading a candidate means resolving how it would be
//! executed and scanning its header for a version requirement; a file that
//! fails to load is reported and excluded without aborting the scan.

use std::path::{Path, PathBuf};

use semver::Version;

/// Directive marker scanned for in a plugin file header,
/// e.g. `# ferrofetch-require: 2.0.0`
const REQUIRE_MARKER: &str = "ferrofetch-require:";

/// How many leading lines of a plugin file are scanned for directives
const HEADER_SCAN_LINES: usize = 20;

/// How many leading bytes of a plugin file are read for the header scan.
/// Plugins may be compiled binaries, so only this prefix is ever read and
/// it is decoded lossily.
const HEADER_SCAN_BYTES: usize = 4096;

/// Resolved invocation for a plugin file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    /// Program to spawn (interpreter, or the file itself)
    pub program: String,
    /// Arguments, ending with the plugin path where an interpreter is used
    pub args: Vec<String>,
}

/// One discovered plugin
///
/// Created once per file at discovery time and immutable thereafter. A
/// descriptor without an entry point is inert: listed, never executed.
#[derive(Debug, Clone)]
pub struct PluginDescriptor {
    /// Unique name, derived from the file stem
    pub name: String,
    /// Path to the plugin file
    pub path: PathBuf,
    /// How to execute the plugin; `None` means the plugin is inert
    pub entry: Option<EntryPoint>,
    /// Declared minimum host version; `None` means compatible by default
    pub required_version: Option<Version>,
}

/// Scan a directory for plugins
///
/// A missing directory yields an empty result. Files are visited in lexical
/// order so the result is stable within a process. Per-file load failures are
/// reported with the file's name and excluded; they never abort the scan.
#[must_use]
pub fn discover(dir: &Path) -> Vec<PluginDescriptor> {
    let mut descriptors: Vec<PluginDescriptor> = Vec::new();

    if !dir.is_dir() {
        tracing::debug!(path = %dir.display(), "plugins directory does not exist");
        return descriptors;
    }

    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            tracing::warn!(
                path = %dir.display(),
                error = %e,
                "failed to read plugins directory"
            );
            return descriptors;
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();
    paths.sort();

    for path in paths {
        match load_descriptor(&path) {
            Ok(descriptor) => {
                if descriptors.iter().any(|d| d.name == descriptor.name) {
                    tracing::warn!(
                        plugin = %descriptor.name,
                        path = %path.display(),
                        "duplicate plugin name, ignoring"
                    );
                    continue;
                }
                tracing::debug!(
                    plugin = %descriptor.name,
                    inert = descriptor.entry.is_none(),
                    required_version = ?descriptor.required_version.as_ref().map(ToString::to_string),
                    "discovered plugin"
                );
                descriptors.push(descriptor);
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to load plugin"
                );
            }
        }
    }

    descriptors
}

/// Load a single plugin file into a descriptor
fn load_descriptor(path: &Path) -> Result<PluginDescriptor, String> {
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .ok_or("invalid plugin file name")?
        .to_string();

    let header = read_header(path).map_err(|e| format!("failed to read plugin file: {e}"))?;

    let required_version = parse_required_version(&header)?;
    let entry = resolve_entry(path)?;

    Ok(PluginDescriptor {
        name,
        path: path.to_path_buf(),
        entry,
        required_version,
    })
}

/// Read the leading bytes of a plugin file, decoded lossily
///
/// Compiled binaries are valid plugins, so non-UTF-8 content must not be a
/// load error; directive scanning simply finds nothing in it.
fn read_header(path: &Path) -> std::io::Result<String> {
    use std::io::Read;

    let mut file = std::fs::File::open(path)?;
    let mut buf = vec![0u8; HEADER_SCAN_BYTES];
    let mut filled = 0;
    loop {
        let n = file.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
        if filled == buf.len() {
            break;
        }
    }
    buf.truncate(filled);
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Scan the file header for a `ferrofetch-require:` directive
fn parse_required_version(content: &str) -> Result<Option<Version>, String> {
    for line in content.lines().take(HEADER_SCAN_LINES) {
        let Some(idx) = line.find(REQUIRE_MARKER) else {
            continue;
        };
        let raw = line[idx + REQUIRE_MARKER.len()..].trim();
        let version = Version::parse(raw)
            .map_err(|e| format!("invalid {REQUIRE_MARKER} directive '{raw}': {e}"))?;
        return Ok(Some(version));
    }
    Ok(None)
}

/// Resolve how a plugin file would be executed, based on its extension
///
/// `Ok(None)` marks an inert plugin (extensionless, not executable);
/// an unrecognized extension is a load error. Also used by the guard to
/// resolve its activation hook.
pub(crate) fn resolve_entry(path: &Path) -> Result<Option<EntryPoint>, String> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    let path_str = path
        .to_str()
        .ok_or("invalid plugin path")?
        .to_string();

    let entry = match extension {
        "sh" => EntryPoint {
            program: "sh".to_string(),
            args: vec![path_str],
        },
        "py" => EntryPoint {
            program: "python3".to_string(),
            args: vec![path_str],
        },
        "js" => EntryPoint {
            program: "node".to_string(),
            args: vec![path_str],
        },
        "rb" => EntryPoint {
            program: "ruby".to_string(),
            args: vec![path_str],
        },
        "" => {
            if is_executable(path) {
                EntryPoint {
                    program: path_str,
                    args: vec![],
                }
            } else {
                return Ok(None);
            }
        }
        _ => return Err(format!("unknown plugin extension: .{extension}")),
    };

    Ok(Some(entry))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path).is_ok_and(|m| m.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(_path: &Path) -> bool {
    false
}
