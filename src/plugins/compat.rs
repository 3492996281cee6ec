//! Version compatibility check between plugins and the host
//!
//! Comparison is semantic (major.minor.patch numeric ordering), never a
//! string comparison. A plugin that declares no requirement is treated as
//! compatible with whatever host it runs under.

use semver::Version;

use crate::{Error, Result};

/// Parse the running host version from the crate version
///
/// # Errors
///
/// Returns error if the compiled-in version string is not valid semver
pub fn host_version() -> Result<Version> {
    Version::parse(crate::VERSION)
        .map_err(|e| Error::Config(format!("invalid host version '{}': {e}", crate::VERSION)))
}

/// Whether a plugin requiring `required` may run on `host`
#[must_use]
pub fn is_compatible(host: &Version, required: Option<&Version>) -> bool {
    required.is_none_or(|r| host >= r)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_version_parses() {
        let host = host_version().unwrap();
        assert_eq!(host.to_string(), crate::VERSION);
    }

    #[test]
    fn no_requirement_is_compatible() {
        let host = Version::new(1, 2, 0);
        assert!(is_compatible(&host, None));
    }

    #[test]
    fn ordering_is_numeric_not_lexical() {
        // "10.0.0" < "9.0.0" lexically; semver must say otherwise
        let host = Version::new(10, 0, 0);
        let required = Version::new(9, 0, 0);
        assert!(is_compatible(&host, Some(&required)));
    }

    #[test]
    fn newer_requirement_is_incompatible() {
        let host = Version::new(1, 2, 0);
        let required = Version::new(2, 0, 0);
        assert!(!is_compatible(&host, Some(&required)));
    }

    #[test]
    fn equal_versions_are_compatible() {
        let host = Version::new(1, 2, 0);
        assert!(is_compatible(&host, Some(&host.clone())));
    }

    #[test]
    fn patch_difference_matters() {
        let host = Version::new(1, 2, 0);
        let required = Version::new(1, 2, 1);
        assert!(!is_compatible(&host, Some(&required)));
    }
}
