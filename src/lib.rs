//! ferrofetch - system-information display with a fault-isolated plugin runtime
//!
//! The built-in display (banner, distro, kernel, RAM, ...) is plain
//! sequential I/O. The interesting part is the plugin runtime:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                  plugins directory                   │
//! │     weather.sh  │  uptime.py  │  quotes.js  │  ...   │
//! └──────────────────────┬───────────────────────────────┘
//!                        │ discovery (per-file fault boundary)
//! ┌──────────────────────▼───────────────────────────────┐
//! │   guard ──▶ version check ──▶ execution supervisor   │
//! │  (policy gate,   (semver        (one subprocess at   │
//! │   fail closed)    ordering)      a time, timeout)    │
//! └──────────────────────┬───────────────────────────────┘
//!                        │
//!              per-plugin outcome report
//! ```
//!
//! A misbehaving plugin can be malformed, version-incompatible, crash, or
//! hang; in every case the damage stays confined to that plugin and the host
//! finishes its display.

pub mod banner;
pub mod config;
pub mod error;
pub mod facts;
pub mod plugins;
pub mod profiles;
pub mod system;

/// Running host version, the baseline for plugin compatibility checks
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use config::FetchConfig;
pub use error::{Error, Result};
pub use plugins::{
    ExecutionOutcome, GuardStatus, PluginDescriptor, PluginReport, discover, engage,
    host_version, listing, run_all,
};
