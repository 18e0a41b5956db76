//! Binder configuration.
//!
//! [`BinderSettings`] holds every tunable of the binder. Defaults are
//! usable as-is; see [`settings_loader`](crate::settings_loader) for loading
//! overrides from files and the environment.

use serde::{Deserialize, Serialize};

/// Default maximum size of a multipart body held in memory (32 MiB).
pub const DEFAULT_MAX_MULTIPART_MEMORY: usize = 32 << 20;

/// Configuration for a binder and its request parsing.
///
/// # Examples
///
/// ```
/// use formbind_core::settings::BinderSettings;
///
/// let settings = BinderSettings::default();
/// assert_eq!(settings.max_multipart_memory, 32 * 1024 * 1024);
/// assert_eq!(settings.log_level, "info");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinderSettings {
    /// Maximum multipart body, in bytes, file parts included. Multipart
    /// bodies are parsed in memory; a larger body is rejected outright.
    pub max_multipart_memory: usize,

    // ── Logging ──────────────────────────────────────────────────────

    /// Whether human-readable debug logging is enabled.
    pub debug: bool,
    /// The tracing filter directive (e.g. "info", "formbind=trace").
    pub log_level: String,
}

impl Default for BinderSettings {
    fn default() -> Self {
        Self {
            max_multipart_memory: DEFAULT_MAX_MULTIPART_MEMORY,
            debug: false,
            log_level: "info".to_string(),
        }
    }
}
