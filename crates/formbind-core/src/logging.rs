//! Logging integration for formbind.
//!
//! Provides helpers for configuring [`tracing`]-based logging from
//! [`BinderSettings`] and for creating per-call spans.

use crate::settings::BinderSettings;

/// Sets up the global tracing subscriber based on the given settings.
///
/// The filter is read from `settings.log_level` (e.g. "debug", "info",
/// "formbind_binder=trace"). In debug mode a pretty, human-readable format is
/// used; otherwise a structured JSON format is used. Installing a subscriber
/// when one is already set is a no-op.
pub fn setup_logging(settings: &BinderSettings) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if settings.debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .try_init()
            .ok();
    }
}

/// Creates a tracing span for one populate call.
///
/// # Examples
///
/// ```
/// use formbind_core::logging::populate_span;
///
/// let span = populate_span("SignupForm");
/// let _guard = span.enter();
/// tracing::debug!("binding");
/// ```
pub fn populate_span(record: &str) -> tracing::Span {
    tracing::debug_span!("populate", record = record)
}
