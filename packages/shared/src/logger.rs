//! Logging setup utilities for Pairhub binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build the default filter directive used when `RUST_LOG` is not set.
///
/// Every crate in `targets` is logged at `default_log_level`; everything else
/// falls back to `warn` so that dependencies (hyper, reqwest, ...) stay quiet.
pub fn default_directive(targets: &[&str], default_log_level: &str) -> String {
    let mut directives = vec!["warn".to_string()];
    directives.extend(
        targets
            .iter()
            .map(|target| format!("{}={}", target.replace('-', "_"), default_log_level)),
    );
    directives.join(",")
}

/// Initialize the tracing subscriber with the specified default log level.
///
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `targets` - Crate / binary names to enable (e.g. `["pairhub_server", "pairhub-server"]`)
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use pairhub_shared::logger::setup_logger;
///
/// setup_logger(&["pairhub_server", env!("CARGO_PKG_NAME")], "debug");
/// ```
pub fn setup_logger(targets: &[&str], default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive(targets, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}
