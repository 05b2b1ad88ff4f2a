//! Logging initialization
//!
//! Diagnostics go through `tracing` to stderr; user-facing progress lines
//! are printed by the `ui` module.

use std::sync::Once;

use tracing::Subscriber;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static INIT_ONCE: Once = Once::new();

/// Installs the global subscriber.
///
/// `RUST_LOG` wins when set. Otherwise only warnings are shown, or
/// everything from this crate down to `debug` when `verbose` is set.
pub fn init(verbose: bool) {
    INIT_ONCE.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));
        subscriber(filter).init();
    });
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "ghidra_provision=debug"
    } else {
        "ghidra_provision=warn"
    }
}

fn subscriber(filter: EnvFilter) -> impl Subscriber + Send + Sync {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(filter)
        .finish()
}
