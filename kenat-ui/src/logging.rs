//! Tracing setup for hosts that do not install their own subscriber.

use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

/// Installs a global fmt subscriber.
///
/// `RUST_LOG` wins when set. Otherwise errors from everywhere and info from
/// this crate are shown. Calling this more than once, or after the host has
/// installed a subscriber, does nothing.
pub fn init_tracing() {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match EnvFilter::try_new("error,kenat_ui=info") {
            Ok(filter) => filter,
            Err(_) => EnvFilter::new("error"),
        },
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .try_init();
}
