//! Console logging for the headless host.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs a stderr subscriber so stdout stays free for JSON dumps.
/// `RUST_LOG` overrides the default filter.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sim_core=info"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .init();
}
