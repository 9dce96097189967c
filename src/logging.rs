//! Tracing subscriber setup
//!
//! Logs go to stderr so `call` output on stdout stays machine-readable.
//! `RUST_LOG` overrides the level chosen by the CLI.

use tracing_subscriber::EnvFilter;

/// Initialize logging for the process. Later calls are no-ops.
pub fn init(default_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tripmock={}", default_level)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if json {
        let _ = builder.json().try_init();
    } else {
        let _ = builder.try_init();
    }
}
