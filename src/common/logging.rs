//! Logging and tracing configuration
//!
//! Command tracing (`DEBUGGER_TEST_TRACE=YES`) writes straight to stderr;
//! everything else goes through `tracing`.

use colored::Colorize;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing for the CLI (stderr logging)
///
/// Logs are controlled by the `RUST_LOG` environment variable.
/// Default level is INFO for this crate, WARN for dependencies.
pub fn init_cli() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("harness=info,dbg_harness=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// Echo a labelled trace line to stderr
pub fn trace_line(label: &str, text: impl std::fmt::Display) {
    eprintln!("{} {}", label.cyan(), text);
}

/// Echo a match outcome after an expectation line
pub fn trace_match(matched: bool) {
    if matched {
        eprintln!("{}", "Matched".green());
    } else {
        eprintln!("{}", "Not matched".red());
    }
}
