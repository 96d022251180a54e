//! Logging setup for the `apm-sourcemap` command.
//!
//! The library emits its own `tracing` events (already gated by the plugin's
//! `logLevel`), so the subscriber lets them all through by default and only
//! filters the CLI's own output.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "apm_sourcemap=trace,apm_sourcemap_cli=info";
const VERBOSE_FILTER: &str = "apm_sourcemap=trace,apm_sourcemap_cli=debug";
const QUIET_FILTER: &str = "apm_sourcemap=error,apm_sourcemap_cli=error";

/// Initialize the tracing subscriber.
///
/// `verbose` wins over `RUST_LOG`, `quiet` keeps errors only, and otherwise
/// `RUST_LOG` is honored when set.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let filter = select_filter(verbose, quiet);

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color && should_use_colors())
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

fn select_filter(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Whether stderr output should be colored.
///
/// `NO_COLOR` disables colors, `FORCE_COLOR` forces them, otherwise the
/// terminal decides.
pub fn should_use_colors() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }

    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }

    console::Term::stderr().features().colors_supported()
}
