//! Tracing subscriber setup.
//!
//! `RUST_LOG` wins when set; otherwise `--verbose` means `debug` and the
//! `[logging] level` from config applies. Logs go to stderr so `run` output
//! can be piped.

use scribeloop_config::LoggingConfig;
use tracing_subscriber::EnvFilter;

pub fn init(verbose: bool, config: &LoggingConfig) {
    let default_level = if verbose { "debug" } else { config.level.as_str() };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if config.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
