#[macro_use]
extern crate clap;

mod app;

use std::io;
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// The environment variable that overrides the log filter chosen on the command line
const LOG_ENV: &str = "CLADE_SORT_LOG";

fn main() {
    let cfg = app::Config::new();
    init_logging(cfg.log_level);
    debug!("{:?}", cfg);

    let result = app::sort_by_clade(&cfg).and_then(|summary| {
        for file in &summary.files {
            debug!("Created {}", file.display());
        }
        app::write_summary(&summary)
    });

    if let Err(e) = result {
        eprintln!("{}", e);
        process::exit(e.exit_code());
    }
}

/// Send log messages to stderr, filtered by `CLADE_SORT_LOG` if set and by `level` otherwise
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
