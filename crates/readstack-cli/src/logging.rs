//! Logging setup
//!
//! Logs go to the configured log file when there is one, otherwise to
//! stderr at warn level. `RUST_LOG` overrides the default filter.

use std::fs::OpenOptions;
use std::sync::Mutex;

use readstack_core::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Initialize tracing for the CLI
pub fn init(config: &Config) {
    match &config.log_file {
        Some(path) => {
            let log_file = match OpenOptions::new().create(true).append(true).open(path) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("Warning: Could not open log file {:?}: {}", path, e);
                    return;
                }
            };

            let env_filter = EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("readstack_core=info,readstack_cli=info"));

            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(log_file))
                .try_init();

            info!("logging initialized to {:?}", path);
        }
        None => {
            let env_filter =
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}
