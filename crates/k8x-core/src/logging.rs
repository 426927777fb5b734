//! Tracing setup.
//!
//! The filter comes from `K8X_LOG` (e.g. `K8X_LOG=k8x_core=debug`), falling
//! back to the caller's default. While the pager owns the terminal, logs go to
//! a file so they cannot corrupt the alternate screen.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Env var holding the log filter directives.
pub const LOG_ENV: &str = "K8X_LOG";

/// Where log lines are written.
#[derive(Debug, Clone)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

/// Builds the filter from `K8X_LOG`, or `default` when unset or invalid.
pub fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Installs the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init(target: &LogTarget, default_filter: &str) {
    let filter = env_filter(default_filter);

    match target {
        LogTarget::Stderr => {
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr).without_time())
                .with(filter)
                .try_init();
        }
        LogTarget::File(path) => match open_log_file(path) {
            Ok(file) => {
                let _ = tracing_subscriber::registry()
                    .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                    .with(filter)
                    .try_init();
            }
            Err(_) => {
                // No file means no logs; stderr would draw over the pager.
                let _ = tracing_subscriber::registry().with(filter).try_init();
            }
        },
    }
}

fn open_log_file(path: &Path) -> std::io::Result<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
