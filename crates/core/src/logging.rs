//! Log output for the resolver binaries.
//!
//! Records go to `<log dir>/<component>.<date>`, rolled daily. The directory
//! is `$MODSCOPE_LOG_DIR` when set, else `~/.modscope/logs`. The filter is
//! read from `MODSCOPE_LOG`, then `RUST_LOG`, and defaults to `info`.

use std::ffi::OsString;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub const LOG_DIR_ENV: &str = "MODSCOPE_LOG_DIR";
pub const LOG_FILTER_ENV: &str = "MODSCOPE_LOG";
const DEFAULT_FILTER: &str = "info";

pub fn log_dir() -> PathBuf {
    resolve_log_dir(std::env::var_os(LOG_DIR_ENV), std::env::var_os("HOME"))
}

fn resolve_log_dir(explicit: Option<OsString>, home: Option<OsString>) -> PathBuf {
    match (explicit, home) {
        (Some(dir), _) if !dir.is_empty() => PathBuf::from(dir),
        (_, Some(home)) => PathBuf::from(home).join(".modscope").join("logs"),
        _ => PathBuf::from(".modscope").join("logs"),
    }
}

fn filter_directives(own: Option<String>, rust_log: Option<String>) -> String {
    let set = |directives: &String| !directives.trim().is_empty();
    own.filter(set)
        .or(rust_log.filter(set))
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

fn env_filter() -> EnvFilter {
    let directives = filter_directives(
        std::env::var(LOG_FILTER_ENV).ok(),
        std::env::var("RUST_LOG").ok(),
    );
    EnvFilter::try_new(&directives).unwrap_or_else(|e| {
        eprintln!("Ignoring log filter {directives:?}: {e}");
        EnvFilter::new(DEFAULT_FILTER)
    })
}

/// Install the global subscriber. Keep the returned guard alive until exit,
/// or buffered records are lost.
pub fn init_logging(component: &str, to_stderr: bool) -> WorkerGuard {
    let log_dir = log_dir();
    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Cannot create log directory {}: {}", log_dir.display(), e);
    }

    let file_appender = tracing_appender::rolling::daily(&log_dir, component);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);
    let stderr_layer = to_stderr.then(|| {
        fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(false)
    });

    // A second call (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(env_filter())
        .with(file_layer)
        .with(stderr_layer)
        .try_init();

    guard
}
