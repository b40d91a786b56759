//! Logging configuration with file-based output and size-based rotation.
//!
//! The server writes logs to `<config dir>/matchcue/matchcue.log` with 10 MB
//! rotation. Client invocations only log to stdout. `--debug` or
//! `DEBUG_LOGGING=1` enables debug output for matchcue crates.

use rolling_file::{BasicRollingFileAppender, RollingConditionBasic};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const LOG_FILE_MAX_BYTES: u64 = 10 * 1024 * 1024;

/// Whether debug output was requested on the command line or environment.
pub fn debug_requested(flag: bool) -> bool {
    flag || std::env::var("DEBUG_LOGGING").is_ok()
}

fn filter(debug_logging: bool) -> EnvFilter {
    if debug_logging {
        EnvFilter::new("info,matchcue=debug,matchcue_core=debug")
    } else {
        EnvFilter::new("info")
    }
}

/// Initialize logging with dual output (file + stdout).
///
/// Returns a `WorkerGuard` that must be held until exit so buffered lines
/// are flushed. Falls back to stdout-only logging and returns `None` if the
/// log file cannot be created.
pub fn init(debug_logging: bool) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let Some(log_dir) = dirs::config_dir().map(|config| config.join("matchcue")) else {
        init_stdout_only(debug_logging);
        return None;
    };

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        // Subscriber not installed yet
        eprintln!(
            "Failed to create log directory {:?}: {}, using stdout only",
            log_dir, e
        );
        init_stdout_only(debug_logging);
        return None;
    }

    // Keep matchcue.log and matchcue.log.1
    let log_path = log_dir.join("matchcue.log");
    let file_appender = match BasicRollingFileAppender::new(
        &log_path,
        RollingConditionBasic::new().max_size(LOG_FILE_MAX_BYTES),
        1,
    ) {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("Failed to create log file at {:?}: {}", log_path, e);
            init_stdout_only(debug_logging);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer)
        .with(filter(debug_logging))
        .init();

    tracing::info!(
        log_file = ?log_path,
        debug_logging,
        "matchcue logging initialized"
    );

    Some(guard)
}

/// Stdout-only logging, used by the client and as the fallback.
pub fn init_stdout_only(debug_logging: bool) {
    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(filter(debug_logging))
        .init();
}
