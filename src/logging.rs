//! File-based logging bootstrap. The TUI owns the terminal, so diagnostics
//! go to rotated files under the data directory instead of stderr.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "moments";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

static LOGGER: OnceCell<LoggerHandle> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

/// Starts rotated file logging once per process; later calls are no-ops.
/// Initialization failures are reported but never fatal for the app.
pub fn init(level: &str, data_dir: &Path) -> Result<(), String> {
    if LOGGER.get().is_some() {
        return Ok(());
    }

    let log_dir = data_dir.join("logs");
    std::fs::create_dir_all(&log_dir)
        .map_err(|e| format!("failed to create log directory {}: {e}", log_dir.display()))?;

    let handle = Logger::try_with_str(normalize_level(level))
        .map_err(|e| format!("invalid log level {level:?}: {e}"))?
        .log_to_file(
            FileSpec::default()
                .directory(&log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|e| format!("failed to start logger: {e}"))?;

    let _ = LOGGER.set(handle);
    install_panic_hook();

    log::info!(
        "moments {} started, logging to {}",
        env!("CARGO_PKG_VERSION"),
        log_dir.display()
    );
    Ok(())
}

pub fn log_directory(data_dir: &Path) -> PathBuf {
    data_dir.join("logs")
}

fn normalize_level(level: &str) -> &str {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "warn" | "warning" => "warn",
        "error" => "error",
        _ => "info",
    }
}

/// The alternate screen swallows panic output; capture it in the log before
/// the default hook runs.
pub fn install_panic_hook() {
    if PANIC_HOOK.get().is_some() {
        return;
    }

    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = if let Some(msg) = info.payload().downcast_ref::<&str>() {
            (*msg).to_string()
        } else if let Some(msg) = info.payload().downcast_ref::<String>() {
            msg.clone()
        } else {
            "non-string panic payload".to_string()
        };
        log::error!("panic at {location}: {}", payload.replace(['\n', '\r'], " "));
        previous(info);
    }));

    let _ = PANIC_HOOK.set(());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_levels_fall_back_to_info() {
        assert_eq!(normalize_level("verbose"), "info");
        assert_eq!(normalize_level(" WARN "), "warn");
        assert_eq!(normalize_level("debug"), "debug");
    }

    #[test]
    fn log_directory_is_under_data_dir() {
        let dir = log_directory(Path::new("/tmp/moments-data"));
        assert!(dir.ends_with("logs"));
    }
}
