use std::error::Error;
use std::io;
use std::path::Path;
use std::sync::Once;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

use crate::error::ConfigError;

/// Environment variable holding the log filter, e.g. `RETYPE_LOG=retype=trace`.
pub const LOG_ENV: &str = "RETYPE_LOG";

/// Send tracing output to `path`.
///
/// The terminal is in raw mode on the alternate screen, so logs only ever go
/// to a file, and only when asked for. Keep the returned guard alive until
/// exit or buffered lines are lost. Returns `Ok(None)` if a global subscriber
/// is already installed.
pub fn init(path: &Path) -> Result<Option<WorkerGuard>, ConfigError> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let dir = dir.unwrap_or_else(|| Path::new("."));
    let file_name = path.file_name().ok_or_else(|| {
        log_file_error(path, io::Error::new(io::ErrorKind::InvalidInput, "not a file path"))
    })?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(dir)
        .map_err(|err| log_file_error(path, err))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init();
    if installed.is_err() {
        return Ok(None);
    }

    install_panic_hook();
    Ok(Some(guard))
}

fn log_file_error(path: &Path, source: impl Into<Box<dyn Error + Send + Sync>>) -> ConfigError {
    ConfigError::LogFile {
        path: path.to_path_buf(),
        source: source.into(),
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "retype::panic", %info, "panic");
            default_panic(info);
        }));
    });
}
