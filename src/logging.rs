/// Logger setup
///
/// Everything goes to stderr. `RUST_LOG` wins over the level from the
/// settings file.
use flexi_logger::{FlexiLoggerError, Logger, LoggerHandle};

/// Initialise the global logger.
///
/// The returned handle must stay alive for the lifetime of the program.
pub fn setup_logging(base_level: &str) -> Result<LoggerHandle, FlexiLoggerError> {
    Logger::try_with_env_or_str(base_level)?
        .log_to_stderr()
        .start()
}
