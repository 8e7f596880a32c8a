
use flexi_logger::{Duplicate, FileSpec, Logger, LoggerHandle, with_thread, WriteMode};
use super::error::*;

///
/// Macros to write to the backing file logger.
///
pub use log::{trace as trace, debug as debug, info as info, warn as warn, error as error};

///
/// Initializes the logstream to write to the given file, and starts it.
///
/// The returned handle flushes the buffered writer when dropped, so the 
/// caller must keep it alive for as long as it intends to log.
///
pub fn initialize (path: & str, filename: & str, level: & str) -> Result<LoggerHandle>
{
    let file_spec = FileSpec::default()
        .directory(path)
        .basename(filename)
        .use_timestamp(true)
        .suffix("log");

    let logger = Logger::try_with_str(level)
        .with_context(|| format!("Invalid log specification '{}'.", level))?
        .log_to_file(file_spec)
        .write_mode(WriteMode::BufferAndFlush)
        .duplicate_to_stderr(Duplicate::Warn)
        .format_for_files(with_thread)
        .start()
        .with_context(|| format!("Failed to start the logger in '{}'.", path))?;

    Ok(logger)
}
