use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use spdlog::sink::{RotatingFileSink, RotationPolicy, StdStream, StdStreamSink};
use spdlog::{Level, LevelFilter, Logger, LoggerBuilder};

use crate::config::{Config, Log, LogLevel};

const LOG_DIR: &str = "log";
const LOG_FILE_NAME: &str = "crosspost.log";
const KEEP_DAYS: usize = 30;

impl From<LogLevel> for Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Critical => Level::Critical,
            LogLevel::Error => Level::Error,
            LogLevel::Warn => Level::Warn,
            LogLevel::Info => Level::Info,
            LogLevel::Debug => Level::Debug,
            LogLevel::Trace => Level::Trace,
        }
    }
}

/// `[log] location`, else `<cache_dir>/log/crosspost.log`, next to the drafts and the LinkedIn copy.
pub fn log_location(config: &Config, log: &Log) -> PathBuf {
    match log.location {
        Some(ref location) => location.clone(),
        None => config.cache_dir().join(LOG_DIR).join(LOG_FILE_NAME),
    }
}

/// Progress on stdout, warnings and errors on stderr.
fn add_console_sinks(builder: &mut LoggerBuilder) -> spdlog::Result<()> {
    let stdout = Arc::new(StdStreamSink::builder()
        .std_stream(StdStream::Stdout)
        .level_filter(LevelFilter::MoreVerbose(Level::Warn))
        .build()?);

    let stderr = Arc::new(StdStreamSink::builder()
        .std_stream(StdStream::Stderr)
        .level_filter(LevelFilter::MoreSevereEqual(Level::Warn))
        .build()?);

    builder.sink(stdout).sink(stderr);

    Ok(())
}

/// Without a `[log]` section the default console logger stays in place.
///
/// Each run is short, so the file is flushed at every info record instead of on a timer only.
pub fn configure_logger(config: &Config) -> spdlog::Result<()> {
    let Some(ref log) = config.log else {
        return Ok(());
    };

    let file_sink = Arc::new(RotatingFileSink::builder()
        .base_path(log_location(config, log))
        .rotation_policy(RotationPolicy::Daily { hour: 0, minute: 0 })
        .max_files(KEEP_DAYS)
        .rotate_on_open(false)
        .build()?);

    let mut builder = Logger::builder();
    builder.name("crosspost").sink(file_sink);
    if log.log_to_console {
        add_console_sinks(&mut builder)?;
    }

    let logger = Arc::new(builder.build()?);
    logger.set_flush_level_filter(LevelFilter::MoreSevereEqual(Level::Info));
    logger.set_flush_period(Some(Duration::from_secs(2)));
    logger.set_level_filter(LevelFilter::MoreSevereEqual(log.level.into()));

    spdlog::set_default_logger(logger);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn log(location: Option<&str>) -> Log {
        Log { level: LogLevel::Info, log_to_console: false, location: location.map(PathBuf::from) }
    }

    #[test]
    fn test_log_location() {
        let mut config = Config::default();
        config.paths.cache_dir = Some(PathBuf::from("/tmp/crosspost-cache"));

        assert_eq!(log_location(&config, &log(None)), Path::new("/tmp/crosspost-cache/log/crosspost.log"));
        assert_eq!(log_location(&config, &log(Some("/var/log/cp.log"))), Path::new("/var/log/cp.log"));
    }

    #[test]
    fn test_level_mapping() {
        assert_eq!(Level::from(LogLevel::Warn), Level::Warn);
        assert_eq!(Level::from(LogLevel::Trace), Level::Trace);
    }
}
