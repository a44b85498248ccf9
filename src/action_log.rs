//! Run log written inside the organized root.
//!
//! Each organizer owns its own `tracing` dispatcher instead of installing a global
//! subscriber, so two organizers (or two tests) never share logging state.
//! Lines look like:
//!
//! ```text
//! 2024-05-01 09:30:12,004 - INFO: Moved '/data/a.txt' to '/data/Organized/txt' as 'a.txt'
//! ```

use crate::config::LogLevel;
use std::fmt;
use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing::{Dispatch, Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Name of the log file created inside the organized root.
pub const LOG_FILE_NAME: &str = "organize_log.txt";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warning => LevelFilter::WARN,
            // tracing has nothing above ERROR.
            LogLevel::Error | LogLevel::Critical => LevelFilter::ERROR,
        }
    }
}

/// `<timestamp> - <LEVEL>: <message>`
struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT);
        write!(
            writer,
            "{} - {}: ",
            timestamp,
            level_name(event.metadata().level())
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn level_name(level: &Level) -> &'static str {
    if *level == Level::WARN {
        "WARNING"
    } else {
        level.as_str()
    }
}

/// A logger instance bound to one log file.
pub struct ActionLog {
    dispatch: Dispatch,
}

impl ActionLog {
    /// Opens (or creates) `path` for appending and filters events below `level`.
    pub fn open(path: &Path, level: LogLevel) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        let subscriber = tracing_subscriber::fmt()
            .with_max_level(LevelFilter::from(level))
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .event_format(LineFormat)
            .finish();

        Ok(Self {
            dispatch: Dispatch::new(subscriber),
        })
    }

    /// Runs `f` with this logger receiving every `tracing` event emitted on the
    /// current thread.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }
}

impl fmt::Debug for ActionLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionLog").finish_non_exhaustive()
    }
}
