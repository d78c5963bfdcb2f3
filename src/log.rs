//! Logging.
//!
//! The decoder library only ever uses the `log` facade. This module provides
//! the logger the `asn1parse` tool installs for it. Until the configuration
//! is known, everything goes to stderr. Afterwards,
//! [`Logger::switch_logging`] redirects output to the configured target.

use std::{fmt, fs, io, process};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, OnceLock};
use chrono::{DateTime, Local};
use chrono::format::{Item, Numeric, Pad};
use log::{LevelFilter, error};
use crate::config::{Config, LogTarget};
use crate::error::Failed;


//------------ Logger --------------------------------------------------------

/// Format and write log messages.
pub struct Logger {
    /// Where to write messages to.
    target: Mutex<LogBackend>,
}

/// The actual target for logging
enum LogBackend {
    File {
        file: fs::File,
        path: PathBuf,
    },
    Stderr {
        stderr: io::Stderr,
    }
}

impl Logger {
    /// Initialize logging.
    ///
    /// All diagnostic output of the tool is done via logging, never to
    /// stderr directly. Thus, it is important to initialize logging before
    /// doing anything else that may result in such output. This function
    /// does exactly that. It sets a maximum log level of `warn`, leading
    /// only printing important information, and directs all logging to
    /// stderr.
    pub fn init() -> Result<(), Failed> {
        log::set_max_level(LevelFilter::Warn);
        if let Err(err) = log::set_logger(&GLOBAL_LOGGER) {
            eprintln!("Failed to initialize logger: {err}.\nAborting.");
            return Err(Failed)
        }
        Ok(())
    }

    /// Switches logging to the configured target.
    ///
    /// Once the configuration has been successfully loaded, logging should
    /// be switched to whatever the user asked for via this method.
    pub fn switch_logging(config: &Config) -> Result<(), Failed> {
        let logger = Logger::new(config)?;
        GLOBAL_LOGGER.switch(logger)?;
        log::set_max_level(config.log_level);
        Ok(())
    }

    /// Creates a new logger from the config.
    fn new(config: &Config) -> Result<Self, Failed> {
        let target = match config.log_target {
            LogTarget::File(ref path) => {
                Self::new_file_target(path.clone())?
            }
            LogTarget::Stderr => {
                LogBackend::Stderr { stderr: io::stderr() }
            }
        };
        Ok(Self { target: Mutex::new(target) })
    }

    fn new_file_target(path: PathBuf) -> Result<LogBackend, Failed> {
        Ok(LogBackend::File {
            file: match Self::open_log_file(&path) {
                Ok(file) => file,
                Err(err) => {
                    error!(
                        "Failed to open log file '{}': {}",
                        path.display(), err
                    );
                    return Err(Failed)
                }
            },
            path
        })
    }

    /// Opens a log file.
    fn open_log_file(path: &Path) -> Result<fs::File, io::Error> {
        fs::OpenOptions::new().create(true).append(true).open(path)
    }

    /// Acquires the backend, taking over a poisoned lock.
    fn backend(&self) -> MutexGuard<LogBackend> {
        self.target.lock().unwrap_or_else(|err| err.into_inner())
    }

    /// Logs a message.
    ///
    /// This method may exit the whole process if logging fails.
    fn log(&self, record: &log::Record) {
        if let Err(err) = self.try_log(record) {
            self.log_failure(err);
        }
    }

    /// Tries logging a message and returns an error if there is one.
    fn try_log(&self, record: &log::Record) -> Result<(), io::Error> {
        let mut backend = self.backend();
        match *backend {
            LogBackend::File { ref mut file, .. } => {
                writeln!(
                    file, "[{}] [{}] {}",
                    format_local_iso_date(Local::now()),
                    record.level(),
                    record.args()
                )
            }
            LogBackend::Stderr { ref mut stderr } => {
                // We never fail when writing to stderr.
                let _ = writeln!(
                    stderr, "[{}] {}", record.level(), record.args()
                );
                Ok(())
            }
        }
    }

    /// Handles an error that happened during logging.
    fn log_failure(&self, err: io::Error) -> ! {
        // We try to write a meaningful message to stderr and then abort.
        if let LogBackend::File { ref path, .. } = *self.backend() {
            eprintln!(
                "Logging to file {} failed: {}. Exiting.",
                path.display(),
                err
            );
        }
        process::exit(1)
    }

    /// Flushes the logging backend.
    fn flush(&self) {
        let mut backend = self.backend();
        match *backend {
            LogBackend::File { ref mut file, .. } => {
                let _ = file.flush();
            }
            LogBackend::Stderr { ref mut stderr } => {
                let _  = stderr.lock().flush();
            }
        }
    }
}


//------------ GlobalLogger --------------------------------------------------

/// The global logger.
///
/// A value of this type can go into a static. Until a proper logger is
/// installed, it just writes all log output to stderr.
struct GlobalLogger {
    /// The real logger. Can only be set once.
    inner: OnceLock<Logger>,
}

/// The static for the log crate.
static GLOBAL_LOGGER: GlobalLogger = GlobalLogger::new();

impl GlobalLogger {
    /// Creates a new provisional logger.
    const fn new() -> Self {
        GlobalLogger { inner: OnceLock::new() }
    }

    /// Switches to the proper logger.
    fn switch(&self, logger: Logger) -> Result<(), Failed> {
        if self.inner.set(logger).is_err() {
            error!("Tried to switch logger more than once.");
            return Err(Failed)
        }
        Ok(())
    }
}


impl log::Log for GlobalLogger {
    fn enabled(&self, _: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        match self.inner.get() {
            Some(logger) => logger.log(record),
            None => {
                let _ = writeln!(
                    io::stderr().lock(), "[{}] {}",
                    record.level(), record.args()
                );
            }
        }
    }

    fn flush(&self) {
        if let Some(logger) = self.inner.get() {
            logger.flush()
        }
    }
}


//------------ Helper Functions ----------------------------------------------

/// Formats a local time as an ISO 8601 date without time zone.
fn format_local_iso_date(date: DateTime<Local>) -> impl fmt::Display {
    const LOCAL_ISO_DATE: &[Item<'static>] = &[
        Item::Numeric(Numeric::Year, Pad::Zero),
        Item::Literal("-"),
        Item::Numeric(Numeric::Month, Pad::Zero),
        Item::Literal("-"),
        Item::Numeric(Numeric::Day, Pad::Zero),
        Item::Literal("T"),
        Item::Numeric(Numeric::Hour, Pad::Zero),
        Item::Literal(":"),
        Item::Numeric(Numeric::Minute, Pad::Zero),
        Item::Literal(":"),
        Item::Numeric(Numeric::Second, Pad::Zero),
    ];

    date.format_with_items(LOCAL_ISO_DATE.iter())
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn local_iso_date() {
        let date = Local.with_ymd_and_hms(2014, 11, 28, 21, 5, 9).unwrap();
        assert_eq!(
            format_local_iso_date(date).to_string(),
            "2014-11-28T21:05:09"
        );
    }

    #[test]
    fn file_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("asn1parse.log");
        let logger = Logger {
            target: Mutex::new(
                Logger::new_file_target(path.clone()).unwrap()
            )
        };
        logger.log(
            &log::Record::builder()
                .level(log::Level::Warn)
                .args(format_args!("data has trailing octets"))
                .build()
        );
        logger.flush();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.ends_with("] [WARN] data has trailing octets\n"));
        assert!(content.starts_with('['));
    }
}
