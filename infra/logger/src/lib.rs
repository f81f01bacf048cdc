//! # Logger
//!
//! Installs the global `tracing` subscriber for Verity binaries: a compact console layer on
//! stderr (stdout is reserved for command output) and an optional daily-rolling file sink
//! written through a non-blocking worker, plain text or JSON.
//!
//! Binaries call [`Logger::from_config`] with the `[logging]` section of the configuration.
//! The builder is there for callers that assemble settings themselves.
//!
//! ## Example
//!
//! ```rust
//! # use verity_logger::{FileSink, LevelFilter, Logger};
//! # let dir = tempfile::tempdir().unwrap();
//! let _logger = Logger::builder()
//!     .name("verity")
//!     .level(LevelFilter::DEBUG)
//!     .env_filter("verity_ownership=trace")
//!     .file(FileSink::new(dir.path()).json(true))
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;

use private::Sealed;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};
use verity_domain::config::LoggingConfig;

const LOG_FILE_SUFFIX: &str = "log";

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

/// Rolling log file output: one file per day, at most `max_files` kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSink {
    dir: PathBuf,
    max_files: usize,
    json: bool,
}

impl FileSink {
    pub const DEFAULT_MAX_FILES: usize = 10;

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), max_files: Self::DEFAULT_MAX_FILES, json: false }
    }

    #[must_use]
    pub const fn max_files(mut self, max: usize) -> Self {
        self.max_files = max;
        self
    }

    /// JSON lines instead of plain text. The console is never JSON.
    #[must_use]
    pub const fn json(mut self, enabled: bool) -> Self {
        self.json = enabled;
        self
    }

    fn layer<S>(&self, prefix: &str) -> Result<(BoxedLayer<S>, WorkerGuard), LoggerError>
    where
        S: Subscriber + for<'a> LookupSpan<'a> + 'static,
    {
        fs::create_dir_all(&self.dir)
            .context(format!("Creating {}", self.dir.display()))?;

        let appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix(prefix)
            .filename_suffix(LOG_FILE_SUFFIX)
            .max_log_files(self.max_files)
            .build(&self.dir)?;
        let (writer, guard) = tracing_appender::non_blocking(appender);

        let plain = fmt::layer().with_writer(writer).with_ansi(false);
        let layer = if self.json { plain.json().boxed() } else { plain.boxed() };
        Ok((layer, guard))
    }
}

#[derive(Debug)]
pub struct NoName;
#[derive(Debug)]
pub struct WithName(String);

mod private {
    pub trait Sealed {}
}
impl Sealed for NoName {}
impl Sealed for WithName {}

/// Collects output settings; [`LoggerBuilder::init`] is reachable once a name is set.
#[derive(Debug)]
pub struct LoggerBuilder<N: Sealed = NoName> {
    name: N,
    level: LevelFilter,
    directives: Option<String>,
    console: bool,
    file: Option<FileSink>,
}

impl LoggerBuilder<NoName> {
    /// Names the logger. The name also prefixes log file names.
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<WithName> {
        LoggerBuilder {
            name: WithName(name.into()),
            level: self.level,
            directives: self.directives,
            console: self.console,
            file: self.file,
        }
    }
}

impl<N: Sealed> LoggerBuilder<N> {
    #[must_use]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Directives such as `verity_ownership=debug`. They replace `RUST_LOG`.
    #[must_use]
    pub fn env_filter(mut self, directives: impl Into<String>) -> Self {
        self.directives = Some(directives.into());
        self
    }

    #[must_use]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.console = enabled;
        self
    }

    #[must_use]
    pub fn file(mut self, sink: FileSink) -> Self {
        self.file = Some(sink);
        self
    }
}

impl LoggerBuilder<WithName> {
    /// Installs the global subscriber.
    ///
    /// Keep the returned [`Logger`] alive until shutdown: it owns the file writer's
    /// [`WorkerGuard`], and lines still buffered when it drops are lost.
    ///
    /// # Errors
    /// * [`LoggerError::InvalidConfiguration`] for an empty name, a bad directive, a file sink
    ///   keeping zero files, or no output at all.
    /// * [`LoggerError::Io`] / [`LoggerError::Appender`] when the log directory is unusable.
    /// * [`LoggerError::Subscriber`] when a global subscriber is already installed.
    pub fn init(self) -> Result<Logger, LoggerError> {
        self.check()?;
        let filter = self.filter()?;

        let mut layers: Vec<BoxedLayer<_>> = Vec::with_capacity(2);
        if self.console {
            layers.push(fmt::layer().compact().with_writer(io::stderr).boxed());
        }
        let guard = match &self.file {
            Some(sink) => {
                let (layer, guard) = sink.layer(&self.name.0)?;
                layers.push(layer);
                Some(guard)
            },
            None => None,
        };

        tracing_subscriber::registry().with(filter).with(layers).try_init()?;
        Ok(Logger { guard })
    }

    fn check(&self) -> Result<(), LoggerError> {
        let invalid = |message: &'static str| {
            Err(LoggerError::InvalidConfiguration { message: message.into(), context: None })
        };

        if self.name.0.trim().is_empty() {
            return invalid("Logger name cannot be empty");
        }
        if self.file.as_ref().is_some_and(|sink| sink.max_files == 0) {
            return invalid("max_files must be greater than zero");
        }
        if !self.console && self.file.is_none() {
            return invalid("No output enabled; turn on the console or set a log path");
        }
        Ok(())
    }

    fn filter(&self) -> Result<EnvFilter, LoggerError> {
        let builder = EnvFilter::builder().with_default_directive(self.level.into());
        match &self.directives {
            None => Ok(builder.from_env_lossy()),
            Some(directives) => {
                builder.parse(directives).map_err(|e| LoggerError::InvalidConfiguration {
                    message: format!("Invalid env filter '{directives}': {e}").into(),
                    context: None,
                })
            },
        }
    }
}

/// Handle to the installed subscriber.
#[must_use = "Dropping this handle stops the background log writer."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    #[must_use]
    pub const fn builder() -> LoggerBuilder {
        LoggerBuilder {
            name: NoName,
            level: LevelFilter::INFO,
            directives: None,
            console: true,
            file: None,
        }
    }

    /// Installs the subscriber described by the `[logging]` configuration section.
    ///
    /// # Errors
    /// [`LoggerError::InvalidConfiguration`] for an unknown level name, otherwise the errors of
    /// [`LoggerBuilder::init`].
    pub fn from_config(name: &str, config: &LoggingConfig) -> Result<Self, LoggerError> {
        Self::builder_from_config(name, config)?.init()
    }

    fn builder_from_config(
        name: &str,
        config: &LoggingConfig,
    ) -> Result<LoggerBuilder<WithName>, LoggerError> {
        let mut builder =
            Self::builder().name(name).level(parse_level(&config.level)?).console(config.console);
        if let Some(directives) = &config.env_filter {
            builder = builder.env_filter(directives.as_str());
        }
        if let Some(dir) = &config.path {
            builder = builder.file(FileSink::new(dir).max_files(config.max_files).json(config.json));
        }
        Ok(builder)
    }

    /// Whether log lines also go to a file.
    #[must_use]
    pub const fn writes_file(&self) -> bool {
        self.guard.is_some()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::debug!("Flushing log file");
        }
    }
}

/// Parses a level name such as `info` or `DEBUG`.
///
/// # Errors
/// Returns [`LoggerError::InvalidConfiguration`] for anything `tracing` does not know.
pub fn parse_level(level: &str) -> Result<LevelFilter, LoggerError> {
    LevelFilter::from_str(level.trim()).map_err(|e| LoggerError::InvalidConfiguration {
        message: format!("Invalid log level '{level}': {e}").into(),
        context: None,
    })
}
