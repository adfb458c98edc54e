//! # Logger
//!
//! Subscriber bootstrap for processes that host a shared symloc registry.
//! Configures console and rolling-file output with environment-based filtering, and a
//! dedicated directive for the registry's own resolution traces.
//!
//! * Use [`LoggerBuilder::registry_level`] to raise or lower only the resolver chatter
//!   (everything under the [`REGISTRY_TARGET`] module tree).
//! * Use [`Logger::from_config`] to drive the whole setup from the `logging` section of a
//!   [`LoaderConfig`](symloc_domain::config::LoaderConfig).
//! * Use [`LoggerBuilder::scoped`] to capture events of a single closure without touching the
//!   global subscriber.
//!
//! ## Example
//!
//! ```rust
//! # use symloc_logger::{Logger, LevelFilter};
//!
//! let _logger = Logger::builder()
//!     .name("worker-pool")
//!     .console(true)
//!     .level(LevelFilter::INFO)
//!     .registry_level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use private::Sealed;
use std::fs;
use std::path::PathBuf;
use symloc_domain::config::LoggingConfig;
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Tracing target used by the registry crate for mutation and resolution events.
pub const REGISTRY_TARGET: &str = "symloc_registry";

const DEFAULT_MAX_FILES: usize = 10;
const LOG_FILE_SUFFIX: &str = "log";

#[derive(Debug)]
struct LoggerConfig {
    console: bool,
    path: Option<PathBuf>,
    level: LevelFilter,
    registry_level: Option<LevelFilter>,
    rotation: Rotation,
    max_files: usize,
    json: bool,
    env_filter: Option<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            console: true,
            path: None,
            level: LevelFilter::INFO,
            registry_level: None,
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
            json: false,
            env_filter: None,
        }
    }
}

#[derive(Debug)]
pub struct NoName;
#[derive(Debug)]
pub struct WithName(String);
#[derive(Debug)]
pub struct NoFile;
#[derive(Debug)]
pub struct WithFile;

mod private {
    pub trait Sealed {}
}
impl Sealed for NoName {}
impl Sealed for WithName {}
impl Sealed for NoFile {}
impl Sealed for WithFile {}

/// A builder for configuring and installing the global tracing subscriber.
#[derive(Debug)]
pub struct LoggerBuilder<N: Sealed = NoName, F: Sealed = NoFile> {
    config: LoggerConfig,
    name: N,
    file_state: std::marker::PhantomData<F>,
}

impl<F: Sealed> LoggerBuilder<NoName, F> {
    /// Sets the name of the logger; also the prefix of rolling log files.
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<WithName, F> {
        LoggerBuilder {
            name: WithName(name.into()),
            config: self.config,
            file_state: std::marker::PhantomData,
        }
    }
}

impl LoggerBuilder<WithName, WithFile> {
    /// Maximum number of rotated log files to keep.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn max_files(mut self, max: usize) -> Self {
        self.config.max_files = max;
        self
    }

    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn rotation(mut self, rotation: Rotation) -> Self {
        self.config.rotation = rotation;
        self
    }

    /// Writes the file output as JSON lines.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn json(mut self) -> Self {
        self.config.json = true;
        self
    }
}

impl<F: Sealed> LoggerBuilder<WithName, F> {
    /// Minimum level emitted when neither `RUST_LOG` nor an explicit filter says otherwise.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.config.level = level;
        self
    }

    /// Level applied to the [`REGISTRY_TARGET`] only.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn registry_level(mut self, level: LevelFilter) -> Self {
        self.config.registry_level = Some(level);
        self
    }

    /// Adds an explicit env filter (e.g., `myhost=debug,symloc_registry=trace`).
    ///
    /// Invalid filters make [`LoggerBuilder::init`] return an error.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.env_filter = Some(filter.into());
        self
    }

    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.config.console = enabled;
        self
    }

    /// Sets the directory for rolling log files.
    pub fn path(self, path: impl Into<PathBuf>) -> LoggerBuilder<WithName, WithFile> {
        let mut config = self.config;
        config.path = Some(path.into());
        LoggerBuilder { config, name: self.name, file_state: std::marker::PhantomData }
    }

    /// Consumes the builder and installs the global tracing subscriber.
    ///
    /// The returned [`Logger`] owns the non-blocking writer guard; keep it alive for as long
    /// as the process logs to files.
    ///
    /// # Errors
    /// Returns [`LoggerError::Subscriber`] if a global subscriber has already been set,
    /// [`LoggerError::InvalidConfiguration`] for invalid builder settings and
    /// [`LoggerError::Io`] if the log directory cannot be created.
    pub fn init(self) -> Result<Logger, LoggerError> {
        let (subscriber, guard) = self.assemble()?;
        subscriber.try_init()?;
        Ok(Logger { guard })
    }

    /// Runs `f` with the configured subscriber as the thread's default and flushes file
    /// output before returning. The global subscriber is left alone.
    ///
    /// # Errors
    /// Same configuration and I/O errors as [`LoggerBuilder::init`].
    pub fn scoped<R>(self, f: impl FnOnce() -> R) -> Result<R, LoggerError> {
        let (subscriber, guard) = self.assemble()?;
        let out = tracing::subscriber::with_default(subscriber, f);
        drop(guard);
        Ok(out)
    }

    fn assemble(
        self,
    ) -> Result<(impl Subscriber + Send + Sync + 'static, Option<WorkerGuard>), LoggerError> {
        validate_config(&self.config, &self.name.0)?;

        let env_filter = build_env_filter(&self.config)?;

        let mut layers = Vec::new();

        if self.config.console {
            layers.push(layer().compact().with_ansi(true).boxed());
        }

        let guard = if let Some(path) = self.config.path {
            fs::create_dir_all(&path)
                .context(format!("Creating log directory {}", path.display()))?;

            let file_appender = RollingFileAppender::builder()
                .rotation(self.config.rotation)
                .filename_prefix(&self.name.0)
                .filename_suffix(LOG_FILE_SUFFIX)
                .max_log_files(self.config.max_files)
                .build(path)?;

            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let file_layer = layer().with_writer(non_blocking).with_ansi(false);

            layers.push(if self.config.json { file_layer.json().boxed() } else { file_layer.boxed() });
            Some(guard)
        } else {
            None
        };

        if layers.is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "Neither console nor file output is enabled".into(),
                context: None,
            });
        }

        Ok((tracing_subscriber::registry().with(env_filter).with(layers), guard))
    }
}

/// A handle to the installed logging system.
#[must_use = "Dropping this handle will stop background logging threads."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    /// Returns a new [`LoggerBuilder`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use symloc_logger::{LevelFilter, Logger};
    ///
    /// let _logger = Logger::builder()
    ///     .name("worker-pool")
    ///     .level(LevelFilter::DEBUG)
    ///     .init()
    ///     .unwrap();
    /// ```
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder {
            config: LoggerConfig::default(),
            name: NoName,
            file_state: std::marker::PhantomData,
        }
    }

    /// Installs the global subscriber described by a `logging` config section.
    ///
    /// # Errors
    /// Returns [`LoggerError::InvalidConfiguration`] for unknown level names, plus every error
    /// of [`LoggerBuilder::init`].
    pub fn from_config(config: &LoggingConfig) -> Result<Self, LoggerError> {
        let mut builder = Self::builder()
            .name(config.name.as_str())
            .level(parse_level(&config.level)?)
            .console(config.console);
        if let Some(level) = &config.registry_level {
            builder = builder.registry_level(parse_level(level)?);
        }
        if let Some(filter) = &config.filter {
            builder = builder.env_filter(filter.as_str());
        }

        let Some(path) = &config.path else {
            return builder.init();
        };
        let builder = builder.path(path).max_files(config.max_files);
        if config.json { builder.json().init() } else { builder.init() }
    }

    /// Returns the non-blocking writer guard, present only when file output is enabled.
    #[must_use]
    pub const fn guard(&self) -> Option<&WorkerGuard> {
        self.guard.as_ref()
    }
}

fn validate_config(config: &LoggerConfig, name: &str) -> Result<(), LoggerError> {
    if name.trim().is_empty() {
        return Err(LoggerError::InvalidConfiguration {
            message: "Logger name cannot be empty".into(),
            context: None,
        });
    }

    if config.max_files == 0 {
        return Err(LoggerError::InvalidConfiguration {
            message: "max_files must be greater than zero".into(),
            context: None,
        });
    }

    Ok(())
}

fn parse_level(level: &str) -> Result<LevelFilter, LoggerError> {
    level.trim().parse().map_err(|e| LoggerError::InvalidConfiguration {
        message: format!("Unknown log level '{level}': {e}").into(),
        context: None,
    })
}

fn build_env_filter(config: &LoggerConfig) -> Result<EnvFilter, LoggerError> {
    let builder = EnvFilter::builder().with_default_directive(config.level.into());

    let mut filter = config.env_filter.as_ref().map_or_else(
        || Ok(builder.from_env_lossy()),
        |filter| {
            builder.parse(filter).map_err(|e| LoggerError::InvalidConfiguration {
                message: format!("Invalid env filter '{filter}': {e}").into(),
                context: None,
            })
        },
    )?;

    if let Some(level) = config.registry_level {
        let directive = format!("{REGISTRY_TARGET}={level}").parse().map_err(|e| {
            LoggerError::InvalidConfiguration {
                message: format!("Invalid registry level '{level}': {e}").into(),
                context: None,
            }
        })?;
        filter = filter.add_directive(directive);
    }

    Ok(filter)
}
