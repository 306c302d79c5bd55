#![deny(
    missing_docs,
    unsafe_code,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    unused_doc_comments
)]

//! Tracing output for errors passing through an errproc dispatcher.
//!
//! This crate provides a [`Processor`] that emits one `tracing` event for every
//! error it is given. Register it with a dispatcher and every processed error
//! shows up in whatever subscriber the application has installed.
//!
//! # Quick Start
//!
//! ```
//! use errproc::{Error, global};
//! use errproc_tracing::tracing_processor;
//!
//! tracing_subscriber::fmt().init();
//!
//! let logging = global::register([tracing_processor()]);
//!
//! let _ = global::process::<()>(Err(Error::new("disk full").wrap("saving draft")));
//! # logging.revoke();
//! ```
//!
//! Output:
//! ```text
//! 2026-01-01T00:00:00.000000Z ERROR errproc_tracing: error processed error=saving draft: disk full
//! ```
//!
//! # Environment Variables
//!
//! - `ERRPROC_TRACING` - Comma-separated options:
//!   - `debug` - Render errors with their recorded stacks (`{:?}`) instead of
//!     the one-line message
//!   - `cause` - Add the root cause as a separate `cause` field
//!   - `warn` - Emit events at WARN instead of ERROR

use std::{fmt, sync::OnceLock};

use errproc::{Error, Processor};
use tracing::Level;

/// Name [`TracingProcessor`] registers under.
pub const PROCESSOR_NAME: &str = "errproc_tracing";

/// A processor emitting one tracing event per error.
///
/// # Examples
///
/// Default settings, taken from the environment:
///
/// ```
/// use errproc::Dispatcher;
/// use errproc_tracing::TracingProcessor;
///
/// let dispatcher = Dispatcher::new([TracingProcessor::new()]);
/// ```
///
/// Custom configuration:
///
/// ```
/// use errproc::Dispatcher;
/// use errproc_tracing::TracingProcessor;
/// use tracing::Level;
///
/// let processor = TracingProcessor {
///     level: Level::WARN,
///     debug_format: true,
///     include_cause: false,
/// };
///
/// let dispatcher = Dispatcher::new([processor]);
/// ```
#[derive(Copy, Clone, Debug)]
pub struct TracingProcessor {
    /// Level of the emitted events.
    pub level: Level,
    /// Whether errors are rendered with `{:?}`, which includes the recorded
    /// stacks, instead of `{}`.
    pub debug_format: bool,
    /// Whether to add the root cause as a separate `cause` field.
    pub include_cause: bool,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct ErrprocTracingEnvOptions {
    debug_format: bool,
    include_cause: bool,
    warn: bool,
}

impl ErrprocTracingEnvOptions {
    fn get() -> &'static Self {
        static ERRPROC_TRACING_FLAGS: OnceLock<ErrprocTracingEnvOptions> = OnceLock::new();

        ERRPROC_TRACING_FLAGS.get_or_init(|| match std::env::var_os("ERRPROC_TRACING") {
            Some(var) => Self::parse(&var.to_string_lossy()),
            None => Self::default(),
        })
    }

    fn parse(var: &str) -> Self {
        let mut options = Self::default();
        for v in var.split(',').map(str::trim) {
            if v.eq_ignore_ascii_case("debug") {
                options.debug_format = true;
            } else if v.eq_ignore_ascii_case("cause") {
                options.include_cause = true;
            } else if v.eq_ignore_ascii_case("warn") {
                options.warn = true;
            }
        }
        options
    }
}

macro_rules! emit {
    ($level:expr, $($fields:tt)*) => {
        if $level == Level::ERROR {
            tracing::error!($($fields)*)
        } else if $level == Level::WARN {
            tracing::warn!($($fields)*)
        } else if $level == Level::INFO {
            tracing::info!($($fields)*)
        } else if $level == Level::DEBUG {
            tracing::debug!($($fields)*)
        } else {
            tracing::trace!($($fields)*)
        }
    };
}

impl TracingProcessor {
    /// Creates a new [`TracingProcessor`] with default settings.
    ///
    /// Configuration is controlled by environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `ERRPROC_TRACING` - Comma-separated options:
    ///   - `debug` - Render errors with `{:?}`
    ///   - `cause` - Add the root cause as a separate field
    ///   - `warn` - Emit events at WARN instead of ERROR
    pub fn new() -> Self {
        let env_options = ErrprocTracingEnvOptions::get();

        Self {
            level: if env_options.warn {
                Level::WARN
            } else {
                Level::ERROR
            },
            debug_format: env_options.debug_format,
            include_cause: env_options.include_cause,
        }
    }

    /// Emits the event for `err`.
    pub fn emit(&self, err: &Error) {
        let rendered = Rendered {
            err,
            debug: self.debug_format,
        };
        let cause = self.include_cause.then(|| err.cause().to_string());

        emit!(
            self.level,
            error = %rendered,
            cause = cause.as_deref(),
            "error processed"
        );
    }

    /// Converts the configuration into a [`Processor`] named
    /// [`PROCESSOR_NAME`].
    pub fn into_processor(self) -> Processor {
        Processor::named(PROCESSOR_NAME, move |err: &Error| self.emit(err))
    }
}

impl Default for TracingProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl From<TracingProcessor> for Processor {
    fn from(processor: TracingProcessor) -> Self {
        processor.into_processor()
    }
}

/// A [`TracingProcessor`] with default settings, ready to register.
pub fn tracing_processor() -> Processor {
    TracingProcessor::new().into_processor()
}

struct Rendered<'a> {
    err: &'a Error,
    debug: bool,
}

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.debug {
            fmt::Debug::fmt(self.err, f)
        } else {
            fmt::Display::fmt(self.err, f)
        }
    }
}
