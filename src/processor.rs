use alloc::sync::Arc;
use core::fmt;

use crate::Error;

type ProcessorFn = dyn Fn(&Error) + Send + Sync + 'static;

/// A side-effecting callback run with every error that reaches a
/// [`Dispatcher`](crate::Dispatcher).
///
/// Processors log, alert, count or store errors. They cannot change the error
/// and their outcome is not observed: a panicking processor unwinds into the
/// caller of [`Dispatcher::process`](crate::Dispatcher::process).
///
/// Every processor carries a display name used by
/// [`Dispatcher::debug`](crate::Dispatcher::debug). [`Processor::new`] derives
/// it from the callable's type name; [`Processor::named`] sets it explicitly.
///
/// Cloning a processor is cheap: the name and the callable are both shared,
/// so a clone never allocates. Clones share behavior, but every time a
/// processor is registered it becomes an independent entry with its own
/// [`ProcessorHandle`](crate::registry::ProcessorHandle).
///
/// # Examples
///
/// ```rust
/// use errproc::{Error, Processor};
///
/// let log = Processor::named("log", |err: &Error| eprintln!("error: {err}"));
/// assert_eq!(log.name(), "log");
///
/// log.process(&Error::new("disk full"));
/// ```
#[derive(Clone)]
pub struct Processor {
    name: Arc<str>,
    func: Arc<ProcessorFn>,
}

impl Processor {
    /// Creates a processor named after the type of `func`.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&Error) + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(core::any::type_name::<F>()),
            func: Arc::new(func),
        }
    }

    /// Creates a processor with an explicit display name.
    pub fn named<N, F>(name: N, func: F) -> Self
    where
        N: Into<Arc<str>>,
        F: Fn(&Error) + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    /// The display name of the processor.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the processor on `err`.
    #[inline]
    pub fn process(&self, err: &Error) {
        (self.func)(err);
    }
}

impl<F> From<F> for Processor
where
    F: Fn(&Error) + Send + Sync + 'static,
{
    fn from(func: F) -> Self {
        Self::new(func)
    }
}

impl From<&Processor> for Processor {
    fn from(processor: &Processor) -> Self {
        processor.clone()
    }
}

impl fmt::Debug for Processor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Processor").field(&self.name).finish()
    }
}
