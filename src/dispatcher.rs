use alloc::{borrow::Cow, string::String, vec::Vec};
use core::fmt::{self, Write as _};

use crate::{
    Error, Processor,
    registry::{ProcessorHandle, ProcessorRegistry},
};

/// The central dispatch point errors are passed through.
///
/// A dispatcher owns one [`ProcessorRegistry`]. Whenever an error is handed to
/// [`process`](Self::process), every registered [`Processor`] runs with it,
/// synchronously and on the calling thread. The order in which processors
/// run is unspecified.
///
/// Most applications use the process-wide instance in [`global`](crate::global);
/// explicit dispatchers are useful for libraries and tests that need isolation.
///
/// # Examples
///
/// ```rust
/// use std::sync::{Arc, Mutex};
///
/// use errproc::{Dispatcher, Error, Processor};
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let log = Processor::named("log", {
///     let seen = seen.clone();
///     move |err: &Error| seen.lock().unwrap().push(err.to_string())
/// });
///
/// let dispatcher = Dispatcher::empty();
/// let revocation = dispatcher.register([log]);
///
/// let result: Result<(), Error> = Err(dispatcher.new_error("boom"));
/// assert!(dispatcher.process(result).is_err());
///
/// revocation.revoke();
/// let _ = dispatcher.process::<()>(Err(dispatcher.new_error("unseen")));
///
/// assert_eq!(*seen.lock().unwrap(), ["boom"]);
/// ```
pub struct Dispatcher {
    processors: ProcessorRegistry,
}

/// Revokes the processors added by one [`Dispatcher::register`] call.
///
/// Dropping a `Revocation` does not unregister anything; call
/// [`revoke`](Self::revoke) explicitly. Revoking more than once, or after the
/// set was replaced with [`Dispatcher::with`], is a no-op.
#[must_use = "dropping a Revocation leaves the processors registered"]
pub struct Revocation<'a> {
    registry: &'a ProcessorRegistry,
    handles: Vec<ProcessorHandle>,
}

impl Revocation<'_> {
    /// Removes exactly the processors this revocation was created for.
    pub fn revoke(&self) {
        self.registry.remove(&self.handles);
    }

    /// The handles of the processors covered by this revocation.
    #[must_use]
    pub fn handles(&self) -> &[ProcessorHandle] {
        &self.handles
    }
}

impl fmt::Debug for Revocation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Revocation")
            .field("handles", &self.handles)
            .finish()
    }
}

impl Dispatcher {
    /// Creates a dispatcher with no processors.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            processors: ProcessorRegistry::new(),
        }
    }

    /// Creates a dispatcher with the given processors registered.
    ///
    /// The order of `processors` has no effect on the order they run in.
    pub fn new<I>(processors: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Processor>,
    {
        let dispatcher = Self::empty();
        dispatcher.with(processors);
        dispatcher
    }

    /// The registry backing this dispatcher.
    #[must_use]
    pub fn registry(&self) -> &ProcessorRegistry {
        &self.processors
    }

    /// Lists the registered processors, one name per line.
    ///
    /// The format is meant for humans. The order follows the current
    /// snapshot and is stable as long as the set is not modified.
    #[must_use]
    pub fn debug(&self) -> String {
        let mut debug = String::new();
        for processor in self.processors.get() {
            // Writing into a String cannot fail.
            let _ = writeln!(debug, "{}", processor.name());
        }
        debug
    }

    /// Replaces every registered processor with `processors`.
    ///
    /// Outstanding [`Revocation`]s turn into no-ops.
    pub fn with<I>(&self, processors: I)
    where
        I: IntoIterator,
        I::Item: Into<Processor>,
    {
        self.processors.replace_all(processors);
    }

    /// Adds `processors` and returns a [`Revocation`] that removes exactly
    /// them again.
    pub fn register<I>(&self, processors: I) -> Revocation<'_>
    where
        I: IntoIterator,
        I::Item: Into<Processor>,
    {
        Revocation {
            registry: &self.processors,
            handles: self.processors.add(processors),
        }
    }

    /// Runs every registered processor on the error in `result`.
    ///
    /// `Ok` values pass through without touching the registry. The result is
    /// returned unchanged either way, so calls can be chained with `?`.
    ///
    /// # Panics
    ///
    /// Panics raised by a processor are not caught. They propagate to the
    /// caller and the remaining processors do not run.
    pub fn process<T>(&self, result: Result<T, Error>) -> Result<T, Error> {
        if let Err(err) = &result {
            for processor in self.processors.get() {
                processor.process(err);
            }
        }
        result
    }

    /// Runs only `processors` on the error in `result`, ignoring the
    /// registry.
    ///
    /// `Ok` values pass through without running anything.
    ///
    /// # Panics
    ///
    /// Same as [`process`](Self::process).
    pub fn process_with<T, I>(&self, result: Result<T, Error>, processors: I) -> Result<T, Error>
    where
        I: IntoIterator,
        I::Item: Into<Processor>,
    {
        if let Err(err) = &result {
            for processor in processors {
                let processor: Processor = processor.into();
                processor.process(err);
            }
        }
        result
    }

    /// See [`Error::new`].
    #[track_caller]
    #[must_use]
    pub fn new_error<M>(&self, message: M) -> Error
    where
        M: Into<Cow<'static, str>>,
    {
        Error::new(message)
    }

    /// See [`Error::from_args`].
    #[track_caller]
    #[must_use]
    pub fn errorf(&self, args: fmt::Arguments<'_>) -> Error {
        Error::from_args(args)
    }

    /// See [`Error::wrap`].
    #[track_caller]
    #[must_use]
    pub fn wrap<M>(&self, err: Error, message: M) -> Error
    where
        M: Into<Cow<'static, str>>,
    {
        err.wrap(message)
    }

    /// See [`Error::wrapf`].
    #[track_caller]
    #[must_use]
    pub fn wrapf(&self, err: Error, args: fmt::Arguments<'_>) -> Error {
        err.wrapf(args)
    }

    /// See [`Error::with_message`].
    #[must_use]
    pub fn wrap_with_message<M>(&self, err: Error, message: M) -> Error
    where
        M: Into<Cow<'static, str>>,
    {
        err.with_message(message)
    }

    /// See [`Error::with_stack`].
    #[track_caller]
    #[must_use]
    pub fn wrap_with_stack(&self, err: Error) -> Error {
        err.with_stack()
    }

    /// See [`Error::cause`].
    #[must_use]
    pub fn cause(&self, err: &Error) -> Error {
        err.cause().clone()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("processors", &self.processors)
            .finish()
    }
}
