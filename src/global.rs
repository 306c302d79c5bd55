//! The process-wide dispatcher.
//!
//! Every [`Dispatcher`] method has a free-function counterpart here that
//! operates on a single instance living for the whole process. The instance
//! starts out empty and is never torn down; [`reset`] clears it, which is
//! mostly useful between tests.
//!
//! ```rust
//! use errproc::{Error, global};
//!
//! let revocation = global::register([|err: &Error| eprintln!("error: {err}")]);
//!
//! let _ = global::process::<()>(Err(global::new_error("disk full")));
//!
//! revocation.revoke();
//! ```

use alloc::{borrow::Cow, string::String};
use core::fmt;

use crate::{Dispatcher, Error, Processor, dispatcher::Revocation};

static DISPATCHER: Dispatcher = Dispatcher::empty();

/// The process-wide dispatcher.
#[must_use]
pub fn dispatcher() -> &'static Dispatcher {
    &DISPATCHER
}

/// Removes every processor from the process-wide dispatcher.
pub fn reset() {
    DISPATCHER.with(core::iter::empty::<Processor>());
}

/// See [`Dispatcher::debug`].
#[must_use]
pub fn debug() -> String {
    DISPATCHER.debug()
}

/// See [`Dispatcher::with`].
pub fn with<I>(processors: I)
where
    I: IntoIterator,
    I::Item: Into<Processor>,
{
    DISPATCHER.with(processors);
}

/// See [`Dispatcher::register`].
pub fn register<I>(processors: I) -> Revocation<'static>
where
    I: IntoIterator,
    I::Item: Into<Processor>,
{
    DISPATCHER.register(processors)
}

/// See [`Dispatcher::process`].
pub fn process<T>(result: Result<T, Error>) -> Result<T, Error> {
    DISPATCHER.process(result)
}

/// See [`Dispatcher::process_with`].
pub fn process_with<T, I>(result: Result<T, Error>, processors: I) -> Result<T, Error>
where
    I: IntoIterator,
    I::Item: Into<Processor>,
{
    DISPATCHER.process_with(result, processors)
}

/// See [`Error::new`].
#[track_caller]
#[must_use]
pub fn new_error<M>(message: M) -> Error
where
    M: Into<Cow<'static, str>>,
{
    DISPATCHER.new_error(message)
}

/// See [`Error::from_args`].
#[track_caller]
#[must_use]
pub fn errorf(args: fmt::Arguments<'_>) -> Error {
    DISPATCHER.errorf(args)
}

/// See [`Error::wrap`].
#[track_caller]
#[must_use]
pub fn wrap<M>(err: Error, message: M) -> Error
where
    M: Into<Cow<'static, str>>,
{
    DISPATCHER.wrap(err, message)
}

/// See [`Error::wrapf`].
#[track_caller]
#[must_use]
pub fn wrapf(err: Error, args: fmt::Arguments<'_>) -> Error {
    DISPATCHER.wrapf(err, args)
}

/// See [`Error::with_message`].
#[must_use]
pub fn wrap_with_message<M>(err: Error, message: M) -> Error
where
    M: Into<Cow<'static, str>>,
{
    DISPATCHER.wrap_with_message(err, message)
}

/// See [`Error::with_stack`].
#[track_caller]
#[must_use]
pub fn wrap_with_stack(err: Error) -> Error {
    DISPATCHER.wrap_with_stack(err)
}

/// See [`Error::cause`].
#[must_use]
pub fn cause(err: &Error) -> Error {
    DISPATCHER.cause(err)
}
