//! The error value passed through processors.
//!
//! An [`Error`] is a cheaply clonable, layered value. Leaves are either a
//! plain message ([`Error::new`], [`errorf!`](crate::errorf)) or a foreign
//! [`core::error::Error`] converted with [`From`]. On top of a leaf callers
//! stack wrapper layers:
//!
//! - [`Error::with_message`] prefixes a message,
//! - [`Error::with_stack`] records the call site,
//! - [`Error::wrap`] does both.
//!
//! [`Error::cause`] walks back through the wrapper layers to the leaf.
//!
//! ```rust
//! use errproc::Error;
//!
//! let base = Error::new("connection reset");
//! let err = base.clone().wrap("fetching user").wrap("handling request");
//!
//! assert_eq!(err.to_string(), "handling request: fetching user: connection reset");
//! assert!(Error::ptr_eq(err.cause(), &base));
//! ```

use alloc::{borrow::Cow, boxed::Box};
use core::{fmt, panic::Location};

use triomphe::Arc;

/// A layered error value.
///
/// Cloning an `Error` is cheap and yields a value with the same identity, see
/// [`Error::ptr_eq`].
///
/// `Error` intentionally does not implement [`core::error::Error`]. This keeps
/// the blanket `From<E: core::error::Error>` conversion coherent so that `?`
/// works on any standard error.
#[derive(Clone)]
pub struct Error(Arc<ErrorData>);

struct ErrorData {
    kind: ErrorKind,
    stack: Option<Stack>,
}

enum ErrorKind {
    Message(Cow<'static, str>),
    Foreign(Box<dyn core::error::Error + Send + Sync + 'static>),
    WithMessage {
        message: Cow<'static, str>,
        cause: Error,
    },
    WithStack {
        cause: Error,
    },
}

/// Call-site information recorded when an error layer is created.
///
/// Always holds the source location. With the `backtrace` feature enabled it
/// also holds the raw frames of a [`backtrace::Backtrace`]. Symbols are only
/// resolved when the error is formatted with `{:?}`.
pub struct Stack {
    location: &'static Location<'static>,
    #[cfg(feature = "backtrace")]
    backtrace: backtrace::Backtrace,
}

impl Stack {
    /// Captures the stack of the caller.
    #[track_caller]
    #[must_use]
    pub fn capture() -> Self {
        Self {
            location: Location::caller(),
            #[cfg(feature = "backtrace")]
            backtrace: backtrace::Backtrace::new_unresolved(),
        }
    }

    /// The source location the stack was captured at.
    #[must_use]
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }

    /// The backtrace captured together with the location.
    ///
    /// The frames are unresolved. Call [`backtrace::Backtrace::resolve`] on a
    /// clone to get symbol names.
    #[cfg(feature = "backtrace")]
    #[must_use]
    pub fn backtrace(&self) -> &backtrace::Backtrace {
        &self.backtrace
    }
}

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.location.file(),
            self.location.line(),
            self.location.column()
        )
    }
}

impl fmt::Debug for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl Error {
    fn from_parts(kind: ErrorKind, stack: Option<Stack>) -> Self {
        Self(Arc::new(ErrorData { kind, stack }))
    }

    /// Creates a new leaf error with the given message, recording the caller's
    /// stack.
    #[track_caller]
    #[must_use]
    pub fn new<M>(message: M) -> Self
    where
        M: Into<Cow<'static, str>>,
    {
        Self::from_parts(ErrorKind::Message(message.into()), Some(Stack::capture()))
    }

    /// Creates a new leaf error from pre-built format arguments.
    ///
    /// Usually called through [`errorf!`](crate::errorf).
    #[track_caller]
    #[must_use]
    pub fn from_args(args: fmt::Arguments<'_>) -> Self {
        let message = match args.as_str() {
            Some(message) => Cow::Borrowed(message),
            None => Cow::Owned(alloc::fmt::format(args)),
        };
        Self::from_parts(ErrorKind::Message(message), Some(Stack::capture()))
    }

    /// Converts a foreign error into a leaf, recording the caller's stack.
    ///
    /// The foreign value can be recovered with [`Error::downcast_ref`].
    #[track_caller]
    #[must_use]
    pub fn from_std<E>(error: E) -> Self
    where
        E: core::error::Error + Send + Sync + 'static,
    {
        Self::from_parts(ErrorKind::Foreign(Box::new(error)), Some(Stack::capture()))
    }

    /// Prefixes the error with a message. No stack is recorded.
    #[must_use]
    pub fn with_message<M>(self, message: M) -> Self
    where
        M: Into<Cow<'static, str>>,
    {
        Self::from_parts(
            ErrorKind::WithMessage {
                message: message.into(),
                cause: self,
            },
            None,
        )
    }

    /// Records the caller's stack on top of the error. The message is
    /// unchanged.
    #[track_caller]
    #[must_use]
    pub fn with_stack(self) -> Self {
        Self::from_parts(ErrorKind::WithStack { cause: self }, Some(Stack::capture()))
    }

    /// Prefixes the error with a message and records the caller's stack.
    #[track_caller]
    #[must_use]
    pub fn wrap<M>(self, message: M) -> Self
    where
        M: Into<Cow<'static, str>>,
    {
        self.with_message(message).with_stack()
    }

    /// Like [`Error::wrap`], with a formatted message.
    ///
    /// Usually called through [`wrapf!`](crate::wrapf).
    #[track_caller]
    #[must_use]
    pub fn wrapf(self, args: fmt::Arguments<'_>) -> Self {
        let message = match args.as_str() {
            Some(message) => Cow::Borrowed(message),
            None => Cow::Owned(alloc::fmt::format(args)),
        };
        self.wrap(message)
    }

    /// Returns the innermost error below all wrapper layers.
    ///
    /// A leaf is its own cause. The returned value shares identity with the
    /// leaf that was originally wrapped.
    #[must_use]
    pub fn cause(&self) -> &Error {
        let mut current = self;
        while let Some(inner) = current.source() {
            current = inner;
        }
        current
    }

    /// Returns the error directly below this layer, if this is a wrapper.
    #[must_use]
    pub fn source(&self) -> Option<&Error> {
        match &self.0.kind {
            ErrorKind::WithMessage { cause, .. } | ErrorKind::WithStack { cause } => Some(cause),
            ErrorKind::Message(_) | ErrorKind::Foreign(_) => None,
        }
    }

    /// Whether this layer wraps another error.
    #[must_use]
    pub fn is_wrapper(&self) -> bool {
        self.source().is_some()
    }

    /// Iterates over every layer, starting with `self` and ending with
    /// [`Error::cause`].
    pub fn chain(&self) -> Chain<'_> {
        Chain { next: Some(self) }
    }

    /// The message introduced by this layer, if any.
    ///
    /// Stack layers and foreign leaves have no message of their own.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match &self.0.kind {
            ErrorKind::Message(message) | ErrorKind::WithMessage { message, .. } => Some(&**message),
            ErrorKind::Foreign(_) | ErrorKind::WithStack { .. } => None,
        }
    }

    /// The stack recorded by this layer, if any.
    #[must_use]
    pub fn stack(&self) -> Option<&Stack> {
        self.0.stack.as_ref()
    }

    /// Returns the foreign leaf below all wrapper layers if it is an `E`.
    #[must_use]
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: core::error::Error + 'static,
    {
        match &self.cause().0.kind {
            ErrorKind::Foreign(error) => error.downcast_ref::<E>(),
            _ => None,
        }
    }

    /// Whether two errors are the same value, as opposed to two errors that
    /// merely look the same.
    #[must_use]
    pub fn ptr_eq(a: &Error, b: &Error) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl<E> From<E> for Error
where
    E: core::error::Error + Send + Sync + 'static,
{
    #[track_caller]
    fn from(error: E) -> Self {
        Self::from_std(error)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.kind {
            ErrorKind::Message(message) => f.write_str(message),
            ErrorKind::Foreign(error) => fmt::Display::fmt(error, f),
            ErrorKind::WithMessage { message, cause } => write!(f, "{message}: {cause}"),
            ErrorKind::WithStack { cause } => fmt::Display::fmt(cause, f),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")?;
        for layer in self.chain() {
            if let Some(stack) = layer.stack() {
                write!(f, "\n    at {stack}")?;
            }
        }

        #[cfg(feature = "backtrace")]
        if let Some(stack) = self.cause().stack() {
            let mut backtrace = stack.backtrace().clone();
            backtrace.resolve();
            write!(f, "\n\nBacktrace:\n{backtrace:?}")?;
        }

        Ok(())
    }
}

/// Iterator over the layers of an [`Error`], see [`Error::chain`].
#[derive(Clone)]
pub struct Chain<'a> {
    next: Option<&'a Error>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a Error;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.source();
        Some(current)
    }
}

impl core::iter::FusedIterator for Chain<'_> {}
