use alloc::borrow::Cow;

use crate::Error;

mod sealed {
    pub trait Sealed {}
    impl<T, E> Sealed for Result<T, E> {}
}

/// Wrapping helpers for [`Result`]s.
///
/// Every method leaves `Ok` values untouched and converts the error into an
/// [`Error`] before wrapping it. Stacks are recorded at the caller.
///
/// # Examples
///
/// ```rust
/// use errproc::{Error, ResultExt};
///
/// fn read_config() -> Result<String, Error> {
///     std::fs::read_to_string("/nonexistent/config.toml").wrap("reading config")
/// }
///
/// let err = read_config().unwrap_err();
/// assert!(err.to_string().starts_with("reading config: "));
/// assert!(err.downcast_ref::<std::io::Error>().is_some());
/// ```
pub trait ResultExt<T>: sealed::Sealed {
    /// Wraps the error with a message and the caller's stack, see
    /// [`Error::wrap`].
    #[track_caller]
    fn wrap<M>(self, message: M) -> Result<T, Error>
    where
        M: Into<Cow<'static, str>>;

    /// Like [`wrap`](Self::wrap), building the message only on error.
    #[track_caller]
    fn wrap_lazy<M, F>(self, message: F) -> Result<T, Error>
    where
        F: FnOnce() -> M,
        M: Into<Cow<'static, str>>;

    /// Prefixes the error with a message, see [`Error::with_message`].
    #[track_caller]
    fn with_message<M>(self, message: M) -> Result<T, Error>
    where
        M: Into<Cow<'static, str>>;

    /// Records the caller's stack on the error, see [`Error::with_stack`].
    #[track_caller]
    fn with_stack(self) -> Result<T, Error>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    Error: From<E>,
{
    #[track_caller]
    fn wrap<M>(self, message: M) -> Result<T, Error>
    where
        M: Into<Cow<'static, str>>,
    {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(Error::from(e).wrap(message)),
        }
    }

    #[track_caller]
    fn wrap_lazy<M, F>(self, message: F) -> Result<T, Error>
    where
        F: FnOnce() -> M,
        M: Into<Cow<'static, str>>,
    {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(Error::from(e).wrap(message())),
        }
    }

    #[track_caller]
    fn with_message<M>(self, message: M) -> Result<T, Error>
    where
        M: Into<Cow<'static, str>>,
    {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(Error::from(e).with_message(message)),
        }
    }

    #[track_caller]
    fn with_stack(self) -> Result<T, Error> {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(Error::from(e).with_stack()),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("timed out")]
    struct Timeout;

    #[test]
    fn test_ok_is_untouched() {
        let result: Result<u8, Timeout> = Ok(3);
        assert_eq!(result.wrap("never").unwrap(), 3);

        let result: Result<u8, Error> = Ok(4);
        let lazy = result.wrap_lazy(|| -> &'static str { panic!("message built on Ok") });
        assert_eq!(lazy.unwrap(), 4);
    }

    #[test]
    fn test_wrap_foreign_error() {
        let result: Result<(), Timeout> = Err(Timeout);
        let err = result.wrap("polling").unwrap_err();

        assert_eq!(err.to_string(), "polling: timed out");
        assert!(err.downcast_ref::<Timeout>().is_some());
    }

    #[test]
    fn test_wrap_keeps_cause_identity() {
        let base = Error::new("base");
        let result: Result<(), Error> = Err(base.clone());
        let err = result.with_message("inner").with_stack().unwrap_err();

        assert_eq!(err.to_string(), "inner: base");
        assert!(Error::ptr_eq(err.cause(), &base));
    }

    #[test]
    fn test_with_stack_location() {
        let result: Result<(), Error> = Err(Error::new("base"));
        let line = line!();
        let err = result.with_stack().unwrap_err();
        assert_eq!(err.stack().map(|s| s.location().line()), Some(line + 1));
    }
}
