/// Creates an [`Error`](crate::Error) from a format string.
///
/// The stack of the macro call site is recorded.
///
/// # Examples
///
/// ```rust
/// use errproc::errorf;
///
/// let user = 42;
/// let err = errorf!("user {user} not found");
/// assert_eq!(err.to_string(), "user 42 not found");
/// ```
#[macro_export]
macro_rules! errorf {
    ($($arg:tt)*) => {
        $crate::Error::from_args($crate::__private::format_args!($($arg)*))
    };
}

/// Wraps an error with a formatted message and the call-site stack.
///
/// The first argument is anything convertible into an
/// [`Error`](crate::Error).
///
/// # Examples
///
/// ```rust
/// use errproc::{Error, wrapf};
///
/// let attempt = 3;
/// let err = wrapf!(Error::new("refused"), "attempt {attempt}");
/// assert_eq!(err.to_string(), "attempt 3: refused");
/// ```
#[macro_export]
macro_rules! wrapf {
    ($err:expr, $($arg:tt)*) => {
        $crate::Error::from($err).wrapf($crate::__private::format_args!($($arg)*))
    };
}

/// Returns early with an error built by [`errorf!`](crate::errorf).
///
/// # Examples
///
/// ```rust
/// use errproc::{Error, bail};
///
/// fn check(n: u32) -> Result<u32, Error> {
///     if n == 0 {
///         bail!("expected a positive number, got {n}");
///     }
///     Ok(n)
/// }
///
/// assert!(check(0).is_err());
/// ```
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return $crate::__private::Err($crate::errorf!($($arg)*).into())
    };
}
