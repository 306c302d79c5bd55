//! Commonly used items for convenient importing.
//!
//! ```rust
//! use errproc::prelude::*;
//!
//! fn divide(a: i32, b: i32) -> Result<i32, Error> {
//!     if b == 0 {
//!         bail!("cannot divide {a} by zero");
//!     }
//!     Ok(a / b)
//! }
//!
//! let dispatcher = Dispatcher::new([Processor::named("ignore", |_: &Error| {})]);
//! assert_eq!(dispatcher.process(divide(10, 2)).unwrap(), 5);
//! ```
//!
//! This prelude includes [`Error`], [`Dispatcher`], [`Processor`],
//! [`ResultExt`] and the [`errorf!`], [`wrapf!`] and [`bail!`] macros.

pub use crate::{Dispatcher, Error, Processor, ResultExt, bail, errorf, wrapf};
