#![cfg_attr(not(feature = "std"), no_std)]
#![deny(
    missing_docs,
    clippy::alloc_instead_of_core,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    unused_doc_comments
)]
#![forbid(unsafe_code)]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Run error processors whenever an error passes a central dispatch point.
//!
//! ## Overview
//!
//! This crate separates "an error occurred" from "what happens when an error
//! occurs". Call sites hand their errors to a [`Dispatcher`], and whoever
//! cares about errors (logging, alerting, metrics) registers a [`Processor`]
//! with it. Neither side needs to know about the other.
//!
//! ## Quick Example
//!
//! ```
//! use errproc::{Dispatcher, Error, Processor, ResultExt};
//!
//! fn read_config(path: &str) -> Result<String, Error> {
//!     std::fs::read_to_string(path).wrap("failed to read configuration file")
//! }
//!
//! let dispatcher = Dispatcher::new([Processor::named("log", |err: &Error| {
//!     eprintln!("{err:?}");
//! })]);
//!
//! let config = dispatcher.process(read_config("/nonexistent/app.toml"));
//! assert!(config.is_err());
//! ```
//!
//! ## Core Concepts
//!
//! - A **[`Processor`]** is a named side-effecting callback taking an
//!   [`&Error`](Error). It cannot change the error or report failure.
//! - A **[`ProcessorRegistry`](registry::ProcessorRegistry)** is the
//!   thread-safe set of registered processors. It supports atomic replacement,
//!   incremental registration and removal by
//!   [`ProcessorHandle`](registry::ProcessorHandle), and hands out snapshots
//!   that are iterated without holding a lock.
//! - A **[`Dispatcher`]** owns one registry. [`Dispatcher::process`] runs all
//!   registered processors on an error, [`Dispatcher::process_with`] runs an
//!   ad-hoc list instead, and [`Dispatcher::register`] returns a
//!   [`Revocation`] that removes what it registered.
//! - The **[`global`]** module mirrors every dispatcher method on a single
//!   process-wide instance.
//! - An **[`Error`]** is a layered error value: a message or foreign error at
//!   the bottom, with message and stack layers wrapped around it.
//!   [`Error::cause`] finds the bottom again.
//!
//! ## Concurrency
//!
//! Processors run synchronously on the thread that calls `process`, one after
//! the other, and in no particular order. They run after the registry lock is
//! released, so a slow processor delays the caller but never blocks
//! registration on other threads. A panicking processor is not caught.
//!
//! ## Features
//!
//! - `std` (default): use [`std::sync::RwLock`] for the registry. Without it
//!   the crate is `no_std` and uses a spin lock.
//! - `backtrace`: capture a full backtrace whenever an [`Error`] records a
//!   stack.

extern crate alloc;

#[macro_use]
mod macros;

mod dispatcher;
mod error;
pub mod global;
pub mod prelude;
mod processor;
pub mod registry;
mod result_ext;

pub use self::{
    dispatcher::{Dispatcher, Revocation},
    error::{Chain, Error, Stack},
    processor::Processor,
    result_ext::ResultExt,
};

// Not public API. Referenced by macro-generated code.
#[doc(hidden)]
pub mod __private {
    #[doc(hidden)]
    pub use core::{format_args, result::Result::Err};
}
