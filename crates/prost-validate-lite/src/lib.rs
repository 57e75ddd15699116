//! Allocation-free runtime for message validators generated from
//! [`buf.validate`](https://github.com/bufbuild/protovalidate) rules.
//!
//! `prost-validate-lite-build` turns the constraint annotations of a schema
//! into plain Rust: one [`Validate`] impl and one `validate_<package>_<Message>`
//! entry point per message. That code calls the [`rules`] primitives and
//! reports failures through a [`PathContext`]. Nothing here allocates or
//! needs `std`; capacities are const generics.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use prost_validate_lite::{ViolationBuffer, ViolationSink};
//!
//! let mut violations: ViolationBuffer = ViolationBuffer::new();
//! if !validate_example_v1_Person(Some(&person), Some(&mut violations)) {
//!     for v in &violations {
//!         eprintln!("{v}");
//!     }
//! }
//! ```
//!
//! # Error types
//!
//! | Type | When |
//! |------|------|
//! | [`ValidationError`] | One or more constraint violations detected |
//! | [`PathOverflow`] | A field path outgrew its fixed-size buffer |
//!
//! Both are unified under [`Error`], returned by [`validate`] and
//! [`validate_with`].
//!
//! # Features
//!
//! - `alloc` (default): map keys of type `String` in field paths.
//! - `std`: `std::error::Error` for the error types.
//! - `pattern`: `string.pattern` rules backed by the `regex` crate.

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]

#[cfg(feature = "alloc")]
extern crate alloc;

mod config;
mod error;
mod path;
pub mod rules;
mod validator;
mod violation;

pub use config::{DEFAULT_CAPACITY, DEFAULT_PATH_CAPACITY, ValidationConfig};
pub use error::{Error, Halt, PathOverflow, ValidationError};
pub use path::{PathContext, PathKey, SegmentWriter};
pub use validator::{Validate, validate, validate_with, verdict, verdict_in};
pub use violation::{Violation, ViolationBuffer, ViolationSink};
