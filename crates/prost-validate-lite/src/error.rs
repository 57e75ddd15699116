use core::fmt;

use crate::config::{DEFAULT_CAPACITY, DEFAULT_PATH_CAPACITY};
use crate::violation::ViolationBuffer;

/// Signal that unwinds a generated validator.
///
/// Returned from [`PathContext::report`](crate::PathContext::report) and the
/// path pushes, and propagated with `?` up to the entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Halt {
    /// A violation was reported while early exit is enabled.
    #[error("stopped at first violation")]
    EarlyExit,

    /// The field path no longer fits in the context's buffer.
    #[error(transparent)]
    PathOverflow(#[from] PathOverflow),
}

/// The field path outgrew its fixed-size buffer.
///
/// Treated as fatal: the verdict is `false` and no violation is recorded for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("field path exceeds {capacity} bytes")]
pub struct PathOverflow {
    /// Size of the path buffer that overflowed.
    pub capacity: usize,
}

/// Top-level error type returned by [`validate`](crate::validate).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error<const N: usize = DEFAULT_CAPACITY, const P: usize = DEFAULT_PATH_CAPACITY> {
    /// One or more validation rules were violated.
    #[error(transparent)]
    Validation(#[from] ValidationError<N, P>),

    /// A field path did not fit; the message could not be checked.
    #[error(transparent)]
    PathOverflow(#[from] PathOverflow),
}

/// Returned when one or more validation rules are violated.
#[derive(Debug)]
pub struct ValidationError<const N: usize = DEFAULT_CAPACITY, const P: usize = DEFAULT_PATH_CAPACITY>
{
    /// The violations found, in encounter order.
    pub violations: ViolationBuffer<N, P>,
}

impl<const N: usize, const P: usize> ValidationError<N, P> {
    pub(crate) fn new(violations: ViolationBuffer<N, P>) -> Self {
        Self { violations }
    }
}

impl<const N: usize, const P: usize> fmt::Display for ValidationError<N, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.violations.as_slice() {
            [] => Ok(()),
            [only] if !self.violations.is_truncated() => write!(f, "validation error: {only}"),
            all => {
                write!(f, "validation errors:")?;
                for v in all {
                    write!(f, "\n - {v}")?;
                }
                if self.violations.is_truncated() {
                    write!(f, "\n - ...")?;
                }
                Ok(())
            }
        }
    }
}

impl<const N: usize, const P: usize> core::error::Error for ValidationError<N, P> {}
