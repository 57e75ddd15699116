use crate::config::{DEFAULT_PATH_CAPACITY, ValidationConfig};
use crate::error::{Error, Halt, ValidationError};
use crate::path::PathContext;
use crate::violation::{ViolationBuffer, ViolationSink};

/// A message with generated validation rules.
///
/// Implementations are emitted by `prost-validate-lite-build`. They walk the
/// message's fields against `ctx`, recurse into submessages through this same
/// trait, and unwind with `?` on [`Halt`].
pub trait Validate {
    /// Checks `self` at the context's current path.
    fn validate_in<const P: usize>(&self, ctx: &mut PathContext<'_, P>) -> Result<(), Halt>;
}

impl<T: Validate + ?Sized> Validate for &T {
    fn validate_in<const P: usize>(&self, ctx: &mut PathContext<'_, P>) -> Result<(), Halt> {
        (**self).validate_in(ctx)
    }
}

// prost boxes recursive message fields.
#[cfg(feature = "alloc")]
impl<T: Validate + ?Sized> Validate for alloc::boxed::Box<T> {
    fn validate_in<const P: usize>(&self, ctx: &mut PathContext<'_, P>) -> Result<(), Halt> {
        (**self).validate_in(ctx)
    }
}

/// Runs `msg`'s validator and returns the verdict.
///
/// `None` is a structural failure and yields `false`. So does a field path
/// longer than the default path capacity; in that case nothing is recorded.
/// Otherwise the result is `true` iff no rule was violated. Violations are
/// appended to `violations` when given.
///
/// Generated `validate_<package>_<Message>` entry points delegate here.
pub fn verdict<M: Validate + ?Sized>(
    msg: Option<&M>,
    violations: Option<&mut dyn ViolationSink>,
    config: ValidationConfig,
) -> bool {
    verdict_in::<M, DEFAULT_PATH_CAPACITY>(msg, violations, config)
}

/// [`verdict`] with an explicit path capacity `P`.
pub fn verdict_in<M: Validate + ?Sized, const P: usize>(
    msg: Option<&M>,
    violations: Option<&mut dyn ViolationSink>,
    config: ValidationConfig,
) -> bool {
    let Some(msg) = msg else {
        return false;
    };
    let mut ctx = PathContext::<P>::new(violations, config.early_exit);
    match msg.validate_in(&mut ctx) {
        Ok(()) | Err(Halt::EarlyExit) => ctx.is_clean(),
        Err(Halt::PathOverflow(_)) => false,
    }
}

/// Validates `msg`, stopping at the first violation.
///
/// ```rust,ignore
/// match prost_validate_lite::validate(&person) {
///     Ok(()) => { /* message is valid */ }
///     Err(e) => eprintln!("validation failed: {e}"),
/// }
/// ```
pub fn validate<M: Validate + ?Sized>(msg: &M) -> Result<(), Error> {
    validate_with(msg, ValidationConfig::default())
}

/// Validates `msg` into a fresh buffer of `N` violations with `P`-byte paths.
///
/// With [`ValidationConfig::collect_all`] every rule is evaluated; violations
/// past `N` are dropped and the returned buffer is marked truncated.
pub fn validate_with<M: Validate + ?Sized, const N: usize, const P: usize>(
    msg: &M,
    config: ValidationConfig,
) -> Result<(), Error<N, P>> {
    let mut violations = ViolationBuffer::<N, P>::new();
    let mut ctx = PathContext::<P>::new(Some(&mut violations), config.early_exit);
    match msg.validate_in(&mut ctx) {
        Ok(()) | Err(Halt::EarlyExit) => {}
        Err(Halt::PathOverflow(overflow)) => return Err(Error::PathOverflow(overflow)),
    }
    let clean = ctx.is_clean();
    drop(ctx);
    if clean {
        Ok(())
    } else {
        Err(ValidationError::new(violations).into())
    }
}
