//! Comparators shared by every numeric protobuf kind.
//!
//! `int32`, `sint32` and `sfixed32` evaluate as `i32`; `int64`, `sint64` and
//! `sfixed64` as `i64`; `uint32`/`fixed32` as `u32`; `uint64`/`fixed64` as
//! `u64`; `float` as `f32` and `double` as `f64`. Float comparisons follow IEEE
//! 754, so NaN fails every bound.

mod private {
    pub trait Sealed {}
}

/// A primitive the numeric rules can compare.
pub trait Number: Copy + PartialOrd + private::Sealed {
    /// `false` only for NaN and the infinities.
    fn is_finite_value(self) -> bool;
}

macro_rules! int_number {
    ($($t:ty),*) => {
        $(
            impl private::Sealed for $t {}
            impl Number for $t {
                #[inline]
                fn is_finite_value(self) -> bool {
                    true
                }
            }
        )*
    };
}

macro_rules! float_number {
    ($($t:ty),*) => {
        $(
            impl private::Sealed for $t {}
            impl Number for $t {
                #[inline]
                fn is_finite_value(self) -> bool {
                    self.is_finite()
                }
            }
        )*
    };
}

int_number!(i32, i64, u32, u64);
float_number!(f32, f64);

/// `value < bound`.
#[inline]
#[must_use]
pub fn lt<T: Number>(value: T, bound: T) -> bool {
    value < bound
}

/// `value <= bound`.
#[inline]
#[must_use]
pub fn lte<T: Number>(value: T, bound: T) -> bool {
    value <= bound
}

/// `value > bound`.
#[inline]
#[must_use]
pub fn gt<T: Number>(value: T, bound: T) -> bool {
    value > bound
}

/// `value >= bound`.
#[inline]
#[must_use]
pub fn gte<T: Number>(value: T, bound: T) -> bool {
    value >= bound
}

/// Exact equality. NaN never equals anything.
#[inline]
#[must_use]
pub fn const_eq<T: Number>(value: T, expected: T) -> bool {
    value == expected
}

/// `value` equals one of `set`. NaN is never a member.
#[inline]
#[must_use]
pub fn in_set<T: Number>(value: T, set: &[T]) -> bool {
    set.iter().any(|candidate| *candidate == value)
}

/// `value` equals none of `set`.
#[inline]
#[must_use]
pub fn not_in_set<T: Number>(value: T, set: &[T]) -> bool {
    !in_set(value, set)
}

/// Rejects NaN and both infinities.
#[inline]
#[must_use]
pub fn finite<T: Number>(value: T) -> bool {
    value.is_finite_value()
}
