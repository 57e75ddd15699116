//! `bool` rules.

/// `value == expected` (`bool.const`).
#[inline]
#[must_use]
pub fn const_eq(value: bool, expected: bool) -> bool {
    value == expected
}
