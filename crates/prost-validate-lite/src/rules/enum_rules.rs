//! Enum rules. prost stores enum fields as `i32`, so every rule takes the
//! raw number.

/// `value` is one of the enum's defined numbers. An empty `defined` list
/// accepts everything.
#[inline]
#[must_use]
pub fn defined_only(value: i32, defined: &[i32]) -> bool {
    defined.is_empty() || defined.contains(&value)
}

/// `value == expected`.
#[inline]
#[must_use]
pub fn const_eq(value: i32, expected: i32) -> bool {
    value == expected
}

/// `value` is one of `set`.
#[inline]
#[must_use]
pub fn in_set(value: i32, set: &[i32]) -> bool {
    set.contains(&value)
}

/// `value` is none of `set`.
#[inline]
#[must_use]
pub fn not_in_set(value: i32, set: &[i32]) -> bool {
    !set.contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defined_only_checks_membership() {
        assert!(defined_only(0, &[0, 1, 2]));
        assert!(defined_only(2, &[0, 1, 2]));
        assert!(!defined_only(3, &[0, 1, 2]));
        assert!(!defined_only(-1, &[0, 1, 2]));
    }

    #[test]
    fn defined_only_with_no_values_accepts_anything() {
        assert!(defined_only(99, &[]));
    }

    #[test]
    fn const_and_sets() {
        assert!(const_eq(1, 1));
        assert!(!const_eq(1, 2));
        assert!(in_set(1, &[1, 2]));
        assert!(!in_set(3, &[1, 2]));
        assert!(not_in_set(3, &[1, 2]));
        assert!(!not_in_set(1, &[1, 2]));
    }
}
