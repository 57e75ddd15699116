//! `bytes` rules. Lengths count bytes; the address rules look only at length.

/// At least `min` bytes.
#[inline]
#[must_use]
pub fn min_len(value: &[u8], min: u64) -> bool {
    value.len() as u64 >= min
}

/// At most `max` bytes.
#[inline]
#[must_use]
pub fn max_len(value: &[u8], max: u64) -> bool {
    value.len() as u64 <= max
}

/// Exactly `expected` bytes.
#[inline]
#[must_use]
pub fn len(value: &[u8], expected: u64) -> bool {
    value.len() as u64 == expected
}

/// Byte-for-byte equality.
#[inline]
#[must_use]
pub fn const_eq(value: &[u8], expected: &[u8]) -> bool {
    value == expected
}

/// Starts with `prefix`.
#[inline]
#[must_use]
pub fn prefix(value: &[u8], prefix: &[u8]) -> bool {
    value.starts_with(prefix)
}

/// Ends with `suffix`.
#[inline]
#[must_use]
pub fn suffix(value: &[u8], suffix: &[u8]) -> bool {
    value.ends_with(suffix)
}

/// `needle` occurs as a contiguous run. The empty needle is always found.
#[must_use]
pub fn contains(value: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || value.windows(needle.len()).any(|window| window == needle)
}

/// `value` equals one of `set`.
#[inline]
#[must_use]
pub fn in_set(value: &[u8], set: &[&[u8]]) -> bool {
    set.contains(&value)
}

/// `value` equals none of `set`.
#[inline]
#[must_use]
pub fn not_in_set(value: &[u8], set: &[&[u8]]) -> bool {
    !in_set(value, set)
}

/// A raw IPv4 or IPv6 address: 4 or 16 bytes.
#[inline]
#[must_use]
pub fn ip(value: &[u8]) -> bool {
    matches!(value.len(), 4 | 16)
}

/// A raw IPv4 address: 4 bytes.
#[inline]
#[must_use]
pub fn ipv4(value: &[u8]) -> bool {
    value.len() == 4
}

/// A raw IPv6 address: 16 bytes.
#[inline]
#[must_use]
pub fn ipv6(value: &[u8]) -> bool {
    value.len() == 16
}
