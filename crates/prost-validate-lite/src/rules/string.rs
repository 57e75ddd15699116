//! String rules. Every length is measured in UTF-8 bytes and every affix
//! check compares raw bytes; nothing here depends on locale or allocates.

use core::net::{Ipv4Addr, Ipv6Addr};

/// At least `min` bytes.
#[inline]
#[must_use]
pub fn min_len(value: &str, min: u64) -> bool {
    value.len() as u64 >= min
}

/// At most `max` bytes.
#[inline]
#[must_use]
pub fn max_len(value: &str, max: u64) -> bool {
    value.len() as u64 <= max
}

/// Exact length in bytes.
#[inline]
#[must_use]
pub fn len(value: &str, expected: u64) -> bool {
    value.len() as u64 == expected
}

/// Exact equality.
#[inline]
#[must_use]
pub fn const_eq(value: &str, expected: &str) -> bool {
    value == expected
}

/// Starts with `prefix`.
#[inline]
#[must_use]
pub fn prefix(value: &str, prefix: &str) -> bool {
    value.as_bytes().starts_with(prefix.as_bytes())
}

/// Ends with `suffix`.
#[inline]
#[must_use]
pub fn suffix(value: &str, suffix: &str) -> bool {
    value.as_bytes().ends_with(suffix.as_bytes())
}

/// `needle` occurs somewhere in `value`.
#[inline]
#[must_use]
pub fn contains(value: &str, needle: &str) -> bool {
    value.contains(needle)
}

/// `needle` does not occur in `value`.
#[inline]
#[must_use]
pub fn not_contains(value: &str, needle: &str) -> bool {
    !value.contains(needle)
}

/// Every byte is 7-bit ASCII.
#[inline]
#[must_use]
pub fn ascii(value: &str) -> bool {
    value.is_ascii()
}

/// `value` is one of `set`.
#[inline]
#[must_use]
pub fn in_set(value: &str, set: &[&str]) -> bool {
    set.contains(&value)
}

/// `value` is none of `set`.
#[inline]
#[must_use]
pub fn not_in_set(value: &str, set: &[&str]) -> bool {
    !in_set(value, set)
}

/// `local@domain`, where the local part uses `A-Z a-z 0-9 . _ + -` without a
/// leading or trailing dot and the domain is at least two hostname labels.
#[must_use]
pub fn email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || local.starts_with('.') || local.ends_with('.') {
        return false;
    }
    if !local
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'+' | b'-'))
    {
        return false;
    }
    domain.split('.').count() >= 2 && hostname(domain)
}

/// Dot-separated labels of 1 to 63 characters from `A-Z a-z 0-9 -`, no label
/// starting or ending with `-`, at most 253 bytes overall.
#[must_use]
pub fn hostname(value: &str) -> bool {
    !value.is_empty() && value.len() <= 253 && value.split('.').all(is_label)
}

fn is_label(label: &str) -> bool {
    let bytes = label.as_bytes();
    match (bytes.first(), bytes.last()) {
        (Some(b'-'), _) | (_, Some(b'-')) | (None, _) => false,
        _ => bytes.len() <= 63 && bytes.iter().all(|b| b.is_ascii_alphanumeric() || *b == b'-'),
    }
}

/// Dotted quad, each octet 0-255 with no leading zeros.
#[inline]
#[must_use]
pub fn ipv4(value: &str) -> bool {
    value.parse::<Ipv4Addr>().is_ok()
}

/// Eight colon-separated groups of 1-4 hex digits. A single `::` may stand for
/// one or more zero groups, and the last 32 bits may be written as a dotted
/// quad. Zone identifiers are not accepted.
#[inline]
#[must_use]
pub fn ipv6(value: &str) -> bool {
    value.parse::<Ipv6Addr>().is_ok()
}

/// Either address family.
#[inline]
#[must_use]
pub fn ip(value: &str) -> bool {
    ipv4(value) || ipv6(value)
}

/// A hostname or an IP address.
#[inline]
#[must_use]
pub fn address(value: &str) -> bool {
    hostname(value) || ip(value)
}

/// Hyphenated 8-4-4-4-12 hex form.
#[must_use]
pub fn uuid(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 36
        && bytes.iter().enumerate().all(|(i, b)| match i {
            8 | 13 | 18 | 23 => *b == b'-',
            _ => b.is_ascii_hexdigit(),
        })
}

/// Trimmed UUID: 32 hex digits, no hyphens.
#[must_use]
pub fn tuuid(value: &str) -> bool {
    value.len() == 32 && value.bytes().all(|b| b.is_ascii_hexdigit())
}

/// `host:port` where host is a hostname or IPv4 address, or `[ipv6]:port`.
#[must_use]
pub fn host_and_port(value: &str) -> bool {
    if let Some(rest) = value.strip_prefix('[') {
        let Some((host, after)) = rest.rsplit_once(']') else {
            return false;
        };
        return match after.strip_prefix(':') {
            Some(port) => ipv6(host) && is_port(port),
            None => false,
        };
    }
    let Some((host, port)) = value.rsplit_once(':') else {
        return false;
    };
    (hostname(host) || ipv4(host)) && is_port(port)
}

fn is_port(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.is_empty() || bytes.len() > 5 || !bytes.iter().all(u8::is_ascii_digit) {
        return false;
    }
    if bytes.len() > 1 && bytes[0] == b'0' {
        return false;
    }
    bytes
        .iter()
        .try_fold(0_u32, |acc, b| {
            let n = acc * 10 + u32::from(b - b'0');
            (n <= u32::from(u16::MAX)).then_some(n)
        })
        .is_some()
}
