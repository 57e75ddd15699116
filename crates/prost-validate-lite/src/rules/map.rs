//! Map rules. The caller passes the entry count or the values; keys and
//! values are checked one entry at a time by the generated code.

/// At least `min` entries.
#[inline]
#[must_use]
pub fn min_pairs(len: usize, min: u64) -> bool {
    len as u64 >= min
}

/// At most `max` entries.
#[inline]
#[must_use]
pub fn max_pairs(len: usize, max: u64) -> bool {
    len as u64 <= max
}

/// No value equals its type's default (`map.no_sparse`).
#[must_use]
pub fn no_sparse<'a, V, I>(values: I) -> bool
where
    V: PartialEq + Default + 'a,
    I: IntoIterator<Item = &'a V>,
{
    let empty = V::default();
    values.into_iter().all(|value| *value != empty)
}
