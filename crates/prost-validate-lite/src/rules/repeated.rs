//! Repeated-field rules on the whole list.

/// At least `min` elements.
#[inline]
#[must_use]
pub fn min_items<T>(items: &[T], min: u64) -> bool {
    items.len() as u64 >= min
}

/// At most `max` elements.
#[inline]
#[must_use]
pub fn max_items<T>(items: &[T], max: u64) -> bool {
    items.len() as u64 <= max
}

/// Every element differs from every other by `PartialEq`.
///
/// Quadratic, but needs no hashing and no scratch memory. Floats compare with
/// IEEE equality, so two NaN elements count as distinct.
#[must_use]
pub fn unique<T: PartialEq>(items: &[T]) -> bool {
    items
        .iter()
        .enumerate()
        .all(|(i, item)| !items[i + 1..].contains(item))
}
