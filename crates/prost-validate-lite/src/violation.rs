use core::fmt;

use crate::config::{DEFAULT_CAPACITY, DEFAULT_PATH_CAPACITY};

/// Receives violations reported by a running validation.
///
/// Generated validators only see this trait, so the same code serves buffers
/// of any capacity.
pub trait ViolationSink {
    /// Records one violation. Returns `false` when the violation was dropped
    /// because the sink is full.
    fn add(&mut self, field_path: &str, constraint_id: &'static str, message: &'static str)
    -> bool;
}

/// A single instance where a validation rule was not met.
///
/// The field path is copied into inline storage of `P` bytes, so a violation
/// never borrows from the context that produced it.
#[derive(Clone, Copy)]
pub struct Violation<const P: usize = DEFAULT_PATH_CAPACITY> {
    path: [u8; P],
    path_len: usize,
    constraint_id: &'static str,
    message: &'static str,
}

impl<const P: usize> Violation<P> {
    const EMPTY: Self = Self {
        path: [0; P],
        path_len: 0,
        constraint_id: "",
        message: "",
    };

    /// Builds a violation, truncating `field_path` to `P` bytes on a character
    /// boundary.
    #[must_use]
    pub fn new(field_path: &str, constraint_id: &'static str, message: &'static str) -> Self {
        let mut out = Self::EMPTY;
        out.set(field_path, constraint_id, message);
        out
    }

    fn set(&mut self, field_path: &str, constraint_id: &'static str, message: &'static str) {
        let mut end = field_path.len().min(P);
        while !field_path.is_char_boundary(end) {
            end -= 1;
        }
        self.path[..end].copy_from_slice(&field_path.as_bytes()[..end]);
        self.path[end..].fill(0);
        self.path_len = end;
        self.constraint_id = constraint_id;
        self.message = message;
    }

    /// Returns the dotted field path where this violation occurred.
    #[must_use]
    pub fn field_path(&self) -> &str {
        // Only ever filled from a `&str` cut on a char boundary.
        core::str::from_utf8(&self.path[..self.path_len]).unwrap_or_default()
    }

    /// Returns the machine-readable constraint identifier, e.g. `int32.gte`.
    #[must_use]
    pub fn constraint_id(&self) -> &'static str {
        self.constraint_id
    }

    /// Returns the human-readable violation message.
    #[must_use]
    pub fn message(&self) -> &'static str {
        self.message
    }
}

impl<const P: usize> PartialEq for Violation<P> {
    fn eq(&self, other: &Self) -> bool {
        self.field_path() == other.field_path()
            && self.constraint_id == other.constraint_id
            && self.message == other.message
    }
}

impl<const P: usize> Eq for Violation<P> {}

impl<const P: usize> fmt::Debug for Violation<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Violation")
            .field("field_path", &self.field_path())
            .field("constraint_id", &self.constraint_id)
            .field("message", &self.message)
            .finish()
    }
}

impl<const P: usize> fmt::Display for Violation<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path_len > 0 {
            write!(f, "{}: ", self.field_path())?;
        }
        if !self.message.is_empty() {
            write!(f, "{}", self.message)
        } else if !self.constraint_id.is_empty() {
            write!(f, "[{}]", self.constraint_id)
        } else {
            write!(f, "[unknown]")
        }
    }
}

/// Fixed-capacity, ordered list of violations.
///
/// Holds at most `N` violations. Once full, further additions are dropped and
/// the buffer is marked truncated until the next [`clear`](Self::clear).
#[derive(Clone)]
pub struct ViolationBuffer<
    const N: usize = DEFAULT_CAPACITY,
    const P: usize = DEFAULT_PATH_CAPACITY,
> {
    items: [Violation<P>; N],
    len: usize,
    truncated: bool,
}

impl<const N: usize, const P: usize> ViolationBuffer<N, P> {
    /// Creates an empty buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: [Violation::EMPTY; N],
            len: 0,
            truncated: false,
        }
    }

    /// Empties the buffer and clears the truncation flag.
    pub fn clear(&mut self) {
        self.len = 0;
        self.truncated = false;
    }

    /// Appends a violation. Returns `false` and sets the truncation flag when
    /// the buffer is already full.
    pub fn add(
        &mut self,
        field_path: &str,
        constraint_id: &'static str,
        message: &'static str,
    ) -> bool {
        match self.items.get_mut(self.len) {
            Some(slot) => {
                slot.set(field_path, constraint_id, message);
                self.len += 1;
                true
            }
            None => {
                self.truncated = true;
                false
            }
        }
    }

    /// At least one violation was recorded.
    #[must_use]
    pub fn has_any(&self) -> bool {
        self.len > 0
    }

    /// Number of recorded violations, never more than `N`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// No violation was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether at least one violation was dropped for lack of room.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// How many violations fit: `N`.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// The violation recorded at `index`, counting from the first.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Violation<P>> {
        self.as_slice().get(index)
    }

    /// Iterates over the recorded violations in encounter order.
    pub fn iter(&self) -> core::slice::Iter<'_, Violation<P>> {
        self.as_slice().iter()
    }

    /// The recorded violations in encounter order.
    #[must_use]
    pub fn as_slice(&self) -> &[Violation<P>] {
        &self.items[..self.len]
    }
}

impl<const N: usize, const P: usize> Default for ViolationBuffer<N, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize, const P: usize> ViolationSink for ViolationBuffer<N, P> {
    fn add(
        &mut self,
        field_path: &str,
        constraint_id: &'static str,
        message: &'static str,
    ) -> bool {
        ViolationBuffer::add(self, field_path, constraint_id, message)
    }
}

impl<const N: usize, const P: usize> PartialEq for ViolationBuffer<N, P> {
    fn eq(&self, other: &Self) -> bool {
        self.truncated == other.truncated && self.as_slice() == other.as_slice()
    }
}

impl<const N: usize, const P: usize> Eq for ViolationBuffer<N, P> {}

impl<const N: usize, const P: usize> fmt::Debug for ViolationBuffer<N, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViolationBuffer")
            .field("violations", &self.as_slice())
            .field("truncated", &self.truncated)
            .finish()
    }
}

impl<'a, const N: usize, const P: usize> IntoIterator for &'a ViolationBuffer<N, P> {
    type Item = &'a Violation<P>;
    type IntoIter = core::slice::Iter<'a, Violation<P>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
