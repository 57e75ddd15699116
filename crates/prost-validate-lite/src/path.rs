use core::fmt::{self, Write as _};

use crate::config::DEFAULT_PATH_CAPACITY;
use crate::error::{Halt, PathOverflow};
use crate::violation::ViolationSink;

/// Scratch state for one validation call.
///
/// Tracks the dotted path of the field being checked, forwards reports to an
/// optional [`ViolationSink`], and counts them so the verdict is known even
/// without a sink. The path lives in a `P`-byte buffer on the caller's stack.
pub struct PathContext<'a, const P: usize = DEFAULT_PATH_CAPACITY> {
    buf: [u8; P],
    len: usize,
    // Path length before each live push. Every push writes at least one byte,
    // so depth never exceeds `P`.
    marks: [u16; P],
    depth: usize,
    sink: Option<&'a mut dyn ViolationSink>,
    early_exit: bool,
    reported: usize,
}

impl<'a, const P: usize> PathContext<'a, P> {
    const FITS_MARKS: () = assert!(P <= u16::MAX as usize, "path capacity must fit in u16");

    /// Creates a context at the root path.
    pub fn new(sink: Option<&'a mut dyn ViolationSink>, early_exit: bool) -> Self {
        let () = Self::FITS_MARKS;
        Self {
            buf: [0; P],
            len: 0,
            marks: [0; P],
            depth: 0,
            sink,
            early_exit,
            reported: 0,
        }
    }

    /// Enters a field: appends `.name`, or `name` at the root.
    pub fn push_field(&mut self, name: &str) -> Result<(), PathOverflow> {
        let sep = self.len > 0;
        self.push_with(|w| {
            if sep {
                w.write_char('.')?;
            }
            w.write_str(name)
        })
    }

    /// Enters a list element: appends `[index]`.
    pub fn push_index(&mut self, index: usize) -> Result<(), PathOverflow> {
        self.push_with(|w| write!(w, "[{index}]"))
    }

    /// Enters a map entry: appends `[key]`. String keys are quoted.
    pub fn push_key<K: PathKey + ?Sized>(&mut self, key: &K) -> Result<(), PathOverflow> {
        self.push_with(|w| {
            w.write_char('[')?;
            key.write_key(w)?;
            w.write_char(']')
        })
    }

    /// Leaves the innermost segment, restoring the path to what it was before
    /// the matching push. A pop at the root does nothing.
    pub fn pop(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
            self.len = usize::from(self.marks[self.depth]);
        }
    }

    /// The current dotted path.
    #[must_use]
    pub fn path(&self) -> &str {
        core::str::from_utf8(&self.buf[..self.len]).unwrap_or_default()
    }

    /// Records a violation at the current path.
    ///
    /// Returns `Err(Halt::EarlyExit)` when early exit is enabled so the
    /// generated validator stops at the first failure.
    pub fn report(&mut self, constraint_id: &'static str, message: &'static str) -> Result<(), Halt> {
        self.reported += 1;
        if let Some(sink) = self.sink.as_deref_mut() {
            let path = core::str::from_utf8(&self.buf[..self.len]).unwrap_or_default();
            sink.add(path, constraint_id, message);
        }
        if self.early_exit {
            Err(Halt::EarlyExit)
        } else {
            Ok(())
        }
    }

    /// Violations reported so far, including those a full sink dropped.
    #[must_use]
    pub fn violation_count(&self) -> usize {
        self.reported
    }

    /// Nothing has been reported yet.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.reported == 0
    }

    fn push_with(
        &mut self,
        write: impl FnOnce(&mut SegmentWriter<'_>) -> fmt::Result,
    ) -> Result<(), PathOverflow> {
        let overflow = PathOverflow { capacity: P };
        let start = self.len;
        let Ok(mark) = u16::try_from(start) else {
            return Err(overflow);
        };
        if self.depth >= P {
            return Err(overflow);
        }
        let mut w = SegmentWriter {
            buf: &mut self.buf,
            len: start,
        };
        if write(&mut w).is_err() {
            return Err(overflow);
        }
        let end = w.len;
        if end == start {
            return Err(overflow);
        }
        self.marks[self.depth] = mark;
        self.depth += 1;
        self.len = end;
        Ok(())
    }
}

impl<const P: usize> fmt::Debug for PathContext<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathContext")
            .field("path", &self.path())
            .field("early_exit", &self.early_exit)
            .field("reported", &self.reported)
            .finish_non_exhaustive()
    }
}

/// Appends into the unused tail of a path buffer, failing once it is full.
/// Bytes written before a failure are ignored because the caller keeps the
/// old length.
pub struct SegmentWriter<'b> {
    buf: &'b mut [u8],
    len: usize,
}

impl fmt::Write for SegmentWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let end = self.len.checked_add(s.len()).ok_or(fmt::Error)?;
        let dst = self.buf.get_mut(self.len..end).ok_or(fmt::Error)?;
        dst.copy_from_slice(s.as_bytes());
        self.len = end;
        Ok(())
    }
}

/// A map key that can be rendered inside `[...]` in a field path.
pub trait PathKey {
    /// Writes the key as it appears between the brackets.
    fn write_key(&self, w: &mut SegmentWriter<'_>) -> fmt::Result;
}

macro_rules! bare_path_key {
    ($($t:ty),*) => {
        $(
            impl PathKey for $t {
                fn write_key(&self, w: &mut SegmentWriter<'_>) -> fmt::Result {
                    write!(w, "{self}")
                }
            }
        )*
    };
}

bare_path_key!(i32, i64, u32, u64, bool);

impl PathKey for str {
    fn write_key(&self, w: &mut SegmentWriter<'_>) -> fmt::Result {
        w.write_char('"')?;
        for c in self.chars() {
            match c {
                '"' => w.write_str("\\\"")?,
                '\\' => w.write_str("\\\\")?,
                '\n' => w.write_str("\\n")?,
                '\r' => w.write_str("\\r")?,
                '\t' => w.write_str("\\t")?,
                c if u32::from(c) < 0x20 => write!(w, "\\u{:04x}", u32::from(c))?,
                c => w.write_char(c)?,
            }
        }
        w.write_char('"')
    }
}

#[cfg(feature = "alloc")]
impl PathKey for alloc::string::String {
    fn write_key(&self, w: &mut SegmentWriter<'_>) -> fmt::Result {
        self.as_str().write_key(w)
    }
}

impl<K: PathKey + ?Sized> PathKey for &K {
    fn write_key(&self, w: &mut SegmentWriter<'_>) -> fmt::Result {
        (**self).write_key(w)
    }
}
