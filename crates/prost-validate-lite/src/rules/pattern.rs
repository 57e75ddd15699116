//! Regular-expression rules (`string.pattern`), compiled lazily on first use.

use std::sync::OnceLock;

pub use regex::Regex;

/// A pattern baked into generated code as a `static`.
///
/// The expression is compiled the first time it is matched and cached for the
/// life of the process. The generator rejects invalid expressions, so
/// compilation only fails if the source was edited by hand; such a pattern
/// matches nothing.
pub struct Pattern {
    source: &'static str,
    compiled: OnceLock<Option<Regex>>,
}

impl Pattern {
    /// Wraps `source` without compiling it.
    #[must_use]
    pub const fn new(source: &'static str) -> Self {
        Self {
            source,
            compiled: OnceLock::new(),
        }
    }

    fn regex(&self) -> Option<&Regex> {
        self.compiled
            .get_or_init(|| Regex::new(self.source).ok())
            .as_ref()
    }
}

impl std::fmt::Debug for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Pattern").field(&self.source).finish()
    }
}

/// `value` matches `pattern` anywhere (use `^`/`$` to anchor).
#[must_use]
pub fn matches(value: &str, pattern: &Pattern) -> bool {
    pattern.regex().is_some_and(|re| re.is_match(value))
}
