use std::fmt::Write as _;

const INDENT: &str = "    ";

/// Line-oriented source buffer with block indentation.
#[derive(Debug, Default)]
pub(crate) struct CodeWriter {
    buf: String,
    depth: usize,
}

impl CodeWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// A writer whose output will be spliced in at `depth`.
    pub(crate) fn at_depth(depth: usize) -> Self {
        Self {
            buf: String::new(),
            depth,
        }
    }

    /// Appends the output of a nested writer verbatim.
    pub(crate) fn splice(&mut self, nested: Self) {
        self.buf.push_str(&nested.buf);
    }

    pub(crate) fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if text.is_empty() {
            self.buf.push('\n');
            return;
        }
        for _ in 0..self.depth {
            self.buf.push_str(INDENT);
        }
        let _ = writeln!(self.buf, "{text}");
    }

    pub(crate) fn blank(&mut self) {
        self.buf.push('\n');
    }

    /// Writes `text` (normally ending in `{`) and indents what follows.
    pub(crate) fn open(&mut self, text: impl AsRef<str>) {
        self.line(text);
        self.depth += 1;
    }

    /// Dedents and writes `text` (normally `}`).
    pub(crate) fn close(&mut self, text: impl AsRef<str>) {
        self.depth = self.depth.saturating_sub(1);
        self.line(text);
    }

    /// `} else {` and friends: dedent, write, indent.
    pub(crate) fn reopen(&mut self, text: impl AsRef<str>) {
        self.depth = self.depth.saturating_sub(1);
        self.line(text);
        self.depth += 1;
    }

    pub(crate) fn finish(self) -> String {
        self.buf
    }
}
