//! Line-addressed text buffer.
//!
//! The buffer is an ordered sequence of owned lines. Users address lines with
//! 1-based numbers; storage is 0-based, and throughout this workspace the word
//! "line" means a 1-based number while "index" means a 0-based offset.
//!
//! A trailing empty entry is the sentinel meaning "the file ends with a
//! newline": `"a\nb\n"` splits into `["a", "b", ""]` and joins back
//! byte-identically. `last_line` therefore reports the entry count minus the
//! sentinel when one is present.
//!
//! Every entry carries a [`LineId`] drawn from a monotonic counter. Ids are
//! never reused and survive text edits to the same line, which gives the
//! global command executor a stable key for its matched-line set even while
//! sub-commands insert and delete lines mid-iteration.

/// Stable identity of one buffer line. Assigned at line creation, never
/// reused; a deleted line's id simply stops appearing in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineId(u64);

#[derive(Debug, Clone)]
struct Line {
    id: LineId,
    text: String,
}

/// Ordered, mutable sequence of owned text lines (no embedded newlines).
///
/// Invariant: the sequence is never empty. A brand-new buffer holds exactly
/// one empty line, which also represents the empty file (zero bytes).
#[derive(Debug, Clone)]
pub struct LineBuffer {
    lines: Vec<Line>,
    next_id: u64,
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl LineBuffer {
    pub fn new() -> Self {
        let mut buf = Self {
            lines: Vec::new(),
            next_id: 0,
        };
        let id = buf.alloc_id();
        buf.lines.push(Line {
            id,
            text: String::new(),
        });
        buf
    }

    /// Split raw file text on `\n` into lines. A final empty segment (the
    /// newline sentinel) is kept, so the split is the exact inverse of
    /// [`LineBuffer::to_text`].
    pub fn from_text(text: &str) -> Self {
        let mut buf = Self {
            lines: Vec::new(),
            next_id: 0,
        };
        for segment in text.split('\n') {
            let id = buf.alloc_id();
            buf.lines.push(Line {
                id,
                text: segment.to_string(),
            });
        }
        debug_assert!(!buf.lines.is_empty());
        buf
    }

    /// Join all entries with `\n`, reproducing the source bytes verbatim.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&line.text);
        }
        out
    }

    /// Raw entry count, including the newline sentinel when present.
    pub fn entry_count(&self) -> usize {
        self.lines.len()
    }

    /// Highest addressable 1-based line number. Zero only for an empty
    /// buffer (single empty entry).
    pub fn last_line(&self) -> usize {
        let count = self.lines.len();
        if self.lines[count - 1].text.is_empty() {
            count - 1
        } else {
            count
        }
    }

    pub fn text(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(|l| l.text.as_str())
    }

    pub fn id(&self, index: usize) -> Option<LineId> {
        self.lines.get(index).map(|l| l.id)
    }

    /// Replace the text at `index`, keeping the line's identity. Panics if
    /// `index` is out of bounds; callers validate addresses first.
    pub fn set_text(&mut self, index: usize, text: String) {
        self.lines[index].text = text;
    }

    /// Splice `texts` in before `index`, assigning each a fresh id. `index`
    /// must be `<= entry_count()`.
    pub fn insert(&mut self, index: usize, texts: Vec<String>) {
        let mut incoming = Vec::with_capacity(texts.len());
        for text in texts {
            let id = self.alloc_id();
            incoming.push(Line { id, text });
        }
        self.lines.splice(index..index, incoming);
    }

    /// Remove entries in the 0-based range `[start, end)`. If the removal
    /// would empty the buffer, a single fresh empty line is left behind to
    /// uphold the non-empty invariant.
    pub fn remove_range(&mut self, start: usize, end: usize) {
        debug_assert!(start <= end && end <= self.lines.len());
        self.lines.drain(start..end);
        if self.lines.is_empty() {
            let id = self.alloc_id();
            self.lines.push(Line {
                id,
                text: String::new(),
            });
        }
    }

    fn alloc_id(&mut self) -> LineId {
        self.next_id += 1;
        LineId(self.next_id)
    }
}
