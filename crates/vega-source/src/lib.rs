pub use text_size::{TextRange, TextSize};

/// Span of a name-introducing identifier token.
///
/// Captured from the parser's token ranges. Provides O(1) `text_range()`
/// at diagnostic time. File context comes from the owning symbol or
/// diagnostic -- not stored here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NameSpan {
    start: u32,
    len: u32,
}

impl NameSpan {
    pub fn new(range: TextRange) -> Self {
        Self {
            start: u32::from(range.start()),
            len: u32::from(range.end()) - u32::from(range.start()),
        }
    }

    pub fn text_range(self) -> TextRange {
        let start = TextSize::from(self.start);
        TextRange::at(start, TextSize::from(self.len))
    }
}

/// Opaque handle to a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub u32);

/// A span within a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub file: FileId,
    pub range: TextRange,
}

impl Span {
    pub fn new(file: FileId, range: TextRange) -> Self {
        Self { file, range }
    }

    /// A span covering `len` bytes starting at `offset` in `file`.
    pub fn at(file: FileId, offset: u32, len: u32) -> Self {
        Self {
            file,
            range: TextRange::at(TextSize::from(offset), TextSize::from(len)),
        }
    }

    /// Zero-length span at the start of this span.
    pub fn start(self) -> Span {
        Span {
            file: self.file,
            range: TextRange::empty(self.range.start()),
        }
    }
}
