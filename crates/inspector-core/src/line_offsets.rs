//! Line start offsets
//!
//! Maps 1-based line numbers to the character offset where the line starts in the
//! concatenated document text (every line followed by a single `\n`).

/// Line number -> absolute start offset table.
///
/// Index 0 is a sentinel holding `0`; index `i` (1-based line) holds the start of line `i`. The
/// table has `line_count + 1` entries and is monotonically non-decreasing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineOffsetTable {
    starts: Vec<usize>,
}

impl LineOffsetTable {
    /// Build the table for `lines` (without line terminators).
    pub fn build<S: AsRef<str>>(lines: &[S]) -> Self {
        let mut starts = Vec::with_capacity(lines.len() + 1);
        starts.push(0);
        let mut offset = 0;
        for line in lines {
            starts.push(offset);
            offset += line.as_ref().chars().count() + 1;
        }
        Self { starts }
    }

    /// Table for a document without lines.
    pub fn empty() -> Self {
        Self { starts: vec![0] }
    }

    /// Absolute offset of `(line, column)`, or `None` if `line` is not covered by the table.
    pub fn offset_of(&self, line: usize, column: usize) -> Option<usize> {
        self.starts.get(line).map(|start| start + column)
    }

    /// Start offset of a 1-based line.
    pub fn line_start(&self, line: usize) -> Option<usize> {
        if line == 0 {
            return None;
        }
        self.starts.get(line).copied()
    }

    /// Number of lines covered by the table.
    pub fn line_count(&self) -> usize {
        self.starts.len() - 1
    }

    /// 1-based line that contains `offset`, or `None` for an empty table.
    pub fn line_of_offset(&self, offset: usize) -> Option<usize> {
        if self.line_count() == 0 {
            return None;
        }
        let lines = &self.starts[1..];
        // Line starts are strictly increasing, so an exact hit is unique.
        let idx = match lines.binary_search(&offset) {
            Ok(idx) => idx,
            Err(0) => 0,
            Err(idx) => idx - 1,
        };
        Some(idx + 1)
    }

    /// Raw table, sentinel included.
    pub fn as_slice(&self) -> &[usize] {
        &self.starts
    }
}

impl Default for LineOffsetTable {
    fn default() -> Self {
        Self::empty()
    }
}
