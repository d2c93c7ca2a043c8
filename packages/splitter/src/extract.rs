//! Line-range extraction.
//!
//! Lines keep their terminators, so concatenating an extracted slice
//! reproduces the source bytes for that range exactly. CRLF lines stay
//! CRLF here; the emitter converts the header and footer to match.

/// Lines selected by a range, plus how the range related to the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction<'a> {
    /// Selected lines, terminators included.
    pub lines: Vec<&'a str>,

    /// Total number of lines in the source.
    pub source_lines: usize,

    /// `true` when the range reached past the end of the source.
    pub truncated: bool,
}

impl Extraction<'_> {
    /// Concatenated body text.
    #[must_use]
    pub fn body(&self) -> String {
        self.lines.concat()
    }
}

/// Split text into lines, keeping each line's `\n` (or `\r\n`).
///
/// A final line without a terminator is still a line.
#[must_use]
pub fn split_lines_inclusive(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}

/// Return lines `start..=end` (1-indexed) of `text`.
///
/// Out-of-range requests never fail: `start > end` yields nothing, an `end`
/// past the last line is clamped, and `start == 0` is read as line 1.
///
/// Note that `start == 0` does not wrap around: a negative-index slice such
/// as `lines[-1:end]` would give an empty body, or only the last line when
/// `end` reaches the end of the source. Here it is the same as `start == 1`.
#[must_use]
pub fn extract_lines(text: &str, start: usize, end: usize) -> Vec<&str> {
    extract_range(text, start, end).lines
}

/// Like [`extract_lines`], also reporting whether the range was clamped.
#[must_use]
pub fn extract_range(text: &str, start: usize, end: usize) -> Extraction<'_> {
    let all = split_lines_inclusive(text);
    let source_lines = all.len();
    let first = start.max(1) - 1;
    let truncated = end > source_lines;
    let last = end.min(source_lines);

    let lines = if first < last {
        all[first..last].to_vec()
    } else {
        Vec::new()
    };

    Extraction {
        lines,
        source_lines,
        truncated,
    }
}
