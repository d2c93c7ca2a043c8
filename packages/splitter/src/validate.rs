//! Range diagnostics for split plans.
//!
//! Nothing here blocks a run. Descriptors are hand-authored line numbers, so
//! the useful thing is to say loudly when they stop matching the source.

use std::fmt;

use crate::config::is_safe_filename;
use crate::types::{SplitDescriptor, SplitPlan};

/// A problem with one descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// `start` is greater than `end`; the output body will be empty.
    Inverted {
        filename: String,
        start: usize,
        end: usize,
    },

    /// `start` is 0; read as line 1.
    ZeroStart { filename: String },

    /// `end` is past the last source line; the body will be truncated.
    PastEnd {
        filename: String,
        end: usize,
        source_lines: usize,
    },

    /// Range shares lines with the previous descriptor.
    Overlap {
        filename: String,
        previous: String,
        start: usize,
        previous_end: usize,
    },

    /// Lines between the previous descriptor and this one go nowhere.
    Gap {
        filename: String,
        previous: String,
        from: usize,
        to: usize,
    },

    /// Output name is not a plain file name.
    UnsafeFilename { filename: String },

    /// Output name is used by an earlier descriptor.
    DuplicateFilename { filename: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inverted {
                filename,
                start,
                end,
            } => write!(
                f,
                "{filename}: start {start} is after end {end}, output body will be empty"
            ),
            Self::ZeroStart { filename } => {
                write!(f, "{filename}: start 0 is not a line number, reading from line 1")
            }
            Self::PastEnd {
                filename,
                end,
                source_lines,
            } => write!(
                f,
                "{filename}: end {end} is past the last source line ({source_lines})"
            ),
            Self::Overlap {
                filename,
                previous,
                start,
                previous_end,
            } => write!(
                f,
                "{filename}: lines {start}-{previous_end} are also copied into {previous}"
            ),
            Self::Gap {
                filename,
                previous,
                from,
                to,
            } => write!(
                f,
                "{filename}: lines {from}-{to} after {previous} are not copied anywhere"
            ),
            Self::UnsafeFilename { filename } => {
                write!(f, "'{filename}' is not a plain file name inside the output directory")
            }
            Self::DuplicateFilename { filename } => {
                write!(f, "{filename}: written by more than one descriptor")
            }
        }
    }
}

/// Check a single descriptor against the source length.
#[must_use]
pub fn check_descriptor(split: &SplitDescriptor, source_lines: Option<usize>) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    if !is_safe_filename(&split.filename) {
        diagnostics.push(Diagnostic::UnsafeFilename {
            filename: split.filename.clone(),
        });
    }
    if split.start == 0 {
        diagnostics.push(Diagnostic::ZeroStart {
            filename: split.filename.clone(),
        });
    }
    if split.start > split.end {
        diagnostics.push(Diagnostic::Inverted {
            filename: split.filename.clone(),
            start: split.start,
            end: split.end,
        });
    }
    if let Some(source_lines) = source_lines {
        if split.end > source_lines {
            diagnostics.push(Diagnostic::PastEnd {
                filename: split.filename.clone(),
                end: split.end,
                source_lines,
            });
        }
    }

    diagnostics
}

/// Check every descriptor in a plan, plus how neighbours line up.
///
/// `source_lines` is the source length when known; without it the
/// past-the-end check is skipped.
#[must_use]
pub fn validate_plan(plan: &SplitPlan, source_lines: Option<usize>) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut seen: Vec<&str> = Vec::new();
    let mut previous: Option<&SplitDescriptor> = None;

    for split in &plan.splits {
        diagnostics.extend(check_descriptor(split, source_lines));

        if seen.contains(&split.filename.as_str()) {
            diagnostics.push(Diagnostic::DuplicateFilename {
                filename: split.filename.clone(),
            });
        }
        seen.push(&split.filename);

        // Inverted ranges cover no lines, so they take no part in ordering
        if split.start > split.end {
            continue;
        }

        if let Some(prev) = previous {
            if split.start <= prev.end {
                diagnostics.push(Diagnostic::Overlap {
                    filename: split.filename.clone(),
                    previous: prev.filename.clone(),
                    start: split.start.max(1),
                    previous_end: prev.end.min(split.end),
                });
            } else if split.start > prev.end + 1 {
                diagnostics.push(Diagnostic::Gap {
                    filename: split.filename.clone(),
                    previous: prev.filename.clone(),
                    from: prev.end + 1,
                    to: split.start - 1,
                });
            }
        }
        previous = Some(split);
    }

    diagnostics
}
