//! Core data types for the splitter.
//!
//! A [`SplitPlan`] bundles everything one split run needs: where to read,
//! where to write, how to render the header, and which line ranges go into
//! which output file.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::template::HeaderTemplate;

/// What to do when an output file already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Leave the existing file untouched and report it.
    Skip,

    /// Replace the existing file.
    Overwrite,
}

impl ConflictPolicy {
    /// Get the lowercase name used in plan files and on the command line.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Skip => "skip",
            Self::Overwrite => "overwrite",
        }
    }
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One output file: its name, display title, and source line range.
///
/// Line numbers are 1-indexed and inclusive on both ends. Nothing ties
/// them to the actual length of the source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitDescriptor {
    /// File name inside the plan's output directory.
    pub filename: String,

    /// Human-readable title substituted into the header.
    pub title: String,

    /// First line to copy (1-indexed).
    pub start: usize,

    /// Last line to copy (1-indexed, inclusive).
    pub end: usize,
}

impl SplitDescriptor {
    /// Create a new descriptor.
    #[must_use]
    pub fn new(
        filename: impl Into<String>,
        title: impl Into<String>,
        start: usize,
        end: usize,
    ) -> Self {
        Self {
            filename: filename.into(),
            title: title.into(),
            start,
            end,
        }
    }
}

/// A source file and the descriptors that split it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitPlan {
    /// Short identifier used with `--only` (e.g. "store").
    pub name: String,

    /// Heading printed before the plan runs (e.g. "Store Tests").
    pub heading: String,

    /// Source test file, relative to the run root.
    pub source: PathBuf,

    /// Output directory, relative to the run root.
    pub out_dir: PathBuf,

    /// Header prepended to every output file.
    pub header: HeaderTemplate,

    /// Text appended after the copied lines, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,

    /// Behavior when an output file already exists.
    pub on_conflict: ConflictPolicy,

    /// Output files, in emission order.
    pub splits: Vec<SplitDescriptor>,
}

/// What happened to one descriptor during emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitOutcome {
    /// File did not exist and was written.
    Created,

    /// File existed and was replaced.
    Overwritten,

    /// File existed and was left alone.
    Skipped,

    /// Dry run: file would have been written.
    Planned,
}

/// Result of emitting a single descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitRecord {
    /// Descriptor file name.
    pub filename: String,

    /// Full path of the output file.
    pub path: PathBuf,

    /// What happened.
    pub outcome: EmitOutcome,

    /// Source lines copied into the body (0 when skipped).
    pub body_lines: usize,
}

/// Summary of one plan run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanReport {
    /// Plan name.
    pub plan: String,

    /// One record per descriptor, in order.
    pub records: Vec<EmitRecord>,
}

impl PlanReport {
    /// Count records with the given outcome.
    #[must_use]
    pub fn count(&self, outcome: EmitOutcome) -> usize {
        self.records.iter().filter(|r| r.outcome == outcome).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_policy_serde() {
        let policy: ConflictPolicy = serde_yaml_ng::from_str("skip").unwrap();
        assert_eq!(policy, ConflictPolicy::Skip);
        assert_eq!(
            serde_yaml_ng::to_string(&ConflictPolicy::Overwrite).unwrap().trim(),
            "overwrite"
        );
    }

    #[test]
    fn test_report_count() {
        let record = |outcome| EmitRecord {
            filename: "x.test.ts".to_string(),
            path: PathBuf::from("x.test.ts"),
            outcome,
            body_lines: 0,
        };
        let report = PlanReport {
            plan: "store".to_string(),
            records: vec![
                record(EmitOutcome::Created),
                record(EmitOutcome::Skipped),
                record(EmitOutcome::Created),
            ],
        };
        assert_eq!(report.count(EmitOutcome::Created), 2);
        assert_eq!(report.count(EmitOutcome::Skipped), 1);
        assert_eq!(report.count(EmitOutcome::Overwritten), 0);
    }
}
