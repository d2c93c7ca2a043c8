//! Error types for the splitter.
//!
//! Every failure that aborts a run carries the path it happened on, so the
//! single `Error: ...` line printed by the binary is enough to act on.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the splitter library.
#[derive(Debug, Error)]
pub enum SplitterError {
    /// Source test file could not be read.
    #[error("Failed to read source file {}: {source}", .path.display())]
    ReadSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output file could not be written.
    #[error("Failed to write output file {}: {source}", .path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Header template references a placeholder with no value.
    #[error("Unknown placeholder '{{{name}}}' in header template")]
    UnknownPlaceholder { name: String },

    /// Header template has a lone `{` or `}`.
    #[error("Unbalanced '{brace}' at byte {offset} in header template")]
    UnbalancedBrace { brace: char, offset: usize },

    /// Plan name not found among the loaded plans.
    #[error("Unknown plan '{name}'. Available: {}", .available.join(", "))]
    UnknownPlan {
        name: String,
        available: Vec<String>,
    },

    /// Output file name would land outside the plan's output directory.
    #[error("Plan '{plan}' writes to '{filename}', which is not a plain file name")]
    UnsafeFilename { plan: String, filename: String },

    /// Plan file could not be read.
    #[error("Failed to read plan file {}: {source}", .path.display())]
    ReadPlanFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Plan file is not valid YAML or does not match the plan schema.
    #[error("Invalid plan file {}: {source}", .path.display())]
    PlanFile {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for splitter operations.
pub type Result<T> = std::result::Result<T, SplitterError>;
