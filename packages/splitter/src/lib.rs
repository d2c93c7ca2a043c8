//! Test Splitter - split oversized generated test files by line range.
//!
//! Each [`SplitPlan`] names a source test file, an output directory, a
//! header template and a list of [`SplitDescriptor`]s. Every descriptor
//! becomes one output file: the header rendered with the descriptor's
//! title, followed by the source lines in its range, followed by the
//! plan's footer.
//!
//! # Example
//!
//! ```
//! use test_splitter::extract::extract_lines;
//! use test_splitter::template::HeaderTemplate;
//!
//! let source = "one\ntwo\nthree\n";
//! assert_eq!(extract_lines(source, 2, 3), vec!["two\n", "three\n"]);
//!
//! let header = HeaderTemplate::new("describe('{title}', () => {{\n");
//! assert_eq!(header.render_title("Keys").unwrap(), "describe('Keys', () => {\n");
//! ```
//!
//! # Architecture
//!
//! - [`types`]: Descriptors, plans, conflict policy and emit outcomes
//! - [`plans`]: The built-in store and cache plans
//! - [`template`]: Header template rendering
//! - [`extract`]: Line-range extraction
//! - [`emit`]: Writing output files
//! - [`validate`]: Non-fatal range diagnostics
//! - [`config`]: Constants, run root and YAML plan files
//! - [`error`]: Error types and Result alias
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod config;
pub mod emit;
pub mod error;
pub mod extract;
pub mod plans;
pub mod template;
pub mod types;
pub mod validate;

// Re-export main functions
pub use emit::{emit_plan, emit_plans, EmitOptions};

// Re-export commonly used items
pub use error::{Result, SplitterError};
pub use plans::{builtin_plans, cache_plan, store_plan};
pub use types::{ConflictPolicy, EmitOutcome, PlanReport, SplitDescriptor, SplitPlan};
