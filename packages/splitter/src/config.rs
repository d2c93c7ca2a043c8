//! Configuration constants, plan files and path handling.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SplitterError};
use crate::plans::builtin_plans;
use crate::types::SplitPlan;

/// Environment variable overriding the run root.
pub const ROOT_ENV_VAR: &str = "SPLIT_TEST_FILES_ROOT";

/// Command suggested once all plans have run.
pub const VERIFY_COMMAND: &str = "pnpm test packages/kernel/src/resource";

/// Output file names: one path component, no leading dot, no separators.
///
/// Plans with any other name are rejected before anything is read or
/// written, so output never lands outside the plan's output directory.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static OUTPUT_FILENAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9._-]*$").expect("valid regex"));

/// Plan file layout: a list of plans under a `plans` key.
///
/// ```yaml
/// plans:
///   - name: store
///     heading: Store Tests
///     source: packages/kernel/src/resource/__tests__/store.test.ts
///     out_dir: packages/kernel/src/resource/__tests__/store
///     header: "/** {title} */\n"
///     footer: "\n});\n"
///     on_conflict: skip
///     splits:
///       - { filename: selectors.test.ts, title: Selectors, start: 441, end: 573 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanFile {
    pub plans: Vec<SplitPlan>,
}

/// Check whether an output file name is a plain, safe file name.
///
/// # Examples
/// ```
/// use test_splitter::config::is_safe_filename;
///
/// assert!(is_safe_filename("selectors.test.ts"));
/// assert!(!is_safe_filename("../store.test.ts"));
/// assert!(!is_safe_filename("nested/keys.test.ts"));
/// ```
#[must_use]
pub fn is_safe_filename(filename: &str) -> bool {
    OUTPUT_FILENAME_PATTERN.is_match(filename)
}

/// Reject a plan whose output names are not plain file names.
pub fn ensure_safe_filenames(plan: &SplitPlan) -> Result<()> {
    match plan.splits.iter().find(|s| !is_safe_filename(&s.filename)) {
        Some(split) => Err(SplitterError::UnsafeFilename {
            plan: plan.name.clone(),
            filename: split.filename.clone(),
        }),
        None => Ok(()),
    }
}

/// Resolve the directory plan paths are relative to.
///
/// Priority: explicit argument, then [`ROOT_ENV_VAR`], then the current
/// directory.
pub fn resolve_root(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(root) = explicit {
        return Ok(root.to_path_buf());
    }
    if let Some(root) = std::env::var_os(ROOT_ENV_VAR).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(root));
    }
    Ok(std::env::current_dir()?)
}

/// Parse plans from YAML text.
///
/// `origin` is only used to label errors.
pub fn parse_plan_file(yaml: &str, origin: &Path) -> Result<Vec<SplitPlan>> {
    let file: PlanFile =
        serde_yaml_ng::from_str(yaml).map_err(|source| SplitterError::PlanFile {
            path: origin.to_path_buf(),
            source,
        })?;
    for plan in &file.plans {
        ensure_safe_filenames(plan)?;
    }
    Ok(file.plans)
}

/// Load plans from a YAML plan file.
pub fn load_plan_file(path: &Path) -> Result<Vec<SplitPlan>> {
    let yaml = fs::read_to_string(path).map_err(|source| SplitterError::ReadPlanFile {
        path: path.to_path_buf(),
        source,
    })?;
    parse_plan_file(&yaml, path)
}

/// Plans for this run: from `plan_file` if given, the built-ins otherwise.
pub fn load_plans(plan_file: Option<&Path>) -> Result<Vec<SplitPlan>> {
    match plan_file {
        Some(path) => load_plan_file(path),
        None => Ok(builtin_plans()),
    }
}

/// Serialize plans in plan file layout.
pub fn plans_to_yaml(plans: &[SplitPlan]) -> Result<String> {
    let file = PlanFile {
        plans: plans.to_vec(),
    };
    serde_yaml_ng::to_string(&file).map_err(|source| SplitterError::PlanFile {
        path: PathBuf::from("<generated>"),
        source,
    })
}
