//! File emission: render header, copy line range, write output.
//!
//! [`emit_plan`] is the one routine behind every plan. Whether an existing
//! output is kept or replaced comes from the plan's [`ConflictPolicy`],
//! optionally overridden through [`EmitOptions`].

use std::borrow::Cow;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::ensure_safe_filenames;
use crate::error::{Result, SplitterError};
use crate::extract::extract_range;
use crate::types::{
    ConflictPolicy, EmitOutcome, EmitRecord, PlanReport, SplitDescriptor, SplitPlan,
};
use crate::validate::{validate_plan, Diagnostic};

/// Run-wide switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmitOptions {
    /// Render everything but write nothing.
    pub dry_run: bool,

    /// Replace every plan's own conflict policy.
    pub on_conflict: Option<ConflictPolicy>,
}

/// Receives progress while a plan runs.
///
/// All methods default to doing nothing.
pub trait Progress {
    /// A descriptor is about to be written.
    fn starting(&mut self, _split: &SplitDescriptor) {}

    /// A descriptor has been handled.
    fn finished(&mut self, _record: &EmitRecord) {}
}

/// Progress sink that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Progress for Silent {}

/// Text of one output file, plus how its range related to the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedOutput {
    /// Header, body and footer.
    pub content: String,

    /// Source lines copied into the body.
    pub body_lines: usize,

    /// Total number of lines in the source.
    pub source_lines: usize,

    /// `true` when the range reached past the end of the source.
    pub truncated: bool,
}

/// Build the full text of one output file.
///
/// Header and footer follow the body's line ending, so a CRLF source
/// produces a CRLF file throughout.
pub fn render_output(
    plan: &SplitPlan,
    split: &SplitDescriptor,
    source: &str,
) -> Result<RenderedOutput> {
    let extraction = extract_range(source, split.start, split.end);
    let crlf = extraction
        .lines
        .first()
        .is_some_and(|line| line.ends_with("\r\n"));

    let header = plan.header.render_title(&split.title)?;
    let header = with_line_ending(&header, crlf);
    let footer = with_line_ending(plan.footer.as_deref().unwrap_or(""), crlf);
    let body = extraction.body();

    let mut content = String::with_capacity(header.len() + body.len() + footer.len());
    content.push_str(&header);
    content.push_str(&body);
    content.push_str(&footer);

    Ok(RenderedOutput {
        content,
        body_lines: extraction.lines.len(),
        source_lines: extraction.source_lines,
        truncated: extraction.truncated,
    })
}

fn with_line_ending(text: &str, crlf: bool) -> Cow<'_, str> {
    if crlf {
        Cow::Owned(text.replace("\r\n", "\n").replace('\n', "\r\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Write `content` to `path` via a temp file in the same directory.
///
/// Writes to temp file, syncs to disk, then renames, so an interrupted run
/// never leaves a half-written output behind.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let wrap = |source: std::io::Error| SplitterError::WriteOutput {
        path: path.to_path_buf(),
        source,
    };

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_file = path.with_file_name(format!(".{file_name}.tmp"));

    {
        let mut file = File::create(&temp_file).map_err(wrap)?;
        file.write_all(content.as_bytes()).map_err(wrap)?;
        file.sync_all().map_err(wrap)?;
    }

    // On Windows, rename fails if the destination already exists
    #[cfg(target_os = "windows")]
    if path.exists() {
        fs::remove_file(path).map_err(wrap)?;
    }

    fs::rename(&temp_file, path).map_err(wrap)
}

/// Read a plan's source file relative to `root`.
pub fn read_source(plan: &SplitPlan, root: &Path) -> Result<String> {
    let path = root.join(&plan.source);
    fs::read_to_string(&path).map_err(|source| SplitterError::ReadSource { path, source })
}

/// Run one plan: read the source once, then handle every descriptor in order.
///
/// Output names that would escape the output directory are rejected before
/// anything is written. After that, the first IO failure aborts the plan;
/// descriptors already written stay written.
pub fn emit_plan(
    plan: &SplitPlan,
    root: &Path,
    options: EmitOptions,
    progress: &mut dyn Progress,
) -> Result<PlanReport> {
    ensure_safe_filenames(plan)?;
    let source = read_source(plan, root)?;

    // Past-the-end ranges are reported per rendered file below
    for diagnostic in validate_plan(plan, None) {
        warn!(plan = %plan.name, "{diagnostic}");
    }

    let policy = options.on_conflict.unwrap_or(plan.on_conflict);
    let out_dir: PathBuf = root.join(&plan.out_dir);
    if !options.dry_run {
        fs::create_dir_all(&out_dir).map_err(|source| SplitterError::WriteOutput {
            path: out_dir.clone(),
            source,
        })?;
    }

    let mut report = PlanReport {
        plan: plan.name.clone(),
        records: Vec::with_capacity(plan.splits.len()),
    };

    for split in &plan.splits {
        let path = out_dir.join(&split.filename);
        let exists = path.exists();

        if exists && policy == ConflictPolicy::Skip {
            debug!(path = %path.display(), "output exists, skipping");
            let record = EmitRecord {
                filename: split.filename.clone(),
                path,
                outcome: EmitOutcome::Skipped,
                body_lines: 0,
            };
            progress.finished(&record);
            report.records.push(record);
            continue;
        }

        progress.starting(split);

        let rendered = render_output(plan, split, &source)?;
        if rendered.truncated {
            let diagnostic = Diagnostic::PastEnd {
                filename: split.filename.clone(),
                end: split.end,
                source_lines: rendered.source_lines,
            };
            warn!(plan = %plan.name, "{diagnostic}");
        }
        let body_lines = rendered.body_lines;

        let outcome = if options.dry_run {
            EmitOutcome::Planned
        } else {
            write_atomic(&path, &rendered.content)?;
            if exists {
                EmitOutcome::Overwritten
            } else {
                EmitOutcome::Created
            }
        };
        debug!(
            path = %path.display(),
            start = split.start,
            end = split.end,
            body_lines,
            ?outcome,
            "emitted split"
        );

        let record = EmitRecord {
            filename: split.filename.clone(),
            path,
            outcome,
            body_lines,
        };
        progress.finished(&record);
        report.records.push(record);
    }

    Ok(report)
}

/// Run several plans in order, stopping at the first error.
pub fn emit_plans(
    plans: &[SplitPlan],
    root: &Path,
    options: EmitOptions,
    progress: &mut dyn Progress,
) -> Result<Vec<PlanReport>> {
    let mut reports = Vec::with_capacity(plans.len());
    for plan in plans {
        reports.push(emit_plan(plan, root, options, progress)?);
    }
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::HeaderTemplate;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn numbered(n: usize) -> String {
        (1..=n).map(|i| format!("line {i}\n")).collect()
    }

    fn test_plan(policy: ConflictPolicy, footer: Option<&str>) -> SplitPlan {
        SplitPlan {
            name: "demo".to_string(),
            heading: "Demo Tests".to_string(),
            source: PathBuf::from("src/all.test.ts"),
            out_dir: PathBuf::from("src/all"),
            header: HeaderTemplate::new("// {title}\ndescribe('{title}', () => {{\n"),
            footer: footer.map(String::from),
            on_conflict: policy,
            splits: vec![
                SplitDescriptor::new("first.test.ts", "First", 2, 4),
                SplitDescriptor::new("second.test.ts", "Second", 5, 6),
            ],
        }
    }

    fn setup(lines: usize) -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/all.test.ts"), numbered(lines)).unwrap();
        dir
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl Progress for Recorder {
        fn starting(&mut self, split: &SplitDescriptor) {
            self.events.push(format!("start {}", split.filename));
        }

        fn finished(&mut self, record: &EmitRecord) {
            self.events
                .push(format!("{:?} {}", record.outcome, record.filename));
        }
    }

    #[test]
    fn test_render_output() {
        let plan = test_plan(ConflictPolicy::Skip, Some("\n});\n"));
        let rendered = render_output(&plan, &plan.splits[0], &numbered(10)).unwrap();
        assert_eq!(
            rendered.content,
            "// First\ndescribe('First', () => {\nline 2\nline 3\nline 4\n\n});\n"
        );
        assert_eq!(rendered.body_lines, 3);
        assert_eq!(rendered.source_lines, 10);
        assert!(!rendered.truncated);
    }

    #[test]
    fn test_render_output_reports_truncation() {
        let mut plan = test_plan(ConflictPolicy::Overwrite, None);
        plan.splits[0].end = 40;
        let rendered = render_output(&plan, &plan.splits[0], &numbered(5)).unwrap();
        assert!(rendered.truncated);
        assert_eq!(rendered.body_lines, 4);
        assert_eq!(rendered.source_lines, 5);
    }

    #[test]
    fn test_render_output_follows_crlf_body() {
        let mut plan = test_plan(ConflictPolicy::Overwrite, Some("\n});\n"));
        plan.header = HeaderTemplate::new("// {title}\n");
        let split = SplitDescriptor::new("t.test.ts", "T", 1, 2);

        let rendered = render_output(&plan, &split, "a\r\nb\r\nc\r\n").unwrap();
        assert_eq!(rendered.content, "// T\r\na\r\nb\r\n\r\n});\r\n");
    }

    #[test]
    fn test_render_output_empty_body_keeps_lf() {
        let plan = test_plan(ConflictPolicy::Overwrite, Some("});\n"));
        let split = SplitDescriptor::new("t.test.ts", "T", 9, 3);

        let rendered = render_output(&plan, &split, "a\r\nb\r\n").unwrap();
        assert_eq!(rendered.content, "// T\ndescribe('T', () => {\n});\n");
    }

    #[test]
    fn test_emit_rejects_escaping_filename() {
        let dir = setup(10);
        let mut plan = test_plan(ConflictPolicy::Overwrite, None);
        plan.splits[1].filename = "../escaped.test.ts".to_string();

        let err = emit_plan(&plan, dir.path(), EmitOptions::default(), &mut Silent).unwrap_err();
        assert!(matches!(err, SplitterError::UnsafeFilename { .. }));
        assert!(!dir.path().join("src/escaped.test.ts").exists());
        // Nothing from the plan is written, not even the safe descriptors
        assert!(!dir.path().join("src/all/first.test.ts").exists());
    }

    #[test]
    fn test_emit_creates_files_and_directory() {
        let dir = setup(10);
        let plan = test_plan(ConflictPolicy::Overwrite, None);

        let report = emit_plan(&plan, dir.path(), EmitOptions::default(), &mut Silent).unwrap();
        assert_eq!(report.count(EmitOutcome::Created), 2);

        let second = fs::read_to_string(dir.path().join("src/all/second.test.ts")).unwrap();
        assert_eq!(second, "// Second\ndescribe('Second', () => {\nline 5\nline 6\n");
    }

    #[test]
    fn test_emit_skip_keeps_existing() {
        let dir = setup(10);
        let plan = test_plan(ConflictPolicy::Skip, Some("});\n"));
        fs::create_dir_all(dir.path().join("src/all")).unwrap();
        fs::write(dir.path().join("src/all/first.test.ts"), "hand edited\n").unwrap();

        let mut recorder = Recorder::default();
        let report = emit_plan(&plan, dir.path(), EmitOptions::default(), &mut recorder).unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("src/all/first.test.ts")).unwrap(),
            "hand edited\n"
        );
        assert_eq!(report.records[0].outcome, EmitOutcome::Skipped);
        assert_eq!(report.records[1].outcome, EmitOutcome::Created);
        assert_eq!(
            recorder.events,
            vec![
                "Skipped first.test.ts",
                "start second.test.ts",
                "Created second.test.ts",
            ]
        );
    }

    #[test]
    fn test_emit_overwrite_is_repeatable() {
        let dir = setup(10);
        let plan = test_plan(ConflictPolicy::Overwrite, None);
        let out = dir.path().join("src/all/first.test.ts");

        emit_plan(&plan, dir.path(), EmitOptions::default(), &mut Silent).unwrap();
        let first_run = fs::read_to_string(&out).unwrap();
        let report = emit_plan(&plan, dir.path(), EmitOptions::default(), &mut Silent).unwrap();

        assert_eq!(fs::read_to_string(&out).unwrap(), first_run);
        assert_eq!(report.count(EmitOutcome::Overwritten), 2);
    }

    #[test]
    fn test_emit_policy_override() {
        let dir = setup(10);
        let plan = test_plan(ConflictPolicy::Skip, None);
        emit_plan(&plan, dir.path(), EmitOptions::default(), &mut Silent).unwrap();

        let options = EmitOptions {
            on_conflict: Some(ConflictPolicy::Overwrite),
            ..EmitOptions::default()
        };
        let report = emit_plan(&plan, dir.path(), options, &mut Silent).unwrap();
        assert_eq!(report.count(EmitOutcome::Overwritten), 2);
    }

    #[test]
    fn test_emit_dry_run_writes_nothing() {
        let dir = setup(10);
        let plan = test_plan(ConflictPolicy::Overwrite, None);
        let options = EmitOptions {
            dry_run: true,
            ..EmitOptions::default()
        };

        let report = emit_plan(&plan, dir.path(), options, &mut Silent).unwrap();
        assert_eq!(report.count(EmitOutcome::Planned), 2);
        assert_eq!(report.records[0].body_lines, 3);
        assert!(!dir.path().join("src/all").exists());
    }

    #[test]
    fn test_emit_truncated_and_inverted_ranges() {
        let dir = setup(5);
        let mut plan = test_plan(ConflictPolicy::Overwrite, None);
        plan.splits = vec![
            SplitDescriptor::new("tail.test.ts", "Tail", 4, 50),
            SplitDescriptor::new("empty.test.ts", "Empty", 9, 3),
        ];

        let report = emit_plan(&plan, dir.path(), EmitOptions::default(), &mut Silent).unwrap();
        assert_eq!(report.records[0].body_lines, 2);
        assert_eq!(report.records[1].body_lines, 0);
        assert_eq!(
            fs::read_to_string(dir.path().join("src/all/empty.test.ts")).unwrap(),
            "// Empty\ndescribe('Empty', () => {\n"
        );
    }

    #[test]
    fn test_emit_missing_source() {
        let dir = tempdir().unwrap();
        let plan = test_plan(ConflictPolicy::Overwrite, None);
        let err = emit_plan(&plan, dir.path(), EmitOptions::default(), &mut Silent).unwrap_err();
        assert!(matches!(err, SplitterError::ReadSource { .. }));
    }

    #[test]
    fn test_write_atomic_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.test.ts");
        write_atomic(&path, "content\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "content\n");
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_emit_plans_in_order() {
        let dir = setup(10);
        let mut second = test_plan(ConflictPolicy::Overwrite, None);
        second.name = "again".to_string();
        second.out_dir = PathBuf::from("src/again");
        let plans = vec![test_plan(ConflictPolicy::Skip, None), second];

        let reports = emit_plans(&plans, dir.path(), EmitOptions::default(), &mut Silent).unwrap();
        let names: Vec<&str> = reports.iter().map(|r| r.plan.as_str()).collect();
        assert_eq!(names, vec!["demo", "again"]);
        assert!(dir.path().join("src/again/first.test.ts").exists());
    }
}
