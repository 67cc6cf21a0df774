//! Applies diagnostic fixes to source text.
//!
//! [`apply_fixes`] performs a single pass: each diagnostic contributes its
//! first fix, fixes are applied in source order and any fix overlapping one
//! already accepted is skipped. [`fix_source`] repeats analyze-and-apply until
//! a pass changes nothing, so fixes skipped because of nesting land in a later
//! pass.

use std::cmp::Reverse;

use crate::analysis::AnalysisEngine;
use crate::diagnostic::{Diagnostic, Fix, FixKind};
use crate::parser::ParsedFile;

pub const MAX_FIX_PASSES: usize = 10;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FixError {
    #[error("Fix '{title}' in {file} has an invalid range {line}:{column}-{end_line}:{end_column}")]
    InvalidRange {
        title: String,
        file: String,
        line: usize,
        column: usize,
        end_line: usize,
        end_column: usize,
    },
}

/// Result of one fix pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOutput {
    pub output: String,
    pub applied: usize,
    /// Fixes dropped because they overlapped an earlier fix.
    pub skipped: usize,
}

/// Result of fixing a file to a fixed point.
#[derive(Debug, Clone)]
pub struct FixResult {
    pub output: String,
    pub fixes_applied: usize,
    /// Passes that changed the text.
    pub passes: usize,
    /// False when [`MAX_FIX_PASSES`] was reached with fixes still pending.
    pub converged: bool,
    /// Diagnostics remaining in `output`.
    pub diagnostics: Vec<Diagnostic>,
}

impl FixResult {
    pub fn changed(&self) -> bool {
        self.fixes_applied > 0
    }
}

struct Edit<'a> {
    start: usize,
    end: usize,
    text: &'a str,
}

fn resolve<'a>(file: &ParsedFile, fix: &'a Fix) -> Result<Edit<'a>, FixError> {
    let invalid = || FixError::InvalidRange {
        title: fix.title.clone(),
        file: file.metadata().filename.clone(),
        line: fix.line,
        column: fix.column,
        end_line: fix.end_line,
        end_column: fix.end_column,
    };

    let FixKind::ReplaceWith { new_text } = &fix.kind;
    let start = file.location_to_offset(fix.line, fix.column).ok_or_else(invalid)?;
    let end = file
        .location_to_offset(fix.end_line, fix.end_column)
        .ok_or_else(invalid)?;

    if end < start {
        return Err(invalid());
    }

    Ok(Edit {
        start,
        end,
        text: new_text,
    })
}

pub fn apply_fixes(file: &ParsedFile, diagnostics: &[Diagnostic]) -> Result<FixOutput, FixError> {
    let mut edits = diagnostics
        .iter()
        .filter_map(|diagnostic| diagnostic.fixes.first())
        .map(|fix| resolve(file, fix))
        .collect::<Result<Vec<_>, _>>()?;

    // At equal starts the enclosing range goes first and the nested fix is skipped.
    edits.sort_by_key(|edit| (edit.start, Reverse(edit.end)));

    let source = file.source();
    let mut output = String::with_capacity(source.len());
    let mut cursor = 0;
    let mut applied = 0;
    let mut skipped = 0;

    for edit in edits {
        if edit.start < cursor {
            skipped += 1;
            continue;
        }
        output.push_str(&source[cursor..edit.start]);
        output.push_str(edit.text);
        cursor = edit.end;
        applied += 1;
    }
    output.push_str(&source[cursor..]);

    Ok(FixOutput {
        output,
        applied,
        skipped,
    })
}

pub fn fix_source(
    engine: &AnalysisEngine,
    filename: &str,
    source: &str,
) -> Result<FixResult, FixError> {
    let mut current = source.to_string();
    let mut fixes_applied = 0;
    let mut passes = 0;

    loop {
        let file = ParsedFile::from_source(filename, &current);
        let diagnostics = engine.analyze(&file);

        if passes == MAX_FIX_PASSES {
            tracing::warn!(
                file = filename,
                passes,
                "fixes did not converge; leaving remaining fixes unapplied"
            );
            return Ok(FixResult {
                output: current,
                fixes_applied,
                passes,
                converged: !diagnostics.iter().any(Diagnostic::is_fixable),
                diagnostics,
            });
        }

        let pass = apply_fixes(&file, &diagnostics)?;
        if pass.applied == 0 {
            return Ok(FixResult {
                output: current,
                fixes_applied,
                passes,
                converged: true,
                diagnostics,
            });
        }

        passes += 1;
        fixes_applied += pass.applied;
        tracing::debug!(
            file = filename,
            pass = passes,
            applied = pass.applied,
            skipped = pass.skipped,
            "applied fixes"
        );
        current = pass.output;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Severity;

    fn diagnostic_with(fix: Fix) -> Diagnostic {
        Diagnostic::new("T001", Severity::Warning, "test", "test.ts", fix.line, fix.column).with_fix(fix)
    }

    #[test]
    fn replaces_single_range() {
        let file = ParsedFile::from_source("test.ts", "const a = foo as jest.Mock;");
        let diagnostics = vec![diagnostic_with(Fix::replace("fix", "jest.mocked(foo)", 1, 11, 1, 27))];

        let pass = apply_fixes(&file, &diagnostics).unwrap();

        insta::assert_snapshot!(pass.output, @"const a = jest.mocked(foo);");
        assert_eq!(pass.applied, 1);
        assert_eq!(pass.skipped, 0);
    }

    #[test]
    fn applies_fixes_on_several_lines() {
        let source = "a as jest.Mock;\nb as jest.Mock;\n";
        let file = ParsedFile::from_source("test.ts", source);
        let diagnostics = vec![
            diagnostic_with(Fix::replace("fix", "jest.mocked(b)", 2, 1, 2, 15)),
            diagnostic_with(Fix::replace("fix", "jest.mocked(a)", 1, 1, 1, 15)),
        ];

        let pass = apply_fixes(&file, &diagnostics).unwrap();

        assert_eq!(pass.output, "jest.mocked(a);\njest.mocked(b);\n");
        assert_eq!(pass.applied, 2);
    }

    #[test]
    fn overlapping_fix_is_skipped() {
        let file = ParsedFile::from_source("test.ts", "abcdef");
        let diagnostics = vec![
            diagnostic_with(Fix::replace("outer", "X", 1, 1, 1, 5)),
            diagnostic_with(Fix::replace("inner", "Y", 1, 2, 1, 4)),
        ];

        let pass = apply_fixes(&file, &diagnostics).unwrap();

        assert_eq!(pass.output, "Xef");
        assert_eq!(pass.applied, 1);
        assert_eq!(pass.skipped, 1);
    }

    #[test]
    fn adjacent_fixes_both_apply() {
        let file = ParsedFile::from_source("test.ts", "abcdef");
        let diagnostics = vec![
            diagnostic_with(Fix::replace("first", "X", 1, 1, 1, 4)),
            diagnostic_with(Fix::replace("second", "Y", 1, 4, 1, 7)),
        ];

        let pass = apply_fixes(&file, &diagnostics).unwrap();

        assert_eq!(pass.output, "XY");
        assert_eq!(pass.applied, 2);
    }

    #[test]
    fn same_start_prefers_enclosing_range() {
        let file = ParsedFile::from_source("test.ts", "abcdef");
        let diagnostics = vec![
            diagnostic_with(Fix::replace("inner", "Y", 1, 1, 1, 3)),
            diagnostic_with(Fix::replace("outer", "X", 1, 1, 1, 7)),
        ];

        let pass = apply_fixes(&file, &diagnostics).unwrap();

        assert_eq!(pass.output, "X");
        assert_eq!(pass.applied, 1);
        assert_eq!(pass.skipped, 1);
    }

    #[test]
    fn columns_count_characters_not_bytes() {
        let file = ParsedFile::from_source("test.ts", "const é = f as jest.Mock;");
        let diagnostics = vec![diagnostic_with(Fix::replace("fix", "jest.mocked(f)", 1, 11, 1, 25))];

        let pass = apply_fixes(&file, &diagnostics).unwrap();

        assert_eq!(pass.output, "const é = jest.mocked(f);");
    }

    #[test]
    fn only_first_fix_of_a_diagnostic_is_used() {
        let file = ParsedFile::from_source("test.ts", "abc");
        let diagnostic = diagnostic_with(Fix::replace("first", "X", 1, 1, 1, 2))
            .with_fix(Fix::replace("alternative", "Y", 1, 1, 1, 2));

        let pass = apply_fixes(&file, &[diagnostic]).unwrap();

        assert_eq!(pass.output, "Xbc");
        assert_eq!(pass.applied, 1);
        assert_eq!(pass.skipped, 0);
    }

    #[test]
    fn invalid_range_is_an_error() {
        let file = ParsedFile::from_source("test.ts", "abc");
        let diagnostics = vec![diagnostic_with(Fix::replace("bad", "X", 4, 1, 4, 2))];

        let err = apply_fixes(&file, &diagnostics).unwrap_err();

        assert!(matches!(err, FixError::InvalidRange { line: 4, .. }));
        assert!(err.to_string().contains("bad"));
    }

    #[test]
    fn reversed_range_is_an_error() {
        let file = ParsedFile::from_source("test.ts", "abcdef");
        let diagnostics = vec![diagnostic_with(Fix::replace("bad", "X", 1, 4, 1, 2))];

        assert!(apply_fixes(&file, &diagnostics).is_err());
    }

    #[test]
    fn diagnostics_without_fixes_leave_text_unchanged() {
        let file = ParsedFile::from_source("test.ts", "const = ;");
        let diagnostics = vec![Diagnostic::new("PARSE", Severity::Error, "oops", "test.ts", 1, 7)];

        let pass = apply_fixes(&file, &diagnostics).unwrap();

        assert_eq!(pass.output, "const = ;");
        assert_eq!(pass.applied, 0);
    }

    #[test]
    fn fix_source_rewrites_mock_cast_in_one_pass() {
        let engine = AnalysisEngine::new();

        let result = fix_source(&engine, "a.test.ts", "(foo as jest.Mock).mockReturnValue(1);").unwrap();

        insta::assert_snapshot!(result.output, @"(jest.mocked(foo)).mockReturnValue(1);");
        assert_eq!(result.fixes_applied, 1);
        assert_eq!(result.passes, 1);
        assert!(result.converged);
        assert!(result.changed());
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn fix_source_handles_every_cast_in_a_file() {
        let engine = AnalysisEngine::new();
        let source = r#"import { foo, bar } from './deps';

const mockedFoo = foo as jest.Mock;
const mockedBar = bar as unknown as jest.MockedFunction<typeof bar>;
"#;

        let result = fix_source(&engine, "a.test.ts", source).unwrap();

        assert_eq!(
            result.output,
            r#"import { foo, bar } from './deps';

const mockedFoo = jest.mocked(foo);
const mockedBar = jest.mocked(bar);
"#
        );
        assert_eq!(result.fixes_applied, 2);
        assert_eq!(result.passes, 1);
    }

    #[test]
    fn parenthesized_nested_cast_is_fixed_in_one_pass() {
        let engine = AnalysisEngine::new();

        let result = fix_source(&engine, "a.test.ts", "(x as jest.Mock) as jest.Mock;").unwrap();

        insta::assert_snapshot!(result.output, @"jest.mocked(x);");
        assert_eq!(result.fixes_applied, 1);
        assert_eq!(result.passes, 1);
        assert!(result.converged);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn chained_mock_casts_are_fixed_in_one_pass() {
        let engine = AnalysisEngine::new();

        let result = fix_source(&engine, "a.test.ts", "const m = a as jest.Mock as jest.Mock;").unwrap();

        insta::assert_snapshot!(result.output, @"const m = jest.mocked(a);");
        assert_eq!(result.fixes_applied, 1);
        assert_eq!(result.passes, 1);
    }

    #[test]
    fn parenthesized_intermediate_casts_are_elided() {
        let engine = AnalysisEngine::new();
        let source = "const a = (foo as unknown) as jest.Mock;
const b = (bar) as jest.MockedFunction;
";

        let result = fix_source(&engine, "a.test.ts", source).unwrap();

        insta::assert_snapshot!(result.output, @r"
        const a = jest.mocked(foo);
        const b = jest.mocked(bar);
        ");
        assert_eq!(result.fixes_applied, 2);
        assert_eq!(result.passes, 1);
    }

    #[test]
    fn fixing_fixed_text_is_a_no_op() {
        let engine = AnalysisEngine::new();
        let first = fix_source(&engine, "a.test.ts", "const m = useFocused as jest.MockedFunction<typeof useFocused>;").unwrap();

        let second = fix_source(&engine, "a.test.ts", &first.output).unwrap();

        assert_eq!(second.output, first.output);
        assert_eq!(second.fixes_applied, 0);
        assert_eq!(second.passes, 0);
        assert!(!second.changed());
    }

    #[test]
    fn fix_source_keeps_parse_diagnostics() {
        let engine = AnalysisEngine::new();

        let result = fix_source(&engine, "broken.ts", "const = ;").unwrap();

        assert_eq!(result.output, "const = ;");
        assert_eq!(result.fixes_applied, 0);
        assert!(result.diagnostics.iter().any(|d| d.rule_id == "PARSE"));
    }

    #[test]
    fn fix_source_respects_disable_directives() {
        let engine = AnalysisEngine::new();
        let source = "// mocklint-disable-next-line J001\nconst a = foo as jest.Mock;\nconst b = bar as jest.Mock;";

        let result = fix_source(&engine, "a.test.ts", source).unwrap();

        assert_eq!(
            result.output,
            "// mocklint-disable-next-line J001\nconst a = foo as jest.Mock;\nconst b = jest.mocked(bar);"
        );
    }
}
