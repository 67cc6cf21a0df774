//! Human-readable terminal output with source context and a summary line.

use colored::{ColoredString, Colorize};
use mocklint_core::diagnostic::Diagnostic;
use mocklint_core::rules::Severity;
use std::collections::HashMap;

pub struct PrettyFormatter {
    sources: HashMap<String, String>,
}

impl PrettyFormatter {
    pub fn with_sources(sources: HashMap<String, String>) -> Self {
        Self { sources }
    }

    pub fn format(&self, diagnostics: &[Diagnostic]) -> String {
        let mut output = String::new();

        for diag in diagnostics {
            output.push_str(&self.format_diagnostic(diag));
            output.push('\n');
        }

        if !diagnostics.is_empty() {
            output.push_str(&self.format_summary(diagnostics));
        }

        output
    }

    fn format_diagnostic(&self, diag: &Diagnostic) -> String {
        let mut lines = Vec::new();
        let gutter = " ".repeat(diag.line.to_string().len());

        lines.push(format!(
            "{}[{}]: {}",
            self.colorize_severity(&diag.severity),
            diag.rule_id.dimmed(),
            diag.message
        ));
        lines.push(format!(
            "  {} {}:{}:{}",
            "-->".blue(),
            diag.file,
            diag.line,
            diag.column
        ));

        if let Some(source_line) = self.get_source_line(&diag.file, diag.line) {
            lines.push(format!("{} {}", gutter, "|".blue()));
            lines.push(format!(
                "{} {} {}",
                diag.line.to_string().blue(),
                "|".blue(),
                source_line
            ));

            let caret_padding = " ".repeat(diag.column.saturating_sub(1));
            let caret_len = if diag.end_line == diag.line && diag.end_column > diag.column {
                diag.end_column - diag.column
            } else {
                source_line
                    .chars()
                    .count()
                    .saturating_sub(diag.column.saturating_sub(1))
            };
            lines.push(format!(
                "{} {} {}{}",
                gutter,
                "|".blue(),
                caret_padding,
                "^".repeat(caret_len.max(1)).red()
            ));
            lines.push(format!("{} {}", gutter, "|".blue()));
        }

        if let Some(suggestion) = &diag.suggestion {
            lines.push(format!(
                "{} {} {} {}",
                gutter,
                "=".blue(),
                "suggestion:".green(),
                suggestion
            ));
        }

        lines.join("\n")
    }

    fn colorize_severity(&self, severity: &Severity) -> ColoredString {
        match severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
            Severity::Info => "info".blue().bold(),
            Severity::Hint => "hint".cyan().bold(),
        }
    }

    fn get_source_line(&self, file: &str, line: usize) -> Option<String> {
        let index = line.checked_sub(1)?;
        self.sources
            .get(file)
            .and_then(|source| source.lines().nth(index))
            .map(str::to_string)
    }

    fn format_summary(&self, diagnostics: &[Diagnostic]) -> String {
        let error_count = count_severity(diagnostics, Severity::Error);
        let warning_count = count_severity(diagnostics, Severity::Warning);
        let fixable_count = diagnostics.iter().filter(|d| d.is_fixable()).count();
        let total = diagnostics.len();

        let errors_str = plural(error_count, "error");
        let warnings_str = plural(warning_count, "warning");
        let problems_str = if total == 1 { "problem" } else { "problems" };

        let mut summary = format!(
            "\nFound {} {} ({}, {})\n",
            total.to_string().bold(),
            problems_str,
            errors_str.red(),
            warnings_str.yellow()
        );

        if fixable_count > 0 {
            summary.push_str(&format!(
                "{} fixable with `mocklint check --fix`\n",
                fixable_count.to_string().green()
            ));
        }

        summary
    }
}

fn count_severity(diagnostics: &[Diagnostic], severity: Severity) -> usize {
    diagnostics.iter().filter(|d| d.severity == severity).count()
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mocklint_core::diagnostic::Fix;
    use serial_test::serial;

    fn mock_cast_diagnostic(severity: Severity, line: usize, column: usize) -> Diagnostic {
        Diagnostic::new("J001", severity, "Prefer jest.mocked()", "a.test.ts", line, column)
            .with_end(line, column + 16)
            .with_suggestion("Replace with jest.mocked(foo)")
    }

    fn sources_for(content: &str) -> HashMap<String, String> {
        let mut sources = HashMap::new();
        sources.insert("a.test.ts".to_string(), content.to_string());
        sources
    }

    #[test]
    #[serial]
    fn format_single_diagnostic_with_context() {
        colored::control::set_override(false);
        let diag = mock_cast_diagnostic(Severity::Warning, 3, 2);
        let formatter = PrettyFormatter::with_sources(sources_for(
            "import { foo } from './foo';\n\n(foo as jest.Mock).mockReturnValue(1);",
        ));

        let output = formatter.format(&[diag]);
        colored::control::unset_override();

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "warning[J001]: Prefer jest.mocked()");
        assert_eq!(lines[1], "  --> a.test.ts:3:2");
        assert_eq!(lines[3], "3 | (foo as jest.Mock).mockReturnValue(1);");
        assert_eq!(lines[4], "  |  ^^^^^^^^^^^^^^^^");
        assert_eq!(lines[6], "  = suggestion: Replace with jest.mocked(foo)");
    }

    #[test]
    #[serial]
    fn colors_match_severity() {
        let formatter = PrettyFormatter::with_sources(HashMap::new());

        assert_eq!(
            formatter.colorize_severity(&Severity::Error).to_string(),
            "error".red().bold().to_string()
        );
        assert_eq!(
            formatter.colorize_severity(&Severity::Warning).to_string(),
            "warning".yellow().bold().to_string()
        );
        assert_eq!(
            formatter.colorize_severity(&Severity::Info).to_string(),
            "info".blue().bold().to_string()
        );
        assert_eq!(
            formatter.colorize_severity(&Severity::Hint).to_string(),
            "hint".cyan().bold().to_string()
        );
    }

    #[test]
    fn multi_line_range_underlines_rest_of_line() {
        let diag = Diagnostic::new("J001", Severity::Warning, "msg", "a.test.ts", 1, 7).with_end(2, 3);
        let formatter = PrettyFormatter::with_sources(sources_for("const fooBar = 1;\nx"));

        let output = formatter.format(&[diag]);

        assert!(output.contains(&"^".repeat(11)));
    }

    #[test]
    fn shows_summary() {
        let diags = vec![
            mock_cast_diagnostic(Severity::Error, 1, 2),
            mock_cast_diagnostic(Severity::Error, 2, 2),
            mock_cast_diagnostic(Severity::Warning, 3, 2),
        ];
        let output = PrettyFormatter::with_sources(HashMap::new()).format(&diags);

        assert!(output.contains("Found"));
        assert!(output.contains("problems"));
        assert!(output.contains("2 errors"));
        assert!(output.contains("1 warning"));
        assert!(!output.contains("fixable"));
    }

    #[test]
    fn shows_summary_singular() {
        let output = PrettyFormatter::with_sources(HashMap::new()).format(&[mock_cast_diagnostic(Severity::Error, 1, 2)]);

        assert!(output.contains("problem"));
        assert!(output.contains("1 error"));
        assert!(output.contains("0 warnings"));
    }

    #[test]
    fn summary_mentions_fixable_count() {
        let diag = mock_cast_diagnostic(Severity::Warning, 1, 1)
            .with_fix(Fix::replace("Replace with jest.mocked()", "jest.mocked(foo)", 1, 1, 1, 17));

        let output = PrettyFormatter::with_sources(HashMap::new()).format(&[diag]);

        assert!(output.contains("fixable with `mocklint check --fix`"));
    }

    #[test]
    fn empty_diagnostics_produces_empty_output() {
        assert!(PrettyFormatter::with_sources(HashMap::new()).format(&[]).is_empty());
    }

    #[test]
    fn missing_source_skips_context() {
        let diag = mock_cast_diagnostic(Severity::Error, 1, 2);

        let output = PrettyFormatter::with_sources(HashMap::new()).format(&[diag]);

        assert!(output.contains("J001"));
        assert!(!output.contains("^"));
    }

    #[test]
    fn multiple_diagnostics_same_file() {
        let diags = vec![
            mock_cast_diagnostic(Severity::Warning, 1, 11),
            mock_cast_diagnostic(Severity::Warning, 3, 11),
        ];
        let formatter = PrettyFormatter::with_sources(sources_for(
            "const a = foo as jest.Mock;\nconst b = 2;\nconst c = bar as jest.Mock;",
        ));

        let output = formatter.format(&diags);

        assert!(output.contains("const a = foo as jest.Mock;"));
        assert!(output.contains("const c = bar as jest.Mock;"));
        assert!(!output.contains("const b = 2;"));
    }
}
