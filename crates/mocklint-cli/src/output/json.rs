//! JSON and NDJSON output for editor and CI integration.

use mocklint_core::diagnostic::{Diagnostic, Fix, FixKind};
use mocklint_core::rules::{RuleCategory, RuleRegistry, Severity};
use serde::Serialize;
use std::collections::HashSet;
use std::io::{self, Write};

#[derive(Serialize)]
pub struct JsonOutput {
    pub version: &'static str,
    pub metadata: JsonMetadata,
    pub summary: JsonSummary,
    pub diagnostics: Vec<JsonDiagnostic>,
}

#[derive(Serialize)]
pub struct JsonMetadata {
    pub mocklint_version: &'static str,
    pub working_directory: String,
    pub analyzed_path: String,
}

#[derive(Serialize)]
pub struct JsonSummary {
    pub total_files: usize,
    pub files_with_issues: usize,
    pub total_diagnostics: usize,
    pub fixable: usize,
    pub by_severity: SeverityCounts,
    pub by_category: CategoryCounts,
}

#[derive(Serialize, Default)]
pub struct SeverityCounts {
    pub error: usize,
    pub warning: usize,
    pub info: usize,
    pub hint: usize,
}

#[derive(Serialize, Default)]
pub struct CategoryCounts {
    pub problem: usize,
    pub suggestion: usize,
    pub layout: usize,
}

#[derive(Serialize)]
pub struct JsonDiagnostic {
    pub rule_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    pub severity: String,
    pub message: String,
    pub location: JsonLocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fixes: Vec<JsonFix>,
}

#[derive(Serialize)]
pub struct JsonLocation {
    pub file: String,
    pub start: JsonPosition,
    pub end: JsonPosition,
}

#[derive(Serialize)]
pub struct JsonPosition {
    pub line: usize,
    pub column: usize,
}

#[derive(Serialize)]
pub struct JsonFix {
    pub title: String,
    pub kind: &'static str,
    pub start: JsonPosition,
    pub end: JsonPosition,
    pub new_text: String,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NdjsonRecord {
    Metadata(JsonMetadata),
    Diagnostic(JsonDiagnostic),
    Summary(JsonSummary),
}

pub struct JsonFormatter<'a> {
    registry: &'a RuleRegistry,
}

impl<'a> JsonFormatter<'a> {
    pub fn with_registry(registry: &'a RuleRegistry) -> Self {
        Self { registry }
    }

    pub fn format(
        &self,
        diagnostics: &[Diagnostic],
        total_files: usize,
        analyzed_path: &str,
    ) -> serde_json::Result<String> {
        let output = JsonOutput {
            version: "1.0",
            metadata: self.build_metadata(analyzed_path),
            summary: self.build_summary(diagnostics, total_files),
            diagnostics: diagnostics
                .iter()
                .map(|d| self.convert_diagnostic(d))
                .collect(),
        };
        serde_json::to_string_pretty(&output)
    }

    pub fn format_ndjson<W: Write>(
        &self,
        diagnostics: &[Diagnostic],
        total_files: usize,
        analyzed_path: &str,
        writer: &mut W,
    ) -> io::Result<()> {
        let mut emit = |record: NdjsonRecord| -> io::Result<()> {
            writeln!(writer, "{}", serde_json::to_string(&record)?)
        };

        emit(NdjsonRecord::Metadata(self.build_metadata(analyzed_path)))?;
        for diag in diagnostics {
            emit(NdjsonRecord::Diagnostic(self.convert_diagnostic(diag)))?;
        }
        emit(NdjsonRecord::Summary(
            self.build_summary(diagnostics, total_files),
        ))
    }

    fn build_metadata(&self, analyzed_path: &str) -> JsonMetadata {
        JsonMetadata {
            mocklint_version: env!("CARGO_PKG_VERSION"),
            working_directory: std::env::current_dir()
                .map(|p| p.to_string_lossy().to_string())
                .unwrap_or_default(),
            analyzed_path: analyzed_path.to_string(),
        }
    }

    fn build_summary(&self, diagnostics: &[Diagnostic], total_files: usize) -> JsonSummary {
        let mut by_severity = SeverityCounts::default();
        let mut by_category = CategoryCounts::default();
        let mut files_with_issues = HashSet::new();

        for diag in diagnostics {
            match diag.severity {
                Severity::Error => by_severity.error += 1,
                Severity::Warning => by_severity.warning += 1,
                Severity::Info => by_severity.info += 1,
                Severity::Hint => by_severity.hint += 1,
            }

            match self.category_of(&diag.rule_id) {
                Some(RuleCategory::Problem) => by_category.problem += 1,
                Some(RuleCategory::Suggestion) => by_category.suggestion += 1,
                Some(RuleCategory::Layout) => by_category.layout += 1,
                None => {}
            }

            files_with_issues.insert(diag.file.as_str());
        }

        JsonSummary {
            total_files,
            files_with_issues: files_with_issues.len(),
            total_diagnostics: diagnostics.len(),
            fixable: diagnostics.iter().filter(|d| d.is_fixable()).count(),
            by_severity,
            by_category,
        }
    }

    fn convert_diagnostic(&self, diag: &Diagnostic) -> JsonDiagnostic {
        let rule = self.registry.get_rule(&diag.rule_id);

        JsonDiagnostic {
            rule_id: diag.rule_id.clone(),
            rule_name: rule.map(|r| r.metadata().name.to_string()),
            category: rule.map(|r| r.metadata().category.as_str().to_string()),
            message_id: diag.message_id.clone(),
            severity: format!("{:?}", diag.severity).to_lowercase(),
            message: diag.message.clone(),
            location: JsonLocation {
                file: diag.file.clone(),
                start: JsonPosition {
                    line: diag.line,
                    column: diag.column,
                },
                end: JsonPosition {
                    line: diag.end_line,
                    column: diag.end_column,
                },
            },
            suggestion: diag.suggestion.clone(),
            fixes: diag.fixes.iter().map(convert_fix).collect(),
        }
    }

    fn category_of(&self, rule_id: &str) -> Option<RuleCategory> {
        self.registry
            .get_rule(rule_id)
            .map(|rule| rule.metadata().category)
    }
}

fn convert_fix(fix: &Fix) -> JsonFix {
    let FixKind::ReplaceWith { new_text } = &fix.kind;

    JsonFix {
        title: fix.title.clone(),
        kind: "replace",
        start: JsonPosition {
            line: fix.line,
            column: fix.column,
        },
        end: JsonPosition {
            line: fix.end_line,
            column: fix.end_column,
        },
        new_text: new_text.clone(),
    }
}
