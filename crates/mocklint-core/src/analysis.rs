//! Analysis engine: runs the registered rules over a parsed file and applies
//! inline disable directives.

use crate::config::Config;
use crate::diagnostic::Diagnostic;
use crate::parser::ParsedFile;
use crate::rules::jest::PreferMocked;
use crate::rules::{RuleRegistry, Severity};

/// Rule id used for syntax errors reported by the parser.
pub const PARSE_RULE_ID: &str = "PARSE";

pub struct AnalysisEngine {
    registry: RuleRegistry,
    config_warnings: Vec<String>,
}

impl AnalysisEngine {
    pub fn new() -> Self {
        Self {
            registry: create_default_registry(),
            config_warnings: Vec::new(),
        }
    }

    pub fn with_config(config: &Config) -> Self {
        let mut registry = create_default_registry();
        let config_warnings = registry.configure(&config.rules);
        Self {
            registry,
            config_warnings,
        }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Warnings produced while applying `[rules]` configuration.
    pub fn config_warnings(&self) -> &[String] {
        &self.config_warnings
    }

    pub fn analyze(&self, file: &ParsedFile) -> Vec<Diagnostic> {
        let directives = file.disable_directives();
        let filename = &file.metadata().filename;

        let parse_diagnostics = file.errors().iter().map(|error| {
            Diagnostic::new(
                PARSE_RULE_ID,
                Severity::Error,
                &error.message,
                filename,
                error.line,
                error.column,
            )
        });

        let diagnostics: Vec<Diagnostic> = parse_diagnostics
            .chain(self.registry.run_all(file))
            .filter(|diagnostic| !self.is_suppressed(file, diagnostic))
            .collect();

        tracing::debug!(
            file = %filename,
            parse_errors = file.errors().len(),
            diagnostics = diagnostics.len(),
            directives = directives.len(),
            "analyzed file"
        );

        diagnostics
    }

    /// Parses `source` and analyzes it in one step.
    pub fn analyze_source(&self, filename: &str, source: &str) -> Vec<Diagnostic> {
        self.analyze(&ParsedFile::from_source(filename, source))
    }

    fn is_suppressed(&self, file: &ParsedFile, diagnostic: &Diagnostic) -> bool {
        let rule_name = self
            .registry
            .get_rule(&diagnostic.rule_id)
            .map(|rule| rule.metadata().name);

        let refs: Vec<&str> = std::iter::once(diagnostic.rule_id.as_str())
            .chain(rule_name)
            .collect();

        file.disable_directives()
            .is_disabled_any(diagnostic.line, &refs)
    }
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn create_default_registry() -> RuleRegistry {
    let mut registry = RuleRegistry::new();
    registry.register(Box::new(PreferMocked::new()));
    registry
}
