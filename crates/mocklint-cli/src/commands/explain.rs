//! Explain command - prints a rule's metadata, examples and status

use std::env;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use mocklint_core::analysis::AnalysisEngine;
use mocklint_core::config::load_config_or_default_with_warnings;
use mocklint_core::rules::{RuleMetadata, RuleRegistry, Severity};

#[derive(Args, Debug)]
pub struct ExplainArgs {
    /// Rule id or name to explain (e.g. "J001", "prefer-mocked")
    #[arg(value_name = "RULE")]
    pub rule: String,
}

impl ExplainArgs {
    pub fn run(&self) -> Result<ExitCode> {
        let cwd = env::current_dir().context("failed to read the working directory")?;
        let config_result = load_config_or_default_with_warnings(&cwd)?;
        let engine = AnalysisEngine::with_config(&config_result.config);
        let registry = engine.registry();

        match registry.find(&self.rule) {
            Some(rule) => {
                let metadata = rule.metadata();
                let enabled = registry.is_rule_enabled(metadata.id);
                print!("{}", render_explanation(metadata, enabled));
                Ok(ExitCode::SUCCESS)
            }
            None => {
                eprint!("{}", render_unknown_rule(&self.rule, registry));
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

fn render_explanation(metadata: &RuleMetadata, enabled: bool) -> String {
    let mut out = String::new();

    out.push('\n');
    out.push_str(&format!("{}\n\n", format!("Rule {}", metadata.id).bold()));
    out.push_str(&format!("  {}: {}\n", "Name".cyan(), metadata.name));
    out.push_str(&format!("  {}: {}\n", "Description".cyan(), metadata.description));
    out.push_str(&format!("  {}: {}\n", "Category".cyan(), metadata.category.as_str()));
    out.push_str(&format!(
        "  {}: {}\n",
        "Severity".cyan(),
        format_severity(&metadata.severity)
    ));
    out.push_str(&format!(
        "  {}: {}\n",
        "Fixable".cyan(),
        if metadata.fixable { "yes" } else { "no" }
    ));

    for (id, template) in metadata.messages {
        out.push_str(&format!("  {} {}: {}\n", "Message".cyan(), id, template));
    }

    if let Some(url) = metadata.docs_url {
        out.push_str(&format!("  {}: {}\n", "Documentation".cyan(), url));
    }

    if let Some(examples) = metadata.examples {
        out.push_str(&format!("\n  {}:\n", "Examples".cyan()));
        for line in examples.lines() {
            out.push_str(&format!("    {}\n", line));
        }
    }

    let status = if enabled {
        "enabled".green()
    } else {
        "disabled".red()
    };
    out.push_str(&format!("\n  {}: {}\n\n", "Status".cyan(), status));

    out
}

fn render_unknown_rule(rule: &str, registry: &RuleRegistry) -> String {
    let mut out = format!("{} unknown rule '{}'\n\nAvailable rules:\n", "error:".red().bold(), rule);
    for rule in registry.rules() {
        let meta = rule.metadata();
        out.push_str(&format!("  {} ({})\n", meta.id, meta.name));
    }
    out
}

fn format_severity(severity: &Severity) -> String {
    match severity {
        Severity::Error => "error".red().to_string(),
        Severity::Warning => "warning".yellow().to_string(),
        Severity::Info => "info".blue().to_string(),
        Severity::Hint => "hint".cyan().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mocklint_core::config::{Config, RulesConfig};

    #[test]
    fn explain_finds_rule_by_id_and_name() {
        let engine = AnalysisEngine::new();
        let registry = engine.registry();

        assert_eq!(registry.find("J001").unwrap().metadata().name, "prefer-mocked");
        assert_eq!(registry.find("prefer-mocked").unwrap().metadata().id, "J001");
        assert!(registry.find("J999").is_none());
    }

    #[test]
    fn explanation_lists_metadata_and_examples() {
        let engine = AnalysisEngine::new();
        let metadata = engine.registry().find("prefer-mocked").unwrap().metadata();

        let text = render_explanation(metadata, true);

        assert!(text.contains("J001"));
        assert!(text.contains("prefer-mocked"));
        assert!(text.contains("Prefer jest.mocked() over (fn as jest.Mock)"));
        assert!(text.contains("suggestion"));
        assert!(text.contains("useJestMocked"));
        assert!(text.contains("Prefer jest.mocked({{ replacement }})"));
        assert!(text.contains("jest.mocked(useFocused)"));
        assert!(text.contains("enabled"));
    }

    #[test]
    fn explanation_reports_disabled_status() {
        let config = Config {
            rules: RulesConfig {
                disabled: vec!["J001".to_string()],
                ..Default::default()
            },
            ..Default::default()
        };
        let engine = AnalysisEngine::with_config(&config);
        let metadata = engine.registry().find("J001").unwrap().metadata();

        let text = render_explanation(metadata, engine.registry().is_rule_enabled("J001"));

        assert!(text.contains("disabled"));
    }

    #[test]
    fn unknown_rule_lists_available_rules() {
        let engine = AnalysisEngine::new();

        let text = render_unknown_rule("no-console", engine.registry());

        assert!(text.contains("unknown rule 'no-console'"));
        assert!(text.contains("J001 (prefer-mocked)"));
    }
}
