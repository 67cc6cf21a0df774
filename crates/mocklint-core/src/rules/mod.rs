//! Rule system for code analysis
//!
//! Rules are registered explicitly into a [`RuleRegistry`] owned by the
//! analysis engine; there is no global rule table.

pub mod helpers;
pub mod jest;

use crate::config::RulesConfig;
use crate::diagnostic::Diagnostic;
use crate::parser::ParsedFile;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

/// What kind of finding a rule reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleCategory {
    /// Code that is likely wrong.
    Problem,
    /// Code that works but has a preferred alternative.
    Suggestion,
    /// Formatting only.
    Layout,
}

impl RuleCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleCategory::Problem => "problem",
            RuleCategory::Suggestion => "suggestion",
            RuleCategory::Layout => "layout",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMetadata {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: RuleCategory,
    pub severity: Severity,
    pub fixable: bool,
    pub accepts_options: bool,
    /// Message templates keyed by message id; see [`helpers::render_message`].
    pub messages: &'static [(&'static str, &'static str)],
    pub docs_url: Option<&'static str>,
    pub examples: Option<&'static str>,
}

impl RuleMetadata {
    pub fn message(&self, message_id: &str) -> Option<&'static str> {
        self.messages
            .iter()
            .find(|(id, _)| *id == message_id)
            .map(|(_, template)| *template)
    }
}

pub trait Rule: Send + Sync {
    fn metadata(&self) -> &RuleMetadata;
    fn check(&self, file: &ParsedFile) -> Vec<Diagnostic>;
}

pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
    disabled_rules: HashSet<String>,
    severity_overrides: HashMap<String, Severity>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            disabled_rules: HashSet::new(),
            severity_overrides: HashMap::new(),
        }
    }

    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    /// Applies `[rules]` configuration and returns warnings for references
    /// that do not match any registered rule.
    pub fn configure(&mut self, config: &RulesConfig) -> Vec<String> {
        self.disabled_rules.clear();
        self.severity_overrides.clear();
        let mut warnings = Vec::new();

        for rule_ref in &config.disabled {
            if !self.is_known(rule_ref) {
                warnings.push(format!("Unknown rule in [rules].disabled: '{}'", rule_ref));
            }
            self.disabled_rules.insert(rule_ref.clone());
        }

        for (rule_ref, severity_value) in &config.severity {
            if !self.is_known(rule_ref) {
                warnings.push(format!("Unknown rule in [rules.severity]: '{}'", rule_ref));
            }
            self.severity_overrides
                .insert(rule_ref.clone(), (*severity_value).into());
        }

        for rule_ref in config.options.keys() {
            match self.find(rule_ref) {
                Some(rule) if !rule.metadata().accepts_options => warnings.push(format!(
                    "Rule '{}' does not accept options; ignoring [rules.options.{}]",
                    rule.metadata().name,
                    rule_ref
                )),
                Some(_) => {}
                None => warnings.push(format!("Unknown rule in [rules.options]: '{}'", rule_ref)),
            }
        }

        for warning in &warnings {
            tracing::warn!("{}", warning);
        }

        warnings
    }

    pub fn rules(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(|r| r.as_ref())
    }

    pub fn run_all(&self, file: &ParsedFile) -> Vec<Diagnostic> {
        self.rules
            .iter()
            .filter(|rule| self.should_run_rule(rule.as_ref()))
            .flat_map(|rule| {
                let mut diagnostics = rule.check(file);
                tracing::trace!(
                    rule = rule.metadata().name,
                    file = %file.metadata().filename,
                    count = diagnostics.len(),
                    "rule finished"
                );
                self.apply_severity_overrides(rule.as_ref(), &mut diagnostics);
                diagnostics
            })
            .collect()
    }

    fn should_run_rule(&self, rule: &dyn Rule) -> bool {
        !self.is_rule_disabled(rule.metadata())
    }

    fn is_rule_disabled(&self, metadata: &RuleMetadata) -> bool {
        self.disabled_rules.contains(metadata.id) || self.disabled_rules.contains(metadata.name)
    }

    fn apply_severity_overrides(&self, rule: &dyn Rule, diagnostics: &mut [Diagnostic]) {
        let metadata = rule.metadata();

        let override_severity = self
            .severity_overrides
            .get(metadata.id)
            .or_else(|| self.severity_overrides.get(metadata.name));

        if let Some(severity) = override_severity {
            for diag in diagnostics.iter_mut() {
                diag.severity = *severity;
            }
        }
    }

    pub fn is_rule_enabled(&self, id_or_name: &str) -> bool {
        self.find(id_or_name)
            .is_some_and(|rule| self.should_run_rule(rule))
    }

    /// Looks a rule up by id first, then by name.
    pub fn find(&self, id_or_name: &str) -> Option<&dyn Rule> {
        self.get_rule(id_or_name)
            .or_else(|| self.get_rule_by_name(id_or_name))
    }

    pub fn get_rule(&self, id: &str) -> Option<&dyn Rule> {
        self.rules
            .iter()
            .find(|r| r.metadata().id == id)
            .map(|r| r.as_ref())
    }

    pub fn get_rule_by_name(&self, name: &str) -> Option<&dyn Rule> {
        self.rules
            .iter()
            .find(|r| r.metadata().name == name)
            .map(|r| r.as_ref())
    }

    fn is_known(&self, id_or_name: &str) -> bool {
        self.find(id_or_name).is_some()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[macro_export]
macro_rules! declare_rule {
    (
        $name:ident,
        id = $id:literal,
        name = $rule_name:literal,
        description = $desc:literal,
        category = $cat:ident,
        severity = $sev:ident,
        fixable = $fixable:literal,
        messages = [$($msg_id:literal => $template:literal),* $(,)?]
        $(, accepts_options = $opts:literal)?
        $(, docs_url = $url:literal)?
        $(, examples = $examples:literal)?
    ) => {
        pub struct $name {
            metadata: $crate::rules::RuleMetadata,
        }

        impl $name {
            pub fn new() -> Self {
                Self {
                    metadata: $crate::rules::RuleMetadata {
                        id: $id,
                        name: $rule_name,
                        description: $desc,
                        category: $crate::rules::RuleCategory::$cat,
                        severity: $crate::rules::Severity::$sev,
                        fixable: $fixable,
                        accepts_options: $crate::declare_rule!(@accepts_options $($opts)?),
                        messages: &[$(($msg_id, $template)),*],
                        docs_url: $crate::declare_rule!(@docs_url $($url)?),
                        examples: $crate::declare_rule!(@examples $($examples)?),
                    },
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
    (@accepts_options $opts:literal) => { $opts };
    (@accepts_options) => { false };
    (@docs_url $url:literal) => { Some($url) };
    (@docs_url) => { None };
    (@examples $examples:literal) => { Some($examples) };
    (@examples) => { None };
}
