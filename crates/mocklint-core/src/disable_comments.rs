//! Inline comments that suppress diagnostics on a single line
//!
//! - `// mocklint-disable-next-line J001` - suppress J001 on the following line
//! - `// mocklint-disable-line prefer-mocked` - suppress by rule name on this line
//! - `// mocklint-disable-next-line` - suppress every rule on the following line
//! - `// mocklint-disable-line J001, PARSE` - several rules at once

use std::collections::HashMap;

const DISABLE_NEXT_LINE: &str = "mocklint-disable-next-line";
const DISABLE_LINE: &str = "mocklint-disable-line";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisableDirective {
    /// 1-based line the directive applies to.
    pub line: usize,
    /// Rule ids or names. Empty means every rule.
    pub rules: Vec<String>,
}

impl DisableDirective {
    pub fn new(line: usize, rules: Vec<String>) -> Self {
        Self { line, rules }
    }

    pub fn for_all_rules(line: usize) -> Self {
        Self::new(line, Vec::new())
    }

    pub fn disables_all(&self) -> bool {
        self.rules.is_empty()
    }

    /// True if this directive covers any of the given references, typically a
    /// rule's id and its name.
    pub fn disables_any(&self, rule_refs: &[&str]) -> bool {
        self.disables_all()
            || self
                .rules
                .iter()
                .any(|listed| rule_refs.contains(&listed.as_str()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct DisableDirectives {
    by_line: HashMap<usize, DisableDirective>,
}

impl DisableDirectives {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_source(source: &str) -> Self {
        let mut directives = Self::new();

        for (index, line) in source.lines().enumerate() {
            let line_num = index + 1;
            let Some(comment_start) = line.find("//") else {
                continue;
            };
            let comment = line[comment_start + 2..].trim();

            if let Some(rest) = comment.strip_prefix(DISABLE_NEXT_LINE) {
                if let Some(rules) = parse_rule_refs(rest) {
                    directives.add(DisableDirective::new(line_num + 1, rules));
                }
            } else if let Some(rest) = comment.strip_prefix(DISABLE_LINE) {
                if let Some(rules) = parse_rule_refs(rest) {
                    directives.add(DisableDirective::new(line_num, rules));
                }
            }
        }

        directives
    }

    /// Adds a directive, merging rule lists when a line is targeted twice.
    pub fn add(&mut self, directive: DisableDirective) {
        match self.by_line.get_mut(&directive.line) {
            Some(existing) if existing.disables_all() => {}
            Some(existing) if directive.disables_all() => existing.rules.clear(),
            Some(existing) => existing.rules.extend(directive.rules),
            None => {
                self.by_line.insert(directive.line, directive);
            }
        }
    }

    pub fn is_disabled_any(&self, line: usize, rule_refs: &[&str]) -> bool {
        self.by_line
            .get(&line)
            .is_some_and(|d| d.disables_any(rule_refs))
    }

    pub fn is_empty(&self) -> bool {
        self.by_line.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_line.len()
    }
}

/// Parses the text after a directive keyword. Returns `None` when the keyword
/// is only a prefix of a longer word, e.g. `mocklint-disable-line-foo`.
fn parse_rule_refs(rest: &str) -> Option<Vec<String>> {
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }

    Some(
        rest.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disable_next_line_with_rule_id() {
        let source = r#"
// mocklint-disable-next-line J001
const mocked = fn as jest.Mock;
"#;
        let directives = DisableDirectives::from_source(source);

        assert!(directives.is_disabled_any(3, &["J001"]));
        assert!(!directives.is_disabled_any(3, &["PARSE"]));
        assert!(!directives.is_disabled_any(2, &["J001"]));
    }

    #[test]
    fn disable_line_with_rule_name() {
        let source = "const mocked = fn as jest.Mock; // mocklint-disable-line prefer-mocked\n";
        let directives = DisableDirectives::from_source(source);

        assert!(directives.is_disabled_any(1, &["prefer-mocked"]));
        assert!(directives.is_disabled_any(1, &["J001", "prefer-mocked"]));
        assert!(!directives.is_disabled_any(1, &["J001"]));
    }

    #[test]
    fn bare_directive_disables_all_rules() {
        let source = r#"
// mocklint-disable-next-line
const a = fn as jest.Mock;
const b = fn as jest.Mock; // mocklint-disable-line
"#;
        let directives = DisableDirectives::from_source(source);

        assert!(directives.is_disabled_any(3, &["J001"]));
        assert!(directives.is_disabled_any(3, &["ANY_RULE"]));
        assert!(directives.is_disabled_any(4, &["PARSE"]));
    }

    #[test]
    fn multiple_rules_with_irregular_whitespace() {
        let source = r#"
// mocklint-disable-next-line   J001  ,  PARSE
const a = fn as jest.Mock;
"#;
        let directives = DisableDirectives::from_source(source);

        assert!(directives.is_disabled_any(3, &["J001"]));
        assert!(directives.is_disabled_any(3, &["PARSE"]));
        assert!(!directives.is_disabled_any(3, &["J002"]));
    }

    #[test]
    fn no_disable_comments() {
        let source = r#"
const a = jest.mocked(fn);
// plain comment
"#;
        let directives = DisableDirectives::from_source(source);

        assert!(directives.is_empty());
        assert!(!directives.is_disabled_any(2, &["J001"]));
    }

    #[test]
    fn directive_only_affects_target_line() {
        let source = r#"
// mocklint-disable-next-line J001
const a = fn as jest.Mock;
const b = fn as jest.Mock;
"#;
        let directives = DisableDirectives::from_source(source);

        assert!(directives.is_disabled_any(3, &["J001"]));
        assert!(!directives.is_disabled_any(4, &["J001"]));
    }

    #[test]
    fn directives_on_first_and_last_line() {
        let source = "// mocklint-disable-next-line J001\nconst a = fn as jest.Mock;\n// mocklint-disable-next-line J001";
        let directives = DisableDirectives::from_source(source);

        assert!(directives.is_disabled_any(2, &["J001"]));
        assert!(directives.is_disabled_any(4, &["J001"]));
        assert_eq!(directives.len(), 2);
    }

    #[test]
    fn indented_comment_in_test_body() {
        let source = r#"
describe('thing', () => {
    // mocklint-disable-next-line J001
    (fetch as jest.Mock).mockResolvedValue({});
});
"#;
        let directives = DisableDirectives::from_source(source);

        assert!(directives.is_disabled_any(4, &["J001"]));
    }

    #[test]
    fn near_misses_are_not_directives() {
        let source = r#"
// mocklint-disable J001
// mocklint-disable-block J001
// mocklint-disable-lines J001
// see mocklint-disable-next-line for details
const a = fn as jest.Mock;
"#;
        let directives = DisableDirectives::from_source(source);

        assert!(directives.is_empty());
    }

    #[test]
    fn same_line_targeted_twice_merges_rules() {
        let source = r#"
// mocklint-disable-next-line J001
const a = fn as jest.Mock; // mocklint-disable-line PARSE
"#;
        let directives = DisableDirectives::from_source(source);

        assert!(directives.is_disabled_any(3, &["J001"]));
        assert!(directives.is_disabled_any(3, &["PARSE"]));
        assert_eq!(directives.len(), 1);
    }

    #[test]
    fn disable_all_wins_when_merging() {
        let mut directives = DisableDirectives::new();
        directives.add(DisableDirective::new(5, vec!["J001".to_string()]));
        directives.add(DisableDirective::for_all_rules(5));
        directives.add(DisableDirective::new(5, vec!["PARSE".to_string()]));

        assert_eq!(directives.len(), 1);
        assert!(directives.is_disabled_any(5, &["ANYTHING"]));
        assert!(directives.is_disabled_any(5, &["J002"]));
    }

    #[test]
    fn directive_struct_matches_id_or_name() {
        let directive = DisableDirective::new(5, vec!["prefer-mocked".to_string()]);

        assert!(directive.disables_any(&["J001", "prefer-mocked"]));
        assert!(!directive.disables_any(&["J001"]));
        assert!(!directive.disables_all());
    }

    #[test]
    fn empty_source() {
        let directives = DisableDirectives::from_source("");

        assert!(directives.is_empty());
        assert_eq!(directives.len(), 0);
    }
}
