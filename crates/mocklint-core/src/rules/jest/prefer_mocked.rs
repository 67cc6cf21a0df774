//! prefer-mocked rule (J001): Prefer `jest.mocked(fn)` over `(fn as jest.Mock)`
//!
//! Casting a function to `jest.Mock` or `jest.MockedFunction<...>` throws away
//! the original signature. `jest.mocked()` keeps it and reads the same at the
//! call site. Intermediate casts (`fn as unknown as jest.Mock`) are dropped by
//! the rewrite.

use std::ops::ControlFlow;

use swc_common::Spanned;
use swc_ecma_ast::{Expr, TsAsExpr, TsEntityName, TsType};

use crate::declare_rule;
use crate::diagnostic::{Diagnostic, Fix};
use crate::parser::ParsedFile;
use crate::rules::helpers::render_message;
use crate::rules::{Rule, RuleMetadata};
use crate::visitor::{AstVisitor, VisitorContext, walk_ast};

pub const MOCK_NAMESPACE: &str = "jest";
pub const MOCK_MARKERS: [&str; 2] = ["Mock", "MockedFunction"];
pub const MOCKED_HELPER: &str = "jest.mocked";
pub const USE_JEST_MOCKED: &str = "useJestMocked";

declare_rule!(
    PreferMocked,
    id = "J001",
    name = "prefer-mocked",
    description = "Prefer jest.mocked() over (fn as jest.Mock)",
    category = Suggestion,
    severity = Warning,
    fixable = true,
    messages = ["useJestMocked" => "Prefer jest.mocked({{ replacement }})"],
    examples = "// Bad\n(foo as jest.Mock).mockReturnValue(1);\nconst m = useFocused as jest.MockedFunction<typeof useFocused>;\n\n// Good\njest.mocked(foo).mockReturnValue(1);\nconst m = jest.mocked(useFocused);"
);

impl Rule for PreferMocked {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn check(&self, file: &ParsedFile) -> Vec<Diagnostic> {
        if !file.metadata().language.is_typescript() {
            return Vec::new();
        }
        let Some(module) = file.module() else {
            return Vec::new();
        };

        let ctx = VisitorContext::new(file);
        let mut visitor = PreferMockedVisitor {
            diagnostics: Vec::new(),
            file_path: file.metadata().filename.clone(),
            metadata: &self.metadata,
        };

        walk_ast(module, &mut visitor, &ctx);
        visitor.diagnostics
    }
}

/// True when the cast targets `jest.Mock` or `jest.MockedFunction`, with or
/// without type arguments.
pub fn is_mock_type_cast(node: &TsAsExpr) -> bool {
    let TsType::TsTypeRef(type_ref) = &*node.type_ann else {
        return false;
    };
    let TsEntityName::TsQualifiedName(qualified) = &type_ref.type_name else {
        return false;
    };
    let TsEntityName::Ident(namespace) = &qualified.left else {
        return false;
    };

    &*namespace.sym == MOCK_NAMESPACE && MOCK_MARKERS.contains(&&*qualified.right.sym)
}

/// Source text of the expression under any number of nested `as` casts.
///
/// Inner casts are unwrapped whatever their target type, and so are the
/// parentheses around them. Returns `None` when the span does not resolve to
/// non-empty text of the file.
pub fn recover_expression_text<'a>(expr: &Expr, ctx: &VisitorContext<'a>) -> Option<&'a str> {
    let mut current = expr;
    loop {
        match current {
            Expr::TsAs(inner) => current = &inner.expr,
            Expr::Paren(paren) => current = &paren.expr,
            _ => break,
        }
    }

    ctx.get_source_text(current.span())
        .filter(|text| !text.is_empty())
}

struct PreferMockedVisitor<'a> {
    diagnostics: Vec<Diagnostic>,
    file_path: String,
    metadata: &'a RuleMetadata,
}

impl AstVisitor for PreferMockedVisitor<'_> {
    fn visit_ts_as_expr(&mut self, node: &TsAsExpr, ctx: &VisitorContext) -> ControlFlow<()> {
        if !is_mock_type_cast(node) {
            return ControlFlow::Continue(());
        }

        let Some(inner_text) = recover_expression_text(&node.expr, ctx) else {
            tracing::trace!(file = %self.file_path, "skipping cast with unresolvable source text");
            return ControlFlow::Continue(());
        };
        let Some((line, column, end_line, end_column)) = ctx.span_to_range(node.span) else {
            return ControlFlow::Continue(());
        };

        let replacement = format!("{}({})", MOCKED_HELPER, inner_text);
        let template = self.metadata.message(USE_JEST_MOCKED).unwrap_or_default();
        let message = render_message(template, &[("replacement", "")]);

        tracing::debug!(
            file = %self.file_path,
            line,
            column,
            replacement = %replacement,
            "found mock type cast"
        );

        let fix = Fix::replace(
            format!("Replace with {}()", MOCKED_HELPER),
            replacement.as_str(),
            line,
            column,
            end_line,
            end_column,
        );

        let diagnostic = Diagnostic::new(
            self.metadata.id,
            self.metadata.severity,
            message,
            &self.file_path,
            line,
            column,
        )
        .with_end(end_line, end_column)
        .with_message_id(USE_JEST_MOCKED)
        .with_suggestion(format!("Replace with {}", replacement))
        .with_fix(fix);

        self.diagnostics.push(diagnostic);
        ControlFlow::Continue(())
    }
}
