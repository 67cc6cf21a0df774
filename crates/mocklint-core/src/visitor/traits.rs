//! AstVisitor trait for uniform AST traversal.

use std::ops::ControlFlow;

use swc_ecma_ast::TsAsExpr;

use super::context::VisitorContext;

/// Hooks invoked by [`super::walk_ast`] in pre-order. Returning
/// `ControlFlow::Break(())` stops the walk.
pub trait AstVisitor {
    fn visit_ts_as_expr(&mut self, _node: &TsAsExpr, _ctx: &VisitorContext) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}
