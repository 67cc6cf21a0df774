//! Visitor pattern for AST traversal.
//!
//! Provides a uniform way to traverse AST nodes with context information.

mod context;
mod traits;

pub use context::VisitorContext;
pub use traits::AstVisitor;

use std::ops::ControlFlow;

use swc_ecma_ast::Module;
use swc_ecma_visit::{Visit, VisitWith};

struct Walker<'a, V: AstVisitor> {
    visitor: &'a mut V,
    ctx: &'a VisitorContext<'a>,
    stopped: bool,
}

impl<V: AstVisitor> Walker<'_, V> {
    fn enter(&mut self, flow: impl FnOnce(&mut V, &VisitorContext) -> ControlFlow<()>) -> bool {
        if self.stopped {
            return false;
        }
        if let ControlFlow::Break(()) = flow(&mut *self.visitor, self.ctx) {
            self.stopped = true;
            return false;
        }
        true
    }
}

impl<V: AstVisitor> Visit for Walker<'_, V> {
    fn visit_ts_as_expr(&mut self, node: &swc_ecma_ast::TsAsExpr) {
        if self.enter(|v, ctx| v.visit_ts_as_expr(node, ctx)) {
            node.visit_children_with(self);
        }
    }
}

/// Walks `module` depth-first, calling the visitor's hooks in source order.
pub fn walk_ast<V: AstVisitor>(module: &Module, visitor: &mut V, ctx: &VisitorContext) {
    let mut walker = Walker {
        visitor,
        ctx,
        stopped: false,
    };
    module.visit_with(&mut walker);
}
