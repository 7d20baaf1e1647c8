//! Depth-first traversal with explicit per-node control.
//!
//! Collectors implement [`TemplateVisitor`] and decide, for every call
//! expression they enter, whether the walk continues into its children, skips
//! them, or stops altogether. [`walk_module`] and [`walk_exprs`] drive the
//! visitor over swc trees.

use swc_ecma_ast::{CallExpr, Expr, Module, Stmt};
use swc_ecma_visit::{Visit, VisitWith};

/// What the walker does after entering a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitControl {
    /// Descend into the node's children.
    Continue,
    /// Leave the node's children unvisited and move on to its siblings.
    SkipChildren,
    /// End the whole walk, for visitors that only need the first match.
    Stop,
}

/// Node-kind callbacks invoked by the walker.
pub trait TemplateVisitor {
    fn enter_call(&mut self, _call: &CallExpr) -> VisitControl {
        VisitControl::Continue
    }
}

/// Walk a script module.
pub fn walk_module<V: TemplateVisitor>(module: &Module, visitor: &mut V) {
    module.visit_with(&mut Walker::new(visitor));
}

/// Walk a sequence of markup expressions in order.
pub fn walk_exprs<'a, V, I>(exprs: I, visitor: &mut V)
where
    V: TemplateVisitor,
    I: IntoIterator<Item = &'a Expr>,
{
    let mut walker = Walker::new(visitor);
    for expr in exprs {
        if walker.stopped {
            break;
        }
        expr.visit_with(&mut walker);
    }
}

struct Walker<'v, V> {
    visitor: &'v mut V,
    stopped: bool,
}

impl<'v, V: TemplateVisitor> Walker<'v, V> {
    fn new(visitor: &'v mut V) -> Self {
        Self {
            visitor,
            stopped: false,
        }
    }
}

impl<V: TemplateVisitor> Visit for Walker<'_, V> {
    fn visit_stmt(&mut self, node: &Stmt) {
        if !self.stopped {
            node.visit_children_with(self);
        }
    }

    fn visit_expr(&mut self, node: &Expr) {
        if !self.stopped {
            node.visit_children_with(self);
        }
    }

    fn visit_call_expr(&mut self, node: &CallExpr) {
        if self.stopped {
            return;
        }
        match self.visitor.enter_call(node) {
            VisitControl::Continue => node.visit_children_with(self),
            VisitControl::SkipChildren => {}
            VisitControl::Stop => self.stopped = true,
        }
    }
}
