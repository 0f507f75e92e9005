//! The seam between the inference core and whatever executes individual statements. The core only
//! pushes and pops scopes and asks the visitor to run nodes; the visitor owns the [Ctx] those
//! effects land in.

use glean_tree::r#abstract::{Expr, Stmt};

use crate::{context::Ctx, scope::Scope, types::Type};

#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Stmt(&'a Stmt),
    /// A body made of a single expression. Its type is what the body returns.
    Expr(&'a Expr),
}

pub trait Visitor {
    fn context(&self) -> &Ctx;

    fn context_mut(&mut self) -> &mut Ctx;

    /// Executes one node, mutating the scope stack and the diagnostics of the context.
    fn visit(&mut self, node: Node<'_>);

    /// Infers the type of an expression in the current scope.
    fn expression_type(&mut self, expr: &Expr) -> Type;

    /// An independent visitor: what it observes or reports never reaches `self`.
    fn fork(&self) -> Box<dyn Visitor>;

    fn begin_scope(&mut self) {
        self.context_mut().begin_scope();
    }

    fn merge_scope(&mut self, scope: Scope) {
        self.context_mut().merge_scope(scope);
    }

    fn end_scope(&mut self) -> Scope {
        self.context_mut().end_scope()
    }
}
