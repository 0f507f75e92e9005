//! A reference [Visitor] for the glean-tree node set. It interprets statements over types instead
//! of values: assignments bind types, calls run the evaluator of the callee and mistakes become
//! diagnostics in the context.

mod call;
mod expr;
mod stmt;

use std::rc::Rc;

use glean_tree::r#abstract::{Arguments, Body, Definition, Expr, Stmt};

use crate::{
    context::Ctx,
    infer::infer_function,
    scope::{Scope, Symbol},
    types::Type,
    visitor::{Node, Visitor},
};

/// Names bound before any program runs.
fn builtins() -> Scope {
    let mut scope = Scope::default();

    for (name, typ) in [
        ("int", Type::Num),
        ("float", Type::Num),
        ("str", Type::Str),
        ("bool", Type::Bool),
        ("list", Type::list(Type::Unknown)),
        ("tuple", Type::tuple(Type::Unknown)),
        ("set", Type::set(Type::Unknown)),
        ("dict", Type::dict(Type::Unknown, Type::Unknown)),
    ] {
        scope.add(Symbol::new(name, typ));
    }

    scope
}

pub struct Interpreter {
    ctx: Ctx,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// An interpreter with the builtins loaded and an empty module scope on top of them.
    pub fn new() -> Self {
        let mut interpreter = Self {
            ctx: Ctx::new(builtins()),
        };

        let print = Definition {
            name: Some("print".to_string()),
            args: Arguments {
                vararg: Some("values".to_string()),
                ..Default::default()
            },
            body: Rc::new(Body::Missing),
            decorators: vec![],
        };
        interpreter.define(&print);

        interpreter.begin_scope();
        interpreter
    }

    /// Binds the type of a named definition in the current scope.
    pub fn define(&mut self, def: &Definition) {
        let function = infer_function(def, self, None);
        if let Some(name) = &def.name {
            self.ctx.bind(Symbol::new(name, Type::Function(function)));
        }
    }

    pub fn run(&mut self, program: &[Stmt]) {
        for stmt in program {
            self.visit(Node::Stmt(stmt));
        }
    }

    pub fn lookup(&self, name: &str) -> Option<Symbol> {
        self.ctx.lookup(name)
    }

    /// The bindings made so far in the innermost scope.
    pub fn module_scope(&self) -> Scope {
        self.ctx.current_scope()
    }
}

impl Visitor for Interpreter {
    fn context(&self) -> &Ctx {
        &self.ctx
    }

    fn context_mut(&mut self) -> &mut Ctx {
        &mut self.ctx
    }

    fn visit(&mut self, node: Node<'_>) {
        match node {
            Node::Stmt(stmt) => self.visit_stmt(stmt),
            Node::Expr(expr) => {
                let (typ, value) = self.eval(expr);
                self.ctx.set_return(typ, value);
            }
        }
    }

    fn expression_type(&mut self, expr: &Expr) -> Type {
        self.eval(expr).0
    }

    fn fork(&self) -> Box<dyn Visitor> {
        Box::new(Self {
            ctx: self.ctx.fork(),
        })
    }
}
