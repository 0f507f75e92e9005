use glean_tree::r#abstract::{Expr, ExprKind, Stmt, StmtKind};

use super::Interpreter;
use crate::{
    infer::{infer_class, infer_function},
    scope::Symbol,
    types::{Type, Value},
};

impl Interpreter {
    pub(super) fn visit_stmt(&mut self, stmt: &Stmt) {
        self.ctx.set_position(stmt.location);

        match &stmt.data {
            StmtKind::Expr(expr) => {
                self.eval(expr);
            }

            StmtKind::Assign(target, value) => {
                let (typ, value) = self.eval(value);
                self.assign(target, typ, value);
            }

            StmtKind::Return(expr) => {
                let (typ, value) = match expr {
                    Some(expr) => self.eval(expr),
                    None => (Type::NoneType, None),
                };
                self.ctx.set_return(typ, value);
            }

            // Both branches run, in order, so each of them gets checked.
            StmtKind::If(test, then, otherwise) => {
                self.eval(test);
                for stmt in then.iter().chain(otherwise) {
                    self.visit_stmt(stmt);
                }
            }

            StmtKind::FunctionDef(def) => {
                let function = infer_function(def, self, None);
                if let Some(name) = &def.name {
                    self.ctx.bind(Symbol::new(name, Type::Function(function)));
                }
            }

            StmtKind::ClassDef(class) => {
                let class_type = infer_class(class, self);
                self.ctx
                    .bind(Symbol::new(&class.name, Type::Class(class_type)));
            }

            StmtKind::Pass => {}
        }
    }

    fn assign(&mut self, target: &Expr, typ: Type, value: Option<Value>) {
        match &target.data {
            ExprKind::Name(name) => self.ctx.bind(Symbol::with_value(name, typ, value)),

            ExprKind::Attribute(obj, attribute) => match self.eval(obj).0 {
                Type::Instance(instance) => {
                    instance.set_attribute(Symbol::with_value(attribute, typ, value));
                }
                Type::Unknown | Type::Any => {}
                other => self.error_at(
                    target.location,
                    format!("cannot set attribute '{attribute}' on '{other}'"),
                ),
            },

            _ => self.error_at(target.location, format!("cannot assign to '{target}'")),
        }
    }
}
