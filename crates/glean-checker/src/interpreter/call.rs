use glean_tree::r#abstract::Expr;

use super::Interpreter;
use crate::{
    evaluator::Outcome,
    meet::{intersection, intersection_all},
    scope::{Scope, Symbol},
    signature::Signature,
    types::Type,
    visitor::Visitor,
};

/// Checks a value against a type and records the outcome as a constraint on the checked name.
const ISINSTANCE: &str = "isinstance";

impl Interpreter {
    pub(super) fn call(&mut self, expr: &Expr, fun: &Expr, args: &[Expr]) -> Outcome {
        if fun.data.as_name() == Some(ISINSTANCE) {
            return self.isinstance(expr, args);
        }

        let (callee, _) = self.eval(fun);
        let arg_types = args
            .iter()
            .map(|arg| self.expression_type(arg))
            .collect::<Vec<_>>();

        self.ctx.set_position(expr.location);

        match callee {
            Type::Function(function) => {
                let argument_scope = match &function.receiver {
                    Some(instance) => {
                        let unbound = function.signature.derive_without_receiver();
                        let mut scope = self.bind_arguments(&unbound, &arg_types);
                        if let Some(receiver) = function.signature.names().first() {
                            scope.add(Symbol::new(receiver, Type::Instance(instance.clone())));
                        }
                        scope
                    }
                    None => self.bind_arguments(&function.signature, &arg_types),
                };

                function.evaluator.evaluate(argument_scope)
            }

            Type::Class(class) => {
                let argument_scope = self.bind_arguments(&class.signature, &arg_types);
                class.evaluator.evaluate(argument_scope)
            }

            Type::Unknown | Type::Any => (Type::Unknown, None),

            other => {
                self.ctx.error(format!("'{other}' is not callable"));
                (Type::Unknown, None)
            }
        }
    }

    /// Builds the scope a call runs in. Arity and argument types are checked here; a mismatching
    /// argument is reported and then bound with its own type.
    fn bind_arguments(&mut self, signature: &Signature, arg_types: &[Type]) -> Scope {
        let (count, min, max) = (arg_types.len(), signature.min_count(), signature.len());

        if count < min || (count > max && signature.vararg().is_none()) {
            let expected = match signature.vararg() {
                Some(_) => format!("at least {min}"),
                None if min == max => format!("{max}"),
                None => format!("{min} to {max}"),
            };
            self.ctx
                .error(format!("expected {expected} arguments, got {count}"));
        }

        let mut scope = Scope::default();

        for (i, (name, param)) in signature.iter().enumerate() {
            let typ = match arg_types.get(i) {
                Some(arg) => intersection(arg, param).unwrap_or_else(|| {
                    self.ctx.error(format!(
                        "argument '{name}' expects '{param}', got '{arg}'"
                    ));
                    arg.clone()
                }),
                None => signature
                    .default_types()
                    .get(i)
                    .cloned()
                    .unwrap_or(Type::Unknown),
            };
            scope.add(Symbol::new(name, typ));
        }

        if let Some(vararg) = signature.vararg() {
            let rest = arg_types.get(max..).unwrap_or_default();
            let item = intersection_all(rest).unwrap_or(Type::Unknown);
            scope.add(Symbol::new(vararg, Type::list(item)));
        }

        if let Some(kwarg) = signature.kwarg() {
            scope.add(Symbol::new(kwarg, Type::dict(Type::Str, Type::Unknown)));
        }

        scope
    }

    fn isinstance(&mut self, expr: &Expr, args: &[Expr]) -> Outcome {
        let [subject, class_info] = args else {
            self.error_at(
                expr.location,
                format!("{ISINSTANCE} expects 2 arguments, got {}", args.len()),
            );
            return (Type::Bool, None);
        };

        self.eval(subject);
        let typ = self.expression_type(class_info);

        if let Some(name) = subject.data.as_name() {
            self.ctx.add_constraint(name, typ);
        }

        (Type::Bool, None)
    }
}
