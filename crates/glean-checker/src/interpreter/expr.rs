use glean_location::ByteRange;
use glean_tree::r#abstract::{BinOp, Expr, ExprKind};

use super::Interpreter;
use crate::{
    evaluator::Outcome,
    infer::infer_function,
    meet::{intersection, intersection_all},
    types::{Type, Value},
    visitor::Visitor,
};

impl Interpreter {
    pub(super) fn error_at(&mut self, location: ByteRange, msg: String) {
        self.ctx.set_position(location);
        self.ctx.error(msg);
    }

    pub(super) fn eval(&mut self, expr: &Expr) -> Outcome {
        self.ctx.set_position(expr.location);

        match &expr.data {
            ExprKind::None => (Type::NoneType, None),
            ExprKind::Bool(b) => (Type::Bool, Some(Value::Bool(*b))),
            ExprKind::Num(n) => (Type::Num, Some(Value::Num(*n))),
            ExprKind::Str(s) => (Type::Str, Some(Value::Str(s.clone()))),

            ExprKind::Name(name) => match self.ctx.lookup(name) {
                Some(symbol) => (symbol.typ, symbol.value),
                None => {
                    self.error_at(expr.location, format!("name '{name}' is not defined"));
                    (Type::Unknown, None)
                }
            },

            ExprKind::List(items) => (Type::list(self.item_type(items.iter())), None),
            ExprKind::Tuple(items) => (Type::tuple(self.item_type(items.iter())), None),
            ExprKind::Set(items) => (Type::set(self.item_type(items.iter())), None),

            ExprKind::Dict(pairs) => {
                let key = self.item_type(pairs.iter().map(|(k, _)| k));
                let value = self.item_type(pairs.iter().map(|(_, v)| v));
                (Type::dict(key, value), None)
            }

            ExprKind::Attribute(obj, attribute) => self.attribute(expr, obj, attribute),

            ExprKind::Call(fun, args) => self.call(expr, fun, args),

            ExprKind::BinOp(left, op, right) => self.binop(expr, left, *op, right),

            ExprKind::Lambda(def) => (Type::Function(infer_function(def, self, None)), None),
        }
    }

    /// The type shared by every item of a container literal, [Type::Unknown] if they disagree.
    fn item_type<'a>(&mut self, items: impl Iterator<Item = &'a Expr>) -> Type {
        let types = items
            .map(|item| self.expression_type(item))
            .collect::<Vec<_>>();
        intersection_all(&types).unwrap_or(Type::Unknown)
    }

    fn attribute(&mut self, expr: &Expr, obj: &Expr, attribute: &str) -> Outcome {
        let (typ, _) = self.eval(obj);

        let found = match &typ {
            Type::Instance(instance) => instance.attribute(attribute),
            Type::Class(class) => class.attributes.get(attribute).cloned(),
            Type::Unknown | Type::Any => return (Type::Unknown, None),
            _ => None,
        };

        match found {
            Some(symbol) => (symbol.typ, symbol.value),
            None => {
                self.error_at(
                    expr.location,
                    format!("'{typ}' has no attribute '{attribute}'"),
                );
                (Type::Unknown, None)
            }
        }
    }

    /// Arithmetic other than `+` only makes sense on numbers, so a bare name used there is
    /// constrained to [Type::Num].
    fn binop(&mut self, expr: &Expr, left: &Expr, op: BinOp, right: &Expr) -> Outcome {
        let (l, _) = self.eval(left);
        let (r, _) = self.eval(right);

        if op != BinOp::Add {
            for name in [left, right].iter().filter_map(|e| e.data.as_name()) {
                self.ctx.add_constraint(name, Type::Num);
            }
        }

        let result = match op {
            BinOp::Add => intersection(&l, &r).filter(|t| {
                matches!(
                    t,
                    Type::Unknown | Type::Any | Type::Num | Type::Str | Type::List(_) | Type::Tuple(_)
                )
            }),
            BinOp::Sub | BinOp::Mul | BinOp::Div => {
                intersection(&l, &r).and_then(|t| intersection(&t, &Type::Num))
            }
        };

        match result {
            Some(typ) => (typ, None),
            None => {
                self.error_at(
                    expr.location,
                    format!("unsupported operand types for {op}: '{l}' and '{r}'"),
                );
                (Type::Unknown, None)
            }
        }
    }
}
