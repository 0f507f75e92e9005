//! Evaluators run the code behind a callable type against the types of a call's arguments and
//! report what the call returns.

use std::{
    cell::{Cell, RefCell},
    fmt::{self, Debug},
    ops::DerefMut,
    rc::Rc,
};

use glean_tree::r#abstract::Body;
use tracing::debug;

use crate::{
    scope::{Scope, Symbol},
    types::{Instance, Type, Value},
    visitor::{Node, Visitor},
};

/// Name of the method that initializes a fresh instance.
pub const INITIALIZER: &str = "__init__";

/// What a call produces: its type and, when one is known, its static value.
pub type Outcome = (Type, Option<Value>);

#[derive(Debug)]
pub enum Evaluator {
    /// Stands in for a definition while its own body is being inferred.
    Recursive,
    Function(FunctionEvaluator),
    Class(ClassEvaluator),
}

impl Evaluator {
    pub fn evaluate(&self, argument_scope: Scope) -> Outcome {
        match self {
            Self::Recursive => (Type::Unknown, Some(Value::Unknown)),
            Self::Function(function) => function.evaluate(argument_scope),
            Self::Class(class) => class.evaluate(argument_scope),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalState {
    Idle,
    Evaluating,
}

/// Runs a body through the visitor it holds. `V` is either an owned visitor or a borrowed one,
/// for evaluators that only live during inference.
pub struct BodyEvaluator<V> {
    body: Rc<Body>,
    visitor: RefCell<V>,
    state: Cell<EvalState>,
}

/// The evaluator stored inside a function type.
pub type FunctionEvaluator = BodyEvaluator<Box<dyn Visitor>>;

impl<'v, V: DerefMut<Target = dyn Visitor + 'v>> BodyEvaluator<V> {
    pub fn new(body: Rc<Body>, visitor: V) -> Self {
        Self {
            body,
            visitor: RefCell::new(visitor),
            state: Cell::new(EvalState::Idle),
        }
    }

    pub fn state(&self) -> EvalState {
        self.state.get()
    }

    /// Runs the body once. Re-entering an evaluator that is already running gives up with
    /// [Type::Unknown] instead of recursing.
    pub fn evaluate(&self, argument_scope: Scope) -> Outcome {
        if self.state.get() == EvalState::Evaluating {
            debug!("recursive evaluation cut off");
            return (Type::Unknown, Some(Value::Unknown));
        }

        if let Body::Missing = *self.body {
            return (Type::NoneType, None);
        }

        self.state.set(EvalState::Evaluating);

        let scope = {
            let mut visitor = self.visitor.borrow_mut();
            let visitor = &mut **visitor;

            visitor.begin_scope();
            visitor.merge_scope(argument_scope);

            match &*self.body {
                Body::Block(stmts) => {
                    for stmt in stmts {
                        visitor.visit(Node::Stmt(stmt));
                    }
                }
                Body::Expr(expr) => visitor.visit(Node::Expr(expr)),
                Body::Missing => {}
            }

            visitor.end_scope()
        };

        self.state.set(EvalState::Idle);

        let return_type = scope.return_type().cloned().unwrap_or(Type::NoneType);

        // A body that returns nothing has no static value, whatever it computed on the way.
        let return_value = (return_type != Type::NoneType)
            .then(|| scope.return_value().cloned().unwrap_or(Value::Unknown));

        (return_type, return_value)
    }
}

impl<V> Debug for BodyEvaluator<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BodyEvaluator")
            .field("body", &format_args!("{}", self.body))
            .field("state", &self.state.get())
            .finish_non_exhaustive()
    }
}

/// Evaluates a call to a class: creates the instance, binds the methods and runs the initializer.
#[derive(Debug)]
pub struct ClassEvaluator {
    class_name: String,
    attributes: Rc<Scope>,
}

impl ClassEvaluator {
    pub fn new(class_name: &str, attributes: Rc<Scope>) -> Self {
        Self {
            class_name: class_name.to_owned(),
            attributes,
        }
    }

    /// `argument_scope` holds the constructor arguments, already checked against the signature of
    /// the initializer, but not the receiver: the instance is created here.
    pub fn evaluate(&self, mut argument_scope: Scope) -> Outcome {
        let instance = Instance::new(&self.class_name);

        for symbol in self.attributes.symbols() {
            if let Type::Function(function) = &symbol.typ {
                let bound = Type::Function(function.bind(&instance));
                instance.set_attribute(Symbol::new(&symbol.name, bound));
            }
        }

        if let Some(Type::Function(init)) = instance.attribute(INITIALIZER).map(|s| s.typ) {
            if let Some(receiver) = init.signature.names().first() {
                argument_scope.add(Symbol::new(receiver, Type::Instance(instance.clone())));
            }
            debug!(class = %self.class_name, "running initializer");
            init.evaluator.evaluate(argument_scope);
        }

        instance.mark_initialized();
        (Type::Instance(instance), Some(Value::Unknown))
    }
}

#[cfg(test)]
mod test {
    use glean_tree::build::{assign, binop, name, num, ret, FunctionBuilder};
    use glean_tree::r#abstract::BinOp;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{interpreter::Interpreter, types::FunctionType};

    fn evaluator_for(def: &glean_tree::r#abstract::Definition) -> FunctionEvaluator {
        BodyEvaluator::new(def.body.clone(), Interpreter::new().fork())
    }

    #[test]
    fn missing_bodies_return_nothing() {
        let def = FunctionBuilder::new("native").missing_body();
        let evaluator = evaluator_for(&def);

        assert_eq!(evaluator.evaluate(Scope::default()), (Type::NoneType, None));
        assert_eq!(evaluator.state(), EvalState::Idle);
    }

    #[test]
    fn bodies_without_return_have_no_value() {
        let def = FunctionBuilder::new("f")
            .body(vec![assign(name("x"), num(1))]);

        assert_eq!(
            evaluator_for(&def).evaluate(Scope::default()),
            (Type::NoneType, None)
        );
    }

    #[test]
    fn arguments_reach_the_body() {
        let def = FunctionBuilder::new("double")
            .params(&["x"])
            .body(vec![ret(binop(name("x"), BinOp::Add, name("x")))]);

        let mut arguments = Scope::default();
        arguments.add(Symbol::new("x", Type::Str));

        let (typ, value) = evaluator_for(&def).evaluate(arguments);
        assert_eq!(typ, Type::Str);
        assert_eq!(value, Some(Value::Unknown));
    }

    #[test]
    fn literal_returns_keep_their_value() {
        let def = FunctionBuilder::new("answer").body(vec![ret(num(42))]);

        assert_eq!(
            evaluator_for(&def).evaluate(Scope::default()),
            (Type::Num, Some(Value::Num(42)))
        );
    }

    #[test]
    fn classes_without_initializer_are_still_initialized() {
        let mut attributes = Scope::default();
        let method = FunctionType::new(
            Default::default(),
            Type::Num,
            Rc::new(Evaluator::Recursive),
        );
        attributes.add(Symbol::new("get", Type::Function(method)));
        attributes.add(Symbol::new("limit", Type::Num));

        let (typ, value) = ClassEvaluator::new("Counter", Rc::new(attributes))
            .evaluate(Scope::default());

        let Type::Instance(instance) = typ else {
            panic!("a class call should produce an instance, got {typ}");
        };
        assert_eq!(value, Some(Value::Unknown));
        assert!(instance.is_initialized());
        assert_eq!(instance.class_name(), "Counter");
        assert!(instance.attribute("limit").is_none());

        let Some(Type::Function(get)) = instance.attribute("get").map(|s| s.typ) else {
            panic!("methods should be bound on the instance");
        };
        assert!(get.receiver.is_some_and(|receiver| receiver.ptr_eq(&instance)));
    }
}
