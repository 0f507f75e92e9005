//! Turns definitions into callable types.
//!
//! A function body is run twice. The first run happens right away against the generic scope of
//! the signature; it reports the diagnostics of the body and tells which constraints the body puts
//! on its parameters. The second evaluator is kept inside the [FunctionType] and runs on every
//! call, on a visitor of its own so those calls start from a clean state.

use std::rc::Rc;

use glean_tree::r#abstract::{ClassDef, Definition};
use tracing::debug;

use crate::{
    evaluator::{BodyEvaluator, ClassEvaluator, Evaluator, INITIALIZER},
    scope::Symbol,
    signature::Signature,
    types::{ClassType, FunctionType, Instance, Type},
    visitor::{Node, Visitor},
};

/// Infers the type of a function, lambda or method definition. `receiver` is the instance a method
/// is being resolved on, if any.
pub fn infer_function(
    def: &Definition,
    visitor: &mut dyn Visitor,
    receiver: Option<&Instance>,
) -> FunctionType {
    let name = def.name.as_deref();
    let mut signature = Signature::new(name, &def.args, &def.decorators, visitor);

    let mut exploratory = None;
    let first_visitor: &mut dyn Visitor = if drives_first_pass(name, receiver) {
        &mut *visitor
    } else {
        &mut **exploratory.insert(visitor.fork())
    };

    first_visitor.context_mut().clear_constraints();

    let mut argument_scope = signature.materialize_scope();
    if let (Some(instance), Some(first)) = (receiver, signature.names().first()) {
        argument_scope.add(Symbol::new(first, Type::Instance(instance.clone())));
    }

    let return_type = {
        let first_pass = BodyEvaluator::new(def.body.clone(), &mut *first_visitor);
        first_pass.evaluate(argument_scope).0
    };

    signature.narrow_many(first_visitor.context().constraints());

    debug!(
        name = name.unwrap_or("<lambda>"),
        signature = %signature,
        returns = %return_type,
        "inferred definition"
    );

    let evaluator = BodyEvaluator::new(def.body.clone(), visitor.fork());
    FunctionType::new(
        Rc::new(signature),
        return_type,
        Rc::new(Evaluator::Function(evaluator)),
    )
}

/// Whether the first run goes through the caller's visitor, so its diagnostics are kept. Methods
/// looked up on an instance that is still being built are explored on a throwaway fork instead,
/// except for the initializer itself.
fn drives_first_pass(name: Option<&str>, receiver: Option<&Instance>) -> bool {
    let Some(instance) = receiver else {
        return true;
    };

    // The initializer of a fresh instance, or any other method of a finished one.
    let is_initializer = name == Some(INITIALIZER);
    is_initializer != instance.is_initialized()
}

/// Infers the type of a class definition. Its body runs once in a scope of its own, whose
/// bindings become the class attributes; calling the class follows the signature of `__init__`.
pub fn infer_class(class: &ClassDef, visitor: &mut dyn Visitor) -> ClassType {
    visitor.begin_scope();
    for stmt in &class.body {
        visitor.visit(Node::Stmt(stmt));
    }
    let attributes = Rc::new(visitor.end_scope());

    let signature = match attributes.get_type(INITIALIZER) {
        Some(Type::Function(init)) => init.signature.derive_without_receiver(),
        _ => Signature::empty(Some(INITIALIZER)),
    };

    debug!(class = %class.name, signature = %signature, "inferred class");

    ClassType {
        name: class.name.clone(),
        signature: Rc::new(signature),
        return_type: Box::new(Type::Instance(Instance::new(&class.name))),
        attributes: attributes.clone(),
        evaluator: Rc::new(Evaluator::Class(ClassEvaluator::new(&class.name, attributes))),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn free_functions_drive_the_first_pass() {
        assert!(drives_first_pass(Some("f"), None));
        assert!(drives_first_pass(None, None));
    }

    #[test]
    fn initializer_drives_only_before_initialization() {
        let instance = Instance::new("C");
        assert!(drives_first_pass(Some(INITIALIZER), Some(&instance)));
        assert!(!drives_first_pass(Some("method"), Some(&instance)));

        instance.mark_initialized();
        assert!(!drives_first_pass(Some(INITIALIZER), Some(&instance)));
        assert!(drives_first_pass(Some("method"), Some(&instance)));
    }
}
