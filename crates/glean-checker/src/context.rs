//! The defining context: the stack of scopes a body runs in, the constraints observed about
//! names while it ran, and the diagnostics it produced.

use std::{
    cell::{Ref, RefCell},
    rc::Rc,
};

use glean_error::Error;
use glean_location::ByteRange;
use tracing::trace;

use crate::{
    meet::intersection,
    scope::{Scope, Symbol},
    types::{Type, Value},
};

/// Types that the code observed a name must have, e.g. after `isinstance(x, str)`.
pub type Constraints = im_rc::HashMap<String, Type>;

type Frame = Rc<RefCell<Scope>>;

#[derive(Clone, Default)]
pub struct Ctx {
    frames: Vec<Frame>,
    constraints: Constraints,
    pub errors: Rc<RefCell<Vec<Error>>>,
    pub location: ByteRange,
}

impl Ctx {
    /// A context whose only frame is `builtins`.
    pub fn new(builtins: Scope) -> Self {
        Self {
            frames: vec![Rc::new(RefCell::new(builtins))],
            ..Self::default()
        }
    }

    /// An isolated copy. The frames are shared so definitions bound later in an enclosing scope
    /// stay visible. Constraints and diagnostics start empty and never reach `self`.
    pub fn fork(&self) -> Self {
        Self {
            frames: self.frames.clone(),
            constraints: Constraints::default(),
            errors: Default::default(),
            location: self.location,
        }
    }

    pub fn begin_scope(&mut self) {
        trace!(depth = self.frames.len() + 1, "begin scope");
        self.frames.push(Default::default());
    }

    /// Copies the bindings of `scope` into the innermost frame.
    pub fn merge_scope(&mut self, scope: Scope) {
        match self.frames.last() {
            Some(frame) => frame.borrow_mut().merge(scope),
            None => self.frames.push(Rc::new(RefCell::new(scope))),
        }
    }

    pub fn end_scope(&mut self) -> Scope {
        trace!(depth = self.frames.len(), "end scope");
        self.frames
            .pop()
            .map(|frame| Rc::try_unwrap(frame).map_or_else(|rc| rc.borrow().clone(), RefCell::into_inner))
            .unwrap_or_default()
    }

    /// A snapshot of the innermost frame.
    pub fn current_scope(&self) -> Scope {
        self.frames
            .last()
            .map(|frame| frame.borrow().clone())
            .unwrap_or_default()
    }

    /// Looks a name up from the innermost frame outwards.
    pub fn lookup(&self, name: &str) -> Option<Symbol> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.borrow().get(name).cloned())
    }

    /// Binds a symbol in the innermost frame.
    pub fn bind(&mut self, symbol: Symbol) {
        match self.frames.last() {
            Some(frame) => frame.borrow_mut().add(symbol),
            None => {
                let mut scope = Scope::default();
                scope.add(symbol);
                self.frames.push(Rc::new(RefCell::new(scope)));
            }
        }
    }

    pub fn set_return(&mut self, typ: Type, value: Option<Value>) {
        if let Some(frame) = self.frames.last() {
            frame.borrow_mut().set_return(typ, value);
        }
    }

    pub fn clear_constraints(&mut self) {
        self.constraints.clear();
    }

    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    /// Adds what was observed about `name`. A second observation is met with the first one; if
    /// they contradict each other the first one is kept.
    pub fn add_constraint(&mut self, name: &str, typ: Type) {
        let merged = match self.constraints.get(name) {
            Some(previous) => intersection(previous, &typ).unwrap_or_else(|| previous.clone()),
            None => typ,
        };
        self.constraints.insert(name.to_owned(), merged);
    }

    /// Sets the current location that we are checking inside of the context.
    pub fn set_position(&mut self, location: ByteRange) {
        self.location = location;
    }

    pub fn error(&self, msg: String) {
        self.errors
            .borrow_mut()
            .push(Error::new(msg, self.location));
    }

    pub fn get_errors(&self) -> Option<Ref<'_, Vec<Error>>> {
        let errors = self.errors.borrow();
        (!errors.is_empty()).then_some(errors)
    }

    pub fn err_count(&self) -> usize {
        self.errors.borrow().len()
    }

    pub fn take_errors(&self) -> Vec<Error> {
        std::mem::take(&mut *self.errors.borrow_mut())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn lookups_walk_outwards() {
        let mut ctx = Ctx::default();
        ctx.begin_scope();
        ctx.bind(Symbol::new("a", Type::Num));
        ctx.begin_scope();
        ctx.bind(Symbol::new("b", Type::Str));

        assert_eq!(ctx.lookup("a").map(|s| s.typ), Some(Type::Num));

        let inner = ctx.end_scope();
        assert!(inner.contains("b"));
        assert!(ctx.lookup("b").is_none());
    }

    #[test]
    fn forks_see_later_bindings_in_shared_frames() {
        let mut ctx = Ctx::default();
        ctx.begin_scope();

        let fork = ctx.fork();
        ctx.bind(Symbol::new("late", Type::Bool));

        assert_eq!(fork.lookup("late").map(|s| s.typ), Some(Type::Bool));
    }

    #[test]
    fn forks_do_not_leak_diagnostics_or_constraints() {
        let mut ctx = Ctx::default();
        ctx.add_constraint("x", Type::Num);

        let mut fork = ctx.fork();
        fork.error("only in the fork".to_string());
        fork.add_constraint("y", Type::Str);

        assert_eq!(ctx.err_count(), 0);
        assert!(ctx.get_errors().is_none());
        assert!(!ctx.constraints().contains_key("y"));
        assert!(!fork.constraints().contains_key("x"));
        assert_eq!(ctx.constraints().get("x"), Some(&Type::Num));
    }

    #[test]
    fn contradicting_constraints_keep_the_first() {
        let mut ctx = Ctx::default();
        ctx.add_constraint("x", Type::list(Type::Unknown));
        ctx.add_constraint("x", Type::list(Type::Num));
        ctx.add_constraint("x", Type::Str);

        assert_eq!(ctx.constraints().get("x"), Some(&Type::list(Type::Num)));
    }
}
