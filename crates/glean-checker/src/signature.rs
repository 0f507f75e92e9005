//! The parameter contract of a definition: which names it takes, how many of them are required
//! and what type each one is believed to have.
//!
//! A parameter's effective type comes from a `@types(...)` modifier when there is exactly one,
//! otherwise from its default value. After the body ran once the effective types can be tightened
//! with [Signature::narrow_many].

use std::{
    fmt::{self, Display},
    hash::{Hash, Hasher},
    iter::repeat,
    rc::Rc,
};

use glean_tree::r#abstract::{Arguments, Expr, ExprKind};
use itertools::Itertools;
use tracing::debug;

use crate::{
    context::Constraints,
    evaluator::Evaluator,
    meet::intersection,
    scope::{Scope, Symbol},
    types::{FunctionType, Type},
    visitor::Visitor,
};

/// Name of the modifier that declares parameter types.
pub const TYPES_MODIFIER: &str = "types";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    name: Option<String>,
    names: Vec<String>,
    types: Vec<Type>,
    default_types: Vec<Type>,
    annotated_types: Vec<Type>,
    min_count: usize,
    vararg: Option<String>,
    kwarg: Option<String>,
}

impl Signature {
    /// Builds the signature of a definition. Default values and modifier arguments are typed once,
    /// here, in the context of the definition.
    pub fn new(
        name: Option<&str>,
        arguments: &Arguments,
        modifiers: &[Expr],
        visitor: &mut dyn Visitor,
    ) -> Self {
        let names = arguments.args.clone();
        let min_count = names.len().saturating_sub(arguments.defaults.len());

        let default_types = repeat(Type::Unknown)
            .take(min_count)
            .chain(arguments.defaults.iter().map(|d| visitor.expression_type(d)))
            .take(names.len())
            .collect::<Vec<_>>();

        let annotated_types = Self::declared_types(modifiers, visitor, names.len());

        let types = annotated_types
            .iter()
            .zip(&default_types)
            .map(|(annotated, default)| {
                if annotated.is_unknown() {
                    default.clone()
                } else {
                    annotated.clone()
                }
            })
            .collect();

        Self {
            name: name.map(str::to_owned),
            names,
            types,
            default_types,
            annotated_types,
            min_count,
            vararg: arguments.vararg.clone(),
            kwarg: arguments.kwarg.clone(),
        }
    }

    /// A signature with no parameters at all.
    pub fn empty(name: Option<&str>) -> Self {
        Self {
            name: name.map(str::to_owned),
            ..Self::default()
        }
    }

    /// The same contract without its first parameter, e.g. a method seen from an instance.
    pub fn derive_without_receiver(&self) -> Self {
        let rest = |types: &[Type]| types.iter().skip(1).cloned().collect();

        Self {
            name: self.name.clone(),
            names: self.names.iter().skip(1).cloned().collect(),
            types: rest(&self.types),
            default_types: rest(&self.default_types),
            annotated_types: rest(&self.annotated_types),
            min_count: self.min_count.saturating_sub(1),
            vararg: self.vararg.clone(),
            kwarg: self.kwarg.clone(),
        }
    }

    /// Only a single `@types(...)` modifier counts. With none, or with more than one, no parameter
    /// is annotated.
    fn declared_types(modifiers: &[Expr], visitor: &mut dyn Visitor, count: usize) -> Vec<Type> {
        let declared = modifiers
            .iter()
            .filter_map(|modifier| match &modifier.data {
                ExprKind::Call(fun, args) if fun.data.as_name() == Some(TYPES_MODIFIER) => {
                    Some(args)
                }
                _ => None,
            })
            .collect::<Vec<_>>();

        let annotated = match declared.as_slice() {
            [args] => args
                .iter()
                .map(|arg| visitor.expression_type(arg))
                .collect(),
            _ => Vec::new(),
        };

        annotated
            .into_iter()
            .chain(repeat(Type::Unknown))
            .take(count)
            .collect()
    }

    /// Tightens the effective type of `name` with `typ`. Returns the new type, or `None` if the
    /// two types do not meet, in which case nothing changes.
    pub fn narrow(&mut self, name: &str, typ: &Type) -> Option<Type> {
        let index = self.names.iter().position(|n| n == name)?;

        let narrowed = intersection(typ, &self.types[index])?;
        debug!(parameter = name, from = %self.types[index], to = %narrowed, "narrowed");
        self.types[index] = narrowed.clone();
        Some(narrowed)
    }

    /// Narrows every parameter that has a constraint. Constraints on other names are ignored.
    pub fn narrow_many(&mut self, constraints: &Constraints) {
        for name in self.names.clone() {
            if let Some(typ) = constraints.get(&name) {
                if self.narrow(&name, typ).is_none() {
                    debug!(parameter = %name, constraint = %typ, "constraint does not meet");
                }
            }
        }
    }

    /// The scope a body starts with when nothing is known about the call: each parameter with its
    /// effective type, the catch-alls with generic containers and, for named definitions, the
    /// definition itself so a recursive reference evaluates to [Type::Unknown].
    pub fn materialize_scope(&self) -> Scope {
        let mut scope = Scope::default();

        if let Some(name) = &self.name {
            let placeholder = FunctionType::new(
                Rc::new(self.clone()),
                Type::Unknown,
                Rc::new(Evaluator::Recursive),
            );
            scope.add(Symbol::new(name, Type::Function(placeholder)));
        }

        for (name, typ) in self.iter() {
            scope.add(Symbol::new(name, typ.clone()));
        }

        if let Some(vararg) = &self.vararg {
            scope.add(Symbol::new(vararg, Type::list(Type::Unknown)));
        }

        if let Some(kwarg) = &self.kwarg {
            scope.add(Symbol::new(kwarg, Type::dict(Type::Unknown, Type::Unknown)));
        }

        scope
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn types(&self) -> &[Type] {
        &self.types
    }

    pub fn default_types(&self) -> &[Type] {
        &self.default_types
    }

    pub fn annotated_types(&self) -> &[Type] {
        &self.annotated_types
    }

    pub fn min_count(&self) -> usize {
        self.min_count
    }

    pub fn vararg(&self) -> Option<&str> {
        self.vararg.as_deref()
    }

    pub fn kwarg(&self) -> Option<&str> {
        self.kwarg.as_deref()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn get(&self, index: usize) -> Option<(&str, &Type)> {
        Some((self.names.get(index)?.as_str(), self.types.get(index)?))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Type)> {
        self.names.iter().map(String::as_str).zip(&self.types)
    }
}

// Only the effective types take part, two signatures that differ in their names alone collide.
impl Hash for Signature {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.types.hash(state);
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let positional = self.iter().map(|(name, typ)| format!("{name}: {typ}"));
        let vararg = self.vararg.iter().map(|name| format!("*{name}: Tuple"));
        let kwarg = self.kwarg.iter().map(|name| format!("**{name}: Dict"));

        write!(f, "{}", positional.chain(vararg).chain(kwarg).join(", "))
    }
}
