//! The closed set of types the checker reasons about. Callable types ([FunctionType] and
//! [ClassType]) carry the [Evaluator] that runs their body, so a call site only needs the type of
//! the callee to compute the type of the call.

use std::{
    cell::RefCell,
    fmt::{self, Debug, Display},
    hash::{Hash, Hasher},
    rc::Rc,
};

use itertools::Itertools;

use crate::{
    evaluator::Evaluator,
    scope::{Scope, Symbol},
    signature::Signature,
};

/// The static value of an expression. The checker itself never looks inside it, it only forwards
/// what the visitor recorded or produces [Value::Unknown].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Unknown,
    Bool(bool),
    Num(i64),
    Str(String),
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "?"),
            Self::Bool(true) => write!(f, "True"),
            Self::Bool(false) => write!(f, "False"),
            Self::Num(n) => write!(f, "{n}"),
            Self::Str(s) => write!(f, "{s:?}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Undefined,
    Any,
    /// Inference could not determine anything here.
    Unknown,
    NoneType,
    Bool,
    Num,
    Str,
    List(Box<Type>),
    Tuple(Box<Type>),
    Set(Box<Type>),
    Dict(Box<Type>, Box<Type>),
    Function(FunctionType),
    Instance(Instance),
    Class(ClassType),
}

impl Type {
    pub fn list(item: Self) -> Self {
        Self::List(Box::new(item))
    }

    pub fn tuple(item: Self) -> Self {
        Self::Tuple(Box::new(item))
    }

    pub fn set(item: Self) -> Self {
        Self::Set(Box::new(item))
    }

    pub fn dict(key: Self, value: Self) -> Self {
        Self::Dict(Box::new(key), Box::new(value))
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => write!(f, "Undefined"),
            Self::Any => write!(f, "Any"),
            Self::Unknown => write!(f, "Unknown"),
            Self::NoneType => write!(f, "NoneType"),
            Self::Bool => write!(f, "Bool"),
            Self::Num => write!(f, "Num"),
            Self::Str => write!(f, "Str"),
            Self::List(item) => write!(f, "List[{item}]"),
            Self::Tuple(item) => write!(f, "Tuple[{item}]"),
            Self::Set(item) => write!(f, "Set[{item}]"),
            Self::Dict(key, value) => write!(f, "Dict[{key},{value}]"),
            Self::Function(function) => write!(f, "{function}"),
            Self::Instance(instance) => write!(f, "{instance}"),
            Self::Class(class) => write!(f, "{class}"),
        }
    }
}

/// The type of a function, lambda or method. `receiver` is set on methods that were bound to an
/// instance.
#[derive(Debug, Clone)]
pub struct FunctionType {
    pub signature: Rc<Signature>,
    pub return_type: Box<Type>,
    pub evaluator: Rc<Evaluator>,
    pub receiver: Option<Instance>,
}

impl FunctionType {
    pub fn new(signature: Rc<Signature>, return_type: Type, evaluator: Rc<Evaluator>) -> Self {
        Self {
            signature,
            return_type: Box::new(return_type),
            evaluator,
            receiver: None,
        }
    }

    /// The same function with `instance` as its receiver.
    pub fn bind(&self, instance: &Instance) -> Self {
        Self {
            receiver: Some(instance.clone()),
            ..self.clone()
        }
    }
}

// Evaluators compare by identity, two functions inferred separately are never equal.
impl PartialEq for FunctionType {
    fn eq(&self, other: &Self) -> bool {
        self.signature == other.signature
            && self.return_type == other.return_type
            && Rc::ptr_eq(&self.evaluator, &other.evaluator)
            && self.receiver == other.receiver
    }
}

impl Eq for FunctionType {}

impl Hash for FunctionType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.signature.hash(state);
        self.return_type.hash(state);
    }
}

impl Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Function[{} -> {}]", self.signature, self.return_type)
    }
}

/// The type of a class object. Calling it produces a fresh [Instance].
#[derive(Debug, Clone)]
pub struct ClassType {
    pub name: String,
    pub signature: Rc<Signature>,
    pub return_type: Box<Type>,
    pub attributes: Rc<Scope>,
    pub evaluator: Rc<Evaluator>,
}

impl PartialEq for ClassType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.signature == other.signature
            && self.return_type == other.return_type
            && self.attributes == other.attributes
            && Rc::ptr_eq(&self.evaluator, &other.evaluator)
    }
}

impl Eq for ClassType {}

impl Hash for ClassType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.signature.hash(state);
        self.return_type.hash(state);
    }
}

impl Display for ClassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Class[{} -> {}]", self.signature, self.return_type)
    }
}

pub struct InstanceData {
    pub class_name: String,
    pub attributes: Scope,
    pub initialized: bool,
}

/// An object created by calling a class. Every copy of an [Instance] points to the same object, so
/// attributes set by the initializer are seen by whoever holds the instance.
#[derive(Clone)]
pub struct Instance(Rc<RefCell<InstanceData>>);

impl Instance {
    pub fn new(class_name: &str) -> Self {
        Self(Rc::new(RefCell::new(InstanceData {
            class_name: class_name.to_owned(),
            attributes: Scope::default(),
            initialized: false,
        })))
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn class_name(&self) -> String {
        self.0.borrow().class_name.clone()
    }

    pub fn is_initialized(&self) -> bool {
        self.0.borrow().initialized
    }

    pub fn mark_initialized(&self) {
        self.0.borrow_mut().initialized = true;
    }

    pub fn attribute(&self, name: &str) -> Option<Symbol> {
        self.0.borrow().attributes.get(name).cloned()
    }

    pub fn set_attribute(&self, symbol: Symbol) {
        self.0.borrow_mut().attributes.add(symbol);
    }
}

type InstancePtr = *const RefCell<InstanceData>;

thread_local! {
    /// Pairs of instances whose comparison is in progress on this thread.
    static COMPARING: RefCell<Vec<(InstancePtr, InstancePtr)>> = const { RefCell::new(Vec::new()) };
}

// Instances reach themselves through their attributes and the receivers of their methods. A pair
// already being compared further up counts as equal.
impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }

        let pair = (Rc::as_ptr(&self.0), Rc::as_ptr(&other.0));
        if COMPARING.with(|comparing| comparing.borrow().contains(&pair)) {
            return true;
        }

        let (left, right) = (self.0.borrow(), other.0.borrow());
        if left.class_name != right.class_name || left.initialized != right.initialized {
            return false;
        }

        COMPARING.with(|comparing| comparing.borrow_mut().push(pair));
        let equal = left.attributes == right.attributes;
        COMPARING.with(|comparing| comparing.borrow_mut().pop());

        equal
    }
}

impl Eq for Instance {}

impl Hash for Instance {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.borrow().class_name.hash(state);
    }
}

impl Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.0.borrow();
        let attributes = data.attributes.names().join(", ");

        f.debug_struct("Instance")
            .field("class_name", &data.class_name)
            .field("initialized", &data.initialized)
            .field("attributes", &format_args!("[{attributes}]"))
            .finish()
    }
}

impl Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Instance[{}]", self.0.borrow().class_name)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn containers_compare_structurally() {
        assert_eq!(Type::list(Type::Num), Type::list(Type::Num));
        assert_ne!(Type::list(Type::Num), Type::set(Type::Num));
        assert_ne!(
            Type::dict(Type::Str, Type::Num),
            Type::dict(Type::Str, Type::Str)
        );
        assert_ne!(Type::Unknown, Type::Any);
        assert_ne!(Type::Unknown, Type::Undefined);
    }

    #[test]
    fn renders_nested_types() {
        let typ = Type::dict(Type::Str, Type::list(Type::tuple(Type::Bool)));
        assert_eq!(typ.to_string(), "Dict[Str,List[Tuple[Bool]]]");
    }

    #[test]
    fn instances_share_their_attributes() {
        let instance = Instance::new("Point");
        let alias = instance.clone();

        alias.set_attribute(Symbol::new("x", Type::Num));

        assert_eq!(instance.attribute("x").map(|s| s.typ), Some(Type::Num));
        assert_eq!(instance.to_string(), "Instance[Point]");
        assert!(!instance.is_initialized());
    }

    #[test]
    fn distinct_instances_compare_by_content() {
        let a = Instance::new("Point");
        let b = Instance::new("Point");
        assert_eq!(a, b);

        a.set_attribute(Symbol::new("x", Type::Num));
        assert_ne!(a, b);

        b.set_attribute(Symbol::new("x", Type::Num));
        b.mark_initialized();
        assert_ne!(a, b);
    }

    #[test]
    fn self_referencing_instances_compare_without_looping() {
        let a = Instance::new("Node");
        let b = Instance::new("Node");
        a.set_attribute(Symbol::new("me", Type::Instance(a.clone())));
        b.set_attribute(Symbol::new("me", Type::Instance(b.clone())));

        assert_eq!(a, b);

        let c = Instance::new("Node");
        c.set_attribute(Symbol::new("me", Type::Instance(a.clone())));
        c.set_attribute(Symbol::new("size", Type::Num));
        assert_ne!(a, c);
    }

    #[test]
    fn debug_lists_attribute_names_only() {
        let node = Instance::new("Node");
        node.set_attribute(Symbol::new("me", Type::Instance(node.clone())));
        node.set_attribute(Symbol::new("size", Type::Num));

        assert_eq!(
            format!("{node:?}"),
            "Instance { class_name: \"Node\", initialized: false, attributes: [me, size] }"
        );
    }
}
