//! Symbol tables. A [Scope] is one frame of bindings plus whatever the code running inside the
//! frame returned.

use indexmap::IndexMap;

use crate::{
    meet::intersection,
    types::{Type, Value},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub typ: Type,
    pub value: Option<Value>,
}

impl Symbol {
    pub fn new(name: impl Into<String>, typ: Type) -> Self {
        Self {
            name: name.into(),
            typ,
            value: None,
        }
    }

    pub fn with_value(name: impl Into<String>, typ: Type, value: Option<Value>) -> Self {
        Self {
            name: name.into(),
            typ,
            value,
        }
    }
}

/// Bindings are kept in insertion order, so walking a class body's scope sees its attributes in
/// the order they were defined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    symbols: IndexMap<String, Symbol>,
    return_type: Option<Type>,
    return_value: Option<Value>,
}

impl Scope {
    /// Binds a symbol, shadowing any previous binding of the same name.
    pub fn add(&mut self, symbol: Symbol) {
        self.symbols.insert(symbol.name.clone(), symbol);
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn get_type(&self, name: &str) -> Option<&Type> {
        self.symbols.get(name).map(|symbol| &symbol.typ)
    }

    pub fn get_value(&self, name: &str) -> Option<&Value> {
        self.symbols.get(name).and_then(|symbol| symbol.value.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.symbols.keys()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Copies every binding of `other` into this scope.
    pub fn merge(&mut self, other: Self) {
        self.symbols.extend(other.symbols);
    }

    /// Records one `return` reached inside this frame. Returns of incompatible types widen the
    /// recorded type to [Type::Unknown]; differing values collapse to [Value::Unknown].
    pub fn set_return(&mut self, typ: Type, value: Option<Value>) {
        match self.return_type.take() {
            None => {
                self.return_type = Some(typ);
                self.return_value = value;
            }
            Some(previous) => {
                self.return_type = Some(intersection(&previous, &typ).unwrap_or(Type::Unknown));
                if self.return_value != value {
                    self.return_value = Some(Value::Unknown);
                }
            }
        }
    }

    pub fn return_type(&self) -> Option<&Type> {
        self.return_type.as_ref()
    }

    pub fn return_value(&self) -> Option<&Value> {
        self.return_value.as_ref()
    }
}
