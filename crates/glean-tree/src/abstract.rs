//! The syntactic tree handed over by the parser. It contains no semantic information; the checker
//! walks it to infer types. The main types of this file are [Expr], [Stmt], [Definition] and
//! [ClassDef].

use std::fmt::{self, Display};
use std::rc::Rc;

use glean_location::Located;
use itertools::Itertools;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "+"),
            Self::Sub => write!(f, "-"),
            Self::Mul => write!(f, "*"),
            Self::Div => write!(f, "/"),
        }
    }
}

/// Expressions are constructions that produce a value.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    None,
    Bool(bool),
    Num(i64),
    Str(String),
    Name(String),
    List(Vec<Expr>),
    Tuple(Vec<Expr>),
    Set(Vec<Expr>),
    Dict(Vec<(Expr, Expr)>),
    Attribute(Box<Expr>, String),
    Call(Box<Expr>, Vec<Expr>),
    BinOp(Box<Expr>, BinOp, Box<Expr>),
    Lambda(Rc<Definition>),
}

impl Display for ExprKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Bool(true) => write!(f, "True"),
            Self::Bool(false) => write!(f, "False"),
            Self::Num(n) => write!(f, "{n}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Name(name) => write!(f, "{name}"),
            Self::List(items) => write!(f, "[{}]", items.iter().join(", ")),
            Self::Tuple(items) if items.len() == 1 => write!(f, "({},)", items[0]),
            Self::Tuple(items) => write!(f, "({})", items.iter().join(", ")),
            Self::Set(items) => write!(f, "{{{}}}", items.iter().join(", ")),
            Self::Dict(pairs) => write!(
                f,
                "{{{}}}",
                pairs.iter().map(|(k, v)| format!("{k}: {v}")).join(", ")
            ),
            Self::Attribute(obj, attr) => write!(f, "{obj}.{attr}"),
            Self::Call(fun, args) => write!(f, "{fun}({})", args.iter().join(", ")),
            Self::BinOp(l, op, r) => write!(f, "({l} {op} {r})"),
            Self::Lambda(def) => write!(f, "(lambda {}: {})", def.args, def.body),
        }
    }
}

pub type Expr = Located<ExprKind>;

impl ExprKind {
    /// The name this expression refers to, if it's a bare identifier.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name),
            _ => None,
        }
    }
}

/// Statements are executed for their effects on the scope.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Expr(Expr),
    Assign(Expr, Expr),
    Return(Option<Expr>),
    If(Expr, Vec<Stmt>, Vec<Stmt>),
    FunctionDef(Rc<Definition>),
    ClassDef(Rc<ClassDef>),
    Pass,
}

fn block(stmts: &[Stmt]) -> String {
    format!("{{ {} }}", stmts.iter().join("; "))
}

impl Display for StmtKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expr(e) => write!(f, "{e}"),
            Self::Assign(target, value) => write!(f, "{target} = {value}"),
            Self::Return(None) => write!(f, "return"),
            Self::Return(Some(e)) => write!(f, "return {e}"),
            Self::If(test, then, otherwise) if otherwise.is_empty() => {
                write!(f, "if {test}: {}", block(then))
            }
            Self::If(test, then, otherwise) => {
                write!(f, "if {test}: {} else: {}", block(then), block(otherwise))
            }
            Self::FunctionDef(def) => write!(f, "{def}"),
            Self::ClassDef(class) => write!(f, "{class}"),
            Self::Pass => write!(f, "pass"),
        }
    }
}

pub type Stmt = Located<StmtKind>;

/// Declared parameters of a definition. `defaults` belong to the trailing parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    pub args: Vec<String>,
    pub defaults: Vec<Expr>,
    pub vararg: Option<String>,
    pub kwarg: Option<String>,
}

impl Display for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let required = self.args.len().saturating_sub(self.defaults.len());

        let positional = self.args.iter().enumerate().map(|(i, name)| {
            if i < required {
                name.clone()
            } else {
                format!("{name}={}", self.defaults[i - required])
            }
        });

        let vararg = self.vararg.iter().map(|name| format!("*{name}"));
        let kwarg = self.kwarg.iter().map(|name| format!("**{name}"));

        write!(f, "{}", positional.chain(vararg).chain(kwarg).join(", "))
    }
}

/// The code of a definition. `Missing` stands for definitions whose body is not available to the
/// checker, like built-ins implemented natively.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Block(Vec<Stmt>),
    Expr(Box<Expr>),
    Missing,
}

impl Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Block(stmts) => write!(f, "{}", block(stmts)),
            Self::Expr(expr) => write!(f, "{expr}"),
            Self::Missing => write!(f, "..."),
        }
    }
}

/// A function definition or a lambda (which has no name and an expression body).
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    pub name: Option<String>,
    pub args: Arguments,
    pub body: Rc<Body>,
    pub decorators: Vec<Expr>,
}

impl Display for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for decorator in &self.decorators {
            write!(f, "@{decorator} ")?;
        }

        match &self.name {
            Some(name) => write!(f, "def {name}({}): {}", self.args, self.body),
            None => write!(f, "lambda {}: {}", self.args, self.body),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDef {
    pub name: String,
    pub body: Vec<Stmt>,
    pub decorators: Vec<Expr>,
}

impl Display for ClassDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for decorator in &self.decorators {
            write!(f, "@{decorator} ")?;
        }
        write!(f, "class {}: {}", self.name, block(&self.body))
    }
}
