//! Shorthands to assemble [crate::r#abstract] nodes without a parser. Every node built here gets a
//! synthetic location.

use std::rc::Rc;

use glean_location::Located;

use crate::r#abstract::*;

pub fn none() -> Expr {
    Located::synthetic(ExprKind::None)
}

pub fn boolean(b: bool) -> Expr {
    Located::synthetic(ExprKind::Bool(b))
}

pub fn num(n: i64) -> Expr {
    Located::synthetic(ExprKind::Num(n))
}

pub fn string(s: &str) -> Expr {
    Located::synthetic(ExprKind::Str(s.to_owned()))
}

pub fn name(id: &str) -> Expr {
    Located::synthetic(ExprKind::Name(id.to_owned()))
}

pub fn list(items: Vec<Expr>) -> Expr {
    Located::synthetic(ExprKind::List(items))
}

pub fn tuple(items: Vec<Expr>) -> Expr {
    Located::synthetic(ExprKind::Tuple(items))
}

pub fn set(items: Vec<Expr>) -> Expr {
    Located::synthetic(ExprKind::Set(items))
}

pub fn dict(pairs: Vec<(Expr, Expr)>) -> Expr {
    Located::synthetic(ExprKind::Dict(pairs))
}

pub fn attr(obj: Expr, attribute: &str) -> Expr {
    Located::synthetic(ExprKind::Attribute(Box::new(obj), attribute.to_owned()))
}

pub fn call(fun: Expr, args: Vec<Expr>) -> Expr {
    Located::synthetic(ExprKind::Call(Box::new(fun), args))
}

pub fn binop(left: Expr, op: BinOp, right: Expr) -> Expr {
    Located::synthetic(ExprKind::BinOp(Box::new(left), op, Box::new(right)))
}

pub fn lambda(params: &[&str], body: Expr) -> Expr {
    let def = Definition {
        name: None,
        args: Arguments {
            args: params.iter().map(|p| p.to_string()).collect(),
            ..Default::default()
        },
        body: Rc::new(Body::Expr(Box::new(body))),
        decorators: vec![],
    };
    Located::synthetic(ExprKind::Lambda(Rc::new(def)))
}

pub fn expr_stmt(expr: Expr) -> Stmt {
    Located::synthetic(StmtKind::Expr(expr))
}

pub fn assign(target: Expr, value: Expr) -> Stmt {
    Located::synthetic(StmtKind::Assign(target, value))
}

pub fn ret(expr: Expr) -> Stmt {
    Located::synthetic(StmtKind::Return(Some(expr)))
}

pub fn ret_none() -> Stmt {
    Located::synthetic(StmtKind::Return(None))
}

pub fn if_else(test: Expr, then: Vec<Stmt>, otherwise: Vec<Stmt>) -> Stmt {
    Located::synthetic(StmtKind::If(test, then, otherwise))
}

pub fn pass() -> Stmt {
    Located::synthetic(StmtKind::Pass)
}

pub fn def(definition: Rc<Definition>) -> Stmt {
    Located::synthetic(StmtKind::FunctionDef(definition))
}

pub fn class(name: &str, body: Vec<Stmt>) -> Stmt {
    Located::synthetic(StmtKind::ClassDef(Rc::new(ClassDef {
        name: name.to_owned(),
        body,
        decorators: vec![],
    })))
}

/// Builds a named [Definition] step by step.
#[derive(Debug, Clone)]
pub struct FunctionBuilder {
    name: String,
    args: Arguments,
    decorators: Vec<Expr>,
}

impl FunctionBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            args: Arguments::default(),
            decorators: vec![],
        }
    }

    pub fn params(mut self, params: &[&str]) -> Self {
        self.args.args = params.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn defaults(mut self, defaults: Vec<Expr>) -> Self {
        self.args.defaults = defaults;
        self
    }

    pub fn vararg(mut self, name: &str) -> Self {
        self.args.vararg = Some(name.to_owned());
        self
    }

    pub fn kwarg(mut self, name: &str) -> Self {
        self.args.kwarg = Some(name.to_owned());
        self
    }

    pub fn decorator(mut self, decorator: Expr) -> Self {
        self.decorators.push(decorator);
        self
    }

    pub fn body(self, stmts: Vec<Stmt>) -> Rc<Definition> {
        self.finish(Body::Block(stmts))
    }

    pub fn missing_body(self) -> Rc<Definition> {
        self.finish(Body::Missing)
    }

    fn finish(self, body: Body) -> Rc<Definition> {
        Rc::new(Definition {
            name: Some(self.name),
            args: self.args,
            body: Rc::new(body),
            decorators: self.decorators,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn renders_like_source() {
        let def = FunctionBuilder::new("area")
            .params(&["w", "h"])
            .defaults(vec![num(1)])
            .vararg("rest")
            .decorator(call(name("types"), vec![name("int"), name("int")]))
            .body(vec![ret(binop(name("w"), BinOp::Mul, name("h")))]);

        assert_eq!(
            def.to_string(),
            "@types(int, int) def area(w, h=1, *rest): { return (w * h) }"
        );
    }

    #[test]
    fn lambdas_have_expression_bodies() {
        let expr = lambda(&["x"], binop(name("x"), BinOp::Add, num(1)));
        assert_eq!(expr.to_string(), "(lambda x: (x + 1))");
    }
}
