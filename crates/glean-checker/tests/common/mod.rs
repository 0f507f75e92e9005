#![allow(dead_code)]

use glean_checker::{interpreter::Interpreter, types::Type, visitor::Visitor};
use glean_tree::r#abstract::Stmt;

pub fn run(program: Vec<Stmt>) -> Interpreter {
    let mut interpreter = Interpreter::new();
    interpreter.run(&program);
    interpreter
}

pub fn type_of(interpreter: &Interpreter, name: &str) -> Type {
    match interpreter.lookup(name) {
        Some(symbol) => symbol.typ,
        None => panic!("'{name}' is not bound"),
    }
}

pub fn messages(interpreter: &Interpreter) -> Vec<String> {
    interpreter
        .context()
        .take_errors()
        .iter()
        .map(|error| error.message().to_string())
        .collect()
}
