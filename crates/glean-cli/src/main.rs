//! Runs small built-in programs through the inference core and prints what it found out about
//! every top-level binding.
//!
//! ```bash
//! glean --list
//! glean --demo classes --log debug
//! ```

use std::process::exit;

use clap::{Parser, ValueEnum};
use glean_checker::{interpreter::Interpreter, visitor::Visitor};
use glean_error::Error;
use glean_tree::{
    build::*,
    r#abstract::{BinOp, Stmt},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "glean", version, about = "Infers signatures and return types of definitions")]
struct Cli {
    /// Program to check. Every program runs when none is given.
    #[arg(long, value_enum)]
    demo: Option<Demo>,

    /// List the available programs and exit.
    #[arg(long)]
    list: bool,

    /// Log level, overridden by RUST_LOG.
    #[arg(long, default_value = "warn")]
    log: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Demo {
    Recursion,
    Classes,
    Annotations,
    Narrowing,
}

impl Demo {
    fn program(self) -> Vec<Stmt> {
        match self {
            Self::Recursion => recursion(),
            Self::Classes => classes(),
            Self::Annotations => annotations(),
            Self::Narrowing => narrowing(),
        }
    }
}

fn recursion() -> Vec<Stmt> {
    let fact = FunctionBuilder::new("fact").params(&["n"]).body(vec![if_else(
        name("n"),
        vec![ret(num(1))],
        vec![ret(binop(
            name("n"),
            BinOp::Mul,
            call(name("fact"), vec![binop(name("n"), BinOp::Sub, num(1))]),
        ))],
    )]);

    vec![
        def(fact),
        assign(name("result"), call(name("fact"), vec![num(5)])),
    ]
}

fn classes() -> Vec<Stmt> {
    let init = FunctionBuilder::new("__init__")
        .params(&["self", "name"])
        .defaults(vec![string("anonymous")])
        .body(vec![
            assign(attr(name("self"), "name"), name("name")),
            assign(attr(name("self"), "visits"), num(0)),
        ]);

    let greet = FunctionBuilder::new("greet")
        .params(&["self"])
        .body(vec![ret(binop(
            string("hello "),
            BinOp::Add,
            attr(name("self"), "name"),
        ))]);

    vec![
        class("User", vec![def(init), def(greet)]),
        assign(name("user"), call(name("User"), vec![string("ada")])),
        assign(name("greeting"), call(attr(name("user"), "greet"), vec![])),
        assign(name("visits"), attr(name("user"), "visits")),
    ]
}

fn annotations() -> Vec<Stmt> {
    let repeat = FunctionBuilder::new("repeat")
        .params(&["text", "times"])
        .defaults(vec![num(2)])
        .decorator(call(name("types"), vec![name("str"), name("int")]))
        .body(vec![ret(list(vec![name("text")]))]);

    vec![
        def(repeat),
        assign(name("words"), call(name("repeat"), vec![string("echo")])),
        expr_stmt(call(name("repeat"), vec![num(1), num(2)])),
    ]
}

fn narrowing() -> Vec<Stmt> {
    let scale = FunctionBuilder::new("scale")
        .params(&["value", "factor"])
        .body(vec![ret(binop(name("value"), BinOp::Mul, name("factor")))]);

    let label = FunctionBuilder::new("label").params(&["x"]).body(vec![
        if_else(
            call(name("isinstance"), vec![name("x"), name("str")]),
            vec![pass()],
            vec![],
        ),
        ret(name("x")),
    ]);

    vec![
        def(scale),
        def(label),
        assign(name("area"), call(name("scale"), vec![num(3), num(4)])),
        assign(name("double"), lambda(&["v"], binop(name("v"), BinOp::Add, name("v")))),
        expr_stmt(call(name("label"), vec![list(vec![])])),
    ]
}

fn setup_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Checks `program`, printing its bindings and diagnostics. Returns how many diagnostics there
/// were.
fn check(demo: Demo, program: &[Stmt]) -> usize {
    info!(?demo, statements = program.len(), "checking");

    println!("# {demo:?}");
    for stmt in program {
        println!("  {stmt}");
    }
    println!();

    let mut interpreter = Interpreter::new();
    interpreter.run(program);

    for symbol in interpreter.module_scope().symbols() {
        println!("{}: {}", symbol.name, symbol.typ);
    }
    println!();

    let errors = interpreter.context().take_errors();
    report(&errors);
    errors.len()
}

fn report(errors: &[Error]) {
    for err in errors {
        eprintln!("{err}");
    }
}

fn main() {
    let cli = Cli::parse();
    setup_logging(&cli.log);

    if cli.list {
        for demo in Demo::value_variants() {
            if let Some(value) = demo.to_possible_value() {
                println!("{}", value.get_name());
            }
        }
        return;
    }

    let demos = match cli.demo {
        Some(demo) => vec![demo],
        None => Demo::value_variants().to_vec(),
    };

    let errors: usize = demos
        .into_iter()
        .map(|demo| check(demo, &demo.program()))
        .sum();

    if errors > 0 {
        exit(1)
    }
}
