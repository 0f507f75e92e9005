mod common;

use common::{messages, run, type_of};
use glean_checker::{
    evaluator::INITIALIZER,
    infer::infer_function,
    interpreter::Interpreter,
    types::{Instance, Type, Value},
    visitor::Visitor,
};
use glean_tree::{build::*, r#abstract::Stmt};
use pretty_assertions::assert_eq;

fn counter() -> Stmt {
    class(
        "Counter",
        vec![
            def(FunctionBuilder::new(INITIALIZER)
                .params(&["self", "start"])
                .body(vec![
                    assign(attr(name("self"), "count"), name("start")),
                    assign(name("local"), num(10)),
                ])),
            def(FunctionBuilder::new("get")
                .params(&["self"])
                .body(vec![ret(attr(name("self"), "count"))])),
        ],
    )
}

#[test]
fn instantiation_initializes_without_a_value() {
    let interpreter = run(vec![
        counter(),
        assign(name("c"), call(name("Counter"), vec![num(1)])),
    ]);

    let c = interpreter.lookup("c").unwrap();
    assert_eq!(c.value, Some(Value::Unknown));

    let Type::Instance(instance) = c.typ else {
        panic!("calling a class should produce an instance");
    };
    assert!(instance.is_initialized());
    assert_eq!(instance.class_name(), "Counter");
    assert_eq!(instance.attribute("count").map(|s| s.typ), Some(Type::Num));
    assert!(instance.attribute("local").is_none());
    assert_eq!(messages(&interpreter), Vec::<String>::new());
}

#[test]
fn methods_see_state_set_by_the_initializer() {
    let interpreter = run(vec![
        counter(),
        assign(name("c"), call(name("Counter"), vec![string("one")])),
        assign(name("v"), call(attr(name("c"), "get"), vec![])),
    ]);

    assert_eq!(type_of(&interpreter, "v"), Type::Str);
}

#[test]
fn class_signature_drops_the_receiver() {
    let interpreter = run(vec![counter()]);

    let Type::Class(class) = type_of(&interpreter, "Counter") else {
        panic!("Counter should be a class");
    };
    assert_eq!(class.signature.names(), ["start"]);
    assert_eq!(class.signature.min_count(), 1);
    assert_eq!(class.to_string(), "Class[start: Unknown -> Instance[Counter]]");
}

#[test]
fn constructor_arity_is_checked() {
    let interpreter = run(vec![
        counter(),
        expr_stmt(call(name("Counter"), vec![])),
    ]);

    assert_eq!(
        messages(&interpreter),
        ["expected 1 arguments, got 0"]
    );
}

#[test]
fn classes_without_initializer_take_no_arguments() {
    let interpreter = run(vec![
        class("Empty", vec![pass()]),
        assign(name("e"), call(name("Empty"), vec![])),
        assign(attr(name("e"), "tag"), string("set later")),
        assign(name("tag"), attr(name("e"), "tag")),
    ]);

    let Type::Instance(instance) = type_of(&interpreter, "e") else {
        panic!("calling a class should produce an instance");
    };
    assert!(instance.is_initialized());
    assert_eq!(type_of(&interpreter, "tag"), Type::Str);
}

#[test]
fn missing_attributes_are_reported() {
    let interpreter = run(vec![
        counter(),
        assign(name("c"), call(name("Counter"), vec![num(1)])),
        expr_stmt(attr(name("c"), "size")),
        assign(attr(num(1), "size"), num(2)),
    ]);

    assert_eq!(
        messages(&interpreter),
        [
            "'Instance[Counter]' has no attribute 'size'",
            "cannot set attribute 'size' on 'Num'",
        ]
    );
}

#[test]
fn exploratory_passes_keep_their_diagnostics() {
    let method = FunctionBuilder::new("describe")
        .params(&["self"])
        .body(vec![ret(name("missing"))]);
    let initializer = FunctionBuilder::new(INITIALIZER)
        .params(&["self"])
        .body(vec![ret(name("missing"))]);

    let mut interpreter = Interpreter::new();
    let building = Instance::new("Widget");

    infer_function(&method, &mut interpreter, Some(&building));
    assert_eq!(interpreter.context().err_count(), 0);

    infer_function(&initializer, &mut interpreter, Some(&building));
    assert_eq!(interpreter.context().err_count(), 1);

    building.mark_initialized();
    infer_function(&method, &mut interpreter, Some(&building));
    assert_eq!(interpreter.context().err_count(), 2);
}

#[test]
fn bound_methods_see_their_receiver() {
    let this = FunctionBuilder::new("this")
        .params(&["self"])
        .body(vec![ret(name("self"))]);

    let mut interpreter = Interpreter::new();
    let instance = Instance::new("Widget");
    instance.mark_initialized();

    let function = infer_function(&this, &mut interpreter, Some(&instance));
    assert_eq!(*function.return_type, Type::Instance(instance));
    assert!(function.receiver.is_none());
}

#[test]
fn initializer_results_never_leak_into_the_instance() {
    let interpreter = run(vec![
        class(
            "Answer",
            vec![def(FunctionBuilder::new(INITIALIZER)
                .params(&["self"])
                .body(vec![
                    assign(attr(name("self"), "value"), num(5)),
                    ret(num(5)),
                ]))],
        ),
        assign(name("answer"), call(name("Answer"), vec![])),
    ]);

    let answer = interpreter.lookup("answer").unwrap();
    assert_eq!(answer.value, Some(Value::Unknown));

    let Type::Instance(instance) = answer.typ else {
        panic!("calling a class should produce an instance");
    };
    assert!(instance.is_initialized());
    assert_eq!(instance.attribute("value").map(|s| s.typ), Some(Type::Num));
}

#[test]
fn self_referencing_instances_meet() {
    let interpreter = run(vec![
        class("Node", vec![pass()]),
        assign(name("a"), call(name("Node"), vec![])),
        assign(attr(name("a"), "me"), name("a")),
        assign(name("b"), call(name("Node"), vec![])),
        assign(attr(name("b"), "me"), name("b")),
        assign(name("pair"), list(vec![name("a"), name("b")])),
    ]);

    assert_eq!(type_of(&interpreter, "pair").to_string(), "List[Instance[Node]]");
    assert_eq!(messages(&interpreter), Vec::<String>::new());
}

#[test]
fn instances_of_one_class_meet_despite_bound_methods() {
    let make = FunctionBuilder::new("make").params(&["flag"]).body(vec![if_else(
        name("flag"),
        vec![ret(call(name("Counter"), vec![num(1)]))],
        vec![ret(call(name("Counter"), vec![num(2)]))],
    )]);

    let interpreter = run(vec![
        counter(),
        assign(
            name("pair"),
            list(vec![
                call(name("Counter"), vec![num(1)]),
                call(name("Counter"), vec![num(2)]),
            ]),
        ),
        def(make),
        assign(name("made"), call(name("make"), vec![boolean(true)])),
    ]);

    assert_eq!(type_of(&interpreter, "pair").to_string(), "List[Instance[Counter]]");
    assert_eq!(type_of(&interpreter, "made").to_string(), "Instance[Counter]");
}
