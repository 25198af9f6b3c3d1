use tbl::interpreter::evaluator::{core::evaluate, environment::Environment};

fn eval(src: &str) -> String {
    let env = Environment::standard().expect("the standard library loads");
    match evaluate(src, &env) {
        Ok(value) => value.to_string(),
        Err(e) => panic!("evaluation failed: {e}\nsource: {src}"),
    }
}

fn fails(src: &str) -> bool {
    let env = Environment::standard().expect("the standard library loads");
    evaluate(src, &env).is_err()
}

#[test]
fn quoted_values_print_as_source() {
    assert_eq!(eval("`{1 + x}"), "`{1 + x}");
    assert_eq!(eval("n : nodeop @ [1, {+}, 2]; [n, eval_ast @ [n]]"), "[`{1 + 2}, 3]");
}

#[test]
fn macro_operators_receive_trees() {
    let src = "{?>} <<< [op_priority @ {+}, [l, r] -> [getname @ [l], getop @ [r]]]; foo ?> (1 - 2)";
    assert_eq!(eval(src), "[foo, -]");
}

#[test]
fn tree_application_passes_the_unevaluated_operand() {
    assert_eq!(eval("opof : t -> getop @ [t]; opof @: (a * b)"), "*");
}

#[test]
fn macro_application_evaluates_the_result_in_the_caller() {
    assert_eq!(eval("x : 5; if @- [x > 1, {big}]"), "big");
    assert_eq!(eval("x : 0; if @- [x > 1, {big}]"), "0");
    assert_eq!(eval("x : 0; ifelse @- [x > 1, {big}, {small}]"), "small");
    assert_eq!(eval("x : 0; if @- [1, x : 9]; x"), "9");
}

#[test]
fn cond_and_switch() {
    assert_eq!(eval("cond @- [[0, {a}], [1, {b}]]"), "b");
    assert_eq!(eval("cond @- [[0, {a}]]"), "0");
    assert_eq!(eval("x : 3; switch @- [x, [1, {one}], [3, {three}]]"), "three");
}

#[test]
fn loop_macros() {
    assert_eq!(eval("n : 0; while @- [n < 3, n : n + 1]; n"), "3");
    assert_eq!(eval("s : 0; for @- [i : 0, i < 4, i : i + 1, s : s + i]; s"), "6");
    assert_eq!(eval("s : 0; forin @- [v, [1, 2, 3], s : s + v]; s"), "6");
    assert_eq!(eval("out : []; forin @- [c, {ab}, push @ [out, c]]; out"), "[a, b]");
}

#[test]
fn short_circuit_skips_the_right_operand() {
    assert_eq!(eval("n : 0; 0 && (n : 1); n"), "0");
    assert_eq!(eval("n : 0; 1 || (n : 1); n"), "0");
    assert_eq!(eval("n : 0; 1 && (n : 1); n"), "1");
}

#[test]
fn editing_trees() {
    let src = "t : `{a + b}; setleft @ [t, 10]; setright @ [t, 5]; setop @ [t, {-}]; eval_ast @ [t]";
    assert_eq!(eval(src), "5");
    assert_eq!(eval("len @ [getsubasts @ [`{[1, 2, 3]}]]"), "3");
    assert_eq!(eval("t : `{[1, 2]}; push @ [t, 3]; eval_ast @ [t]"), "[1, 2, 3]");
    assert_eq!(eval("t : `{x}; setname @ [t, {y}]; y : 4; eval_ast @ [t]"), "4");
}

#[test]
fn get_on_a_node_returns_a_copy() {
    assert_eq!(eval("t : `{[a, b]}; c : get @ [t, 0]; setname @ [c, {z}]; t"), "`{[a, b]}");
}

#[test]
fn settext_reparses_interpolation() {
    assert_eq!(eval("v : 3; t : nodestr @ [{v is \\{v\\}}]; eval_ast @ [t]"), "v is 3");
    assert_eq!(eval("gettext @ `{{a\\{b\\}}}"), "a\\{b\\}");
}

#[test]
fn nested_quotes() {
    assert_eq!(eval("q : `{`{x}}; [isnodeast @ q, isnodeident @ (getast @ q)]"), "[1, 1]");
}

#[test]
fn node_predicates() {
    let src = "[isnodelist @ `{[]}, isnodeexpr @ `{()}, isnodenum @ `{1}, isnodestr @ `{{s}}, \
               isnodeop @ `{a + b}, isnodelist @ 1]";
    assert_eq!(eval(src), "[1, 1, 1, 1, 1, 0]");
}

#[test]
fn function_introspection() {
    assert_eq!(eval("f : [a, b] -> a + b; [getparams @ f, getbody @ f]"), "[[a, b], `{a + b}]");
    assert_eq!(eval("f : x -> x + 1; setbody @ [f, `{x * 10}]; f @ 3"), "30");
}

#[test]
fn gensym_names_are_fresh() {
    let src = "a : gensym @ []; b : gensym @ []; [isnodeident @ a, (getname @ a) = (getname @ b)]";
    assert_eq!(eval(src), "[1, 0]");
}

#[test]
fn introspecting_the_environment() {
    assert_eq!(eval("get @ [ptable @ [], 0]"), "[['], left]");
    assert_eq!(eval("op_priority @ {nope}"), "-1");
    assert_eq!(eval("includes @ [defined @ [], {fact}]"), "1");
    assert_eq!(eval("eval @ {y : 4}; y"), "4");
}

#[test]
fn trees_can_not_hold_functions() {
    assert!(fails("nodeop @ [x -> x, {+}, 1]"));
    assert!(fails("getop @ `{x}"));
    assert!(fails("eval_ast @ `{undefined_name}"));
}
