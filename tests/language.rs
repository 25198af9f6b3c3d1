use std::fs::{self};

use tbl::{
    error::RuntimeError,
    interpreter::evaluator::{core::evaluate, environment::Environment},
    run,
};
use walkdir::WalkDir;

const EXPECT: &str = "-- expect:";

#[test]
fn script_examples_work() {
    let mut count = 0;

    for entry in
        WalkDir::new("tests/scripts").into_iter()
                                     .filter_map(Result::ok)
                                     .filter(|e| e.path().extension().is_some_and(|ext| ext == "tbl"))
    {
        let path = entry.path();
        let content =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));
        let expected = content.lines()
                              .next()
                              .and_then(|line| line.strip_prefix(EXPECT))
                              .unwrap_or_else(|| panic!("{path:?} does not start with '{EXPECT}'"))
                              .trim();

        count += 1;
        let env = Environment::standard().expect("the standard library loads");
        match evaluate(&content, &env) {
            Ok(value) => assert_eq!(value.to_string(), expected, "script {path:?}"),
            Err(e) => panic!("Script {path:?} failed:\nError: {e}"),
        }
    }

    assert!(count > 0, "No scripts found in tests/scripts");
}

fn assert_success(src: &str) {
    if let Err(e) = run(src, false) {
        panic!("Script failed: {e}");
    }
}

fn assert_failure(src: &str) {
    if run(src, false).is_ok() {
        panic!("Script succeeded but was expected to fail")
    }
}

fn assert_eval(src: &str, expected: &str) {
    let env = Environment::standard().expect("the standard library loads");
    match evaluate(src, &env) {
        Ok(value) => assert_eq!(value.to_string(), expected, "source: {src}"),
        Err(e) => panic!("Script failed: {e}\nsource: {src}"),
    }
}

#[test]
fn binding_and_basic_arithmetic() {
    assert_eval("x : 3; y : 4; x + y", "7");
    assert_eval("x : 7 * 9; x", "63");
    assert_eval("x : 1; x : x + 1; x", "2");
    assert_eval("", "0");
}

#[test]
fn destructuring() {
    assert_eval("[a, b] : [1, 2]; [b, a]", "[2, 1]");
    assert_eval("[a, b] : 5; a + b", "10");
    assert_failure("[a, b] : [1, 2, 3]");
    assert_failure("[a, 1] : [1, 2]");
}

#[test]
fn destructured_broadcast_is_independent() {
    assert_eval("[a, b] : [[1]]; push @ [a, 2]; [len @ [a], len @ [b]]", "[2, 1]");
}

#[test]
fn function_definition_and_application() {
    assert_eval("f : a -> a * a; f @ [5]", "25");
    assert_eval("f : a -> a * a; f @ 5", "25");
    assert_eval("add3 : [a, b, c] -> a + b + c; add3 @ [1, 2, 3]", "6");
    assert_eval("count : xs => len @ [xs]; count @ [1, 2, 3, 4]", "4");
    assert_eval("(a -> a + 1) @ 1", "2");
}

#[test]
fn wrong_function_arity_is_error() {
    assert_failure("f : [x, y] -> x + y; f @ [3]");
    assert_failure("f : [x, rest] => x; f @ []");
}

#[test]
fn closures_snapshot_their_bindings() {
    assert_eval("x : 1; f : [] -> x; x : 2; f @ []", "1");
    assert_eval("adder : n -> (m -> n + m); add2 : adder @ 2; add2 @ 40", "42");
}

#[test]
fn closures_share_captured_lists() {
    let src = "log : []; note : v -> push @ [log, v]; note @ 1; note @ 2; log";
    assert_eval(src, "[1, 2]");
}

#[test]
fn recursion_through_names_and_self() {
    assert_eval("f : n -> (n < 2) ? [1, n * f @ [n - 1]]; f @ 6", "720");
    assert_eval("(n -> (n < 2) ? [n, $ @ [n - 1] + $ @ [n - 2]]) @ 10", "55");
}

#[test]
fn runaway_recursion_is_an_error() {
    let env = Environment::with_builtins();
    assert!(evaluate("f : n -> f @ [n + 1]; f @ 0", &env).is_err());
}

#[test]
fn scoped_application_binds_in_the_caller() {
    assert_eval("set_y : [] -> (y : 7); set_y @! []; y", "7");
    assert_failure("set_y : [] -> (y : 7); set_y @ []; y");
    assert_eval("outer : [] -> (inner : [] -> (z : 3); inner @!! []; 0); outer @ []; z", "3");
}

#[test]
fn a_call_keeps_the_bindings_it_started_with() {
    let src = "x : 1; f : [] -> (bump : [] -> (x : 5); bump @!! []; x); [f @ [], x]";
    assert_eval(src, "[1, 5]");
}

#[test]
fn partial_application() {
    assert_eval("sub2 : [a, b] -> a - b; from_ten : sub2'[10, _]; from_ten @ 4", "6");
    assert_eval("halve : div'[_, 2]; halve @ 9", "4.5");
    assert_eval("x : 1; p : add'x; x : 100; p @ 1", "2");
    assert_failure("p : sub'[_, _]; p @ 1");
}

#[test]
fn conditional_evaluates_one_branch() {
    assert_eval("1 < 2 ? [{yes}, undefined_name]", "yes");
    assert_eval("0 ? [undefined_name, {no}]", "no");
    assert_failure("1 ? [2]");
}

#[test]
fn while_loop_terminates() {
    assert_eval("i : 0; [i < 3] !! [i : i + 1]", "3");
    assert_eval("i : 0; [i < 3] !! [i : i + 1]; i", "3");
    assert_eval("0 !! [1]", "0");
}

#[test]
fn for_loop_sums() {
    assert_eval("s : 0; [i : 1, i <= 4, i : i + 1] # [s : s + i]; s", "10");
    assert_eval("[i : 0, i < 0, i : i + 1] # [i]", "0");
}

#[test]
fn text_interpolation_and_escapes() {
    assert_eval("n : 3; {n is {n}}", "n is 3");
    assert_eval("{a\\{b\\}}", "a{b}");
    assert_eval("{one\\stwo}", "one two");
    assert_eval("{sum: {1 + 2}}", "sum: 3");
}

#[test]
fn text_repeat_needs_text_on_the_left() {
    assert_eval("{a} * 3", "aaa");
    assert_failure("3 * {a}");
}

#[test]
fn text_concatenation_and_ordering() {
    assert_eval("{ab} + {cd}", "abcd");
    assert_eval("{n = } + 4", "n = 4");
    assert_eval("{abc} < {abd}", "1");
}

#[test]
fn list_equality_and_broadcasting() {
    assert_eval("[1, 2] = [1, 2]", "1");
    assert_eval("[1, 2] = [1, 2, 3]", "0");
    assert_eval("[1, 2] != [1, 2, 3]", "1");
    assert_eval("[1, 2, 3] = 2", "[0, 1, 0]");
    assert_eval("[1, 2] + [10, 20]", "[11, 22]");
    assert_failure("[1, 2] + [1, 2, 3]");
}

#[test]
fn objects() {
    assert_eval("o : object @ []; set @ [o, {a}, 1]; set @ [o, {b}, 2]; o", "{a: 1, b: 2}");
    let src = "o : object @ []; set @ [o, {x}, 5]; [get @ [o, {x}], haskey @ [o, {x}], haskey @ [o, {y}]]";
    assert_eval(src, "[5, 1, 0]");
    assert_failure("o : object @ []; get @ [o, {x}]");
}

#[test]
fn operator_defined_mid_source_is_usable() {
    assert_eval("{<+>} << [3.5, [a, b] -> a * 10 + b]; 1 <+> 2 + 3", "15");
    assert_eval("{%%} << [op_priority @ {+} + 0.5, [a, b] -> a - b]; 10 %% 1 + 2", "7");
}

#[test]
fn associativity_conflict_requires_force() {
    let env = Environment::with_builtins();
    assert!(evaluate("{<->} << [4, {right}, [a, b] -> a - b]", &env).is_err());

    let env = Environment::with_builtins();
    let value = evaluate("{<->} << [4, {right}, [a, b] -> a - b, 0, 0]; 10 - 3 - 2", &env).unwrap();
    assert_eq!(value.to_string(), "9");
}

#[test]
fn reserved_operators_can_not_be_redefined() {
    assert_failure("{:} << [a, b] -> a");
    assert_failure("{<<} << [a, b] -> a");
    assert_failure("{ab} << [a, b] -> a");
    assert_failure("{<+>} << [a, b, c] -> a");
    assert_failure("{<+>} << [~1, [a, b] -> a]");
    assert_failure("{<+>} << [99, [a, b] -> a]");
}

#[test]
fn redefining_an_operator_moves_it() {
    let src = "{<+>} << [3, [a, b] -> a + b]; {<+>} << [0.5, [a, b] -> a * b]; 2 <+> 3 ^ 2";
    assert_eval(src, "36");
}

#[test]
fn quoting_yields_independent_copies() {
    let src = "g : [] -> `{1 + 2}; q1 : g @ []; q2 : g @ []; setop @ [q1, {*}]; \
               [eval_ast @ [q1], eval_ast @ [q2]]";
    assert_eval(src, "[2, 3]");
}

#[test]
fn duplicate_shares_nothing() {
    assert_eval("a : [[1]]; b : dup @ [a]; push @ [get @ [b, 0], 2]; a", "[[1]]");
    assert_eval("a : [1]; b : a; push @ [b, 2]; a", "[1, 2]");
}

#[test]
fn self_containing_values_print_with_an_ellipsis() {
    assert_eval("l : [1]; push @ [l, l]; str @ [l]", "[1, [...]]");
    assert_eval("o : object @ []; set @ [o, {me}, o]; str @ [o]", "{me: {...}}");
    assert_eval("l : [1]; m : [l, l]; str @ [m]", "[[1], [1]]");
}

#[test]
fn walking_a_self_containing_value_is_an_error() {
    let cyclic = "l : [1]; push @ [l, l]; ";
    for walk in ["l = l", "l != l", "dup @ [l]", "[a, b] : [l]", "l + 1", "floor @ [l]", "push @ [`{[]}, l]"] {
        let env = Environment::standard().expect("the standard library loads");
        let err = evaluate(&format!("{cyclic}{walk}"), &env).expect_err(walk);
        assert!(matches!(err, RuntimeError::CyclicValue { .. }), "{walk}: {err}");
    }
    assert_eval("l : [1]; push @ [l, l]; trycatch @ [`{dup @ [l]}, `{{caught}}]", "caught");
}

#[test]
fn eval_and_trycatch() {
    assert_eval("eval @ {1 + 2}", "3");
    assert_eval("trycatch @ [`{undefined_name}, `{{caught}}]", "caught");
    assert_eval("trycatch @ [`{throw @ {boom}}, `{2}]", "2");
    assert_failure("throw @ {boom}");
}

#[test]
fn undefined_names_are_errors() {
    assert_failure("x : y + 1");
    assert_failure("del @ [{max}]; max @ [1, 2]");
}

#[test]
fn parse_errors_surface() {
    assert_failure("[1, 2");
    assert_failure("1 +");
    assert_failure("(1))");
}

#[test]
fn standard_library_basics() {
    assert_success("max @ [1, 2]");
    assert_eval("fact @ 5", "120");
    assert_eval("sum @ [[1, 2, 3, 4]]", "10");
    assert_eval("prod @ [[1, 2, 3, 4]]", "24");
    assert_eval("[not @ 0, bool @ 5, neg @ 3]", "[1, 1, -3]");
    assert_eval("[maxl @ [[3, 9, 2]], minl @ [[3, 9, 2]]]", "[9, 2]");
    assert_eval("reverse @ [[1, 2, 3]]", "[3, 2, 1]");
    assert_eval("[at @ [[1, 2, 3], ~1], at @ [[1, 2, 3], 0]]", "[3, 1]");
}

#[test]
fn standard_library_operators() {
    assert_eval("[10, 20, 30]::1", "20");
    assert_eval("(sqrt . abs) @ ~16", "4");
    assert_eval("[1, 2] ++ [3]", "[1, 2, 3]");
    assert_eval("7 // 2", "3");
    assert_eval("(x -> x * 2) @@ [1, 2, 3]", "[2, 4, 6]");
    assert_eval("(x -> x > 1) @| [1, 2, 3]", "[2, 3]");
    assert_eval("[1, 2] <:> [3, 4]", "[[1, 3], [2, 4]]");
}

#[test]
fn short_circuit_logic() {
    assert_eval("0 && undefined_name", "0");
    assert_eval("1 || undefined_name", "1");
    assert_eval("x : 5; (x > 1) && (x < 10)", "1");
    assert_eval("[1 <> 0, 1 <> 1]", "[1, 0]");
    assert_eval("[all @ [[1, 1, 0]], any @ [[0, 0, 1]]]", "[0, 1]");
}

#[test]
fn list_helpers() {
    assert_eval("index_of @ [[4, 5, 6], 6]", "2");
    assert_eval("index_of @ [[4, 5, 6], 7]", "-1");
    assert_eval("includes @ [[[1, 2], [3, 4]], [3, 4]]", "1");
    assert_eval("uniq @ [[1, 2, 1, 3, 2]]", "[1, 2, 3]");
    assert_eval("nwise @ [[1, 2, 3], 2]", "[[1, 2], [2, 3]]");
    assert_eval("every @ [[2, 4], x -> x % 2 = 0]", "1");
    assert_eval("some @ [[1, 3], x -> x % 2 = 0]", "0");
}

#[test]
fn number_bases() {
    assert_eval("bin @ 6", "[1, 1, 0]");
    assert_eval("fbin @ [[1, 1, 0]]", "6");
    assert_eval("hex @ 255", "[15, 15]");
}

#[test]
fn quicksort() {
    assert_eval("qsort @ [[5, 3, 8, 1, 2]]", "[1, 2, 3, 5, 8]");
    assert_eval("qsort @ [[]]", "[]");
}

#[test]
fn without_the_standard_library() {
    let env = Environment::with_builtins();
    assert!(evaluate("fact @ 3", &env).is_err());
    assert!(evaluate("1 && 1", &env).is_err());
    assert_eq!(evaluate("len @ [[1, 2]]", &env).unwrap().to_string(), "2");
}

#[test]
fn host_builtins_can_be_registered() {
    let env = Environment::standard().unwrap();
    env.register_builtin("twice", |args, env| {
           let f = args[0].clone();
           let once = env.apply(&f, vec![args[1].clone()])?;
           env.apply(&f, vec![once])
       });
    assert_eq!(evaluate("twice @ [x -> x * 3, 2]", &env).unwrap().to_string(), "18");
}
