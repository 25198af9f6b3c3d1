use tbl::{
    error::RuntimeError,
    interpreter::{
        evaluator::{binary::core::BinaryOperator, core::evaluate, environment::Environment},
        value::{complex::ComplexNumber, core::Value},
    },
};

fn eval(src: &str) -> String {
    let env = Environment::with_builtins();
    match evaluate(src, &env) {
        Ok(value) => value.to_string(),
        Err(e) => panic!("evaluation failed: {e}\nsource: {src}"),
    }
}

fn eval_err(src: &str) -> RuntimeError {
    let env = Environment::with_builtins();
    match evaluate(src, &env) {
        Ok(value) => panic!("expected an error, got {value}\nsource: {src}"),
        Err(e) => e,
    }
}

#[test]
fn real_arithmetic() {
    assert_eq!(eval("1 + 2 * 3"), "7");
    assert_eq!(eval("(1 + 2) * 3"), "9");
    assert_eq!(eval("7 % 3"), "1");
    assert_eq!(eval("2 ^ 10"), "1024");
    assert_eq!(eval("9 / 2"), "4.5");
    assert_eq!(eval("~3 + 1"), "-2");
}

#[test]
fn division_by_zero_follows_floats() {
    assert_eq!(eval("1 / 0 > 1000000"), "1");
    assert!(matches!(eval_err("1i % 2"), RuntimeError::InvalidArguments { .. }));
}

#[test]
fn complex_arithmetic() {
    assert_eq!(eval("(1 + 2i) * (3 - 1i)"), "5 + 5i");
    assert_eq!(eval("1i * 1i"), "-1");
    assert_eq!(eval("(4 + 2i) / 2"), "2 + 1i");
    assert_eq!(eval("sqrt @ ~4"), "2i");
    assert_eq!(eval("abs @ (3 + 4i)"), "5");
    assert_eq!(eval("[re @ (1 - 2i), im @ (1 - 2i)]"), "[1, -2]");
}

#[test]
fn add_then_subtract_restores_the_operand() {
    let pairs = [(1.5, -2.0, 0.25, 7.0), (-3.0, 0.0, 1e6, -1e-3), (0.1, 0.2, 0.3, 0.4)];
    for (ar, ai, br, bi) in pairs {
        let a = Value::from(ComplexNumber::new(ar, ai));
        let b = Value::from(ComplexNumber::new(br, bi));
        let sum = Environment::eval_binary(BinaryOperator::Add, &a, &b).unwrap();
        let back = Environment::eval_binary(BinaryOperator::Sub, &sum, &b).unwrap();
        let same = Environment::eval_binary(BinaryOperator::Equal, &back, &a).unwrap();
        assert!(same.is_truthy(), "{a} + {b} - {b} gave {back}");
    }
}

#[test]
fn fuzzy_equality() {
    assert_eq!(eval("0.1 + 0.2 = 0.3"), "1");
    assert_eq!(eval("1 = 1.001"), "0");
    assert_eq!(eval("1 != 1.001"), "1");
}

#[test]
fn ordering() {
    assert_eq!(eval("[1 < 2, 2 < 1, 2 <= 2, 3 >= 4, 3 > 2]"), "[1, 0, 1, 0, 1]");
    assert_eq!(eval("1i < 2i"), "1");
    assert_eq!(eval("(3 + 4i) < 6"), "1");
}

#[test]
fn broadcasting_over_lists() {
    assert_eq!(eval("[1, 2, 3] * 2"), "[2, 4, 6]");
    assert_eq!(eval("10 - [1, 2]"), "[9, 8]");
    assert_eq!(eval("[[1, 2], [3, 4]] + 1"), "[[2, 3], [4, 5]]");
    assert_eq!(eval("[[1, 2], [3, 4]] * [10, 100]"), "[[10, 20], [300, 400]]");
    assert_eq!(eval("[1, 2] < [2, 1]"), "[1, 0]");
}

#[test]
fn broadcasting_never_mutates_operands() {
    assert_eq!(eval("a : [1, 2]; b : a + 1; [a, b]"), "[[1, 2], [2, 3]]");
}

#[test]
fn unequal_lengths_are_rejected() {
    assert!(matches!(eval_err("[1, 2] + [1, 2, 3]"),
                     RuntimeError::UnequalLength { left: 2, right: 3 }));
    assert!(matches!(eval_err("[[1, 2]] * [[1]]"), RuntimeError::UnequalLength { .. }));
}

#[test]
fn one_bad_element_fails_the_whole_operation() {
    let err = eval_err("[1, {a}, 3] - 1");
    assert!(matches!(&err, RuntimeError::InvalidArguments { left, .. } if left == "a"), "{err}");
}

#[test]
fn math_builtins() {
    assert_eq!(eval("floor @ 2.7"), "2");
    assert_eq!(eval("ceil @ [[1.2, 2]]"), "[2, 2]");
    assert_eq!(eval("round @ 2.5"), "3");
    assert_eq!(eval("log2 @ 8"), "3");
    assert_eq!(eval("sin @ 0"), "0");
    assert_eq!(eval("exp @ 0"), "1");
    assert!(matches!(eval_err("floor @ 1i"), RuntimeError::TypeError { .. }));
}

#[test]
fn trigonometry_and_logarithms_take_reals() {
    assert_eq!(eval("cos @ 0"), "1");
    assert_eq!(eval("ln @ 1"), "0");
    for name in ["sin", "cos", "tan", "sinh", "cosh", "tanh", "ln"] {
        let err = eval_err(&format!("{name} @ (1 + 1i)"));
        assert!(matches!(err, RuntimeError::TypeError { .. }), "{name}: {err}");
    }
}

#[test]
fn constants() {
    assert_eq!(eval("floor @ (PI * 1000)"), "3141");
    assert_eq!(eval("floor @ (E * 1000)"), "2718");
}
