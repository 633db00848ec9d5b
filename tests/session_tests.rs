// tests/session_tests.rs

use test_utils::*;

use fn_calc::{FunctionInfo, Output, Session};
use std::collections::BTreeMap;

#[cfg(test)]
mod session_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_variables_in_expressions() {
        assert_eq!(run_num(&["let x = 5", "let y = 3", "x + y"]), 8.0);
        assert_eq!(run_num(&["let x = 5", "let y = x * 2", "y"]), 10.0);
    }

    #[test]
    fn test_let_confirmation() {
        assert_eq!(run(&["let x = 2 + 3"]), Ok(Output::Text("x = 5".to_string())));
        assert_eq!(run(&["let half = 1 / 2"]), Ok(Output::Text("half = 0.5".to_string())));
    }

    #[test]
    fn test_def_confirmation() {
        assert_eq!(
            run(&["def hyp(a, b) = (a ^ 2 + b ^ 2) ^ 0.5"]),
            Ok(Output::Text("Function hyp(a, b) defined".to_string()))
        );
        assert_eq!(run_num(&["def sumsq(a, b) = a ^ 2 + b ^ 2", "sumsq(3, 4)"]), 25.0);
    }

    #[test]
    fn test_def_body_is_not_evaluated_at_definition() {
        // `later` does not exist yet; only the call needs it.
        let mut session = Session::new();
        session.evaluate("def f(a) = a + later").unwrap();
        session.evaluate("let later = 100").unwrap();
        assert_eq!(session.evaluate("f(1)"), Ok(Output::Number(101.0)));
    }

    #[test]
    fn test_functions_can_call_functions() {
        assert_eq!(run_num(&["def sq(x) = x * x", "def sumsq(a, b) = sq(a) + sq(b)", "sumsq(3, 4)"]), 25.0);
    }

    #[test]
    fn test_redefining_a_function_replaces_it() {
        assert_eq!(run_num(&["def f(x) = x + 1", "def f(x, y) = x * y", "f(3, 4)"]), 12.0);
    }

    #[test]
    fn test_named_function_wins_over_closure_variable() {
        assert_eq!(run_num(&["let f = fn(x) => x + 1", "def f(x) = x * 10", "f(2)"]), 20.0);
    }

    #[test]
    fn test_let_overwrites_either_kind() {
        let mut session = Session::new();
        run_lines(&mut session, &["let v = fn(x) => x", "let v = 3"]).unwrap();
        assert_eq!(session.closures(), Vec::<String>::new());
        assert_eq!(session.variables().get("v"), Some(&3.0));

        run_lines(&mut session, &["let v = fn(x) => x"]).unwrap();
        assert_eq!(session.closures(), vec!["v".to_string()]);
        assert!(session.variables().is_empty());
    }

    #[test]
    fn test_introspection() {
        let mut session = Session::new();
        run_lines(
            &mut session,
            &[
                "let b = 2",
                "let a = 1",
                "let twice = fn(x) => x * 2",
                "def g(x) = (x + a) * b",
                "def f() = 42",
            ],
        )
        .unwrap();

        let expected: BTreeMap<String, f64> =
            [("a".to_string(), 1.0), ("b".to_string(), 2.0)].into_iter().collect();
        assert_eq!(session.variables(), expected);
        assert_eq!(session.closures(), vec!["twice".to_string()]);
        assert_eq!(
            session.functions(),
            vec![
                FunctionInfo { name: "f".to_string(), params: vec![], body: "42".to_string() },
                FunctionInfo {
                    name: "g".to_string(),
                    params: vec!["x".to_string()],
                    body: "(x + a) * b".to_string(),
                },
            ]
        );
        assert_eq!(session.functions()[1].to_string(), "g(x) = (x + a) * b");
    }

    #[test]
    fn test_reset() {
        let mut session = Session::new();
        run_lines(&mut session, &["let a = 1", "def f(x) = x", "let g = fn() => 1"]).unwrap();
        session.reset();
        assert!(session.variables().is_empty());
        assert!(session.functions().is_empty());
        assert!(session.closures().is_empty());
        assert!(session.evaluate("a").is_err());
    }

    #[test]
    fn test_sessions_are_independent() {
        let mut one = Session::new();
        let mut two = Session::new();
        one.evaluate("let x = 1").unwrap();
        two.evaluate("let x = 2").unwrap();
        assert_eq!(one.evaluate("x"), Ok(Output::Number(1.0)));
        assert_eq!(two.evaluate("x"), Ok(Output::Number(2.0)));
    }

    #[test]
    fn test_whitespace_is_insignificant() {
        assert_eq!(run_num(&["   let   x=4   ", "x*x"]), 16.0);
        assert_eq!(eval_ok("\t2+2\n"), 4.0);
    }

    #[test]
    fn test_float_formatting() {
        assert_eq!(Session::new().evaluate("7 / 2").unwrap().to_string(), "3.5");
        assert_eq!(Session::new().evaluate("10").unwrap().to_string(), "10");
    }
}
