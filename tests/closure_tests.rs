// tests/closure_tests.rs

use test_utils::*;

use fn_calc::{Error, Output};

#[cfg(test)]
mod closure_tests {
    use super::*;

    #[test]
    fn test_closure_keeps_snapshot() {
        assert_eq!(run_num(&["let x = 5", "let addX = fn(y) => x + y", "let x = 10", "addX(3)"]), 8.0);
    }

    #[test]
    fn test_named_function_sees_live_globals() {
        assert_eq!(run_num(&["let y = 10", "def addY(a) = a + y", "let y = 20", "addY(5)"]), 25.0);
    }

    #[test]
    fn test_closure_falls_through_to_live_globals() {
        // `z` did not exist when the lambda was evaluated.
        assert_eq!(run_num(&["let f = fn(a) => a + z", "let z = 7", "f(1)"]), 8.0);
    }

    #[test]
    fn test_curried_adder() {
        assert_eq!(
            run_num(&["let makeAdder = fn(n) => fn(x) => x + n", "let add5 = makeAdder(5)", "add5(10)"]),
            15.0
        );
    }

    #[test]
    fn test_each_closure_has_its_own_snapshot() {
        let lines = [
            "let makeAdder = fn(n) => fn(x) => x + n",
            "let add1 = makeAdder(1)",
            "let add100 = makeAdder(100)",
            "add1(1) + add100(1)",
        ];
        assert_eq!(run_num(&lines), 103.0);
    }

    #[test]
    fn test_immediate_calls() {
        assert_eq!(eval_ok("(fn(x) => x * x)(4)"), 16.0);
        assert_eq!(eval_ok("(fn() => 3)()"), 3.0);
        assert_eq!(eval_ok("(fn(a, b) => a - b)(10, 4) * 2"), 12.0);
        assert_eq!(eval_ok("(fn(x) => (fn(y) => x * y)(3))(5)"), 15.0);
    }

    #[test]
    fn test_parenthesized_lambda_is_a_value() {
        assert_eq!(run(&["(fn(q) => q)"]), Ok(Output::Text("<function(q)>".to_string())));
        assert_eq!(run_num(&["let id = (fn(q) => q)", "id(9)"]), 9.0);
    }

    #[test]
    fn test_closure_returned_from_named_function() {
        assert_eq!(run_num(&["def scaler(k) = fn(x) => x * k", "let triple = scaler(3)", "triple(7)"]), 21.0);
    }

    #[test]
    fn test_closure_passed_as_argument() {
        let lines = ["def apply(f, v) = f(v)", "let inc = fn(x) => x + 1", "apply(inc, 41)"];
        assert_eq!(run_num(&lines), 42.0);
        assert_eq!(run_num(&["def apply(f, v) = f(v)", "apply(fn(x) => x * 2, 4)"]), 8.0);
    }

    #[test]
    fn test_arguments_are_evaluated_in_caller_frame() {
        let lines = ["let mk = fn(a) => fn(b) => a + b", "let a = 1000", "mk(1)(2)"];
        // Call syntax only applies to names, so chained calls do not parse.
        assert!(matches!(run(&lines), Err(Error::Parse(_))));

        let lines = ["let mk = fn(a) => fn(b) => a + b", "let g = mk(1)", "let a = 1000", "g(a)"];
        assert_eq!(run_num(&lines), 1001.0);
    }

    #[test]
    fn test_local_closure_is_not_captured() {
        // `f` is a closure-valued parameter, so the inner lambda does not
        // snapshot it and the call inside fails.
        let lines = ["let compose = fn(f) => fn(x) => f(x)", "let h = compose(fn(v) => v + 1)", "h(1)"];
        assert_eq!(run(&lines), Err(Error::UndefinedCallable("f".to_string())));
    }

    #[test]
    fn test_global_closure_is_reached_through_live_globals() {
        let lines = [
            "let inc = fn(v) => v + 1",
            "let twice = fn(x) => inc(inc(x))",
            "twice(1)",
        ];
        assert_eq!(run_num(&lines), 3.0);

        // Rebinding the global changes what the closure sees.
        let lines = [
            "let inc = fn(v) => v + 1",
            "let twice = fn(x) => inc(inc(x))",
            "let inc = fn(v) => v * 10",
            "twice(1)",
        ];
        assert_eq!(run_num(&lines), 100.0);
    }

    #[test]
    fn test_number_bound_name_is_not_callable() {
        assert_eq!(run(&["let x = 4", "x(1)"]), Err(Error::UndefinedCallable("x".to_string())));

        // The numeric parameter `g` shadows the global closure `g`.
        let lines = ["let g = fn(v) => v + 1", "def h(g) = g(2)", "h(5)"];
        assert_eq!(run(&lines), Err(Error::UndefinedCallable("g".to_string())));
    }

    #[test]
    fn test_closure_variable_in_arithmetic_is_type_error() {
        assert!(matches!(run(&["let f = fn(x) => x", "f + 1"]), Err(Error::Type(_))));
    }

    #[test]
    fn test_closure_arity() {
        assert_eq!(
            run(&["let f = fn(a, b) => a", "f(1, 2, 3)"]),
            Err(Error::Arity { name: "f".to_string(), expected: 2, got: 3 })
        );
        assert!(matches!(eval_err("(fn(a) => a)()"), Error::Arity { expected: 1, got: 0, .. }));
    }
}
